//! The binder: decides, per incoming declaration, whether to skip it, emit IR for it, or
//! recurse into its members.
//!
//! The driver calls [`bind_decl`] for every declaration in the translation unit exactly once;
//! the mapper re-enters it for declarations that are referenced before they are visited. The
//! memo table in the context makes both paths meet in the middle: whoever gets there first
//! binds, everyone else hits the memo.

use nim_ir::{
    AliasDecl, ConstructorDecl, EnumDecl, EnumField, FuncDecl, MethodDecl, Param, RecordDecl,
    RecordField, RoutineDecl, SymId, Type, TypeDecl, TypeId, VariableDecl,
};

use super::map_type::{map_decl, map_type, std_alias_atom};
use crate::cast::{
    ConstructorInfo, DeclId, DeclKind, EnumInfo, MethodInfo, ParamInfo, QualType, RecordInfo,
    Storage, TranslationUnit, TypedefInfo, VariableInfo,
};
use crate::context::BindContext;
use crate::error::{BindError, Result};

pub fn bind_decl(ctx: &mut BindContext, tu: &TranslationUnit, id: DeclId) -> Result<()> {
    if ctx.lookup(id).is_some() {
        // Already bound, either lazily through the mapper or as a fused typedef tag.
        return Ok(());
    }
    let decl = tu.decl(id);
    if let Some(name) = &decl.name {
        if ctx.config().is_ignored(name) {
            return Ok(());
        }
    }
    match &decl.kind {
        // Structural kinds handled inline by their owner, or carrying no bindable content.
        DeclKind::Namespace | DeclKind::Using | DeclKind::Field(_) | DeclKind::Param => Ok(()),
        // Members are bound as part of their owning record, never independently.
        DeclKind::Method(_) | DeclKind::Constructor(_) => Ok(()),
        DeclKind::Record(info) => bind_record(ctx, tu, id, info, None),
        DeclKind::Enum(info) => bind_enum(ctx, tu, id, info, None),
        DeclKind::Typedef(info) => bind_typedef(ctx, tu, id, info),
        DeclKind::Function(info) => bind_function(ctx, tu, id, info),
        DeclKind::Variable(info) => bind_variable(ctx, tu, id, info),
        DeclKind::Other(kind) => Err(BindError::UnhandledDeclarationKind {
            kind: kind.clone(),
            decl: decl.display_name().to_owned(),
        }),
    }
}

fn bind_record(
    ctx: &mut BindContext,
    tu: &TranslationUnit,
    id: DeclId,
    info: &RecordInfo,
    name_override: Option<&str>,
) -> Result<()> {
    let decl = tu.decl(id);
    let Some(header) = ctx.header_of(decl) else {
        return Ok(());
    };
    if !ctx.access_guard(decl) {
        return Ok(());
    }
    // Anonymous records only become bindable through a typedef that names them.
    let Some(name) = name_override.or(decl.name.as_deref()) else {
        return Ok(());
    };
    let name = name.to_owned();

    let name_sym = ctx.module_mut().new_sym(name.clone());
    let atom = ctx.module_mut().add_type(Type::Atom(name_sym));
    // Associate before touching the fields, so a struct containing a pointer to itself
    // resolves against the memo instead of recursing forever.
    ctx.associate(id, decl, atom)?;

    let generic_params: Option<Vec<SymId>> = info.template_params.as_ref().map(|params| {
        params
            .iter()
            .map(|p| ctx.module_mut().new_sym(p.clone()))
            .collect()
    });

    let fields = if info.is_definition {
        let mut fields = Vec::new();
        for field_id in &info.fields {
            let field = tu.decl(*field_id);
            if !ctx.access_guard(field) {
                continue;
            }
            let DeclKind::Field(field_info) = &field.kind else {
                continue;
            };
            let ty = map_type(ctx, tu, &field_info.ty)?;
            let name = ctx
                .module_mut()
                .new_sym(field.name.clone().unwrap_or_default());
            fields.push(RecordField { name, ty });
        }
        Some(fields)
    } else {
        None
    };

    let cpp_name = if decl.qualified_name.is_empty() {
        // A fused anonymous tag is only addressable through its typedef name.
        name
    } else {
        decl.qualified_name.clone()
    };
    ctx.add_type_decl(TypeDecl::Record(RecordDecl {
        name: name_sym,
        cpp_name: cpp_name.clone(),
        header: header.to_owned(),
        fields,
        generic_params: generic_params.clone(),
    }));

    let owner_generics = generic_params.unwrap_or_default();
    for member_id in &info.methods {
        bind_member(ctx, tu, *member_id, atom, &owner_generics, &cpp_name, header)?;
    }
    Ok(())
}

fn bind_member(
    ctx: &mut BindContext,
    tu: &TranslationUnit,
    id: DeclId,
    owner: TypeId,
    owner_generics: &[SymId],
    owner_cpp_name: &str,
    header: &str,
) -> Result<()> {
    let decl = tu.decl(id);
    match &decl.kind {
        DeclKind::Method(MethodInfo { is_static, routine, .. }) => {
            if !routine.template_params.is_empty() {
                return Err(BindError::UnsupportedTemplate {
                    decl: decl.display_name().to_owned(),
                });
            }
            if !ctx.access_guard(decl) {
                return Ok(());
            }
            let params = bind_params(ctx, tu, &routine.params)?;
            let ret = bind_return(ctx, tu, &routine.ret)?;
            let name = ctx
                .module_mut()
                .new_sym(decl.name.clone().unwrap_or_default());
            ctx.add_routine_decl(RoutineDecl::Method(MethodDecl {
                name,
                cpp_name: decl.qualified_name.clone(),
                header: header.to_owned(),
                is_static: *is_static,
                owner,
                params,
                ret,
                owner_generic_params: owner_generics.to_vec(),
                generic_params: vec![],
            }));
            Ok(())
        }
        DeclKind::Constructor(ConstructorInfo {
            params,
            template_params,
            ..
        }) => {
            if !template_params.is_empty() {
                return Err(BindError::UnsupportedTemplate {
                    decl: decl.display_name().to_owned(),
                });
            }
            if !ctx.access_guard(decl) {
                return Ok(());
            }
            let params = bind_params(ctx, tu, params)?;
            ctx.add_routine_decl(RoutineDecl::Constructor(ConstructorDecl {
                cpp_name: owner_cpp_name.to_owned(),
                header: header.to_owned(),
                owner,
                params,
                owner_generic_params: owner_generics.to_vec(),
                generic_params: vec![],
            }));
            Ok(())
        }
        // Fields were gathered with the record itself; anything else a record can contain
        // (nested types, friends) is picked up by the driver's own visit.
        _ => Ok(()),
    }
}

fn bind_enum(
    ctx: &mut BindContext,
    tu: &TranslationUnit,
    id: DeclId,
    info: &EnumInfo,
    name_override: Option<&str>,
) -> Result<()> {
    let decl = tu.decl(id);
    let Some(header) = ctx.header_of(decl) else {
        return Ok(());
    };
    if !ctx.access_guard(decl) {
        return Ok(());
    }
    let Some(name) = name_override.or(decl.name.as_deref()) else {
        return Ok(());
    };
    let name = name.to_owned();

    let name_sym = ctx.module_mut().new_sym(name.clone());
    let atom = ctx.module_mut().add_type(Type::Atom(name_sym));
    ctx.associate(id, decl, atom)?;

    let fields = info
        .enumerators
        .iter()
        .map(|e| EnumField {
            name: ctx.module_mut().new_sym(e.name.clone()),
            value: e.explicit.then_some(e.value),
        })
        .collect();

    let cpp_name = if decl.qualified_name.is_empty() {
        name
    } else {
        decl.qualified_name.clone()
    };
    ctx.add_type_decl(TypeDecl::Enum(EnumDecl {
        name: name_sym,
        cpp_name,
        header: header.to_owned(),
        fields,
    }));
    Ok(())
}

fn bind_typedef(
    ctx: &mut BindContext,
    tu: &TranslationUnit,
    id: DeclId,
    info: &TypedefInfo,
) -> Result<()> {
    let decl = tu.decl(id);
    if ctx.header_of(decl).is_none() {
        return Ok(());
    }
    let Some(name) = decl.name.as_deref() else {
        return Ok(());
    };

    // The common cstddef aliases collapse straight to their builtin atom; emitting an alias
    // declaration for every `size_t` sighting would bury the output in noise.
    if ctx.config().fold_std_aliases() {
        if let Some(atom_name) = std_alias_atom(&decl.qualified_name) {
            let atom = ctx.module_mut().atom(atom_name);
            return ctx.associate(id, decl, atom);
        }
    }

    if let Some(tag_id) = info.owned_tag {
        let tag = tu.decl(tag_id);
        match tag.name.as_deref() {
            Some(tag_name) if tag_name == name => {
                // `typedef struct Foo Foo;`: one declaration comes out, both names resolve to
                // the same type.
                let ty = map_decl(ctx, tu, tag_id)?;
                return ctx.associate(id, decl, ty);
            }
            Some(_) => {
                // Differently named tag: an ordinary alias to it, below.
            }
            None => {
                // `typedef struct {...} Foo;`: the tag takes the typedef's name.
                match &tag.kind {
                    DeclKind::Record(record_info) => {
                        bind_record(ctx, tu, tag_id, record_info, Some(name))?
                    }
                    DeclKind::Enum(enum_info) => bind_enum(ctx, tu, tag_id, enum_info, Some(name))?,
                    _ => {}
                }
                let ty = ctx
                    .lookup(tag_id)
                    .ok_or_else(|| BindError::UnresolvableDeclaration {
                        decl: decl.display_name().to_owned(),
                    })?;
                return ctx.associate(id, decl, ty);
            }
        }
    }

    let underlying = map_type(ctx, tu, &info.underlying)?;
    let name_sym = ctx.module_mut().new_sym(name.to_owned());
    let alias_atom = ctx.module_mut().add_type(Type::Atom(name_sym));
    ctx.associate(id, decl, alias_atom)?;
    ctx.add_type_decl(TypeDecl::Alias(AliasDecl {
        name: name_sym,
        ty: underlying,
    }));
    Ok(())
}

fn bind_function(
    ctx: &mut BindContext,
    tu: &TranslationUnit,
    id: DeclId,
    info: &crate::cast::RoutineInfo,
) -> Result<()> {
    let decl = tu.decl(id);
    let Some(header) = ctx.header_of(decl) else {
        return Ok(());
    };
    if !info.template_params.is_empty() {
        return Err(BindError::UnsupportedTemplate {
            decl: decl.display_name().to_owned(),
        });
    }
    // Free functions are not access-guarded; namespace-scope visibility was already settled by
    // the header-origin check.
    let Some(name) = decl.name.as_deref() else {
        return Ok(());
    };
    let params = bind_params(ctx, tu, &info.params)?;
    let ret = bind_return(ctx, tu, &info.ret)?;
    let name = ctx.module_mut().new_sym(name.to_owned());
    ctx.add_routine_decl(RoutineDecl::Func(FuncDecl {
        name,
        cpp_name: decl.qualified_name.clone(),
        header: header.to_owned(),
        params,
        ret,
        generic_params: vec![],
    }));
    Ok(())
}

fn bind_variable(
    ctx: &mut BindContext,
    tu: &TranslationUnit,
    id: DeclId,
    info: &VariableInfo,
) -> Result<()> {
    let decl = tu.decl(id);
    let Some(header) = ctx.header_of(decl) else {
        return Ok(());
    };
    // Function-local variables (including local statics) never surface, and a file-scope
    // `static` has internal linkage so there is nothing to import.
    if info.is_local || info.storage == Storage::Static {
        return Ok(());
    }
    if !ctx.access_guard(decl) {
        return Ok(());
    }
    let Some(name) = decl.name.as_deref() else {
        return Ok(());
    };
    let ty = map_type(ctx, tu, &info.ty)?;
    let name = ctx.module_mut().new_sym(name.to_owned());
    ctx.add_var_decl(VariableDecl {
        name,
        cpp_name: decl.qualified_name.clone(),
        header: header.to_owned(),
        ty,
    });
    Ok(())
}

fn bind_params(
    ctx: &mut BindContext,
    tu: &TranslationUnit,
    params: &[ParamInfo],
) -> Result<Vec<Param>> {
    params
        .iter()
        .map(|p| {
            let ty = map_type(ctx, tu, &p.ty)?;
            let name = p
                .name
                .as_ref()
                .map(|n| ctx.module_mut().new_sym(n.clone()));
            Ok(Param { name, ty })
        })
        .collect()
}

fn bind_return(
    ctx: &mut BindContext,
    tu: &TranslationUnit,
    ret: &QualType,
) -> Result<Option<TypeId>> {
    if ret.is_void() {
        Ok(None)
    } else {
        map_type(ctx, tu, ret).map(Some)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cast::{Access, Builtin, Decl, FieldInfo, RoutineInfo, TypeNode};
    use crate::config::{Config, ConfigBuilder};

    const HEADER: &str = "/usr/include/demo.h";

    fn config() -> Config {
        ConfigBuilder::new().header("demo.h").build().unwrap()
    }

    fn decl(name: Option<&str>, kind: DeclKind) -> Decl {
        Decl {
            name: name.map(str::to_owned),
            qualified_name: name.unwrap_or_default().to_owned(),
            file: HEADER.to_owned(),
            access: Access::Unscoped,
            kind,
        }
    }

    fn record_info() -> RecordInfo {
        RecordInfo {
            fields: vec![],
            methods: vec![],
            template_params: None,
            is_definition: true,
        }
    }

    fn bind_all(tu: &TranslationUnit, ctx: &mut BindContext) -> Result<()> {
        for id in tu.decl_ids() {
            bind_decl(ctx, tu, id)?;
        }
        Ok(())
    }

    #[test]
    fn identically_named_tag_and_typedef_fuse() {
        let mut tu = TranslationUnit::new();
        let tag = tu.add_decl(decl(Some("Foo"), DeclKind::Record(record_info())));
        let typedef = tu.add_decl(decl(
            Some("Foo"),
            DeclKind::Typedef(TypedefInfo {
                underlying: QualType::unqualified(TypeNode::Elaborated(Box::new(
                    QualType::unqualified(TypeNode::Named(tag)),
                ))),
                owned_tag: Some(tag),
            }),
        ));

        let config = config();
        let mut ctx = BindContext::new(&config);
        bind_all(&tu, &mut ctx).unwrap();

        assert_eq!(ctx.module().type_decls().len(), 1);
        assert_eq!(ctx.lookup(tag), ctx.lookup(typedef));
    }

    #[test]
    fn anonymous_tag_takes_the_typedef_name() {
        let mut tu = TranslationUnit::new();
        let tag = tu.add_decl(decl(None, DeclKind::Record(record_info())));
        let typedef = tu.add_decl(decl(
            Some("Handle"),
            DeclKind::Typedef(TypedefInfo {
                underlying: QualType::unqualified(TypeNode::Elaborated(Box::new(
                    QualType::unqualified(TypeNode::Named(tag)),
                ))),
                owned_tag: Some(tag),
            }),
        ));

        let config = config();
        let mut ctx = BindContext::new(&config);
        bind_all(&tu, &mut ctx).unwrap();

        assert_eq!(ctx.module().type_decls().len(), 1);
        assert_eq!(ctx.lookup(tag), ctx.lookup(typedef));
        match &ctx.module().type_decls()[0] {
            TypeDecl::Record(record) => {
                assert_eq!(ctx.module().sym(record.name).name(), "Handle");
            }
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[test]
    fn std_aliases_collapse_to_atoms() {
        let mut tu = TranslationUnit::new();
        let typedef = tu.add_decl(decl(
            Some("size_t"),
            DeclKind::Typedef(TypedefInfo {
                underlying: QualType::unqualified(TypeNode::Builtin(Builtin::ULong)),
                owned_tag: None,
            }),
        ));

        let config = config();
        let mut ctx = BindContext::new(&config);
        bind_all(&tu, &mut ctx).unwrap();

        // No alias declaration, just the atom.
        assert!(ctx.module().type_decls().is_empty());
        let bound = ctx.lookup(typedef).unwrap();
        assert_eq!(bound, ctx.module_mut().atom("csize_t"));
    }

    #[test]
    fn self_referential_record_terminates() {
        let mut tu = TranslationUnit::new();
        let node_field = tu.add_decl(Decl {
            name: Some("next".to_owned()),
            qualified_name: "Node::next".to_owned(),
            file: HEADER.to_owned(),
            access: Access::Public,
            kind: DeclKind::Field(FieldInfo {
                // Filled in below once the record id is known.
                ty: QualType::unqualified(TypeNode::Builtin(Builtin::Int)),
            }),
        });
        let record = tu.add_decl(decl(
            Some("Node"),
            DeclKind::Record(RecordInfo {
                fields: vec![node_field],
                methods: vec![],
                template_params: None,
                is_definition: true,
            }),
        ));
        // Point the field back at the record: `Node* next;`
        if let DeclKind::Field(info) = &mut tu.decl_mut(node_field).kind {
            info.ty = QualType::unqualified(TypeNode::Pointer(Box::new(QualType::unqualified(
                TypeNode::Named(record),
            ))));
        }

        let config = config();
        let mut ctx = BindContext::new(&config);
        bind_all(&tu, &mut ctx).unwrap();

        assert_eq!(ctx.module().type_decls().len(), 1);
        assert!(ctx.lookup(record).is_some());
    }

    #[test]
    fn templated_free_function_is_fatal() {
        let mut tu = TranslationUnit::new();
        tu.add_decl(decl(
            Some("max"),
            DeclKind::Function(RoutineInfo {
                params: vec![],
                ret: QualType::unqualified(TypeNode::Builtin(Builtin::Void)),
                template_params: vec!["T".to_owned()],
            }),
        ));

        let config = config();
        let mut ctx = BindContext::new(&config);
        assert_eq!(
            bind_all(&tu, &mut ctx),
            Err(BindError::UnsupportedTemplate {
                decl: "max".to_owned()
            })
        );
    }

    #[test]
    fn internal_linkage_globals_are_skipped() {
        let mut tu = TranslationUnit::new();
        let hidden = tu.add_decl(decl(
            Some("hidden"),
            DeclKind::Variable(VariableInfo {
                ty: QualType::unqualified(TypeNode::Builtin(Builtin::Int)),
                storage: Storage::Static,
                is_local: false,
            }),
        ));
        let visible = tu.add_decl(decl(
            Some("visible"),
            DeclKind::Variable(VariableInfo {
                ty: QualType::unqualified(TypeNode::Builtin(Builtin::Int)),
                storage: Storage::Extern,
                is_local: false,
            }),
        ));

        let config = config();
        let mut ctx = BindContext::new(&config);
        bind_all(&tu, &mut ctx).unwrap();

        assert!(ctx.lookup(hidden).is_none());
        assert!(ctx.lookup(visible).is_none());
        assert_eq!(ctx.module().var_decls().len(), 1);
        let var = &ctx.module().var_decls()[0];
        assert_eq!(ctx.module().sym(var.name).name(), "visible");
    }

    #[test]
    fn foreign_header_declarations_are_skipped() {
        let mut tu = TranslationUnit::new();
        let mut foreign = decl(Some("Foo"), DeclKind::Record(record_info()));
        foreign.file = "/usr/include/other.h".to_owned();
        let id = tu.add_decl(foreign);

        let config = config();
        let mut ctx = BindContext::new(&config);
        bind_all(&tu, &mut ctx).unwrap();

        assert!(ctx.lookup(id).is_none());
        assert!(ctx.module().is_empty());
    }
}
