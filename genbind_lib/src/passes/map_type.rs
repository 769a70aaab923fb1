//! The mapper: resolves source type nodes to output types.
//!
//! Total over the supported kinds; everything else is a fatal [`BindError::UnsupportedType`].
//! This is a binding generator, not a best-effort tool, and an approximated type would be a
//! wrong binding.

use nim_ir::{Expr, GenericArg, Type, TypeId};

use super::bind;
use crate::cast::{Builtin, DeclId, QualType, TemplateArg, TranslationUnit, TypeNode};
use crate::context::BindContext;
use crate::error::{BindError, Result};

pub fn map_type(ctx: &mut BindContext, tu: &TranslationUnit, ty: &QualType) -> Result<TypeId> {
    if ty.is_volatile || ty.is_restrict {
        return Err(BindError::UnsupportedType {
            kind: "volatile/restrict qualified type".to_owned(),
        });
    }
    if ty.is_const {
        let inner = map_node(ctx, tu, &ty.node)?;
        return Ok(ctx.module_mut().add_type(Type::Const(inner)));
    }
    map_node(ctx, tu, &ty.node)
}

fn map_node(ctx: &mut BindContext, tu: &TranslationUnit, node: &TypeNode) -> Result<TypeId> {
    match node {
        TypeNode::Builtin(builtin) => Ok(builtin_atom(ctx, *builtin)),
        TypeNode::Pointer(pointee) => {
            // `void*` has no pointee to name; it collapses to the pointer atom.
            if pointee.is_void() {
                return Ok(ctx.module_mut().atom("pointer"));
            }
            let inner = map_type(ctx, tu, pointee)?;
            Ok(ctx.module_mut().add_type(Type::Ptr(inner)))
        }
        TypeNode::Reference(referee) => {
            let inner = map_type(ctx, tu, referee)?;
            Ok(ctx.module_mut().add_type(Type::Ref(inner)))
        }
        TypeNode::Named(id) => map_decl(ctx, tu, *id),
        TypeNode::Elaborated(inner) | TypeNode::Paren(inner) | TypeNode::Decltype(inner) => {
            map_type(ctx, tu, inner)
        }
        TypeNode::Vector => Ok(ctx.module_mut().add_type(Type::Opaque)),
        TypeNode::FunctionProto { params, ret } => {
            let params = params
                .iter()
                .map(|p| map_type(ctx, tu, p))
                .collect::<Result<Vec<_>>>()?;
            let ret = if ret.is_void() {
                None
            } else {
                Some(map_type(ctx, tu, ret)?)
            };
            Ok(ctx.module_mut().add_type(Type::Func { params, ret }))
        }
        TypeNode::ConstantArray { elem, size } => {
            let elem = map_type(ctx, tu, elem)?;
            Ok(ctx.module_mut().add_type(Type::Array {
                len: Expr::UInt(*size),
                elem,
            }))
        }
        TypeNode::IncompleteArray(elem) => {
            let elem = map_type(ctx, tu, elem)?;
            Ok(ctx.module_mut().add_type(Type::UnsizedArray(elem)))
        }
        TypeNode::DependentSizedArray { elem, size_param } => {
            let elem = map_type(ctx, tu, elem)?;
            let param = ctx.module_mut().new_sym(size_param.clone());
            Ok(ctx.module_mut().add_type(Type::Array {
                len: Expr::Param(param),
                elem,
            }))
        }
        TypeNode::TemplateSpecialization { name, args } => {
            let args = args
                .iter()
                .map(|arg| map_template_arg(ctx, tu, arg))
                .collect::<Result<Vec<_>>>()?;
            let name = ctx.module_mut().new_sym(name.clone());
            Ok(ctx.module_mut().add_type(Type::Inst { name, args }))
        }
        TypeNode::VendorBuiltin(name) => Err(BindError::UnsupportedType {
            kind: format!("vendor builtin type `{name}`"),
        }),
        TypeNode::SaturatedFixedPoint => Err(BindError::UnsupportedType {
            kind: "saturating fixed-point type".to_owned(),
        }),
        TypeNode::Placeholder(name) => Err(BindError::UnsupportedType {
            kind: format!("placeholder type `{name}`"),
        }),
    }
}

fn map_template_arg(
    ctx: &mut BindContext,
    tu: &TranslationUnit,
    arg: &TemplateArg,
) -> Result<GenericArg> {
    match arg {
        TemplateArg::Type(ty) => Ok(GenericArg::Type(map_type(ctx, tu, ty)?)),
        TemplateArg::Value(v) => Ok(GenericArg::Value(Expr::Int(*v))),
        TemplateArg::Param(name) => {
            let sym = ctx.module_mut().new_sym(name.clone());
            Ok(GenericArg::Value(Expr::Param(sym)))
        }
    }
}

/// Resolves a named declaration to its type, binding it on demand.
///
/// A declaration referenced before the traversal got to it is bound right here, re-entrantly
/// ("lazy" binding). The memo table keeps this terminating: the binder associates a declaration
/// before resolving anything it refers to.
pub fn map_decl(ctx: &mut BindContext, tu: &TranslationUnit, id: DeclId) -> Result<TypeId> {
    if let Some(ty) = ctx.lookup(id) {
        return Ok(ty);
    }
    bind::bind_decl(ctx, tu, id)?;
    ctx.lookup(id).ok_or_else(|| BindError::UnresolvableDeclaration {
        decl: tu.decl(id).display_name().to_owned(),
    })
}

/// The fixed builtin table. Pure: the same kind resolves to the same interned atom every time.
fn builtin_atom(ctx: &mut BindContext, builtin: Builtin) -> TypeId {
    use Builtin as B;
    let name = match builtin {
        B::Void => "void",
        B::Bool => "bool",
        B::Char => "cchar",
        B::SChar => "cschar",
        B::UChar => "cuchar",
        B::WChar => "WideChar",
        B::Char8 => "Char8",
        B::Char16 => "Char16",
        B::Char32 => "Char32",
        B::Short => "cshort",
        B::UShort => "cushort",
        B::Int => "cint",
        B::UInt => "cuint",
        B::Long => "clong",
        B::ULong => "culong",
        B::LongLong => "clonglong",
        B::ULongLong => "culonglong",
        B::Int128 => "Int128",
        B::UInt128 => "UInt128",
        B::Float => "cfloat",
        B::Double => "cdouble",
        B::LongDouble => "clongdouble",
        B::Half => "Float16",
        B::BFloat16 => "BFloat16",
        B::Float128 => "Float128",
        B::NullPtr => "pointer",
    };
    ctx.module_mut().atom(name)
}

/// The cstddef aliases that collapse to a builtin atom instead of an alias declaration.
pub(super) fn std_alias_atom(qualified_name: &str) -> Option<&'static str> {
    match qualified_name {
        "std::size_t" | "size_t" => Some("csize_t"),
        "ssize_t" => Some("cssize_t"),
        "std::ptrdiff_t" | "ptrdiff_t" => Some("cptrdiff"),
        "std::max_align_t" | "max_align_t" => Some("MaxAlign"),
        "std::nullptr_t" | "nullptr_t" => Some("pointer"),
        "std::byte" => Some("byte"),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::ConfigBuilder;

    #[test]
    fn builtin_table_is_idempotent() {
        let config = ConfigBuilder::new().header("x.h").build().unwrap();
        let mut ctx = BindContext::new(&config);
        let kinds = [
            Builtin::Void,
            Builtin::Bool,
            Builtin::Char,
            Builtin::SChar,
            Builtin::UChar,
            Builtin::WChar,
            Builtin::Char8,
            Builtin::Char16,
            Builtin::Char32,
            Builtin::Short,
            Builtin::UShort,
            Builtin::Int,
            Builtin::UInt,
            Builtin::Long,
            Builtin::ULong,
            Builtin::LongLong,
            Builtin::ULongLong,
            Builtin::Int128,
            Builtin::UInt128,
            Builtin::Float,
            Builtin::Double,
            Builtin::LongDouble,
            Builtin::Half,
            Builtin::BFloat16,
            Builtin::Float128,
            Builtin::NullPtr,
        ];
        for kind in kinds {
            let first = builtin_atom(&mut ctx, kind);
            let second = builtin_atom(&mut ctx, kind);
            assert_eq!(first, second, "{kind:?} did not resolve to a stable atom");
        }
    }

    #[test]
    fn volatile_is_fatal() {
        let config = ConfigBuilder::new().header("x.h").build().unwrap();
        let mut ctx = BindContext::new(&config);
        let tu = TranslationUnit::new();
        let ty = QualType {
            is_const: false,
            is_volatile: true,
            is_restrict: false,
            node: TypeNode::Builtin(Builtin::Int),
        };
        assert!(matches!(
            map_type(&mut ctx, &tu, &ty),
            Err(BindError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn void_pointer_collapses_to_pointer_atom() {
        let config = ConfigBuilder::new().header("x.h").build().unwrap();
        let mut ctx = BindContext::new(&config);
        let tu = TranslationUnit::new();
        let ty = QualType::unqualified(TypeNode::Pointer(Box::new(QualType::unqualified(
            TypeNode::Builtin(Builtin::Void),
        ))));
        let mapped = map_type(&mut ctx, &tu, &ty).unwrap();
        assert_eq!(mapped, ctx.module_mut().atom("pointer"));
    }
}
