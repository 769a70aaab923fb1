use std::collections::HashMap;

use nim_ir::{Module, RoutineDecl, TypeDecl, TypeId, VariableDecl};

use crate::cast::{Access, Decl, DeclId};
use crate::config::Config;
use crate::error::{BindError, Result};

/// The process-scoped state of one binding run.
///
/// Owns the output [`Module`] under construction and the decl→type memo table that makes lazy
/// binding terminate (a declaration referenced from many places is bound once, every later
/// reference hits the memo). Exactly one context exists per run; two runs never share one.
#[derive(Debug)]
pub struct BindContext<'c> {
    module: Module,
    memo: HashMap<DeclId, TypeId>,
    config: &'c Config,
}

impl<'c> BindContext<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self {
            module: Module::new(),
            memo: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn module_mut(&mut self) -> &mut Module {
        &mut self.module
    }

    pub fn into_module(self) -> Module {
        self.module
    }

    /// The memoized type of a previously bound declaration.
    pub fn lookup(&self, id: DeclId) -> Option<TypeId> {
        self.memo.get(&id).copied()
    }

    /// Records the type a declaration was bound to.
    ///
    /// A declaration must be bound at most once; a second `associate` is a binder logic error
    /// and fails with [`BindError::DuplicateBinding`].
    pub fn associate(&mut self, id: DeclId, decl: &Decl, ty: TypeId) -> Result<()> {
        if self.memo.insert(id, ty).is_some() {
            return Err(BindError::DuplicateBinding {
                decl: decl.display_name().to_owned(),
            });
        }
        Ok(())
    }

    /// `true` for declarations visible through the member access rules: public members and
    /// declarations outside any class.
    pub fn access_guard(&self, decl: &Decl) -> bool {
        matches!(decl.access, Access::Public | Access::Unscoped)
    }

    /// Resolves the origin header of a declaration against the requested header names.
    ///
    /// `None` means the declaration came from somewhere the user didn't ask about; the binder
    /// treats that as "skip", never as an error.
    pub fn header_of(&self, decl: &Decl) -> Option<&'c str> {
        self.config
            .headers()
            .iter()
            .find(|h| decl.file.ends_with(h.as_str()))
            .map(String::as_str)
    }

    pub fn add_type_decl(&mut self, decl: TypeDecl) {
        self.module.add_type_decl(decl);
    }

    pub fn add_routine_decl(&mut self, decl: RoutineDecl) {
        self.module.add_routine_decl(decl);
    }

    pub fn add_var_decl(&mut self, decl: VariableDecl) {
        self.module.add_var_decl(decl);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cast::{DeclKind, EnumInfo, TranslationUnit};
    use crate::config::ConfigBuilder;

    fn dummy_decl(file: &str) -> Decl {
        Decl {
            name: Some("Foo".to_owned()),
            qualified_name: "Foo".to_owned(),
            file: file.to_owned(),
            access: Access::Unscoped,
            kind: DeclKind::Enum(EnumInfo {
                enumerators: vec![],
            }),
        }
    }

    #[test]
    fn associate_then_lookup_roundtrips() {
        let config = ConfigBuilder::new().header("foo.h").build().unwrap();
        let mut ctx = BindContext::new(&config);
        let mut tu = TranslationUnit::new();
        let decl = dummy_decl("/usr/include/foo.h");
        let id = tu.add_decl(decl.clone());

        assert_eq!(ctx.lookup(id), None);
        let ty = ctx.module_mut().atom("cint");
        ctx.associate(id, &decl, ty).unwrap();
        assert_eq!(ctx.lookup(id), Some(ty));
    }

    #[test]
    fn double_associate_is_fatal() {
        let config = ConfigBuilder::new().header("foo.h").build().unwrap();
        let mut ctx = BindContext::new(&config);
        let mut tu = TranslationUnit::new();
        let decl = dummy_decl("/usr/include/foo.h");
        let id = tu.add_decl(decl.clone());

        let ty = ctx.module_mut().atom("cint");
        ctx.associate(id, &decl, ty).unwrap();
        assert_eq!(
            ctx.associate(id, &decl, ty),
            Err(BindError::DuplicateBinding {
                decl: "Foo".to_owned()
            })
        );
    }

    #[test]
    fn header_resolution_is_a_suffix_match() {
        let config = ConfigBuilder::new().header("geom.h").build().unwrap();
        let ctx = BindContext::new(&config);

        assert_eq!(
            ctx.header_of(&dummy_decl("/home/user/project/geom.h")),
            Some("geom.h")
        );
        assert_eq!(ctx.header_of(&dummy_decl("/usr/include/string.h")), None);
    }
}
