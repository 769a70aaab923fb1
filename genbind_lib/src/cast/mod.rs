//! The source AST: the immutable, fully resolved declaration/type graph of one translation
//! unit, as dumped by the clang-side front end.
//!
//! Nothing in here has behavior beyond lookups; building this graph (parsing, system header
//! search, template instantiation) all happens on the other side of the dump.

mod decl;
mod ty;

pub use decl::{
    Access, ConstructorInfo, Decl, DeclKind, EnumInfo, Enumerator, FieldInfo, MethodInfo,
    ParamInfo, RecordInfo, RoutineInfo, Storage, TypedefInfo, VariableInfo,
};
pub use ty::{Builtin, QualType, TemplateArg, TypeNode};

use serde::{Deserialize, Serialize};

/// A reference to a [`Decl`] in a [`TranslationUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(usize);

/// One translation unit's worth of declarations.
///
/// Declarations are stored in discovery order; the driver traverses them in that order and
/// visits each one exactly once. Ids index into the store and are also how type nodes and
/// members refer to other declarations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationUnit {
    decls: Vec<Decl>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId(self.decls.len());
        self.decls.push(decl);
        id
    }

    /// Panics if the given [`DeclId`] does not come from this translation unit.
    #[track_caller]
    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        self.decls.get(id.0).expect("Invalid decl id")
    }

    /// Mutable access, for graph builders that have to patch forward references.
    #[track_caller]
    #[inline]
    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        self.decls.get_mut(id.0).expect("Invalid decl id")
    }

    /// All declaration ids in discovery order.
    pub fn decl_ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.decls.len()).map(DeclId)
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}
