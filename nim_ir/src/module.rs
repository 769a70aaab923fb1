use std::collections::HashMap;

use crate::decl::{RoutineDecl, TypeDecl, VariableDecl};
use crate::sym::{Sym, SymId};
use crate::table::Table;
use crate::ty::{Type, TypeId};

/// One output module under construction.
///
/// Owns the sym table and the type arena all ids point into, plus the three top-level
/// declaration collections in discovery order. The renderer consumes a finished `Module`; after
/// binding nothing but rename passes should touch it.
#[derive(Debug, Default)]
pub struct Module {
    syms: Table<Sym>,
    types: Table<Type>,
    atoms: HashMap<String, TypeId>,
    type_decls: Vec<TypeDecl>,
    routine_decls: Vec<RoutineDecl>,
    var_decls: Vec<VariableDecl>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_sym(&mut self, name: impl Into<String>) -> SymId {
        SymId(self.syms.add_item(Sym::new(name)))
    }

    #[track_caller]
    pub fn sym(&self, id: SymId) -> &Sym {
        self.syms.get(id.0)
    }

    #[track_caller]
    pub fn sym_mut(&mut self, id: SymId) -> &mut Sym {
        self.syms.get_mut(id.0)
    }

    pub fn sym_ids(&self) -> impl Iterator<Item = SymId> {
        self.syms.item_ids().map(SymId)
    }

    pub fn add_type(&mut self, ty: Type) -> TypeId {
        TypeId(self.types.add_item(ty))
    }

    #[track_caller]
    pub fn ty(&self, id: TypeId) -> &Type {
        self.types.get(id.0)
    }

    /// The builtin atom with the given name.
    ///
    /// Atoms are interned: asking for the same name twice returns the same [`TypeId`], so the
    /// builtin table stays idempotent across the whole run.
    pub fn atom(&mut self, name: &str) -> TypeId {
        if let Some(id) = self.atoms.get(name) {
            return *id;
        }
        let sym = self.new_sym(name);
        let id = self.add_type(Type::Atom(sym));
        self.atoms.insert(name.to_owned(), id);
        id
    }

    pub fn add_type_decl(&mut self, decl: TypeDecl) {
        self.type_decls.push(decl);
    }

    pub fn add_routine_decl(&mut self, decl: RoutineDecl) {
        self.routine_decls.push(decl);
    }

    pub fn add_var_decl(&mut self, decl: VariableDecl) {
        self.var_decls.push(decl);
    }

    pub fn type_decls(&self) -> &[TypeDecl] {
        &self.type_decls
    }

    pub fn routine_decls(&self) -> &[RoutineDecl] {
        &self.routine_decls
    }

    pub fn var_decls(&self) -> &[VariableDecl] {
        &self.var_decls
    }

    pub fn is_empty(&self) -> bool {
        self.type_decls.is_empty() && self.routine_decls.is_empty() && self.var_decls.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn atoms_are_interned() {
        let mut module = Module::new();
        let a = module.atom("cint");
        let b = module.atom("cuint");
        let c = module.atom("cint");
        assert_eq!(a, c);
        assert_ne!(a, b);
        match module.ty(a) {
            Type::Atom(sym) => assert_eq!(module.sym(*sym).name(), "cint"),
            other => panic!("expected an atom, got {other:?}"),
        }
    }
}
