mod decl;
mod expr;
mod module;
mod outputter;
mod sym;
mod table;
mod ty;

pub mod ident;

pub use decl::{
    AliasDecl, ConstructorDecl, EnumDecl, EnumField, FuncDecl, MethodDecl, Param, RecordDecl,
    RecordField, RoutineDecl, TypeDecl, VariableDecl,
};
pub use expr::Expr;
pub use module::Module;
pub use outputter::*;
pub use sym::{Sym, SymId};
pub use table::{ItemId, Table};
pub use ty::{GenericArg, Type, TypeId};
