use crate::expr::Expr;
use crate::sym::SymId;
use crate::table::ItemId;

/// A reference into a [`Module`](crate::Module)'s type arena.
///
/// A type is built once and may be referenced from many declarations; sharing an id is how the
/// IR expresses structural aliasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) ItemId);

/// The type language of the output module.
///
/// Nested types are ids into the same arena the type itself lives in. An item can only refer to
/// ids created before it, so every type tree is acyclic by construction; cycles between
/// declarations are broken at the binding layer, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A builtin or named declared type.
    Atom(SymId),
    Ptr(TypeId),
    Ref(TypeId),
    /// A type whose internals are deliberately erased. Used for vector types, which are assumed
    /// to only ever appear behind an alias.
    Opaque,
    /// A generic instantiation, e.g. `std::vector<int>`.
    Inst { name: SymId, args: Vec<GenericArg> },
    UnsizedArray(TypeId),
    Array { len: Expr, elem: TypeId },
    Func { params: Vec<TypeId>, ret: Option<TypeId> },
    /// Top-level const qualification.
    Const(TypeId),
}

/// An argument of a generic instantiation: either a type or a constant value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericArg {
    Type(TypeId),
    Value(Expr),
}
