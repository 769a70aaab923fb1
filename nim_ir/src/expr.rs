use crate::sym::SymId;

/// A constant expression used where a type needs a value: array bounds and value arguments of
/// generic instantiations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expr {
    Int(i64),
    UInt(u64),
    /// A reference to a constant template parameter, for bounds that only become known at
    /// instantiation time.
    Param(SymId),
}
