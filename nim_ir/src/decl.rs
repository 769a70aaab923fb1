use crate::sym::SymId;
use crate::ty::TypeId;

/// A type declaration of the output module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDecl {
    Alias(AliasDecl),
    Enum(EnumDecl),
    Record(RecordDecl),
}

/// `type Name* = <type>`
///
/// An alias carries no import pragma of its own; the declaration it aliases does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDecl {
    pub name: SymId,
    pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: SymId,
    /// The fully qualified name on the C++ side, used in the import pragma.
    pub cpp_name: String,
    /// The requested header the declaration came from.
    pub header: String,
    pub fields: Vec<EnumField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumField {
    pub name: SymId,
    /// `Some` only for enumerators with an explicit value in the source. Implicit enumerators
    /// continue from the previous value in both languages, so nothing is rendered for them.
    pub value: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDecl {
    pub name: SymId,
    pub cpp_name: String,
    pub header: String,
    /// `None` for records without a visible definition; they render as an empty object.
    pub fields: Option<Vec<RecordField>>,
    /// `Some` for class templates; the params become Nim generic params.
    pub generic_params: Option<Vec<SymId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub name: SymId,
    pub ty: TypeId,
}

/// A routine declaration of the output module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineDecl {
    Func(FuncDecl),
    Constructor(ConstructorDecl),
    Method(MethodDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: SymId,
    pub cpp_name: String,
    pub header: String,
    pub params: Vec<Param>,
    /// `None` for void.
    pub ret: Option<TypeId>,
    pub generic_params: Vec<SymId>,
}

/// A constructor has no name of its own; the rendered proc name is derived from the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub cpp_name: String,
    pub header: String,
    pub owner: TypeId,
    pub params: Vec<Param>,
    pub owner_generic_params: Vec<SymId>,
    pub generic_params: Vec<SymId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: SymId,
    pub cpp_name: String,
    pub header: String,
    pub is_static: bool,
    pub owner: TypeId,
    pub params: Vec<Param>,
    pub ret: Option<TypeId>,
    pub owner_generic_params: Vec<SymId>,
    pub generic_params: Vec<SymId>,
}

/// A routine parameter. Unnamed parameters get a positional placeholder at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: Option<SymId>,
    pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    pub name: SymId,
    pub cpp_name: String,
    pub header: String,
    pub ty: TypeId,
}

impl RoutineDecl {
    /// All template parameters the rendered proc has to carry: the owner's first, then the
    /// routine's own.
    pub fn all_generic_params(&self) -> Vec<SymId> {
        match self {
            RoutineDecl::Func(f) => f.generic_params.clone(),
            RoutineDecl::Constructor(c) => {
                let mut all = c.owner_generic_params.clone();
                all.extend_from_slice(&c.generic_params);
                all
            }
            RoutineDecl::Method(m) => {
                let mut all = m.owner_generic_params.clone();
                all.extend_from_slice(&m.generic_params);
                all
            }
        }
    }
}
