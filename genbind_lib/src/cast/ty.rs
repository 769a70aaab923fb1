use serde::{Deserialize, Serialize};

use super::DeclId;

/// A type reference with its qualifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualType {
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_volatile: bool,
    #[serde(default)]
    pub is_restrict: bool,
    pub node: TypeNode,
}

impl QualType {
    pub fn unqualified(node: TypeNode) -> Self {
        Self {
            is_const: false,
            is_volatile: false,
            is_restrict: false,
            node,
        }
    }

    /// `true` if this is plain `void` (possibly behind sugar), i.e. an omitted return type.
    pub fn is_void(&self) -> bool {
        match &self.node {
            TypeNode::Builtin(Builtin::Void) => true,
            TypeNode::Elaborated(inner) | TypeNode::Paren(inner) => inner.is_void(),
            _ => false,
        }
    }
}

/// The closed set of type node kinds the front end dumps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeNode {
    Builtin(Builtin),
    Pointer(Box<QualType>),
    Reference(Box<QualType>),
    /// A reference to a record, enum or typedef declaration.
    Named(DeclId),
    /// Sugar: `struct Foo`, `enum Bar` spellings.
    Elaborated(Box<QualType>),
    /// Sugar: parenthesized types.
    Paren(Box<QualType>),
    /// Sugar: `decltype(expr)`, already resolved by the front end.
    Decltype(Box<QualType>),
    /// A SIMD-style vector type. Bound as an opaque type: such types only ever appear behind an
    /// alias, their internals are not representable.
    Vector,
    FunctionProto {
        params: Vec<QualType>,
        ret: Box<QualType>,
    },
    ConstantArray {
        elem: Box<QualType>,
        size: u64,
    },
    IncompleteArray(Box<QualType>),
    /// An array whose bound is a constant template parameter.
    DependentSizedArray {
        elem: Box<QualType>,
        size_param: String,
    },
    TemplateSpecialization {
        /// The qualified name of the template.
        name: String,
        args: Vec<TemplateArg>,
    },
    /// A vendor/accelerator builtin kind. Never bindable.
    VendorBuiltin(String),
    /// Embedded-C saturating fixed-point kinds. Never bindable.
    SaturatedFixedPoint,
    /// `auto`, dependent and other placeholder kinds. Never bindable.
    Placeholder(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TemplateArg {
    Type(QualType),
    Value(i64),
    /// A dependent value argument naming a constant template parameter.
    Param(String),
}

/// The builtin kinds the fixed atom table covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Builtin {
    Void,
    Bool,
    // Character kinds
    Char,
    SChar,
    UChar,
    WChar,
    Char8,
    Char16,
    Char32,
    // Integer kinds
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Int128,
    UInt128,
    // Floating kinds
    Float,
    Double,
    LongDouble,
    Half,
    BFloat16,
    Float128,
    NullPtr,
}
