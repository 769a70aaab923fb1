use std::fmt;

pub type Result<T> = std::result::Result<T, BindError>;

/// A fatal binding fault. There is no partial-success mode: the first error aborts the whole
/// run and no output is written.
///
/// The unsupported-construct variants exist because silently dropping or approximating such a
/// construct would produce an incorrect binding; the contract-violation variants
/// ([`DuplicateBinding`](BindError::DuplicateBinding),
/// [`UnresolvableDeclaration`](BindError::UnresolvableDeclaration)) indicate a binder bug rather
/// than bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A declaration was associated with a type twice.
    DuplicateBinding { decl: String },
    /// A type kind that can not be represented in the output language.
    UnsupportedType { kind: String },
    /// A templated routine declaration.
    UnsupportedTemplate { decl: String },
    /// A lazy bind completed without producing a memo entry.
    UnresolvableDeclaration { decl: String },
    /// A declaration kind without a binder handler.
    UnhandledDeclarationKind { kind: String, decl: String },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::DuplicateBinding { decl } => {
                write!(f, "declaration `{decl}` was bound more than once")
            }
            BindError::UnsupportedType { kind } => {
                write!(f, "can't bind unsupported type: {kind}")
            }
            BindError::UnsupportedTemplate { decl } => {
                write!(f, "can't bind templated routine `{decl}`")
            }
            BindError::UnresolvableDeclaration { decl } => {
                write!(f, "binding `{decl}` did not resolve it to a type")
            }
            BindError::UnhandledDeclarationKind { kind, decl } => {
                write!(f, "no handler for {kind} declaration `{decl}`")
            }
        }
    }
}

impl std::error::Error for BindError {}
