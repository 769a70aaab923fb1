use serde::{Deserialize, Serialize};

use super::ty::QualType;
use super::DeclId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decl {
    /// `None` for anonymous records and enums.
    pub name: Option<String>,
    /// The fully `::`-qualified name. Equal to `name` for declarations at global scope.
    pub qualified_name: String,
    /// The source file the declaration was found in.
    pub file: String,
    pub access: Access,
    pub kind: DeclKind,
}

impl Decl {
    /// A name to identify the declaration by in diagnostics.
    pub fn display_name(&self) -> &str {
        if !self.qualified_name.is_empty() {
            &self.qualified_name
        } else {
            self.name.as_deref().unwrap_or("<anonymous>")
        }
    }
}

/// Member access of the declaration. `Unscoped` for declarations outside any class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    Public,
    Protected,
    Private,
    Unscoped,
}

/// The closed set of declaration kinds the front end dumps.
///
/// The binder matches this exhaustively; kinds it can not bind are listed here all the same so
/// that forgetting one is a compile error, not a silently wrong binding. `Other` carries kinds
/// the front end itself didn't recognize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeclKind {
    Record(RecordInfo),
    Enum(EnumInfo),
    Typedef(TypedefInfo),
    Function(RoutineInfo),
    Method(MethodInfo),
    Constructor(ConstructorInfo),
    Variable(VariableInfo),
    Field(FieldInfo),
    Param,
    Namespace,
    Using,
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordInfo {
    pub fields: Vec<DeclId>,
    pub methods: Vec<DeclId>,
    /// `Some` for class templates.
    pub template_params: Option<Vec<String>>,
    /// `false` for forward declarations; such records bind without a field list.
    pub is_definition: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumInfo {
    pub enumerators: Vec<Enumerator>,
}

/// An enumerator with its value as resolved by the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enumerator {
    pub name: String,
    pub value: i64,
    /// `true` if the value was written out in the source. Implicit enumerators continue from
    /// the previous value and stay implicit in the output too.
    pub explicit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedefInfo {
    pub underlying: QualType,
    /// The struct/enum declared inside this typedef, if any (`typedef struct {...} T;` and
    /// friends). Drives tag/typedef fusion.
    pub owned_tag: Option<DeclId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineInfo {
    pub params: Vec<ParamInfo>,
    pub ret: QualType,
    pub template_params: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodInfo {
    pub is_static: bool,
    pub owner: DeclId,
    pub routine: RoutineInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructorInfo {
    pub owner: DeclId,
    pub params: Vec<ParamInfo>,
    pub template_params: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamInfo {
    /// `None` for unnamed parameters; they get a positional placeholder at render time.
    pub name: Option<String>,
    pub ty: QualType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableInfo {
    pub ty: QualType,
    pub storage: Storage,
    /// `true` for variables declared inside a function body, including function-local statics.
    pub is_local: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Storage {
    None,
    Static,
    Extern,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldInfo {
    pub ty: QualType,
}
