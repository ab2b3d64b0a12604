use super::Value;
use serde::Deserialize;

///
/// DbType
///
/// Semantic parameter type handed to the data-access collaborator.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DbType {
    Boolean,
    Int32,
    Int64,
    UInt64,
    Double,
    String,
    Binary,
    Structured,
}

impl DbType {
    /// Infer a parameter type from a runtime value.
    ///
    /// Nulls and lists carry no scalar type and yield `None`.
    #[must_use]
    pub const fn infer(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(_) => Some(Self::Boolean),
            Value::Int(_) => Some(Self::Int64),
            Value::Uint(_) => Some(Self::UInt64),
            Value::Float(_) => Some(Self::Double),
            Value::Text(_) => Some(Self::String),
            Value::Blob(_) => Some(Self::Binary),
            Value::Null | Value::DbNull | Value::List(_) => None,
        }
    }
}
