//! Dynamic values exchanged with the data-access collaborator.
//!
//! `Value::Null` is the language-level absence of a value; `Value::DbNull`
//! is the explicit "send a database NULL" sentinel that null-value policies
//! substitute for it.

mod db_type;


use thiserror::Error as ThisError;

// re-exports
pub use db_type::DbType;

///
/// Value
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    DbNull,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    List(Vec<Self>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_db_null(&self) -> bool {
        matches!(self, Self::DbNull)
    }

    /// True for both the language-level null and the database sentinel.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Null | Self::DbNull)
    }

    /// Substitute the database sentinel for a language-level null.
    #[must_use]
    pub fn replace_null_with_db_null(self) -> Self {
        match self {
            Self::Null => Self::DbNull,
            other => other,
        }
    }

    /// Collapse the database sentinel back to `Null` for row projection.
    #[must_use]
    pub(crate) fn normalize_db_null(self) -> Self {
        match self {
            Self::DbNull => Self::Null,
            other => other,
        }
    }

    /// Short label used in conversion diagnostics.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::DbNull => "db_null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
            Self::List(_) => "list",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Uint(u64::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

///
/// ConversionError
///
/// Failure to move a dynamic value into a concrete Rust field type.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConversionError {
    #[error("cannot convert {found} value into {target}")]
    TypeMismatch {
        target: &'static str,
        found: &'static str,
    },

    #[error("value {value} is out of range for {target}")]
    OutOfRange { target: &'static str, value: String },

    #[error("{0}")]
    Custom(String),
}

impl ConversionError {
    pub(crate) const fn mismatch(target: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            target,
            found: found.kind_label(),
        }
    }

    /// Build a free-form conversion failure for user-supplied converters.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}
