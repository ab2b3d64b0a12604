//! Capability traits that stand in for runtime property reflection.
//!
//! Filter and result types describe their properties through a static
//! declaration table and read/write them by name. The `record!` macro
//! generates both for plain structs.

use crate::value::{ConversionError, DbType, Value};
use thiserror::Error as ThisError;

///
/// FieldValue
///
/// Conversion between a concrete field type and a dynamic `Value`.
/// `DB_TYPE` is `None` for types with no known parameter mapping; such
/// properties are skipped by implicit inclusion.
///

pub trait FieldValue {
    const DB_TYPE: Option<DbType>;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ConversionError>
    where
        Self: Sized;
}

impl FieldValue for String {
    const DB_TYPE: Option<DbType> = Some(DbType::String);

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(ConversionError::mismatch("String", &other)),
        }
    }
}

impl FieldValue for bool {
    const DB_TYPE: Option<DbType> = Some(DbType::Boolean);

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(ConversionError::mismatch("bool", &other)),
        }
    }
}

impl FieldValue for f64 {
    const DB_TYPE: Option<DbType> = Some(DbType::Double);

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    #[expect(clippy::cast_precision_loss)]
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as Self),
            Value::Uint(v) => Ok(v as Self),
            other => Err(ConversionError::mismatch("f64", &other)),
        }
    }
}

impl FieldValue for Vec<u8> {
    const DB_TYPE: Option<DbType> = Some(DbType::Binary);

    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Blob(v) => Ok(v),
            other => Err(ConversionError::mismatch("Vec<u8>", &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const DB_TYPE: Option<DbType> = T::DB_TYPE;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        if value.is_absent() {
            return Ok(None);
        }

        T::from_value(value).map(Some)
    }
}

// impl_field_value
// integers accept either signed or unsigned storage and range-check on the way in
macro_rules! impl_field_value {
    ( $( $type:ty => $variant:ident, $db_type:ident ),* $(,)? ) => {
        $(
            impl FieldValue for $type {
                const DB_TYPE: Option<DbType> = Some(DbType::$db_type);

                fn to_value(&self) -> Value {
                    Value::$variant((*self).into())
                }

                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::Int(v) => <$type>::try_from(v).map_err(|_| ConversionError::OutOfRange {
                            target: stringify!($type),
                            value: v.to_string(),
                        }),
                        Value::Uint(v) => <$type>::try_from(v).map_err(|_| ConversionError::OutOfRange {
                            target: stringify!($type),
                            value: v.to_string(),
                        }),
                        other => Err(ConversionError::mismatch(stringify!($type), &other)),
                    }
                }
            }
        )*
    };
}

impl_field_value!(
    i8 => Int, Int32,
    i16 => Int, Int32,
    i32 => Int, Int32,
    i64 => Int, Int64,
    u8 => Uint, Int32,
    u16 => Uint, Int32,
    u32 => Uint, Int64,
    u64 => Uint, UInt64,
);

///
/// DescriptorActions
///
/// Which directions a property participates in.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DescriptorActions {
    None,
    Read,
    Write,
    ReadWrite,
}

impl DescriptorActions {
    /// True when every direction in `requested` is permitted.
    #[must_use]
    pub const fn allows(self, requested: Self) -> bool {
        match requested {
            Self::None => true,
            Self::Read => matches!(self, Self::Read | Self::ReadWrite),
            Self::Write => matches!(self, Self::Write | Self::ReadWrite),
            Self::ReadWrite => matches!(self, Self::ReadWrite),
        }
    }
}

///
/// PropertyDescriptor
///
/// One entry of a type's static property table.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub alias: &'static str,
    pub db_type: Option<DbType>,
    pub actions: DescriptorActions,
}

impl PropertyDescriptor {
    #[must_use]
    pub const fn new(name: &'static str, alias: &'static str, db_type: Option<DbType>) -> Self {
        Self {
            name,
            alias,
            db_type,
            actions: DescriptorActions::ReadWrite,
        }
    }

    #[must_use]
    pub const fn with_actions(mut self, actions: DescriptorActions) -> Self {
        self.actions = actions;
        self
    }
}

///
/// PropertyError
///

#[derive(Debug, ThisError)]
pub enum PropertyError {
    #[error("property '{property}' not found on {type_name}")]
    NotFound {
        type_name: &'static str,
        property: String,
    },

    #[error("property '{property}': {source}")]
    Conversion {
        property: String,
        #[source]
        source: ConversionError,
    },
}

///
/// PropertyAccessor
///
/// Named property access over a filter or result type.
/// `properties` lists public properties in declaration order; that order is
/// the enumeration order for implicit parameter inclusion.
///

pub trait PropertyAccessor: 'static {
    fn properties() -> &'static [PropertyDescriptor]
    where
        Self: Sized;

    /// Read a property; `None` when the type has no property of that name.
    fn get(&self, name: &str) -> Option<Value>;

    fn set(&mut self, name: &str, value: Value) -> Result<(), PropertyError>;

    /// Look up one declared property by name.
    #[must_use]
    fn descriptor(name: &str) -> Option<&'static PropertyDescriptor>
    where
        Self: Sized,
    {
        Self::properties().iter().find(|desc| desc.name == name)
    }
}

// the unit filter: commands that take no filter object
impl PropertyAccessor for () {
    fn properties() -> &'static [PropertyDescriptor] {
        &[]
    }

    fn get(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set(&mut self, name: &str, _value: Value) -> Result<(), PropertyError> {
        Err(PropertyError::NotFound {
            type_name: "()",
            property: name.to_string(),
        })
    }
}

///
/// ResultRecord
///
/// A type rows can be projected into.
///

pub trait ResultRecord: PropertyAccessor + Default + Send {}

impl<T> ResultRecord for T where T: PropertyAccessor + Default + Send {}
