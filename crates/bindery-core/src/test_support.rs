//! Shared fixtures for unit tests: filter/result records and an in-memory
//! data-access double that records every call.

use crate::{
    access::{AsyncDatabaseManager, DatabaseManager, ExecuteError, ParameterFactory, RowSet},
    command::{CommandKind, Parameter},
    traits::{FieldValue, PropertyAccessor, PropertyDescriptor, PropertyError},
    value::{ConversionError, DbType, Value},
};
use async_trait::async_trait;
use std::sync::Mutex;

///
/// UserFilter
///
/// Hand-written accessor with capitalized property names.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct UserFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl PropertyAccessor for UserFilter {
    fn properties() -> &'static [PropertyDescriptor] {
        const PROPERTIES: &[PropertyDescriptor] = &[
            PropertyDescriptor::new("Id", "Id", Some(DbType::Int64)),
            PropertyDescriptor::new("Name", "Name", Some(DbType::String)),
        ];

        PROPERTIES
    }

    fn get(&self, name: &str) -> Option<Value> {
        match name {
            "Id" => Some(self.id.to_value()),
            "Name" => Some(self.name.to_value()),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        let conversion = |source| PropertyError::Conversion {
            property: name.to_string(),
            source,
        };

        match name {
            "Id" => self.id = FieldValue::from_value(value).map_err(conversion)?,
            "Name" => self.name = FieldValue::from_value(value).map_err(conversion)?,
            _ => {
                return Err(PropertyError::NotFound {
                    type_name: "UserFilter",
                    property: name.to_string(),
                });
            }
        }

        Ok(())
    }
}

///
/// Tags
///
/// A field type with no scalar parameter mapping.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Tags(pub Vec<String>);

impl FieldValue for Tags {
    const DB_TYPE: Option<DbType> = None;

    fn to_value(&self) -> Value {
        Value::List(self.0.iter().cloned().map(Value::Text).collect())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::List(items) => items
                .into_iter()
                .map(String::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Self),
            other => Err(ConversionError::mismatch("Tags", &other)),
        }
    }
}

///
/// SearchFilter
///

#[derive(Clone, Debug, Default)]
pub(crate) struct SearchFilter {
    pub id: i64,
    pub name: Option<String>,
    pub tags: Tags,
    pub active: bool,
}

crate::record!(SearchFilter {
    id: i64,
    name: Option<String>,
    tags: Tags,
    active: bool,
});

///
/// User
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct User {
    pub id: i64,
    pub name: Option<String>,
    pub active: bool,
}

crate::record!(User {
    id: i64,
    name: Option<String> => "user_name",
    active: bool,
});

///
/// Order
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Order {
    pub id: i64,
    pub user_id: i64,
    pub total: f64,
}

crate::record!(Order {
    id: i64,
    user_id: i64,
    total: f64,
});

///
/// Call
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Call {
    pub text: String,
    pub kind: CommandKind,
    pub parameters: Vec<Parameter>,
}

///
/// RecordingDatabase
///

#[derive(Default)]
pub(crate) struct RecordingDatabase {
    calls: Mutex<Vec<Call>>,
    row_sets: Vec<RowSet>,
    scalar: Value,
    affected: u64,
    failing: bool,
}

impl RecordingDatabase {
    pub(crate) fn with_row_sets(row_sets: Vec<RowSet>) -> Self {
        Self {
            row_sets,
            ..Self::default()
        }
    }

    pub(crate) fn with_scalar(scalar: impl Into<Value>) -> Self {
        Self {
            scalar: scalar.into(),
            ..Self::default()
        }
    }

    pub(crate) fn with_affected(affected: u64) -> Self {
        Self {
            affected,
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<(), ExecuteError> {
        self.calls.lock().expect("calls lock").push(Call {
            text: text.to_string(),
            kind,
            parameters: parameters.to_vec(),
        });

        if self.failing {
            return Err(ExecuteError::backend(text, "connection reset"));
        }

        Ok(())
    }
}

impl ParameterFactory for RecordingDatabase {}

impl DatabaseManager for RecordingDatabase {
    fn execute_reader(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<Vec<RowSet>, ExecuteError> {
        self.record(text, kind, parameters)?;
        Ok(self.row_sets.clone())
    }

    fn execute_scalar(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<Value, ExecuteError> {
        self.record(text, kind, parameters)?;
        Ok(self.scalar.clone())
    }

    fn execute_non_query(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<u64, ExecuteError> {
        self.record(text, kind, parameters)?;
        Ok(self.affected)
    }
}

#[async_trait]
impl AsyncDatabaseManager for RecordingDatabase {
    async fn execute_reader(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<Vec<RowSet>, ExecuteError> {
        DatabaseManager::execute_reader(self, text, kind, parameters)
    }

    async fn execute_scalar(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<Value, ExecuteError> {
        DatabaseManager::execute_scalar(self, text, kind, parameters)
    }

    async fn execute_non_query(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<u64, ExecuteError> {
        DatabaseManager::execute_non_query(self, text, kind, parameters)
    }
}
