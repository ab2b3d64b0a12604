//! Module: access
//! Responsibility: the boundary to the data-access collaborator that actually
//! talks to a server.
//! Does not own: connection management, transactions, or command-text rewriting.

use crate::{
    command::{CommandKind, Parameter, ParameterDirection},
    value::{DbType, Value},
};
use async_trait::async_trait;
use thiserror::Error as ThisError;

///
/// ExecuteError
///

#[derive(Debug, ThisError)]
pub enum ExecuteError {
    #[error("command '{command}' failed: {source}")]
    Backend {
        command: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ExecuteError {
    pub fn backend(
        command: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Backend {
            command: command.into(),
            source: source.into(),
        }
    }
}

///
/// RowSet
///
/// One materialized result set: column names plus rows in column order.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.push_row(row);
        self
    }

    pub fn push_row(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Resolve a column alias: exact match first, then ASCII case-insensitive.
    #[must_use]
    pub fn ordinal(&self, alias: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column == alias)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|column| column.eq_ignore_ascii_case(alias))
            })
    }
}

///
/// ParameterFactory
///
/// Provider-specific parameter construction.
///

pub trait ParameterFactory {
    fn create_parameter(&self) -> Parameter {
        Parameter::default()
    }

    fn create_input_parameter(&self, name: &str, db_type: DbType, value: Value) -> Parameter {
        let mut parameter = self.create_parameter();
        parameter.name = name.to_string();
        parameter.direction = ParameterDirection::Input;
        parameter.db_type = Some(db_type);
        parameter.value = value;

        parameter
    }
}

///
/// DatabaseManager
///
/// Synchronous execution against a server.
///

pub trait DatabaseManager: ParameterFactory + Send + Sync {
    fn execute_reader(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<Vec<RowSet>, ExecuteError>;

    fn execute_scalar(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<Value, ExecuteError>;

    fn execute_non_query(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<u64, ExecuteError>;
}

///
/// AsyncDatabaseManager
///
/// Asynchronous execution. Dropping a returned future cancels the call.
///

#[async_trait]
pub trait AsyncDatabaseManager: ParameterFactory + Send + Sync {
    async fn execute_reader(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<Vec<RowSet>, ExecuteError>;

    async fn execute_scalar(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<Value, ExecuteError>;

    async fn execute_non_query(
        &self,
        text: &str,
        kind: CommandKind,
        parameters: &[Parameter],
    ) -> Result<u64, ExecuteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Provider;

    impl ParameterFactory for Provider {
        fn create_parameter(&self) -> Parameter {
            Parameter {
                size: Some(64),
                ..Parameter::default()
            }
        }
    }

    #[test]
    fn input_parameter_builds_on_the_provider_parameter() {
        let parameter = Provider.create_input_parameter("code", DbType::String, Value::from("x"));

        assert_eq!(parameter.name, "code");
        assert_eq!(parameter.direction, ParameterDirection::Input);
        assert_eq!(parameter.db_type, Some(DbType::String));
        assert_eq!(parameter.value, Value::Text("x".to_string()));
        assert_eq!(parameter.size, Some(64));
    }

    #[test]
    fn ordinal_prefers_exact_column_match() {
        let set = RowSet::new(["Name", "name", "id"]);

        assert_eq!(set.ordinal("name"), Some(1));
        assert_eq!(set.ordinal("NAME"), Some(0));
        assert_eq!(set.ordinal("ID"), Some(2));
        assert_eq!(set.ordinal("missing"), None);
    }
}
