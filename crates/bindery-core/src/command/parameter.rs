use crate::value::{DbType, Value};
use std::sync::Arc;

///
/// ParameterDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

///
/// Parameter
///
/// One bound command parameter. `type_name` is only meaningful for
/// structured (table-valued) parameters.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub direction: ParameterDirection,
    pub db_type: Option<DbType>,
    pub value: Value,
    pub size: Option<usize>,
    pub type_name: Option<String>,
}

impl Parameter {
    /// Build an input parameter with an inferred type.
    pub fn input(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();

        Self {
            name: name.into(),
            db_type: DbType::infer(&value),
            value,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_db_type(mut self, db_type: DbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    #[must_use]
    pub const fn with_direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = direction;
        self
    }
}

///
/// ParameterModifier
///
/// Caller hook run against a freshly created parameter.
///

pub type ParameterModifier = Arc<dyn Fn(&mut Parameter) + Send + Sync>;

/// Wrap a closure as a shareable parameter modifier.
pub fn modifier<M>(modify: M) -> ParameterModifier
where
    M: Fn(&mut Parameter) + Send + Sync + 'static,
{
    Arc::new(modify)
}
