//! Table-valued ("structured") parameters: a property whose value is a
//! list of rows, sent under a server-side table type name.

use super::{CommandExpression, ParameterModifier};
use crate::{traits::PropertyAccessor, value::DbType};

impl<F: PropertyAccessor> CommandExpression<F> {
    /// Include a property as a structured parameter of server type
    /// `type_name`. An extra modifier runs after the type is set.
    #[must_use]
    pub fn include_property_as_structured(
        self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        modify: Option<ParameterModifier>,
    ) -> Self {
        let type_name = type_name.into();

        self.include_property_with(name, move |parameter| {
            parameter.db_type = Some(DbType::Structured);
            parameter.type_name = Some(type_name.clone());

            if let Some(modify) = &modify {
                modify(parameter);
            }
        })
    }
}
