//! Parameter materialization: command rules + filter instance → ordered
//! parameter list.
//!
//! Output order is a contract callers bind positionally against:
//! filter-derived parameters, then constants in addition order, then the
//! caller's explicit parameters in call order.

#[cfg(test)]
mod tests;

use super::{
    CommandSpec, InclusionMode, NullValueMode, Parameter, ParameterDirection, ParameterModifier,
};
use crate::{
    access::ParameterFactory,
    error::ErrorClass,
    traits::{PropertyAccessor, PropertyDescriptor},
    value::DbType,
};
use thiserror::Error as ThisError;

///
/// MaterializeError
///

#[derive(Debug, ThisError)]
pub enum MaterializeError {
    #[error("property '{property}' not found on filter type {type_name}")]
    UnknownProperty {
        type_name: &'static str,
        property: String,
    },

    #[error("parameter '{parameter}' holds a {kind} value with no known parameter type")]
    UnsupportedParameterType {
        parameter: String,
        kind: &'static str,
    },
}

impl MaterializeError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownProperty { .. } => ErrorClass::NotFound,
            Self::UnsupportedParameterType { .. } => ErrorClass::Unsupported,
        }
    }

    fn unknown<F>(property: &str) -> Self {
        Self::UnknownProperty {
            type_name: std::any::type_name::<F>(),
            property: property.to_string(),
        }
    }
}

/// Build the ordered parameter list for one execution.
///
/// A missing filter contributes no property parameters and never fails.
pub fn materialize<F, P>(
    spec: &CommandSpec,
    factory: &P,
    filter: Option<&F>,
    explicit: Vec<Parameter>,
) -> Result<Vec<Parameter>, MaterializeError>
where
    F: PropertyAccessor,
    P: ParameterFactory + ?Sized,
{
    let mut parameters = Vec::with_capacity(spec.constants.len() + explicit.len());

    if let Some(filter) = filter {
        match spec.inclusion_mode {
            InclusionMode::Explicit => {
                push_explicit_properties(spec, factory, filter, &mut parameters)?;
            }
            InclusionMode::Implicit => {
                push_implicit_properties(spec, factory, filter, &mut parameters)?;
            }
        }
    }

    for (name, modify) in &spec.constants {
        let mut parameter = factory.create_parameter();
        parameter.name.clone_from(name);
        parameter.direction = ParameterDirection::Input;
        modify(&mut parameter);

        parameters.push(parameter);
    }

    let replace_nulls = spec.null_mode.replaces_explicit_nulls();
    parameters.extend(explicit.into_iter().map(|mut parameter| {
        if replace_nulls {
            replace_null(&mut parameter);
        }
        parameter
    }));

    Ok(parameters)
}

// Only the included properties, in inclusion order.
fn push_explicit_properties<F, P>(
    spec: &CommandSpec,
    factory: &P,
    filter: &F,
    out: &mut Vec<Parameter>,
) -> Result<(), MaterializeError>
where
    F: PropertyAccessor,
    P: ParameterFactory + ?Sized,
{
    for (name, modify) in &spec.inclusions {
        let desc = F::descriptor(name).ok_or_else(|| MaterializeError::unknown::<F>(name))?;
        let parameter = property_parameter(factory, filter, desc, modify.as_ref(), spec.null_mode)?;

        out.push(parameter);
    }

    Ok(())
}

// Every declared property minus exclusions, in declaration order.
fn push_implicit_properties<F, P>(
    spec: &CommandSpec,
    factory: &P,
    filter: &F,
    out: &mut Vec<Parameter>,
) -> Result<(), MaterializeError>
where
    F: PropertyAccessor,
    P: ParameterFactory + ?Sized,
{
    for desc in F::properties() {
        if spec.exclusions.contains(desc.name) {
            continue;
        }

        let inclusion = spec.inclusions.get(desc.name);

        // no override and no known parameter type: not ours to send
        if inclusion.is_none() && desc.db_type.is_none() {
            continue;
        }

        let modify = inclusion.and_then(Option::as_ref);
        let parameter = property_parameter(factory, filter, desc, modify, spec.null_mode)?;

        out.push(parameter);
    }

    Ok(())
}

fn property_parameter<F, P>(
    factory: &P,
    filter: &F,
    desc: &PropertyDescriptor,
    modify: Option<&ParameterModifier>,
    null_mode: NullValueMode,
) -> Result<Parameter, MaterializeError>
where
    F: PropertyAccessor,
    P: ParameterFactory + ?Sized,
{
    let value = filter
        .get(desc.name)
        .ok_or_else(|| MaterializeError::unknown::<F>(desc.name))?;

    let mut parameter = factory.create_parameter();
    parameter.name = desc.name.to_string();
    parameter.direction = ParameterDirection::Input;
    parameter.value = value;
    parameter.db_type = desc.db_type;

    match modify {
        Some(modify) => {
            modify(&mut parameter);
            if null_mode.replaces_modified_nulls() {
                replace_null(&mut parameter);
            }
        }
        None => {
            if null_mode.replaces_filter_nulls() {
                replace_null(&mut parameter);
            }
        }
    }

    if parameter.db_type.is_none() {
        parameter.db_type = DbType::infer(&parameter.value);
    }
    if parameter.db_type.is_none() && !parameter.value.is_absent() {
        return Err(MaterializeError::UnsupportedParameterType {
            kind: parameter.value.kind_label(),
            parameter: parameter.name,
        });
    }

    Ok(parameter)
}

fn replace_null(parameter: &mut Parameter) {
    parameter.value = std::mem::take(&mut parameter.value).replace_null_with_db_null();
}
