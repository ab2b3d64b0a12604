//! Property metadata discovery for result mapping.
//!
//! The extractor is a pluggable capability; `DeclaredPropertyExtractor`
//! reads the static tables supplied by `PropertyAccessor`.

use crate::{
    traits::{DescriptorActions, PropertyAccessor, PropertyDescriptor},
    value::DbType,
};
use indexmap::IndexMap;
use std::any::TypeId;

///
/// TypeDescriptor
///
/// Runtime handle on a filter or result type: identity plus its
/// property table.
///

#[derive(Clone, Copy, Debug)]
pub struct TypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    properties: fn() -> &'static [PropertyDescriptor],
}

impl TypeDescriptor {
    #[must_use]
    pub fn of<T: PropertyAccessor>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            properties: T::properties,
        }
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn properties(&self) -> &'static [PropertyDescriptor] {
        (self.properties)()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeDescriptor {}

///
/// PropertyMetadata
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyMetadata {
    pub name: String,
    pub alias: String,
    pub db_type: Option<DbType>,
}

impl From<&PropertyDescriptor> for PropertyMetadata {
    fn from(desc: &PropertyDescriptor) -> Self {
        Self {
            name: desc.name.to_string(),
            alias: desc.alias.to_string(),
            db_type: desc.db_type,
        }
    }
}

///
/// PropertyMetadataExtractor
///
/// Finds the properties of a type that may take part in the requested
/// direction, keyed by property name in declaration order.
///

pub trait PropertyMetadataExtractor: Send + Sync {
    fn find_allowed_properties(
        &self,
        descriptor: &TypeDescriptor,
        actions: DescriptorActions,
    ) -> IndexMap<String, PropertyMetadata>;
}

///
/// DeclaredPropertyExtractor
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DeclaredPropertyExtractor;

impl PropertyMetadataExtractor for DeclaredPropertyExtractor {
    fn find_allowed_properties(
        &self,
        descriptor: &TypeDescriptor,
        actions: DescriptorActions,
    ) -> IndexMap<String, PropertyMetadata> {
        descriptor
            .properties()
            .iter()
            .filter(|desc| desc.actions.allows(actions))
            .map(|desc| (desc.name.to_string(), PropertyMetadata::from(desc)))
            .collect()
    }
}
