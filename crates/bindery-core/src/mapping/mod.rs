//! Module: mapping
//! Responsibility: per-result-type property → column-alias tables and row
//! projection through them.
//! Does not own: metadata discovery (see `metadata`) or row retrieval.


use crate::{
    access::RowSet,
    error::ErrorClass,
    fingerprint::Fingerprint,
    metadata::{PropertyMetadataExtractor, TypeDescriptor},
    traits::{DescriptorActions, PropertyError, ResultRecord},
    value::{ConversionError, Value},
};
use derive_more::Deref;
use indexmap::{IndexMap, IndexSet};
use std::{fmt, sync::Arc};
use thiserror::Error as ThisError;

///
/// MappingError
///

#[derive(Debug, ThisError)]
pub enum MappingError {
    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error("converter for property '{property}' failed: {source}")]
    Converter {
        property: String,
        #[source]
        source: ConversionError,
    },

    #[error("scalar result: {0}")]
    Scalar(#[source] ConversionError),

    #[error("no mapping table for result set {index}")]
    MissingTable { index: usize },
}

impl MappingError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::Property(PropertyError::NotFound { .. }) => ErrorClass::NotFound,
            Self::Property(PropertyError::Conversion { .. })
            | Self::Converter { .. }
            | Self::Scalar(_) => ErrorClass::Unsupported,
            Self::MissingTable { .. } => ErrorClass::InvariantViolation,
        }
    }
}

/// Column value transform applied before assignment.
pub type ValueConverter = Arc<dyn Fn(Value) -> Result<Value, ConversionError> + Send + Sync>;

type MappingAction = Arc<dyn Fn(&mut PropertyMappingConfiguration) + Send + Sync>;

///
/// PropertyMappingConfiguration
///
/// Scratch state one mapping action writes into.
///

pub struct PropertyMappingConfiguration {
    property: String,
    alias: Option<String>,
    converter: Option<ValueConverter>,
}

impl PropertyMappingConfiguration {
    fn new(property: &str) -> Self {
        Self {
            property: property.to_string(),
            alias: None,
            converter: None,
        }
    }

    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Read this property from the column named `alias`.
    pub fn use_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.alias = Some(alias.into());
        self
    }

    /// Transform the column value before it is assigned.
    pub fn process_value_using<C>(&mut self, converter: C) -> &mut Self
    where
        C: Fn(Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        self.converter = Some(Arc::new(converter));
        self
    }
}

///
/// MappingRule
///

#[derive(Clone)]
pub struct MappingRule {
    pub property: String,
    pub alias: String,
    pub converter: Option<ValueConverter>,
}

impl fmt::Debug for MappingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRule")
            .field("property", &self.property)
            .field("alias", &self.alias)
            .field("converter", &self.converter.is_some())
            .finish()
    }
}

///
/// MappingTable
///
/// Frozen property → rule table for one result type.
///

#[derive(Clone, Debug, Default, Deref)]
pub struct MappingTable(IndexMap<String, MappingRule>);

impl MappingTable {
    /// Project every row of `set` into a fresh `R`.
    pub fn project<R: ResultRecord>(&self, set: &RowSet) -> Result<Vec<R>, MappingError> {
        // resolve ordinals once per row set; rules with no column are skipped
        let bound: Vec<(&MappingRule, usize)> = self
            .0
            .values()
            .filter_map(|rule| set.ordinal(&rule.alias).map(|ordinal| (rule, ordinal)))
            .collect();

        let mut out = Vec::with_capacity(set.rows().len());
        for row in set.rows() {
            let mut record = R::default();

            for (rule, ordinal) in &bound {
                let Some(raw) = row.get(*ordinal) else {
                    continue;
                };

                let mut value = raw.clone().normalize_db_null();
                if let Some(convert) = &rule.converter {
                    value = convert(value).map_err(|source| MappingError::Converter {
                        property: rule.property.clone(),
                        source,
                    })?;
                }

                record.set(&rule.property, value)?;
            }

            out.push(record);
        }

        Ok(out)
    }
}

///
/// ResultMapping
///
/// Mutable mapping rules for one declared result type. Seeded with one
/// alias action per readable property; caller overrides replace them.
///

#[derive(Clone)]
pub struct ResultMapping {
    descriptor: TypeDescriptor,
    actions: IndexMap<String, MappingAction>,
    overrides: IndexSet<String>,
    cleared: bool,
}

impl ResultMapping {
    pub fn new(descriptor: TypeDescriptor, extractor: &dyn PropertyMetadataExtractor) -> Self {
        let actions = extractor
            .find_allowed_properties(&descriptor, DescriptorActions::Read)
            .into_iter()
            .map(|(name, metadata)| {
                let alias = metadata.alias;
                let action: MappingAction =
                    Arc::new(move |config: &mut PropertyMappingConfiguration| {
                        config.use_alias(alias.clone());
                    });

                (name, action)
            })
            .collect();

        Self {
            descriptor,
            actions,
            overrides: IndexSet::new(),
            cleared: false,
        }
    }

    #[must_use]
    pub const fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Add or replace the mapping action for one property.
    pub fn for_property<O>(&mut self, name: impl Into<String>, options: O) -> &mut Self
    where
        O: Fn(&mut PropertyMappingConfiguration) + Send + Sync + 'static,
    {
        let name = name.into();
        self.overrides.insert(name.clone());
        self.actions.insert(name, Arc::new(options));
        self
    }

    /// Drop every mapping action, seeded ones included.
    pub fn clear_mappings(&mut self) -> &mut Self {
        self.actions.clear();
        self.overrides.clear();
        self.cleared = true;
        self
    }

    /// Property names with an active mapping, in action order.
    pub fn properties(&self) -> impl ExactSizeIterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_result_type(
            &self.descriptor,
            self.cleared,
            self.overrides.iter().map(String::as_str),
        )
    }

    /// Run every action and snapshot the resulting rules.
    #[must_use]
    pub fn export(&self) -> MappingTable {
        let rules = self
            .actions
            .iter()
            .map(|(name, action)| {
                let mut config = PropertyMappingConfiguration::new(name);
                action(&mut config);

                let rule = MappingRule {
                    alias: config.alias.unwrap_or_else(|| name.clone()),
                    property: config.property,
                    converter: config.converter,
                };

                (name.clone(), rule)
            })
            .collect();

        MappingTable(rules)
    }
}

impl fmt::Debug for ResultMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultMapping")
            .field("type", &self.descriptor.type_name())
            .field("properties", &self.actions.keys().collect::<Vec<_>>())
            .field("cleared", &self.cleared)
            .finish_non_exhaustive()
    }
}
