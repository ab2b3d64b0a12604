//! Module: command
//! Responsibility: command description (text, kind, parameter rules, null policy)
//! and parameter materialization against filter instances.
//! Does not own: execution (delegated to `access`) or result mapping.

mod builder;
mod materialize;
mod parameter;
mod structured;


use crate::error::ErrorClass;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use thiserror::Error as ThisError;

// re-exports
pub use builder::CommandExpression;
pub use materialize::{MaterializeError, materialize};
pub use parameter::{Parameter, ParameterDirection, ParameterModifier, modifier};

///
/// CommandError
///
/// Construction and configuration failures, surfaced immediately.
///

#[derive(Debug, ThisError)]
pub enum CommandError {
    #[error("no command text provided")]
    EmptyText,

    #[error("command kind {0:?} is not supported")]
    UnsupportedKind(CommandKind),

    #[error("result type {type_name} is not declared on this command")]
    ResultTypeNotDeclared { type_name: &'static str },

    #[error("result set {index} is out of range ({arity} declared)")]
    ResultSetOutOfRange { index: usize, arity: usize },
}

impl CommandError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::EmptyText => ErrorClass::InvariantViolation,
            Self::UnsupportedKind(_) => ErrorClass::Unsupported,
            Self::ResultTypeNotDeclared { .. } | Self::ResultSetOutOfRange { .. } => {
                ErrorClass::NotFound
            }
        }
    }
}

///
/// CommandKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CommandKind {
    Text,
    StoredProcedure,
    TableDirect,
}

impl CommandKind {
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Text => 0x01,
            Self::StoredProcedure => 0x02,
            Self::TableDirect => 0x03,
        }
    }
}

///
/// InclusionMode
///
/// Implicit: every filter property becomes a parameter unless excluded.
/// Explicit: only included properties become parameters.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum InclusionMode {
    #[default]
    Implicit,
    Explicit,
}

impl InclusionMode {
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Implicit => 0x10,
            Self::Explicit => 0x11,
        }
    }
}

///
/// NullValueMode
///
/// Where the `DbNull` sentinel replaces a language-level null.
///
/// | mode                     | filter, no modifier | filter, modifier ran | explicit |
/// |--------------------------|---------------------|----------------------|----------|
/// | `Never`                  |                     |                      |          |
/// | `FilterOnlyMinimum`      | yes                 |                      |          |
/// | `FilterOnlyFull`         | yes                 | yes                  |          |
/// | `ExplicitParametersOnly` |                     |                      | yes      |
/// | `Full`                   | yes                 | yes                  | yes      |
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum NullValueMode {
    #[default]
    Never,
    FilterOnlyMinimum,
    FilterOnlyFull,
    ExplicitParametersOnly,
    Full,
}

impl NullValueMode {
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Never => 0x20,
            Self::FilterOnlyMinimum => 0x21,
            Self::FilterOnlyFull => 0x22,
            Self::ExplicitParametersOnly => 0x23,
            Self::Full => 0x24,
        }
    }

    #[must_use]
    pub const fn replaces_filter_nulls(self) -> bool {
        matches!(
            self,
            Self::FilterOnlyMinimum | Self::FilterOnlyFull | Self::Full
        )
    }

    #[must_use]
    pub const fn replaces_modified_nulls(self) -> bool {
        matches!(self, Self::FilterOnlyFull | Self::Full)
    }

    #[must_use]
    pub const fn replaces_explicit_nulls(self) -> bool {
        matches!(self, Self::ExplicitParametersOnly | Self::Full)
    }
}

///
/// CommandSpec
///
/// Frozen-able description of a parameterized command. Ordered maps keep
/// the first insertion position when an entry is replaced.
///

#[derive(Clone)]
pub struct CommandSpec {
    text: String,
    kind: CommandKind,
    pub(crate) inclusion_mode: InclusionMode,
    pub(crate) null_mode: NullValueMode,
    pub(crate) inclusions: IndexMap<String, Option<ParameterModifier>>,
    pub(crate) exclusions: IndexSet<String>,
    pub(crate) constants: IndexMap<String, ParameterModifier>,
}

impl CommandSpec {
    /// Validate and build a command description with default rules.
    pub fn new(text: impl Into<String>, kind: CommandKind) -> Result<Self, CommandError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CommandError::EmptyText);
        }
        if kind == CommandKind::TableDirect {
            return Err(CommandError::UnsupportedKind(kind));
        }

        Ok(Self {
            text,
            kind,
            inclusion_mode: InclusionMode::default(),
            null_mode: NullValueMode::default(),
            inclusions: IndexMap::new(),
            exclusions: IndexSet::new(),
            constants: IndexMap::new(),
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        self.kind
    }

    #[must_use]
    pub const fn inclusion_mode(&self) -> InclusionMode {
        self.inclusion_mode
    }

    #[must_use]
    pub const fn null_mode(&self) -> NullValueMode {
        self.null_mode
    }

    pub fn inclusion_keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.inclusions.keys().map(String::as_str)
    }

    pub fn exclusions(&self) -> impl ExactSizeIterator<Item = &str> {
        self.exclusions.iter().map(String::as_str)
    }

    pub fn constant_keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.constants.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("text", &self.text)
            .field("kind", &self.kind)
            .field("inclusion_mode", &self.inclusion_mode)
            .field("null_mode", &self.null_mode)
            .field("inclusions", &self.inclusions.keys().collect::<Vec<_>>())
            .field("exclusions", &self.exclusions)
            .field("constants", &self.constants.keys().collect::<Vec<_>>())
            .finish()
    }
}
