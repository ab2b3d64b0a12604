//! Module: config
//! Responsibility: defaults applied to every builder created by a
//! `CommandManager`, loadable from TOML.
//! Does not own: per-command overrides (those stay on the builder).

use crate::{
    command::{InclusionMode, NullValueMode},
    error::ErrorClass,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::Read { .. } => ErrorClass::NotFound,
            Self::Parse(_) => ErrorClass::Unsupported,
        }
    }
}

///
/// Config
///
/// ```toml
/// null_values = "filter_only_minimum"
/// inclusion = "explicit"
///
/// [cache]
/// enabled = true
/// ```
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub null_values: NullValueMode,
    pub inclusion: InclusionMode,
    pub cache: CacheConfig,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }
}

///
/// CacheConfig
///
/// With `enabled = false` every `realize` compiles a fresh processor.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
