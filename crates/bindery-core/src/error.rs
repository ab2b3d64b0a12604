use crate::{
    access::ExecuteError,
    cache::CacheError,
    command::{CommandError, MaterializeError},
    config::ConfigError,
    mapping::MappingError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Rolled-up error returned by the public bindery surface.
/// Each variant wraps the concern-specific error that produced it.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Runtime classification of this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Command(err) => err.class(),
            Self::Materialize(err) => err.class(),
            Self::Mapping(err) => err.class(),
            Self::Cache(err) => err.class(),
            Self::Execute(_) => ErrorClass::Internal,
            Self::Config(err) => err.class(),
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Internal,
    Conflict,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Internal => "internal",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}
