//! Core runtime for bindery: fluent command description, parameter
//! materialization, result mapping, fingerprinting and the processor cache,
//! plus the ergonomics exported via the `prelude`.
//!
//! Data flow: `CommandManager::command` starts a `CommandExpression`;
//! `realize` fingerprints the accumulated rules and returns a cached,
//! immutable processor; executing a processor materializes parameters from
//! a filter, calls the data-access collaborator and projects any rows.

#[macro_use]
mod macros;

// public exports are one module level down
pub mod access;
pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod manager;
pub mod mapping;
pub mod metadata;
pub mod processor;
pub mod results;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

/// re-exports
///
/// implementors of `AsyncDatabaseManager` need the `async_trait` attribute the
/// trait was declared with
#[doc(hidden)]
pub mod __reexports {
    pub use async_trait;
}

///
/// Prelude
///
/// Everything needed to describe, realize and execute a command.
/// Processor traits are imported as `_` so their methods resolve without
/// claiming the names.
///

pub mod prelude {
    pub use crate::{
        access::{AsyncDatabaseManager, DatabaseManager, ParameterFactory, RowSet},
        command::{
            CommandKind, InclusionMode, NullValueMode, Parameter, ParameterDirection, modifier,
        },
        config::Config,
        error::Error,
        manager::CommandManager,
        processor::CommandProcessor as _,
        traits::{FieldValue, PropertyAccessor},
        value::{DbType, Value},
    };
}
