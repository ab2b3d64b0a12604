//! ## Crate layout
//! - `core`: command builders, parameter materialization, result mapping,
//!   fingerprints, the processor cache and configuration.
//!
//! The `prelude` module carries the surface needed to describe, realize and
//! execute commands; record types opt in with `record!`.

pub use bindery_core as core;

#[doc(hidden)]
pub use bindery_core::__reexports;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use bindery_core::{Error, record};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{prelude::*, record};
}
