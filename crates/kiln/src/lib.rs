//! Kiln: a convention-driven metadata model builder.
//!
//! Declare entity types and their inheritance through a [`ModelBuilder`],
//! let the registered conventions keep the model consistent, then
//! `finalize` it into a shared read-only [`Model`] for storage mapping and
//! the save pipeline.

mod error;
mod setup;

#[cfg(test)]
mod tests;

pub use error::{ConfigErrorKind, Error, ErrorKind, ErrorOrigin, ModelErrorKind};
pub use setup::{convention_set, model_builder, model_builder_from_toml};

pub use kiln_config as config;
pub use kiln_core as core;

pub use kiln_config::ModelConfig;
pub use kiln_core::{builder::ModelBuilder, model::Model};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{Error, ModelConfig, model_builder};
    pub use kiln_core::prelude::*;
}
