//! Core of Kiln: the convention-driven entity-type graph, the configuration
//! source ledger, convention dispatch, the discriminator convention, and the
//! read surface the save pipeline and storage mapping use once a model has
//! been finalized.

pub mod builder;
pub mod convention;
pub mod dispatch;
pub mod error;
pub mod generate;
pub mod ledger;
pub mod mapping;
pub mod model;
pub mod obs;
pub mod save;

mod validate;

#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Builder vocabulary only; errors, traces and dispatch internals stay in
/// their modules.
///

pub mod prelude {
    pub use crate::{
        builder::ModelBuilder,
        convention::DiscriminatorConvention,
        dispatch::ConventionSet,
        ledger::ConfigurationSource,
        model::{EntityTypeId, Model, PropertyId, PropertySaveBehavior, ProviderKey, ValueType},
    };
}
