//! Value generation for new rows.
//!
//! Generators receive the finalized model at call time rather than a value
//! captured while the model was still being built, so they always observe the
//! configuration that was frozen.

use crate::{
    error::ModelError,
    model::{EntityTypeId, Model, ProviderKey},
};
use std::{fmt, sync::Arc};

///
/// ValueGenerator
///

pub trait ValueGenerator: Send + Sync {
    /// Produce the value to store for a new row of `entity`.
    fn generate(&self, model: &Model, entity: EntityTypeId) -> Result<String, ModelError>;
}

///
/// ValueGeneratorFactory
///
/// What a property records about how its values are produced.
///

#[derive(Clone)]
pub enum ValueGeneratorFactory {
    Discriminator(ProviderKey),
    Custom(Arc<dyn ValueGenerator>),
}

impl fmt::Debug for ValueGeneratorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discriminator(provider) => f.debug_tuple("Discriminator").field(provider).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

///
/// DiscriminatorValueGenerator
///
/// Returns the configured discriminator value of the entity type being
/// inserted. Stateless: two calls for the same type return the same value.
///

#[derive(Clone, Debug)]
pub struct DiscriminatorValueGenerator {
    provider: ProviderKey,
}

impl DiscriminatorValueGenerator {
    #[must_use]
    pub const fn new(provider: ProviderKey) -> Self {
        Self { provider }
    }

    #[must_use]
    pub const fn provider(&self) -> &ProviderKey {
        &self.provider
    }
}

impl ValueGenerator for DiscriminatorValueGenerator {
    fn generate(&self, model: &Model, entity: EntityTypeId) -> Result<String, ModelError> {
        if !model.is_finalized() {
            return Err(ModelError::NotFinalized {
                operation: "generate discriminator value",
            });
        }

        match model.discriminator_value(&self.provider, entity)? {
            Some(value) => Ok(value.to_string()),
            None => Err(ModelError::MissingDiscriminatorValue {
                entity: model.entity_type(entity)?.name().to_string(),
                provider: self.provider.to_string(),
            }),
        }
    }
}
