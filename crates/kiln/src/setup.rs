use crate::Error;
use kiln_config::ModelConfig;
use kiln_core::{
    builder::{DispatchLimits, ModelBuilder},
    convention::DiscriminatorConvention,
    dispatch::ConventionSet,
    model::ProviderKey,
};
use std::sync::Arc;

/// Conventions selected by `config`, in registration order.
#[must_use]
pub fn convention_set(config: &ModelConfig) -> ConventionSet {
    let mut set = ConventionSet::new();

    let discriminator = &config.discriminator;
    if discriminator.enabled {
        set.add_structural(Arc::new(
            DiscriminatorConvention::new(ProviderKey::new(discriminator.provider.as_str()))
                .with_property_name(discriminator.property_name.as_str()),
        ));
    }

    set
}

/// A fresh builder wired with the conventions and dispatch limits of `config`.
pub fn model_builder(config: &ModelConfig) -> Result<ModelBuilder, Error> {
    config.validate()?;

    let limits = DispatchLimits {
        max_depth: config.dispatch.max_depth,
    };
    tracing::debug!(
        discriminator = config.discriminator.enabled,
        provider = %config.discriminator.provider,
        max_depth = limits.max_depth,
        "creating model builder"
    );

    Ok(ModelBuilder::new(convention_set(config)).with_limits(limits))
}

/// [`model_builder`] over a TOML document.
pub fn model_builder_from_toml(src: &str) -> Result<ModelBuilder, Error> {
    let config = ModelConfig::from_toml_str(src)?;

    model_builder(&config)
}
