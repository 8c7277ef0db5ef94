use crate::{
    builder::ModelBuilder,
    dispatch::{BaseTypeChangedConvention, Convention, ConventionFlow, EntityTypeAddedConvention},
    error::ModelError,
    generate::ValueGeneratorFactory,
    ledger::ConfigurationSource,
    model::{EntityTypeId, PropertySaveBehavior, ProviderKey, ValueType},
};

const SOURCE: ConfigurationSource = ConfigurationSource::Convention;

///
/// DiscriminatorConvention
///
/// Keeps single-table inheritance discriminators consistent as entity types
/// are declared and reparented:
/// - the hierarchy root owns one shadow, required, write-once text property;
/// - every member's discriminator value defaults to its short name.
///
/// All writes happen at `Convention` rank, so anything configured by
/// annotation or explicit API is left alone.
///

#[derive(Clone, Debug)]
pub struct DiscriminatorConvention {
    provider: ProviderKey,
    property_name: String,
}

impl DiscriminatorConvention {
    pub const DEFAULT_PROPERTY_NAME: &str = "Discriminator";

    #[must_use]
    pub fn new(provider: ProviderKey) -> Self {
        Self {
            provider,
            property_name: Self::DEFAULT_PROPERTY_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn with_property_name(mut self, name: impl Into<String>) -> Self {
        self.property_name = name.into();
        self
    }

    #[must_use]
    pub const fn provider(&self) -> &ProviderKey {
        &self.provider
    }

    #[must_use]
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    // Make `entity` the discriminator owner of its hierarchy.
    fn configure_discriminator(
        &self,
        builder: &mut ModelBuilder,
        entity: EntityTypeId,
    ) -> Result<(), ModelError> {
        let property =
            builder.add_or_get_shadow_property(entity, &self.property_name, ValueType::Text, SOURCE)?;
        builder.set_required(property, true, SOURCE)?;
        builder.set_after_save(property, PropertySaveBehavior::Throw, SOURCE)?;
        builder.set_value_generator(
            property,
            Some(ValueGeneratorFactory::Discriminator(self.provider.clone())),
            SOURCE,
        )?;

        builder.set_discriminator_property(&self.provider, entity, Some(property), SOURCE)?;
        self.set_default_values(builder, &[entity])?;

        tracing::debug!(
            entity = builder.model().entity_type(entity)?.name(),
            provider = %self.provider,
            "configured discriminator"
        );

        Ok(())
    }

    fn set_default_values(
        &self,
        builder: &mut ModelBuilder,
        entities: &[EntityTypeId],
    ) -> Result<(), ModelError> {
        for &entity in entities {
            let value = builder.model().entity_type(entity)?.short_name().to_string();
            builder.set_discriminator_value(&self.provider, entity, Some(value), SOURCE)?;
        }

        Ok(())
    }

    // `entity` now inherits its discriminator column from a base.
    fn release_discriminator(
        &self,
        builder: &mut ModelBuilder,
        entity: EntityTypeId,
    ) -> Result<(), ModelError> {
        builder.set_discriminator_property(&self.provider, entity, None, SOURCE)?;

        let declared_shadow = builder
            .model()
            .find_property(entity, &self.property_name)
            .is_some_and(|p| p.is_shadow());
        if declared_shadow {
            builder.remove_property(entity, &self.property_name, SOURCE)?;
        }

        Ok(())
    }
}

impl Default for DiscriminatorConvention {
    fn default() -> Self {
        Self::new(ProviderKey::document())
    }
}

impl Convention for DiscriminatorConvention {
    fn name(&self) -> &'static str {
        "discriminator"
    }
}

impl EntityTypeAddedConvention for DiscriminatorConvention {
    fn on_entity_type_added(
        &self,
        builder: &mut ModelBuilder,
        entity: EntityTypeId,
    ) -> Result<ConventionFlow, ModelError> {
        let declared = builder.model().entity_type(entity)?;

        // already part of a connected subtree; its root owns the discriminator
        if declared.is_root() && declared.direct_derived_types().is_empty() {
            self.configure_discriminator(builder, entity)?;
        }

        Ok(ConventionFlow::Continue)
    }
}

impl BaseTypeChangedConvention for DiscriminatorConvention {
    fn on_base_type_changed(
        &self,
        builder: &mut ModelBuilder,
        entity: EntityTypeId,
        _old_base: Option<EntityTypeId>,
    ) -> Result<ConventionFlow, ModelError> {
        match builder.model().base_type(entity)? {
            None => {
                self.configure_discriminator(builder, entity)?;

                let derived = builder.model().derived_types(entity, false)?;
                self.set_default_values(builder, &derived)?;
            }
            Some(base) => {
                let root = builder.model().root_of(base)?;
                if builder
                    .model()
                    .own_discriminator_property(&self.provider, root)?
                    .is_none()
                {
                    self.configure_discriminator(builder, root)?;
                }

                self.release_discriminator(builder, entity)?;

                let subtree = builder.model().derived_types(entity, true)?;
                self.set_default_values(builder, &subtree)?;
            }
        }

        Ok(ConventionFlow::Continue)
    }
}
