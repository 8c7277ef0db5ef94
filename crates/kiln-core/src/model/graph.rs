use crate::{
    error::ModelError,
    generate::{DiscriminatorValueGenerator, ValueGenerator, ValueGeneratorFactory},
    ledger::{Attribute, ConfigLedger, ConfigurationSource, LedgerKey},
    model::{
        DiscriminatorMapping, EntityType, EntityTypeId, Property, PropertyId,
        PropertySaveBehavior, ProviderKey, ValueType,
    },
};
use serde::Serialize;
use std::sync::Arc;

///
/// Model
///
/// Entity-type graph plus the ledger that guards its tracked attributes.
/// Mutation is crate-internal; callers edit through `ModelBuilder`, which
/// raises the matching convention events.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct Model {
    entity_types: Vec<EntityType>,
    properties: Vec<Property>,

    #[serde(skip)]
    ledger: ConfigLedger,

    finalized: bool,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    #[must_use]
    pub const fn ledger(&self) -> &ConfigLedger {
        &self.ledger
    }

    /// All entity types in declaration order.
    pub fn entity_types(&self) -> impl Iterator<Item = &EntityType> {
        self.entity_types.iter()
    }

    #[must_use]
    pub fn entity_type_count(&self) -> usize {
        self.entity_types.len()
    }

    pub fn entity_type(&self, id: EntityTypeId) -> Result<&EntityType, ModelError> {
        self.entity_types
            .get(id.index())
            .ok_or_else(|| ModelError::UnknownEntityType(id.to_string()))
    }

    #[must_use]
    pub fn find_entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entity_types.iter().find(|e| e.name == name)
    }

    pub fn property(&self, id: PropertyId) -> Result<&Property, ModelError> {
        self.properties
            .get(id.index())
            .ok_or_else(|| ModelError::UnknownProperty(id.to_string()))
    }

    /// Properties in the bag of `entity`, in declaration order.
    pub fn properties(
        &self,
        entity: EntityTypeId,
    ) -> Result<impl Iterator<Item = &Property>, ModelError> {
        let entity = self.entity_type(entity)?;

        Ok(entity
            .properties
            .iter()
            .map(move |id| &self.properties[id.index()]))
    }

    /// Look a property up in the bag of `entity` only; inherited properties
    /// are not visible here.
    #[must_use]
    pub fn find_property(&self, entity: EntityTypeId, name: &str) -> Option<&Property> {
        self.properties(entity).ok()?.find(|p| p.name == name)
    }

    pub fn base_type(&self, entity: EntityTypeId) -> Result<Option<EntityTypeId>, ModelError> {
        Ok(self.entity_type(entity)?.base)
    }

    /// Root of the hierarchy `entity` belongs to.
    pub fn root_of(&self, entity: EntityTypeId) -> Result<EntityTypeId, ModelError> {
        let mut current = self.entity_type(entity)?;
        while let Some(base) = current.base {
            current = self.entity_type(base)?;
        }

        Ok(current.id)
    }

    /// Pre-order walk of the subtree below `entity`.
    pub fn derived_types(
        &self,
        entity: EntityTypeId,
        inclusive: bool,
    ) -> Result<Vec<EntityTypeId>, ModelError> {
        let start = self.entity_type(entity)?;
        let mut out = Vec::new();
        if inclusive {
            out.push(start.id);
        }

        let mut stack: Vec<EntityTypeId> = start.derived.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.entity_type(next)?.derived.iter().rev().copied());
        }

        Ok(out)
    }

    /// Whether `candidate` is `entity` itself or sits anywhere below it.
    pub fn is_same_or_derived_from(
        &self,
        candidate: EntityTypeId,
        entity: EntityTypeId,
    ) -> Result<bool, ModelError> {
        let mut current = Some(candidate);
        while let Some(id) = current {
            if id == entity {
                return Ok(true);
            }
            current = self.entity_type(id)?.base;
        }

        Ok(false)
    }

    /// Discriminator property owned by `entity` itself.
    pub fn own_discriminator_property(
        &self,
        provider: &ProviderKey,
        entity: EntityTypeId,
    ) -> Result<Option<PropertyId>, ModelError> {
        Ok(self
            .entity_type(entity)?
            .discriminator(provider)
            .and_then(|m| m.property))
    }

    /// Discriminator property in effect for `entity`, read from its root.
    pub fn discriminator_property(
        &self,
        provider: &ProviderKey,
        entity: EntityTypeId,
    ) -> Result<Option<PropertyId>, ModelError> {
        self.own_discriminator_property(provider, self.root_of(entity)?)
    }

    pub fn discriminator_value(
        &self,
        provider: &ProviderKey,
        entity: EntityTypeId,
    ) -> Result<Option<&str>, ModelError> {
        Ok(self
            .entity_type(entity)?
            .discriminator(provider)
            .and_then(|m| m.value.as_deref()))
    }

    /// Instantiate the value generator configured on `property`, if any.
    pub fn value_generator(
        &self,
        property: PropertyId,
    ) -> Result<Option<Arc<dyn ValueGenerator>>, ModelError> {
        let generator = match self.property(property)?.value_generator_factory() {
            None => None,
            Some(ValueGeneratorFactory::Discriminator(provider)) => Some(Arc::new(
                DiscriminatorValueGenerator::new(provider.clone()),
            ) as Arc<dyn ValueGenerator>),
            Some(ValueGeneratorFactory::Custom(generator)) => Some(Arc::clone(generator)),
        };

        Ok(generator)
    }

    // ------------------------------------------------------------------
    // Mutation (crate-internal, no events)
    // ------------------------------------------------------------------

    pub(crate) const fn mark_finalized(&mut self) {
        self.finalized = true;
    }

    pub(crate) const fn ledger_mut(&mut self) -> &mut ConfigLedger {
        &mut self.ledger
    }

    pub(crate) fn insert_entity_type(&mut self, name: &str) -> Result<EntityTypeId, ModelError> {
        if self.find_entity_type(name).is_some() {
            return Err(ModelError::DuplicateEntityType(name.to_string()));
        }

        let id = EntityTypeId::new(self.entity_types.len());
        self.entity_types.push(EntityType::new(id, name));

        Ok(id)
    }

    /// Relink `entity` under `new_base`, returning the previous base.
    ///
    /// Cycle detection happens before anything is written. A rejected ledger
    /// write leaves the graph untouched and reports the current base as both
    /// old and new.
    pub(crate) fn relink_base(
        &mut self,
        entity: EntityTypeId,
        new_base: Option<EntityTypeId>,
        source: ConfigurationSource,
    ) -> Result<(Option<EntityTypeId>, bool), ModelError> {
        let old_base = self.entity_type(entity)?.base;

        if let Some(base) = new_base
            && self.is_same_or_derived_from(base, entity)?
        {
            return Err(ModelError::Cycle {
                entity: self.entity_type(entity)?.name.clone(),
                base: self.entity_type(base)?.name.clone(),
            });
        }
        let key = LedgerKey::entity(entity, Attribute::BaseType);
        if old_base == new_base {
            if self.ledger.accepts(&key, source) {
                self.ledger.claim(key, source);
            }
            return Ok((old_base, false));
        }

        let slot = &mut self.entity_types[entity.index()].base;
        if !self.ledger.try_set(key, slot, new_base, source) {
            return Ok((old_base, false));
        }

        if let Some(old) = old_base {
            self.entity_types[old.index()]
                .derived
                .retain(|id| *id != entity);
        }
        if let Some(base) = new_base {
            self.entity_types[base.index()].derived.push(entity);
        }

        Ok((old_base, true))
    }

    /// Find or declare a property in the bag of `entity`.
    pub(crate) fn add_or_get_property(
        &mut self,
        entity: EntityTypeId,
        name: &str,
        value_type: ValueType,
        shadow: bool,
        source: ConfigurationSource,
    ) -> Result<PropertyId, ModelError> {
        if let Some(existing) = self.find_property(entity, name) {
            let id = existing.id;
            self.ledger
                .claim(LedgerKey::property(id, Attribute::Declared), source);

            return Ok(id);
        }
        self.entity_type(entity)?;

        let id = PropertyId::new(self.properties.len());
        self.properties
            .push(Property::new(id, name, entity, value_type, shadow));
        self.entity_types[entity.index()].properties.push(id);
        self.ledger
            .claim(LedgerKey::property(id, Attribute::Declared), source);

        Ok(id)
    }

    /// Unlink a property from the bag of `entity` if `source` may override
    /// its declaration and every configured facet. The arena slot stays so
    /// ids remain stable.
    pub(crate) fn remove_property(
        &mut self,
        entity: EntityTypeId,
        name: &str,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.entity_type(entity)?;
        let Some(id) = self.find_property(entity, name).map(Property::id) else {
            return Ok(false);
        };

        // removal drops every facet rank, so each one must yield to `source`
        let keys = [
            Attribute::Declared,
            Attribute::Required,
            Attribute::AfterSave,
            Attribute::ValueGenerator,
        ]
        .map(|attribute| LedgerKey::property(id, attribute));
        if !self.ledger.admits_all(&keys, source) {
            return Ok(false);
        }

        self.entity_types[entity.index()]
            .properties
            .retain(|p| *p != id);
        self.properties[id.index()].attached = false;

        for key in &keys {
            self.ledger.release(key);
        }

        Ok(true)
    }

    pub(crate) fn set_required(
        &mut self,
        property: PropertyId,
        required: bool,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.property(property)?;
        let key = LedgerKey::property(property, Attribute::Required);
        let slot = &mut self.properties[property.index()].required;

        Ok(self.ledger.try_set(key, slot, required, source))
    }

    pub(crate) fn set_after_save(
        &mut self,
        property: PropertyId,
        behavior: PropertySaveBehavior,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.property(property)?;
        let key = LedgerKey::property(property, Attribute::AfterSave);
        let slot = &mut self.properties[property.index()].after_save;

        Ok(self.ledger.try_set(key, slot, behavior, source))
    }

    pub(crate) fn set_value_generator(
        &mut self,
        property: PropertyId,
        factory: Option<ValueGeneratorFactory>,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.property(property)?;
        let key = LedgerKey::property(property, Attribute::ValueGenerator);
        let slot = &mut self.properties[property.index()].value_generator;

        Ok(self.ledger.try_set(key, slot, factory, source))
    }

    pub(crate) fn set_discriminator_property(
        &mut self,
        provider: &ProviderKey,
        entity: EntityTypeId,
        property: Option<PropertyId>,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.entity_type(entity)?;
        if let Some(property) = property {
            self.property(property)?;
        }

        let key = LedgerKey::entity(entity, Attribute::DiscriminatorProperty(provider.clone()));
        let DiscriminatorMapping { property: slot, .. } =
            self.entity_types[entity.index()].discriminator_mut(provider);

        Ok(self.ledger.try_set(key, slot, property, source))
    }

    pub(crate) fn set_discriminator_value(
        &mut self,
        provider: &ProviderKey,
        entity: EntityTypeId,
        value: Option<String>,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.entity_type(entity)?;

        let key = LedgerKey::entity(entity, Attribute::DiscriminatorValue(provider.clone()));
        let DiscriminatorMapping { value: slot, .. } =
            self.entity_types[entity.index()].discriminator_mut(provider);

        Ok(self.ledger.try_set(key, slot, value, source))
    }
}
