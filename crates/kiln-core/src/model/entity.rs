use crate::model::{EntityTypeId, PropertyId, ProviderKey, short_name};
use serde::Serialize;
use std::collections::BTreeMap;

///
/// DiscriminatorMapping
///
/// Provider-specific discriminator attributes of one entity type.
/// `property` is only ever set on a hierarchy root; derived types resolve it
/// through their root.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DiscriminatorMapping {
    pub property: Option<PropertyId>,
    pub value: Option<String>,
}

///
/// EntityType
///

#[derive(Clone, Debug, Serialize)]
pub struct EntityType {
    pub(crate) id: EntityTypeId,
    pub(crate) name: String,
    pub(crate) base: Option<EntityTypeId>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) derived: Vec<EntityTypeId>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) properties: Vec<PropertyId>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) extensions: BTreeMap<ProviderKey, DiscriminatorMapping>,
}

impl EntityType {
    pub(crate) fn new(id: EntityTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            base: None,
            derived: Vec::new(),
            properties: Vec::new(),
            extensions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> EntityTypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default discriminator value.
    #[must_use]
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    #[must_use]
    pub const fn base_type(&self) -> Option<EntityTypeId> {
        self.base
    }

    /// Direct derived types, in the order they were attached.
    #[must_use]
    pub fn direct_derived_types(&self) -> &[EntityTypeId] {
        &self.derived
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.base.is_none()
    }

    #[must_use]
    pub fn property_ids(&self) -> &[PropertyId] {
        &self.properties
    }

    #[must_use]
    pub fn discriminator(&self, provider: &ProviderKey) -> Option<&DiscriminatorMapping> {
        self.extensions.get(provider)
    }

    pub(crate) fn discriminator_mut(&mut self, provider: &ProviderKey) -> &mut DiscriminatorMapping {
        self.extensions.entry(provider.clone()).or_default()
    }

    /// Providers that have a discriminator side table on this type.
    pub fn providers(&self) -> impl Iterator<Item = &ProviderKey> {
        self.extensions.keys()
    }
}
