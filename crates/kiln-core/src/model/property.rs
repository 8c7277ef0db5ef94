use crate::{
    generate::ValueGeneratorFactory,
    model::{EntityTypeId, PropertyId},
};
use serde::Serialize;

///
/// ValueType
/// Declared storage type of a property.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ValueType {
    Blob,
    Bool,
    Float,
    Int,
    Text,
    Timestamp,
    Uint,
    Ulid,
}

///
/// PropertySaveBehavior
///
/// What the save pipeline does with a modified value on an already-persisted row.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum PropertySaveBehavior {
    /// Reject the write.
    Throw,
    /// Keep the stored value and drop the modification.
    Ignore,
    #[default]
    Save,
}

///
/// Property
///

#[derive(Clone, Debug, Serialize)]
pub struct Property {
    pub(crate) id: PropertyId,
    pub(crate) name: String,
    pub(crate) declaring: EntityTypeId,
    pub(crate) value_type: ValueType,
    pub(crate) shadow: bool,
    pub(crate) attached: bool,
    pub(crate) required: bool,
    pub(crate) after_save: PropertySaveBehavior,

    #[serde(skip)]
    pub(crate) value_generator: Option<ValueGeneratorFactory>,
}

impl Property {
    pub(crate) fn new(
        id: PropertyId,
        name: impl Into<String>,
        declaring: EntityTypeId,
        value_type: ValueType,
        shadow: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            declaring,
            value_type,
            shadow,
            attached: true,
            required: false,
            after_save: PropertySaveBehavior::default(),
            value_generator: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> PropertyId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn declaring_entity_type(&self) -> EntityTypeId {
        self.declaring
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Shadow properties have no backing field on the mapped shape.
    #[must_use]
    pub const fn is_shadow(&self) -> bool {
        self.shadow
    }

    /// Whether the property is still linked into its declaring type's bag.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn after_save(&self) -> PropertySaveBehavior {
        self.after_save
    }

    #[must_use]
    pub const fn value_generator_factory(&self) -> Option<&ValueGeneratorFactory> {
        self.value_generator.as_ref()
    }
}
