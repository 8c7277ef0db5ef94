//! After-save contract check for the save pipeline.

use crate::{
    error::ModelError,
    model::{Model, PropertyId, PropertySaveBehavior},
};

impl Model {
    /// Check a pending modification of an already-persisted value.
    ///
    /// `Throw` properties reject any change; `Ignore` and `Save` always pass
    /// (the pipeline decides whether to keep or write the new value).
    /// Discriminator properties report the dedicated discriminator error.
    pub fn check_after_save<T: PartialEq + ?Sized>(
        &self,
        property: PropertyId,
        original: &T,
        current: &T,
    ) -> Result<(), ModelError> {
        let prop = self.property(property)?;
        if prop.after_save() != PropertySaveBehavior::Throw || original == current {
            return Ok(());
        }

        let owner = self.entity_type(prop.declaring_entity_type())?;
        let is_discriminator = owner
            .providers()
            .any(|provider| owner.discriminator(provider).and_then(|m| m.property) == Some(property));

        let entity = owner.name().to_string();
        let property = prop.name().to_string();
        if is_discriminator {
            Err(ModelError::DiscriminatorWriteAfterSave { entity, property })
        } else {
            Err(ModelError::WriteAfterSave { entity, property })
        }
    }
}
