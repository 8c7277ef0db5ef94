//! Finalize-time hierarchy validation.

use crate::{
    error::{ModelError, ValidationErrors},
    model::{Model, ProviderKey},
};
use std::collections::{BTreeMap, BTreeSet};

/// Check discriminator invariants for every provider present in the model.
pub(crate) fn validate_model(model: &Model) -> Result<(), ModelError> {
    let mut errs = ValidationErrors::new();

    let providers: BTreeSet<&ProviderKey> = model
        .entity_types()
        .flat_map(|entity| entity.providers())
        .collect();

    for provider in providers {
        validate_ownership(model, provider, &mut errs)?;
        validate_values(model, provider, &mut errs)?;
    }

    errs.result().map_err(ModelError::from)
}

// Only roots may own a discriminator property, and it must sit in the root's bag.
fn validate_ownership(
    model: &Model,
    provider: &ProviderKey,
    errs: &mut ValidationErrors,
) -> Result<(), ModelError> {
    for entity in model.entity_types() {
        let Some(property) = model.own_discriminator_property(provider, entity.id())? else {
            continue;
        };

        if !entity.is_root() {
            errs.add(format!(
                "entity type '{}' is not a hierarchy root but owns a '{provider}' discriminator property",
                entity.name()
            ));
        }

        let property = model.property(property)?;
        if property.declaring_entity_type() != entity.id() || !property.is_attached() {
            errs.add(format!(
                "'{provider}' discriminator property '{}' of '{}' is not declared on that entity type",
                property.name(),
                entity.name()
            ));
        }
    }

    Ok(())
}

// Every member of a discriminated hierarchy needs a value. Duplicate values are
// allowed but logged, since rows of the two types become indistinguishable.
fn validate_values(
    model: &Model,
    provider: &ProviderKey,
    errs: &mut ValidationErrors,
) -> Result<(), ModelError> {
    for root in model.entity_types().filter(|e| e.is_root()) {
        if model
            .own_discriminator_property(provider, root.id())?
            .is_none()
        {
            continue;
        }

        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for id in model.derived_types(root.id(), true)? {
            let entity = model.entity_type(id)?;
            match model.discriminator_value(provider, id)? {
                None => errs.add(format!(
                    "entity type '{}' in hierarchy '{}' has no '{provider}' discriminator value",
                    entity.name(),
                    root.name()
                )),
                Some(value) => {
                    if let Some(prev) = seen.insert(value, entity.name()) {
                        tracing::warn!(
                            hierarchy = root.name(),
                            value,
                            first = prev,
                            second = entity.name(),
                            "duplicate discriminator value"
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
