//! Storage-mapping reads over a finalized model.

use crate::{
    error::ModelError,
    model::{EntityTypeId, Model, ProviderKey},
};
use std::fmt::{self, Display};

///
/// DiscriminatorFilter
///
/// Column and accepted values that select the rows of one entity type and
/// everything derived from it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiscriminatorFilter {
    pub column: String,
    pub values: Vec<String>,
}

impl DiscriminatorFilter {
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.as_str() == value)
    }
}

impl Display for DiscriminatorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self
            .values
            .iter()
            .map(|v| format!("'{}'", v.replace('\'', "''")))
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "{} IN ({values})", self.column)
    }
}

impl Model {
    /// Filter selecting `entity` and its derived types, or `None` when the
    /// hierarchy has no discriminator for `provider`.
    ///
    /// Values are listed in pre-order and deduplicated; types without a value
    /// contribute nothing.
    pub fn discriminator_filter(
        &self,
        provider: &ProviderKey,
        entity: EntityTypeId,
    ) -> Result<Option<DiscriminatorFilter>, ModelError> {
        let Some(property) = self.discriminator_property(provider, entity)? else {
            return Ok(None);
        };

        let mut values: Vec<String> = Vec::new();
        for id in self.derived_types(entity, true)? {
            if let Some(value) = self.discriminator_value(provider, id)?
                && !values.iter().any(|v| v.as_str() == value)
            {
                values.push(value.to_string());
            }
        }

        Ok(Some(DiscriminatorFilter {
            column: self.property(property)?.name().to_string(),
            values,
        }))
    }
}
