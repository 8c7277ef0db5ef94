//! Configuration-source ledger.
//!
//! Records, per `(subject, attribute)`, the rank of whoever configured the
//! attribute last. Every tracked attribute in the model is written through
//! [`ConfigLedger::try_set`]; a write from a lower rank than the recorded one is
//! a rejected no-op, so a convention can propose a value but never silently
//! replace one set by annotation or explicit API.

use crate::model::{EntityTypeId, PropertyId, ProviderKey};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

///
/// ConfigurationSource
///
/// Authority of a configuration write, lowest first.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ConfigurationSource {
    Convention,
    DataAnnotation,
    ExplicitApi,
}

impl fmt::Display for ConfigurationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Convention => "convention",
            Self::DataAnnotation => "data_annotation",
            Self::ExplicitApi => "explicit_api",
        };
        write!(f, "{label}")
    }
}

///
/// Subject
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Subject {
    EntityType(EntityTypeId),
    Property(PropertyId),
}

///
/// Attribute
///
/// Tracked attributes. Discriminator attributes live in a provider-keyed side
/// table, so the provider is part of the key.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Attribute {
    BaseType,
    Declared,
    Required,
    AfterSave,
    ValueGenerator,
    DiscriminatorProperty(ProviderKey),
    DiscriminatorValue(ProviderKey),
}

///
/// LedgerKey
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct LedgerKey {
    pub subject: Subject,
    pub attribute: Attribute,
}

impl LedgerKey {
    #[must_use]
    pub const fn entity(entity: EntityTypeId, attribute: Attribute) -> Self {
        Self {
            subject: Subject::EntityType(entity),
            attribute,
        }
    }

    #[must_use]
    pub const fn property(property: PropertyId, attribute: Attribute) -> Self {
        Self {
            subject: Subject::Property(property),
            attribute,
        }
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subject {
            Subject::EntityType(id) => write!(f, "{id}/{:?}", self.attribute),
            Subject::Property(id) => write!(f, "{id}/{:?}", self.attribute),
        }
    }
}

///
/// LedgerRejection
///
/// A write turned away because the attribute is held at a higher rank.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerRejection {
    pub key: LedgerKey,
    pub current: ConfigurationSource,
    pub attempted: ConfigurationSource,
}

///
/// ConfigLedger
///

#[derive(Clone, Debug, Default)]
pub struct ConfigLedger {
    ranks: BTreeMap<LedgerKey, ConfigurationSource>,
    rejections: Vec<LedgerRejection>,
}

impl ConfigLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank of the last accepted write, if any.
    #[must_use]
    pub fn rank(&self, key: &LedgerKey) -> Option<ConfigurationSource> {
        self.ranks.get(key).copied()
    }

    /// Whether a write at `source` would be accepted.
    #[must_use]
    pub fn accepts(&self, key: &LedgerKey, source: ConfigurationSource) -> bool {
        self.rank(key).is_none_or(|current| source >= current)
    }

    /// Record `source` as the owner of `key` without touching any value.
    ///
    /// Used for structural claims (property declarations) where the value is
    /// the existence of the subject itself.
    pub fn claim(&mut self, key: LedgerKey, source: ConfigurationSource) -> bool {
        if let Some(current) = self.rank(&key)
            && source < current
        {
            tracing::trace!(%key, %current, attempted = %source, "ledger rejected write");
            self.rejections.push(LedgerRejection {
                key,
                current,
                attempted: source,
            });

            return false;
        }

        self.ranks.insert(key, source);

        true
    }

    /// Whether `source` may override every key in `keys`. Each key that
    /// refuses is recorded as a rejection; nothing is claimed either way.
    pub fn admits_all(&mut self, keys: &[LedgerKey], source: ConfigurationSource) -> bool {
        let mut admitted = true;
        for key in keys {
            if let Some(current) = self.rank(key)
                && source < current
            {
                tracing::trace!(%key, %current, attempted = %source, "ledger rejected write");
                self.rejections.push(LedgerRejection {
                    key: key.clone(),
                    current,
                    attempted: source,
                });
                admitted = false;
            }
        }

        admitted
    }

    /// Write `value` into `slot` if `source` is at least the recorded rank.
    pub fn try_set<T>(
        &mut self,
        key: LedgerKey,
        slot: &mut T,
        value: T,
        source: ConfigurationSource,
    ) -> bool {
        if !self.claim(key, source) {
            return false;
        }
        *slot = value;

        true
    }

    /// Drop the rank recorded for `key`, returning it.
    pub fn release(&mut self, key: &LedgerKey) -> Option<ConfigurationSource> {
        self.ranks.remove(key)
    }

    /// Take the rejections recorded since the last drain.
    pub fn drain_rejections(&mut self) -> Vec<LedgerRejection> {
        std::mem::take(&mut self.rejections)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> LedgerKey {
        LedgerKey::entity(
            EntityTypeId::new(0),
            Attribute::DiscriminatorValue(ProviderKey::document()),
        )
    }

    #[test]
    fn unset_attribute_accepts_any_rank() {
        let mut ledger = ConfigLedger::new();
        let mut slot = None;

        assert!(ledger.try_set(
            key(),
            &mut slot,
            Some("Animal"),
            ConfigurationSource::Convention
        ));
        assert_eq!(slot, Some("Animal"));
        assert_eq!(ledger.rank(&key()), Some(ConfigurationSource::Convention));
    }

    #[test]
    fn lower_rank_is_rejected_without_writing() {
        let mut ledger = ConfigLedger::new();
        let mut slot = None;

        ledger.try_set(
            key(),
            &mut slot,
            Some("Custom"),
            ConfigurationSource::ExplicitApi,
        );
        let accepted = ledger.try_set(
            key(),
            &mut slot,
            Some("Animal"),
            ConfigurationSource::Convention,
        );

        assert!(!accepted);
        assert_eq!(slot, Some("Custom"));
        assert_eq!(ledger.rank(&key()), Some(ConfigurationSource::ExplicitApi));

        let rejections = ledger.drain_rejections();
        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].current, ConfigurationSource::ExplicitApi);
        assert_eq!(rejections[0].attempted, ConfigurationSource::Convention);
        assert!(ledger.drain_rejections().is_empty());
    }

    #[test]
    fn equal_rank_is_last_writer_wins() {
        let mut ledger = ConfigLedger::new();
        let mut slot = 0;

        ledger.try_set(key(), &mut slot, 1, ConfigurationSource::DataAnnotation);
        assert!(ledger.try_set(key(), &mut slot, 2, ConfigurationSource::DataAnnotation));
        assert_eq!(slot, 2);
    }

    #[test]
    fn higher_rank_upgrades_recorded_source() {
        let mut ledger = ConfigLedger::new();

        assert!(ledger.claim(key(), ConfigurationSource::Convention));
        assert!(ledger.claim(key(), ConfigurationSource::DataAnnotation));
        assert!(!ledger.accepts(&key(), ConfigurationSource::Convention));
        assert!(ledger.accepts(&key(), ConfigurationSource::ExplicitApi));
    }

    #[test]
    fn release_forgets_the_rank() {
        let mut ledger = ConfigLedger::new();

        ledger.claim(key(), ConfigurationSource::ExplicitApi);
        assert_eq!(
            ledger.release(&key()),
            Some(ConfigurationSource::ExplicitApi)
        );
        assert!(ledger.is_empty());
        assert!(ledger.accepts(&key(), ConfigurationSource::Convention));
    }

    #[test]
    fn admits_all_reports_every_refusing_key() {
        let mut ledger = ConfigLedger::new();
        let required = LedgerKey::property(PropertyId::new(0), Attribute::Required);
        let after_save = LedgerKey::property(PropertyId::new(0), Attribute::AfterSave);
        let declared = LedgerKey::property(PropertyId::new(0), Attribute::Declared);

        ledger.claim(required.clone(), ConfigurationSource::ExplicitApi);
        ledger.claim(after_save.clone(), ConfigurationSource::DataAnnotation);
        ledger.claim(declared.clone(), ConfigurationSource::Convention);
        assert_eq!(ledger.len(), 3);

        let keys = [declared, required.clone(), after_save.clone()];
        assert!(!ledger.admits_all(&keys, ConfigurationSource::Convention));

        let refused: Vec<LedgerKey> = ledger
            .drain_rejections()
            .into_iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(refused, vec![required, after_save]);

        // checking claims nothing
        assert_eq!(ledger.len(), 3);
        assert!(ledger.admits_all(&keys, ConfigurationSource::ExplicitApi));
        assert!(ledger.drain_rejections().is_empty());
    }
}
