//! Entity-type graph.
//!
//! A forest of entity types linked by single inheritance. Types and
//! properties live in arenas owned by [`Model`] and are addressed by copyable
//! ids; base/derived links and property bags store ids only.
//!
//! Invariants:
//! - Base links never form a cycle; every hierarchy has exactly one root.
//! - `derived` lists mirror `base` links exactly.
//! - A property is linked into at most one bag: its declaring entity type.

mod entity;
mod graph;
mod name;
mod property;


use derive_more::Display;
use serde::Serialize;

pub use entity::{DiscriminatorMapping, EntityType};
pub use graph::Model;
pub use name::short_name;
pub use property::{Property, PropertySaveBehavior, ValueType};

///
/// EntityTypeId
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[display("entity#{_0}")]
pub struct EntityTypeId(usize);

impl EntityTypeId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

///
/// PropertyId
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[display("property#{_0}")]
pub struct PropertyId(usize);

impl PropertyId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

///
/// ProviderKey
///
/// Names the provider side table that discriminator attributes are stored in.
///

#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ProviderKey(String);

impl ProviderKey {
    pub const DOCUMENT: &str = "document";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn document() -> Self {
        Self::new(Self::DOCUMENT)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProviderKey {
    fn default() -> Self {
        Self::document()
    }
}
