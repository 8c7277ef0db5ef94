use crate::model::EntityTypeId;
use serde::Serialize;
use std::fmt;

///
/// ModelEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModelEvent {
    EntityTypeAdded(EntityTypeId),
    BaseTypeChanged {
        entity: EntityTypeId,
        old_base: Option<EntityTypeId>,
    },
}

impl ModelEvent {
    #[must_use]
    pub const fn kind(&self) -> ModelEventKind {
        match self {
            Self::EntityTypeAdded(_) => ModelEventKind::EntityTypeAdded,
            Self::BaseTypeChanged { .. } => ModelEventKind::BaseTypeChanged,
        }
    }

    /// Entity type the event is about.
    #[must_use]
    pub const fn entity(&self) -> EntityTypeId {
        match *self {
            Self::EntityTypeAdded(entity) | Self::BaseTypeChanged { entity, .. } => entity,
        }
    }
}

impl fmt::Display for ModelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.entity())
    }
}

///
/// ModelEventKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ModelEventKind {
    EntityTypeAdded,
    BaseTypeChanged,
}

impl fmt::Display for ModelEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::EntityTypeAdded => "entity_type_added",
            Self::BaseTypeChanged => "base_type_changed",
        };
        write!(f, "{label}")
    }
}
