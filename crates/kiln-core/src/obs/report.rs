use crate::dispatch::ModelEventKind;
use serde::Serialize;

///
/// BuildReport
///
/// Counters for one model build. Saturating; never reset by the builder.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct BuildReport {
    pub entity_type_added: u64,
    pub base_type_changed: u64,
    pub handler_invocations: u64,
    pub handler_stops: u64,
    pub ledger_rejections: u64,
    pub max_depth: usize,
}

impl BuildReport {
    pub(crate) const fn record_event(&mut self, kind: ModelEventKind, depth: usize) {
        match kind {
            ModelEventKind::EntityTypeAdded => {
                self.entity_type_added = self.entity_type_added.saturating_add(1);
            }
            ModelEventKind::BaseTypeChanged => {
                self.base_type_changed = self.base_type_changed.saturating_add(1);
            }
        }
        if depth > self.max_depth {
            self.max_depth = depth;
        }
    }

    pub(crate) const fn record_handler(&mut self, stopped: bool) {
        self.handler_invocations = self.handler_invocations.saturating_add(1);
        if stopped {
            self.handler_stops = self.handler_stops.saturating_add(1);
        }
    }

    pub(crate) const fn record_rejection(&mut self) {
        self.ledger_rejections = self.ledger_rejections.saturating_add(1);
    }

    /// Total events raised across all kinds.
    #[must_use]
    pub const fn events_raised(&self) -> u64 {
        self.entity_type_added.saturating_add(self.base_type_changed)
    }
}
