//! Convention dispatch.
//!
//! Structural edits are described by [`ModelEvent`]; a [`ConventionSet`] holds
//! the ordered handler list for each event kind. Handlers run in
//! registration order on the caller's stack. Any edit a handler makes raises
//! its own event immediately, so propagation is depth-first: a handler and
//! everything it triggers finishes before its next sibling starts.

mod event;

#[cfg(test)]
mod tests;

use crate::{builder::ModelBuilder, error::ModelError, model::EntityTypeId};
use std::sync::Arc;

pub use event::{ModelEvent, ModelEventKind};

///
/// ConventionFlow
///
/// Handler verdict for the event currently being dispatched.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConventionFlow {
    Continue,
    /// Skip the remaining handlers for this event.
    Stop,
}

///
/// Convention
///

pub trait Convention: Send + Sync {
    /// Stable label used in traces and reports.
    fn name(&self) -> &'static str;
}

///
/// EntityTypeAddedConvention
///

pub trait EntityTypeAddedConvention: Convention {
    fn on_entity_type_added(
        &self,
        builder: &mut ModelBuilder,
        entity: EntityTypeId,
    ) -> Result<ConventionFlow, ModelError>;
}

///
/// BaseTypeChangedConvention
///
/// Fired after the base link of `entity` has been rewritten.
///

pub trait BaseTypeChangedConvention: Convention {
    fn on_base_type_changed(
        &self,
        builder: &mut ModelBuilder,
        entity: EntityTypeId,
        old_base: Option<EntityTypeId>,
    ) -> Result<ConventionFlow, ModelError>;
}

///
/// ConventionSet
///
/// Ordered handler lists, one per event kind. Every handler must be
/// idempotent: the same state is reachable through different event orders.
///

#[derive(Clone, Default)]
pub struct ConventionSet {
    entity_type_added: Vec<Arc<dyn EntityTypeAddedConvention>>,
    base_type_changed: Vec<Arc<dyn BaseTypeChangedConvention>>,
}

impl ConventionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity_type_added(&mut self, convention: Arc<dyn EntityTypeAddedConvention>) {
        self.entity_type_added.push(convention);
    }

    pub fn add_base_type_changed(&mut self, convention: Arc<dyn BaseTypeChangedConvention>) {
        self.base_type_changed.push(convention);
    }

    /// Register one convention for every event kind it handles.
    pub fn add_structural<C>(&mut self, convention: Arc<C>)
    where
        C: EntityTypeAddedConvention + BaseTypeChangedConvention + 'static,
    {
        self.entity_type_added.push(Arc::clone(&convention) as Arc<dyn EntityTypeAddedConvention>);
        self.base_type_changed.push(convention);
    }

    /// Names of the handlers registered for `kind`, in dispatch order.
    #[must_use]
    pub fn handler_names(&self, kind: ModelEventKind) -> Vec<&'static str> {
        match kind {
            ModelEventKind::EntityTypeAdded => {
                self.entity_type_added.iter().map(|c| c.name()).collect()
            }
            ModelEventKind::BaseTypeChanged => {
                self.base_type_changed.iter().map(|c| c.name()).collect()
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_type_added.is_empty() && self.base_type_changed.is_empty()
    }

    // Run every handler for `event` against `builder`.
    pub(crate) fn dispatch(
        &self,
        builder: &mut ModelBuilder,
        event: &ModelEvent,
    ) -> Result<ConventionFlow, ModelError> {
        match *event {
            ModelEvent::EntityTypeAdded(entity) => {
                for convention in &self.entity_type_added {
                    let flow = convention.on_entity_type_added(builder, entity)?;
                    builder.record_handler(convention.name(), event, flow);

                    if flow == ConventionFlow::Stop {
                        return Ok(flow);
                    }
                }
            }
            ModelEvent::BaseTypeChanged { entity, old_base } => {
                for convention in &self.base_type_changed {
                    let flow = convention.on_base_type_changed(builder, entity, old_base)?;
                    builder.record_handler(convention.name(), event, flow);

                    if flow == ConventionFlow::Stop {
                        return Ok(flow);
                    }
                }
            }
        }

        Ok(ConventionFlow::Continue)
    }
}
