use crate::{
    dispatch::{ConventionFlow, ModelEventKind},
    ledger::LedgerRejection,
    model::EntityTypeId,
};

///
/// BuildTraceSink
///

pub trait BuildTraceSink: Send + Sync {
    fn on_event(&self, event: BuildTraceEvent);
}

///
/// BuildTraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildTraceEvent {
    EventRaised {
        kind: ModelEventKind,
        entity: EntityTypeId,
        depth: usize,
    },
    HandlerFinished {
        convention: &'static str,
        kind: ModelEventKind,
        entity: EntityTypeId,
        flow: ConventionFlow,
    },
    LedgerRejected(LedgerRejection),
    Finalized {
        entity_types: usize,
    },
}
