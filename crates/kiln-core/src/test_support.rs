use crate::{
    builder::ModelBuilder,
    convention::DiscriminatorConvention,
    dispatch::ConventionSet,
    obs::{BuildTraceEvent, BuildTraceSink},
};
use std::sync::{Arc, Mutex};

/// Builder with only the discriminator convention registered.
pub(crate) fn discriminator_builder() -> ModelBuilder {
    let mut conventions = ConventionSet::new();
    conventions.add_structural(Arc::new(DiscriminatorConvention::default()));

    ModelBuilder::new(conventions)
}

/// Builder with no conventions at all.
pub(crate) fn bare_builder() -> ModelBuilder {
    ModelBuilder::new(ConventionSet::new())
}

///
/// RecordingSink
///

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<BuildTraceEvent>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<BuildTraceEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl BuildTraceSink for RecordingSink {
    fn on_event(&self, event: BuildTraceEvent) {
        self.events.lock().unwrap().push(event);
    }
}
