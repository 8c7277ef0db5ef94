use super::*;
use crate::{
    builder::{DispatchLimits, ModelBuilder},
    ledger::ConfigurationSource,
};
use std::sync::Mutex;

type Log = Arc<Mutex<Vec<String>>>;

///
/// Recorder
///
/// Logs every event it sees. On `EntityTypeAdded` for `trigger` it declares
/// `spawn`, which raises a nested event before the next sibling handler runs.
///

struct Recorder {
    label: &'static str,
    log: Log,
    trigger: Option<(&'static str, &'static str)>,
    flow: ConventionFlow,
}

impl Recorder {
    fn new(label: &'static str, log: &Log) -> Self {
        Self {
            label,
            log: Arc::clone(log),
            trigger: None,
            flow: ConventionFlow::Continue,
        }
    }

    fn spawning(mut self, trigger: &'static str, spawn: &'static str) -> Self {
        self.trigger = Some((trigger, spawn));
        self
    }

    fn stopping(mut self) -> Self {
        self.flow = ConventionFlow::Stop;
        self
    }
}

impl Convention for Recorder {
    fn name(&self) -> &'static str {
        self.label
    }
}

impl EntityTypeAddedConvention for Recorder {
    fn on_entity_type_added(
        &self,
        builder: &mut ModelBuilder,
        entity: EntityTypeId,
    ) -> Result<ConventionFlow, ModelError> {
        let name = builder.model().entity_type(entity)?.name().to_string();
        self.log.lock().unwrap().push(format!("{}:added:{name}", self.label));

        if let Some((trigger, spawn)) = self.trigger
            && trigger == name
        {
            builder.entity(spawn)?;
        }

        Ok(self.flow)
    }
}

impl BaseTypeChangedConvention for Recorder {
    fn on_base_type_changed(
        &self,
        builder: &mut ModelBuilder,
        entity: EntityTypeId,
        old_base: Option<EntityTypeId>,
    ) -> Result<ConventionFlow, ModelError> {
        let name = builder.model().entity_type(entity)?.name().to_string();
        let old = match old_base {
            Some(id) => builder.model().entity_type(id)?.name().to_string(),
            None => "-".to_string(),
        };
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:base:{name}:{old}", self.label));

        Ok(self.flow)
    }
}

///
/// Runaway
/// Declares a fresh type for every type it sees.
///

struct Runaway;

impl Convention for Runaway {
    fn name(&self) -> &'static str {
        "runaway"
    }
}

impl EntityTypeAddedConvention for Runaway {
    fn on_entity_type_added(
        &self,
        builder: &mut ModelBuilder,
        entity: EntityTypeId,
    ) -> Result<ConventionFlow, ModelError> {
        let name = format!("{}_", builder.model().entity_type(entity)?.name());
        builder.add_entity_type(&name)?;

        Ok(ConventionFlow::Continue)
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[test]
fn handlers_run_in_registration_order() {
    let log = Log::default();
    let mut set = ConventionSet::new();
    set.add_structural(Arc::new(Recorder::new("first", &log)));
    set.add_structural(Arc::new(Recorder::new("second", &log)));

    let mut b = ModelBuilder::new(set);
    let animal = b.add_entity_type("Animal").unwrap();
    b.add_derived_entity_type("Dog", animal).unwrap();

    assert_eq!(
        entries(&log),
        vec![
            "first:added:Animal",
            "second:added:Animal",
            "first:added:Dog",
            "second:added:Dog",
            "first:base:Dog:-",
            "second:base:Dog:-",
        ]
    );
}

#[test]
fn nested_events_complete_before_next_sibling() {
    let log = Log::default();
    let mut set = ConventionSet::new();
    set.add_entity_type_added(Arc::new(
        Recorder::new("first", &log).spawning("Animal", "Dog"),
    ));
    set.add_entity_type_added(Arc::new(Recorder::new("second", &log)));

    let mut b = ModelBuilder::new(set);
    b.add_entity_type("Animal").unwrap();

    assert_eq!(
        entries(&log),
        vec![
            "first:added:Animal",
            "first:added:Dog",
            "second:added:Dog",
            "second:added:Animal",
        ]
    );
    assert_eq!(b.report().max_depth, 2);
    assert_eq!(b.report().entity_type_added, 2);
    assert_eq!(b.report().handler_invocations, 4);
    assert_eq!(b.report().events_raised(), 2);
}

#[test]
fn stop_skips_remaining_handlers_for_that_event() {
    let log = Log::default();
    let mut set = ConventionSet::new();
    set.add_entity_type_added(Arc::new(Recorder::new("first", &log).stopping()));
    set.add_entity_type_added(Arc::new(Recorder::new("second", &log)));

    let mut b = ModelBuilder::new(set);
    let animal = b.add_entity_type("Animal").unwrap();
    let flow = b.raise(ModelEvent::EntityTypeAdded(animal)).unwrap();

    assert_eq!(flow, ConventionFlow::Stop);
    assert_eq!(entries(&log), vec!["first:added:Animal", "first:added:Animal"]);
    assert_eq!(b.report().handler_stops, 2);
}

#[test]
fn base_event_carries_old_base() {
    let log = Log::default();
    let mut set = ConventionSet::new();
    set.add_base_type_changed(Arc::new(Recorder::new("r", &log)));

    let mut b = ModelBuilder::new(set);
    let animal = b.add_entity_type("Animal").unwrap();
    let dog = b.add_derived_entity_type("Dog", animal).unwrap();
    b.set_base_type(dog, None, ConfigurationSource::ExplicitApi)
        .unwrap();

    assert_eq!(entries(&log), vec!["r:base:Dog:-", "r:base:Dog:Animal"]);
}

#[test]
fn runaway_convention_hits_depth_limit() {
    let mut set = ConventionSet::new();
    set.add_entity_type_added(Arc::new(Runaway));

    let mut b = ModelBuilder::new(set).with_limits(DispatchLimits { max_depth: 8 });
    let err = b.add_entity_type("Seed").unwrap_err();

    assert!(matches!(
        err,
        ModelError::DispatchDepthExceeded { max: 8, .. }
    ));
    assert_eq!(b.report().max_depth, 8);
}

#[test]
fn handler_names_follow_registration() {
    let log = Log::default();
    let mut set = ConventionSet::new();
    set.add_entity_type_added(Arc::new(Recorder::new("a", &log)));
    set.add_structural(Arc::new(Recorder::new("b", &log)));

    assert_eq!(
        set.handler_names(ModelEventKind::EntityTypeAdded),
        vec!["a", "b"]
    );
    assert_eq!(set.handler_names(ModelEventKind::BaseTypeChanged), vec!["b"]);
    assert!(!set.is_empty());
    assert!(ConventionSet::new().is_empty());
}
