//! Model builder: the mutable build-phase surface over [`Model`].
//!
//! Every edit checks the frozen flag, goes through the ledger, and raises
//! the matching convention event on the same call stack. `finalize` validates
//! the model and hands out an immutable shared snapshot; after that every
//! edit is rejected with `ModelFrozen`.


use crate::{
    dispatch::{ConventionFlow, ConventionSet, ModelEvent},
    error::ModelError,
    generate::ValueGeneratorFactory,
    ledger::ConfigurationSource,
    model::{EntityTypeId, Model, PropertyId, PropertySaveBehavior, ProviderKey, ValueType},
    obs::{BuildReport, BuildTraceEvent, BuildTraceSink},
    validate::validate_model,
};
use std::sync::Arc;

///
/// DispatchLimits
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DispatchLimits {
    /// Maximum nesting of events raised from inside handlers.
    pub max_depth: usize,
}

impl DispatchLimits {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
}

impl Default for DispatchLimits {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

///
/// ModelBuilder
///

pub struct ModelBuilder {
    model: Model,
    conventions: Arc<ConventionSet>,
    limits: DispatchLimits,
    depth: usize,
    report: BuildReport,
    sink: Option<Arc<dyn BuildTraceSink>>,
    finalized: Option<Arc<Model>>,
}

impl ModelBuilder {
    #[must_use]
    pub fn new(conventions: ConventionSet) -> Self {
        Self::with_shared_conventions(Arc::new(conventions))
    }

    /// Build against a convention set shared with other builders.
    #[must_use]
    pub fn with_shared_conventions(conventions: Arc<ConventionSet>) -> Self {
        Self {
            model: Model::new(),
            conventions,
            limits: DispatchLimits::default(),
            depth: 0,
            report: BuildReport::default(),
            sink: None,
            finalized: None,
        }
    }

    #[must_use]
    pub const fn with_limits(mut self, limits: DispatchLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn with_trace_sink(mut self, sink: Arc<dyn BuildTraceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use]
    pub const fn model(&self) -> &Model {
        &self.model
    }

    #[must_use]
    pub const fn report(&self) -> &BuildReport {
        &self.report
    }

    #[must_use]
    pub const fn limits(&self) -> DispatchLimits {
        self.limits
    }

    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    // ------------------------------------------------------------------
    // Entity types
    // ------------------------------------------------------------------

    /// Declare a new, unconnected entity type.
    pub fn add_entity_type(&mut self, name: &str) -> Result<EntityTypeId, ModelError> {
        self.ensure_mutable("add_entity_type")?;

        let id = self.model.insert_entity_type(name)?;
        tracing::debug!(entity = name, %id, "entity type added");
        self.raise(ModelEvent::EntityTypeAdded(id))?;

        Ok(id)
    }

    /// Return the entity type named `name`, declaring it if needed.
    pub fn entity(&mut self, name: &str) -> Result<EntityTypeId, ModelError> {
        match self.model.find_entity_type(name) {
            Some(existing) => Ok(existing.id()),
            None => self.add_entity_type(name),
        }
    }

    /// Declare `name` and attach it under `base` with explicit authority.
    pub fn add_derived_entity_type(
        &mut self,
        name: &str,
        base: EntityTypeId,
    ) -> Result<EntityTypeId, ModelError> {
        self.model.entity_type(base)?;

        let id = self.add_entity_type(name)?;
        self.set_base_type(id, Some(base), ConfigurationSource::ExplicitApi)?;

        Ok(id)
    }

    /// Replace the base of `entity`, returning the previous base.
    ///
    /// Fails with `Cycle` before any mutation when `new_base` is `entity` or
    /// one of its descendants. `BaseTypeChanged` is raised only when the link
    /// actually changes.
    pub fn set_base_type(
        &mut self,
        entity: EntityTypeId,
        new_base: Option<EntityTypeId>,
        source: ConfigurationSource,
    ) -> Result<Option<EntityTypeId>, ModelError> {
        self.ensure_mutable("set_base_type")?;

        let (old_base, changed) = self.model.relink_base(entity, new_base, source)?;
        self.drain_rejections();

        if changed {
            tracing::debug!(%entity, ?old_base, ?new_base, "base type changed");
            self.raise(ModelEvent::BaseTypeChanged { entity, old_base })?;
        }

        Ok(old_base)
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn add_or_get_property(
        &mut self,
        entity: EntityTypeId,
        name: &str,
        value_type: ValueType,
        source: ConfigurationSource,
    ) -> Result<PropertyId, ModelError> {
        self.ensure_mutable("add_or_get_property")?;

        let id = self
            .model
            .add_or_get_property(entity, name, value_type, false, source)?;
        self.drain_rejections();

        Ok(id)
    }

    /// Like [`Self::add_or_get_property`] but declares a property with no
    /// backing field on the mapped shape.
    pub fn add_or_get_shadow_property(
        &mut self,
        entity: EntityTypeId,
        name: &str,
        value_type: ValueType,
        source: ConfigurationSource,
    ) -> Result<PropertyId, ModelError> {
        self.ensure_mutable("add_or_get_shadow_property")?;

        let id = self
            .model
            .add_or_get_property(entity, name, value_type, true, source)?;
        self.drain_rejections();

        Ok(id)
    }

    pub fn remove_property(
        &mut self,
        entity: EntityTypeId,
        name: &str,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.ensure_mutable("remove_property")?;

        let removed = self.model.remove_property(entity, name, source)?;
        self.drain_rejections();

        Ok(removed)
    }

    pub fn set_required(
        &mut self,
        property: PropertyId,
        required: bool,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.ensure_mutable("set_required")?;

        let accepted = self.model.set_required(property, required, source)?;
        self.drain_rejections();

        Ok(accepted)
    }

    pub fn set_after_save(
        &mut self,
        property: PropertyId,
        behavior: PropertySaveBehavior,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.ensure_mutable("set_after_save")?;

        let accepted = self.model.set_after_save(property, behavior, source)?;
        self.drain_rejections();

        Ok(accepted)
    }

    pub fn set_value_generator(
        &mut self,
        property: PropertyId,
        factory: Option<ValueGeneratorFactory>,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.ensure_mutable("set_value_generator")?;

        let accepted = self.model.set_value_generator(property, factory, source)?;
        self.drain_rejections();

        Ok(accepted)
    }

    // ------------------------------------------------------------------
    // Discriminator attributes
    // ------------------------------------------------------------------

    pub fn set_discriminator_property(
        &mut self,
        provider: &ProviderKey,
        entity: EntityTypeId,
        property: Option<PropertyId>,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.ensure_mutable("set_discriminator_property")?;

        let accepted = self
            .model
            .set_discriminator_property(provider, entity, property, source)?;
        self.drain_rejections();

        Ok(accepted)
    }

    pub fn set_discriminator_value(
        &mut self,
        provider: &ProviderKey,
        entity: EntityTypeId,
        value: Option<String>,
        source: ConfigurationSource,
    ) -> Result<bool, ModelError> {
        self.ensure_mutable("set_discriminator_value")?;

        let accepted = self
            .model
            .set_discriminator_value(provider, entity, value, source)?;
        self.drain_rejections();

        Ok(accepted)
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Run the registered conventions for `event`.
    ///
    /// Re-entrant: handlers that edit the model raise nested events through
    /// this same method.
    pub fn raise(&mut self, event: ModelEvent) -> Result<ConventionFlow, ModelError> {
        self.ensure_mutable("raise")?;
        self.model.entity_type(event.entity())?;

        if self.depth >= self.limits.max_depth {
            return Err(ModelError::DispatchDepthExceeded {
                max: self.limits.max_depth,
                event: event.to_string(),
            });
        }

        self.depth += 1;
        let depth = self.depth;
        self.report.record_event(event.kind(), depth);
        tracing::trace!(%event, depth, "raising model event");
        self.emit(BuildTraceEvent::EventRaised {
            kind: event.kind(),
            entity: event.entity(),
            depth,
        });

        let conventions = Arc::clone(&self.conventions);
        let result = conventions.dispatch(self, &event);
        self.depth -= 1;

        result
    }

    pub(crate) fn record_handler(
        &mut self,
        convention: &'static str,
        event: &ModelEvent,
        flow: ConventionFlow,
    ) {
        self.report.record_handler(flow == ConventionFlow::Stop);
        tracing::trace!(convention, %event, ?flow, "convention handled event");
        self.emit(BuildTraceEvent::HandlerFinished {
            convention,
            kind: event.kind(),
            entity: event.entity(),
            flow,
        });
    }

    // ------------------------------------------------------------------
    // Finalization
    // ------------------------------------------------------------------

    /// Validate and freeze the model, returning the shared read-only snapshot.
    ///
    /// Idempotent: later calls return the same snapshot.
    pub fn finalize(&mut self) -> Result<Arc<Model>, ModelError> {
        if let Some(model) = &self.finalized {
            return Ok(Arc::clone(model));
        }

        validate_model(&self.model)?;

        self.model.mark_finalized();
        let model = Arc::new(self.model.clone());
        self.finalized = Some(Arc::clone(&model));

        let entity_types = model.entity_type_count();
        tracing::debug!(entity_types, "model finalized");
        self.emit(BuildTraceEvent::Finalized { entity_types });

        Ok(model)
    }

    /// Finalize and return the snapshot together with the build counters.
    pub fn into_finalized(mut self) -> Result<(Arc<Model>, BuildReport), ModelError> {
        let model = self.finalize()?;

        Ok((model, self.report))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_mutable(&self, operation: &'static str) -> Result<(), ModelError> {
        if self.is_finalized() {
            return Err(ModelError::ModelFrozen { operation });
        }

        Ok(())
    }

    fn drain_rejections(&mut self) {
        for rejection in self.model.ledger_mut().drain_rejections() {
            self.report.record_rejection();
            self.emit(BuildTraceEvent::LedgerRejected(rejection));
        }
    }

    fn emit(&self, event: BuildTraceEvent) {
        if let Some(sink) = &self.sink {
            sink.on_event(event);
        }
    }
}
