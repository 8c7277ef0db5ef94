use super::*;
use kiln_core::{
    error::ModelError,
    model::{PropertySaveBehavior, ProviderKey},
};

#[test]
fn default_config_registers_the_discriminator_convention() {
    let set = convention_set(&ModelConfig::default());

    assert_eq!(
        set.handler_names(kiln_core::dispatch::ModelEventKind::EntityTypeAdded),
        vec!["discriminator"]
    );
    assert_eq!(
        set.handler_names(kiln_core::dispatch::ModelEventKind::BaseTypeChanged),
        vec!["discriminator"]
    );
}

#[test]
fn disabled_convention_leaves_hierarchies_bare() {
    let mut b = model_builder_from_toml("[discriminator]\nenabled = false\n").unwrap();
    let animal = b.add_entity_type("Animal").unwrap();

    assert!(b.model().properties(animal).unwrap().next().is_none());
    assert!(
        b.model()
            .discriminator_property(&ProviderKey::document(), animal)
            .unwrap()
            .is_none()
    );
}

#[test]
fn builder_follows_configured_names() {
    let mut b = model_builder_from_toml(
        r#"
        [discriminator]
        property_name = "Kind"
        provider = "relational"
        "#,
    )
    .unwrap();
    let animal = b.add_entity_type("Animal").unwrap();
    let dog = b.add_derived_entity_type("Dog", animal).unwrap();
    let model = b.finalize().unwrap();

    let provider = ProviderKey::new("relational");
    let filter = model.discriminator_filter(&provider, dog).unwrap().unwrap();
    assert_eq!(filter.to_string(), "Kind IN ('Dog')");

    let property = model.discriminator_property(&provider, dog).unwrap().unwrap();
    assert_eq!(
        model.property(property).unwrap().after_save(),
        PropertySaveBehavior::Throw
    );
}

#[test]
fn builder_uses_configured_depth() {
    let b = model_builder_from_toml("[dispatch]\nmax_depth = 5\n").unwrap();

    assert_eq!(b.limits().max_depth, 5);
}

#[test]
fn invalid_config_maps_to_public_error() {
    let Err(err) = model_builder_from_toml("[dispatch]\nmax_depth = 0\n") else {
        panic!("expected config error");
    };

    assert_eq!(err.kind, ErrorKind::Config(ConfigErrorKind::Invalid));
    assert_eq!(err.origin, ErrorOrigin::Config);

    let Err(err) = model_builder_from_toml("[dispatch\n") else {
        panic!("expected parse error");
    };
    assert_eq!(err.kind, ErrorKind::Config(ConfigErrorKind::Parse));
}

#[test]
fn hand_built_config_is_validated() {
    let mut config = ModelConfig::default();
    config.discriminator.property_name.clear();

    assert!(model_builder(&config).is_err());
}

#[test]
fn model_errors_keep_class_and_origin() {
    let mut b = model_builder(&ModelConfig::default()).unwrap();
    let animal = b.add_entity_type("Animal").unwrap();
    let dog = b.add_derived_entity_type("Dog", animal).unwrap();

    let core_err = b
        .set_base_type(animal, Some(dog), kiln_core::ledger::ConfigurationSource::ExplicitApi)
        .unwrap_err();
    assert!(matches!(core_err, ModelError::Cycle { .. }));

    let message = core_err.to_string();
    let err = Error::from(core_err);
    assert_eq!(err.kind, ErrorKind::Model(ModelErrorKind::Conflict));
    assert_eq!(err.origin, ErrorOrigin::Graph);
    assert_eq!(err.message, message);
    assert_eq!(err.to_string(), message);
}

#[test]
fn public_error_serializes() {
    let err = Error::new(
        ErrorKind::Model(ModelErrorKind::Unsupported),
        ErrorOrigin::Builder,
        "model is finalized",
    );

    let json = serde_json::to_string(&err).unwrap();
    let back: Error = serde_json::from_str(&json).unwrap();

    assert_eq!(back, err);
    assert_eq!(
        json,
        r#"{"kind":{"Model":"Unsupported"},"origin":"Builder","message":"model is finalized"}"#
    );
    assert_eq!(ErrorOrigin::Finalize.to_string(), "Finalize");
}
