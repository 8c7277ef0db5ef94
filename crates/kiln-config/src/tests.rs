use super::*;

#[test]
fn empty_document_uses_defaults() {
    let config = ModelConfig::from_toml_str("").unwrap();

    assert_eq!(config, ModelConfig::default());
    assert!(config.discriminator.enabled);
    assert_eq!(config.discriminator.property_name, "Discriminator");
    assert_eq!(config.discriminator.provider, "document");
    assert_eq!(config.dispatch.max_depth, 64);
}

#[test]
fn partial_tables_keep_remaining_defaults() {
    let config = ModelConfig::from_toml_str(
        r#"
        [discriminator]
        property_name = "Kind"

        [dispatch]
        max_depth = 8
        "#,
    )
    .unwrap();

    assert!(config.discriminator.enabled);
    assert_eq!(config.discriminator.property_name, "Kind");
    assert_eq!(config.discriminator.provider, "document");
    assert_eq!(config.dispatch.max_depth, 8);
}

#[test]
fn convention_can_be_disabled() {
    let config = ModelConfig::from_toml_str("[discriminator]\nenabled = false\n").unwrap();

    assert!(!config.discriminator.enabled);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = ModelConfig::from_toml_str("[discriminator]\ncolumn = \"Kind\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));

    let err = ModelConfig::from_toml_str("[storage]\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn wrong_types_are_parse_errors() {
    let err = ModelConfig::from_toml_str("[dispatch]\nmax_depth = \"deep\"\n").unwrap_err();

    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn invalid_values_are_rejected() {
    for src in [
        "[discriminator]\nproperty_name = \"\"\n",
        "[discriminator]\nprovider = \"\"\n",
        "[discriminator]\nproperty_name = \"Kind Of\"\n",
        "[discriminator]\nprovider = \"dokumént\"\n",
        "[dispatch]\nmax_depth = 0\n",
    ] {
        let err = ModelConfig::from_toml_str(src).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{src:?} gave {err}");
    }
}

#[test]
fn invalid_message_names_the_key() {
    let err = ModelConfig::from_toml_str("[dispatch]\nmax_depth = 0\n").unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid config: dispatch.max_depth must be at least 1"
    );
}

#[test]
fn load_reads_a_file() {
    let path = std::env::temp_dir().join(format!("kiln-config-{}.toml", std::process::id()));
    fs::write(&path, "[discriminator]\nprovider = \"relational\"\n").unwrap();

    let config = ModelConfig::load(&path);
    fs::remove_file(&path).unwrap();

    assert_eq!(config.unwrap().discriminator.provider, "relational");
}

#[test]
fn missing_file_is_io_error() {
    let err = ModelConfig::load("/nonexistent/kiln.toml").unwrap_err();

    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn config_round_trips_through_toml() {
    let config = ModelConfig {
        discriminator: DiscriminatorConfig {
            enabled: false,
            property_name: "Kind".to_string(),
            provider: "relational".to_string(),
        },
        dispatch: DispatchConfig { max_depth: 16 },
    };

    let src = toml::to_string(&config).unwrap();

    assert_eq!(ModelConfig::from_toml_str(&src).unwrap(), config);
}
