use super::*;
use crate::core::config::data::ThemeMode;
use std::path::PathBuf;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn every_config_key_has_a_handler() {
    let registry = SettingRegistry::new();
    assert_eq!(
        registry.keys_display_order(),
        &[
            "model",
            "max-tokens",
            "base-url",
            "theme",
            "request-timeout",
            "data-dir"
        ]
    );
}

#[test]
fn set_then_unset_model() {
    let registry = SettingRegistry::new();
    let mut config = Config::default();

    let message = apply_set(&registry, "model", &args(&["claude-3-haiku-20240307"]), &mut config)
        .unwrap();
    assert!(message.contains("claude-3-haiku-20240307"));
    assert_eq!(config.model.as_deref(), Some("claude-3-haiku-20240307"));

    apply_unset(&registry, "model", &mut config).unwrap();
    assert_eq!(config.model, None);
}

#[test]
fn unknown_key_is_rejected() {
    let registry = SettingRegistry::new();
    let mut config = Config::default();
    assert_eq!(
        apply_set(&registry, "colour", &args(&["blue"]), &mut config),
        Err(SettingError::UnknownKey("colour".to_string()))
    );
    assert_eq!(
        apply_unset(&registry, "colour", &mut config),
        Err(SettingError::UnknownKey("colour".to_string()))
    );
    assert_eq!(config, Config::default());
}

#[test]
fn numbers_must_be_positive() {
    let registry = SettingRegistry::new();
    let mut config = Config::default();

    for bad in ["0", "-3", "many", "1.5"] {
        let err = apply_set(&registry, "max-tokens", &args(&[bad]), &mut config).unwrap_err();
        assert!(matches!(err, SettingError::InvalidValue { key: "max-tokens", .. }));
    }
    apply_set(&registry, "max-tokens", &args(&["2048"]), &mut config).unwrap();
    apply_set(&registry, "request-timeout", &args(&["30"]), &mut config).unwrap();
    assert_eq!(config.max_tokens, Some(2048));
    assert_eq!(config.request_timeout_secs, Some(30));
}

#[test]
fn base_url_is_validated_and_normalized() {
    let registry = SettingRegistry::new();
    let mut config = Config::default();

    assert!(apply_set(&registry, "base-url", &args(&["localhost:8080"]), &mut config).is_err());
    apply_set(
        &registry,
        "base-url",
        &args(&["http://localhost:8080/v1/"]),
        &mut config,
    )
    .unwrap();
    assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
}

#[test]
fn theme_accepts_light_and_dark_only() {
    let registry = SettingRegistry::new();
    let mut config = Config::default();

    apply_set(&registry, "theme", &args(&["LIGHT"]), &mut config).unwrap();
    assert_eq!(config.theme, Some(ThemeMode::Light));
    assert!(apply_set(&registry, "theme", &args(&["sepia"]), &mut config).is_err());
    assert_eq!(config.theme, Some(ThemeMode::Light));
}

#[test]
fn missing_values_explain_usage() {
    let registry = SettingRegistry::new();
    let mut config = Config::default();

    for key in registry.keys_display_order() {
        let err = apply_set(&registry, key, &[], &mut config).unwrap_err();
        assert!(
            matches!(err, SettingError::MissingArgs { .. }),
            "{key} should ask for a value"
        );
    }
}

#[test]
fn data_dir_keeps_spaces() {
    let registry = SettingRegistry::new();
    let mut config = Config::default();
    apply_set(
        &registry,
        "data-dir",
        &args(&["/srv/My", "Chats"]),
        &mut config,
    )
    .unwrap();
    assert_eq!(config.data_dir, Some(PathBuf::from("/srv/My Chats")));
}
