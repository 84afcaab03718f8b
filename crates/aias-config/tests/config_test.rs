#![allow(clippy::unwrap_used)]
// Config loading, saving and profile translation.

use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;

use aias_config::{
    Config, ConfigError, Defaults, LogFormat, Profile, build_store_config, load_config_from,
    resolve_api_key_with, save_config_to,
};
use aias_core::{StoreCredentials, TlsVerification};

// ── Helpers ─────────────────────────────────────────────────────────

fn setup(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

fn emulator_profile() -> Profile {
    Profile {
        project_id: "demo-aias".into(),
        base_url: Some("http://localhost:8080".into()),
        ..Profile::default()
    }
}

// ── Loading ─────────────────────────────────────────────────────────

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.default_profile.as_deref(), Some("default"));
    assert_eq!(config.defaults.timeout, 30);
    assert_eq!(config.defaults.cache_ttl_secs, 300);
    assert!(config.profiles.is_empty());
}

#[test]
fn profiles_and_logging_are_read_from_toml() {
    let (_dir, path) = setup(
        r#"
default_profile = "emulator"

[defaults]
timeout = 10

[logging]
level = "aias_core=debug,warn"
format = "json"

[profiles.emulator]
project_id = "demo-aias"
base_url = "http://localhost:8080"
cache_ttl_secs = 5

[profiles.prod]
api_key_env = "AIAS_PROD_KEY"
"#,
    );

    let config = load_config_from(&path).unwrap();

    let (name, emulator) = config.profile(None).unwrap();
    assert_eq!(name, "emulator");
    assert_eq!(emulator.project_id, "demo-aias");
    assert_eq!(emulator.cache_ttl_secs, Some(5));

    let (_, prod) = config.profile(Some("prod")).unwrap();
    assert_eq!(prod.project_id, "aias-bsr");
    assert_eq!(prod.api_key_env.as_deref(), Some("AIAS_PROD_KEY"));

    assert_eq!(config.defaults.timeout, 10);
    assert_eq!(config.defaults.cache_ttl_secs, 300);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.level, "aias_core=debug,warn");
}

#[test]
fn unknown_profiles_are_rejected() {
    let config = Config::default();

    assert!(matches!(
        config.profile(Some("staging")),
        Err(ConfigError::UnknownProfile { .. })
    ));

    let (name, stock) = config.profile(None).unwrap();
    assert_eq!(name, "default");
    assert_eq!(stock.project_id, "aias-bsr");
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let mut config = Config::default();
    config.profiles.insert("emulator".into(), emulator_profile());

    save_config_to(&config, &path).unwrap();
    let loaded = load_config_from(&path).unwrap();

    let (_, profile) = loaded.profile(Some("emulator")).unwrap();
    assert_eq!(profile.base_url.as_deref(), Some("http://localhost:8080"));
}

// ── Store config ────────────────────────────────────────────────────

#[test]
fn profile_overrides_defaults() {
    let mut profile = emulator_profile();
    profile.timeout = Some(5);

    let store = build_store_config(&profile, &Defaults::default(), StoreCredentials::default())
        .unwrap();

    assert_eq!(store.project_id, "demo-aias");
    assert_eq!(store.database, "(default)");
    assert_eq!(store.base_url.unwrap().as_str(), "http://localhost:8080/");
    assert_eq!(store.timeout, Duration::from_secs(5));
    assert_eq!(store.cache_ttl, Duration::from_secs(300));
    assert_eq!(store.tls, TlsVerification::SystemDefaults);
}

#[test]
fn tls_choice_follows_the_profile() {
    let mut profile = emulator_profile();
    profile.ca_cert = Some(PathBuf::from("/etc/aias/ca.pem"));
    let store = build_store_config(&profile, &Defaults::default(), StoreCredentials::default())
        .unwrap();
    assert_eq!(
        store.tls,
        TlsVerification::CustomCa(PathBuf::from("/etc/aias/ca.pem"))
    );

    profile.insecure = Some(true);
    let store = build_store_config(&profile, &Defaults::default(), StoreCredentials::default())
        .unwrap();
    assert_eq!(store.tls, TlsVerification::DangerAcceptInvalid);
}

#[test]
fn invalid_profiles_fail_validation() {
    let mut profile = emulator_profile();
    profile.base_url = Some("not a url".into());
    let err = build_store_config(&profile, &Defaults::default(), StoreCredentials::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "base_url"));

    let profile = Profile::default();
    let err = build_store_config(&profile, &Defaults::default(), StoreCredentials::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "project_id"));
}

// ── Credentials ─────────────────────────────────────────────────────

#[test]
fn env_var_wins_over_plaintext_key() {
    let profile = Profile {
        api_key: Some("plaintext-key".into()),
        api_key_env: Some("AIAS_TEST_KEY".into()),
        ..emulator_profile()
    };

    let key = resolve_api_key_with(&profile, "aias-config-test-env", |name| {
        (name == "AIAS_TEST_KEY").then(|| "env-key".to_string())
    })
    .unwrap();

    assert_eq!(key.expose_secret(), "env-key");
}

#[test]
fn plaintext_key_is_the_last_resort() {
    let profile = Profile {
        api_key: Some("plaintext-key".into()),
        api_key_env: Some("AIAS_TEST_KEY_UNSET".into()),
        ..emulator_profile()
    };

    let key = resolve_api_key_with(&profile, "aias-config-test-plaintext", |_| None).unwrap();
    assert_eq!(key.expose_secret(), "plaintext-key");

    let bare = emulator_profile();
    assert!(resolve_api_key_with(&bare, "aias-config-test-bare", |_| None).is_none());
}
