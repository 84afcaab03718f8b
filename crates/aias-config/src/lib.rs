//! Shared configuration for AIAS content tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! logging setup, and translation to `aias_core::StoreConfig`.

pub mod logging;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use aias_core::config::DEFAULT_PROJECT_ID;
use aias_core::{StoreConfig, StoreCredentials, TlsVerification};

pub use logging::{LogFormat, LoggingConfig, init_tracing};

const KEYRING_SERVICE: &str = "aias-content";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named store profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Content cache freshness window in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_cache_ttl() -> u64 {
    300
}

/// A named store profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Project id; the chapter project when omitted.
    #[serde(default = "default_project")]
    pub project_id: String,

    /// Database id; `(default)` when omitted.
    pub database: Option<String>,

    /// Service root override, e.g. "http://localhost:8080" for the emulator.
    pub base_url: Option<String>,

    /// Web API key (plaintext, prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Environment variable name containing an admin ID token.
    pub id_token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override cache freshness window.
    pub cache_ttl_secs: Option<u64>,
}

fn default_project() -> String {
    DEFAULT_PROJECT_ID.into()
}

impl Config {
    /// The named profile, or the default one.
    ///
    /// An unconfigured `default` profile resolves to the stock chapter
    /// profile so a fresh install works without a config file.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = name
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into());
        match self.profiles.get(&name) {
            Some(profile) => Ok((name, profile.clone())),
            None if name == "default" => Ok((
                name,
                Profile {
                    project_id: default_project(),
                    ..Profile::default()
                },
            )),
            None => Err(ConfigError::UnknownProfile { profile: name }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "aias", "aias-content").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("aias-content");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment. A missing file yields defaults.
///
/// Environment keys use `AIAS_` and `__` as the nesting separator, e.g.
/// `AIAS_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AIAS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the API key: env var named by the profile, then the system
/// keyring, then plaintext. `None` when nothing is configured, which is
/// valid against the emulator and for public read rules.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_api_key_with(profile, profile_name, |name| std::env::var(name).ok())
}

/// [`resolve_api_key`] with a custom environment lookup.
pub fn resolve_api_key_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(value) = profile.api_key_env.as_deref().and_then(&env) {
        return Some(SecretString::from(value));
    }

    // 2. System keyring
    if let Some(secret) = keyring_secret(profile_name, "api-key") {
        return Some(secret);
    }

    // 3. Plaintext in config
    profile.api_key.clone().map(SecretString::from)
}

/// Resolve an admin ID token: env var named by the profile, then keyring.
pub fn resolve_id_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_id_token_with(profile, profile_name, |name| std::env::var(name).ok())
}

pub fn resolve_id_token_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    if let Some(value) = profile.id_token_env.as_deref().and_then(&env) {
        return Some(SecretString::from(value));
    }
    keyring_secret(profile_name, "id-token")
}

fn keyring_secret(profile_name: &str, kind: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}")).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

// ── Store config ────────────────────────────────────────────────────

/// Build a `StoreConfig` from a profile, with resolved credentials.
pub fn profile_to_store_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<StoreConfig, ConfigError> {
    let credentials = StoreCredentials {
        api_key: resolve_api_key(profile, profile_name),
        id_token: resolve_id_token(profile, profile_name),
    };
    build_store_config(profile, defaults, credentials)
}

/// Build a `StoreConfig` from a profile and explicitly supplied credentials.
pub fn build_store_config(
    profile: &Profile,
    defaults: &Defaults,
    credentials: StoreCredentials,
) -> Result<StoreConfig, ConfigError> {
    if profile.project_id.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "project_id".into(),
            reason: "must not be empty".into(),
        });
    }

    let base_url = profile
        .base_url
        .as_deref()
        .map(|raw| {
            raw.parse::<url::Url>().map_err(|_| ConfigError::Validation {
                field: "base_url".into(),
                reason: format!("invalid URL: {raw}"),
            })
        })
        .transpose()?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let stock = StoreConfig::default();
    Ok(StoreConfig {
        project_id: profile.project_id.clone(),
        database: profile.database.clone().unwrap_or(stock.database),
        base_url,
        credentials,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        cache_ttl: Duration::from_secs(profile.cache_ttl_secs.unwrap_or(defaults.cache_ttl_secs)),
    })
}

/// Load the config file and build the `StoreConfig` of the named (or
/// default) profile.
pub fn store_config(profile_name: Option<&str>) -> Result<StoreConfig, ConfigError> {
    let config = load_config()?;
    let (name, profile) = config.profile(profile_name)?;
    profile_to_store_config(&profile, &name, &config.defaults)
}
