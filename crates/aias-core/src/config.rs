// ── Runtime store configuration ──
//
// These types describe *how* to reach the document store. They carry
// credential data and connection tuning, but never touch disk.
// `aias-config` (or any embedding program) builds a `StoreConfig`
// and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use aias_api::FirestoreConfig;
use aias_api::firestore::DEFAULT_DATABASE;
use aias_api::transport::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// Project the chapter site is deployed under.
pub const DEFAULT_PROJECT_ID: &str = "aias-bsr";

/// Freshness window of the content cache.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Credentials supplied by the embedding program.
#[derive(Debug, Clone, Default)]
pub struct StoreCredentials {
    /// Web API key of the project.
    pub api_key: Option<SecretString>,
    /// ID token of a signed-in admin, for writes guarded by security rules.
    pub id_token: Option<SecretString>,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (local emulator behind a self-signed proxy).
    DangerAcceptInvalid,
}

/// Configuration for one document store.
///
/// Built by the embedding program, passed to
/// [`ContentService::connect`](crate::ContentService::connect).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub project_id: String,
    /// Database id (defaults to `(default)`).
    pub database: String,
    /// Service root override, e.g. a local emulator. `None` = hosted service.
    pub base_url: Option<Url>,
    pub credentials: StoreCredentials,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How long a successful content fetch is served from cache.
    pub cache_ttl: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.into(),
            database: DEFAULT_DATABASE.into(),
            base_url: None,
            credentials: StoreCredentials::default(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl StoreConfig {
    /// Connection parameters for the Firestore client.
    pub fn firestore_config(&self) -> FirestoreConfig {
        FirestoreConfig {
            base_url: self.base_url.clone(),
            project_id: self.project_id.clone(),
            database: self.database.clone(),
            api_key: self.credentials.api_key.clone(),
            id_token: self.credentials.id_token.clone(),
        }
    }

    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: tls_to_transport(&self.tls),
            timeout: self.timeout,
        }
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
