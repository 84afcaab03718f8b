// ── Core error types ──
//
// User-facing errors from aias-core. Page code never sees HTTP status
// codes or JSON parse failures directly. The `From<aias_api::Error>` impl
// translates store-layer errors into domain-appropriate variants.

use thiserror::Error;

use crate::model::Section;
use crate::reader::FetchReport;
use crate::reconciler::ReconcileReport;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation errors ────────────────────────────────────────────
    #[error("Validation failed for {entity}: missing required fields {}", fields.join(", "))]
    ValidationFailed {
        entity: &'static str,
        fields: Vec<&'static str>,
    },

    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    // ── Conflicts / lookups ──────────────────────────────────────────
    #[error("Admin already exists: {email}")]
    DuplicateAdmin { email: String },

    #[error("Admin not found: {email}")]
    AdminNotFound { email: String },

    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("Cannot reach document store at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Document store request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Document store error: {message}")]
    Api {
        message: String,
        /// Provider error code (e.g. `PERMISSION_DENIED`).
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Malformed stored data: {message}")]
    Decode { message: String },

    // ── Aggregated failures ──────────────────────────────────────────
    /// A content fetch failed. `section` is the first failed section;
    /// `report` holds the outcome of every section.
    #[error("Content unavailable: failed to read {section}")]
    ContentUnavailable {
        section: Section,
        report: FetchReport,
        source: Box<CoreError>,
    },

    /// A reconciliation pass finished with errors. The report still lists
    /// every action that succeeded.
    #[error("Structure reconciliation finished with {} error(s)", report.errors.len())]
    ReconcileFailed { report: ReconcileReport },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable machine-readable code, used in result envelopes.
    ///
    /// Remote errors carry the provider code when one was reported.
    pub fn code(&self) -> &str {
        match self {
            Self::ValidationFailed { .. } => "validation_failed",
            Self::InvalidEmail { .. } => "invalid_email",
            Self::DuplicateAdmin { .. } => "duplicate_admin",
            Self::AdminNotFound { .. } => "admin_not_found",
            Self::NotFound { .. } => "not_found",
            Self::ConnectionFailed { .. } => "connection_failed",
            Self::AuthenticationFailed { .. } => "authentication_failed",
            Self::Timeout { .. } => "timeout",
            Self::Api {
                code: Some(code), ..
            } => code,
            Self::Api { code: None, .. } => "api_error",
            Self::Decode { .. } => "decode_error",
            Self::ContentUnavailable { .. } => "content_unavailable",
            Self::ReconcileFailed { .. } => "reconcile_failed",
            Self::Config { .. } => "config_error",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns `true` for validation and lookup failures that never
    /// reached (or were definitively answered by) the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed { .. }
                | Self::InvalidEmail { .. }
                | Self::DuplicateAdmin { .. }
                | Self::AdminNotFound { .. }
                | Self::NotFound { .. }
        )
    }
}

// ── Conversion from store-layer errors ───────────────────────────────

impl From<aias_api::Error> for CoreError {
    fn from(err: aias_api::Error) -> Self {
        match err {
            aias_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), |u| u.origin().ascii_serialization()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            aias_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            aias_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            aias_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            aias_api::Error::InvalidCredential(message) => {
                CoreError::AuthenticationFailed { message }
            }
            aias_api::Error::Api {
                message,
                status: 401,
                ..
            } => CoreError::AuthenticationFailed { message },
            aias_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            aias_api::Error::NotFound { path } => CoreError::NotFound {
                entity_type: "document".into(),
                identifier: path,
            },
            aias_api::Error::InvalidPath { path, reason } => {
                CoreError::Internal(format!("invalid store path '{path}': {reason}"))
            }
            aias_api::Error::Deserialization { message, body: _ } => CoreError::Decode { message },
            aias_api::Error::Injected { path } => CoreError::Api {
                message: format!("injected failure for {path}"),
                code: Some("UNAVAILABLE".into()),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Decode {
            message: err.to_string(),
        }
    }
}
