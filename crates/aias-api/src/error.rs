use thiserror::Error;

/// Top-level error type for the `aias-api` crate.
///
/// Covers every failure mode of a document-store backend: transport,
/// provider-reported errors, path problems, and payload decoding.
/// `aias-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A credential could not be turned into a request header.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    // ── Store ───────────────────────────────────────────────────────
    /// Structured error reported by the document store
    /// (parsed from the `{error: {code, message, status}}` body).
    #[error("Document store error (HTTP {status}): {message}")]
    Api {
        message: String,
        /// Provider status name, e.g. `PERMISSION_DENIED`.
        code: Option<String>,
        status: u16,
    },

    /// The addressed document does not exist.
    #[error("Document not found: {path}")]
    NotFound { path: String },

    /// A document or collection path has the wrong shape.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── In-memory store ─────────────────────────────────────────────
    /// Failure injected into a [`MemoryStore`](crate::MemoryStore) path.
    #[error("Injected failure for {path}")]
    Injected { path: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Extract the provider error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
