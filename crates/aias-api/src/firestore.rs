// Firestore REST client
//
// Wraps `reqwest::Client` with Firestore v1 URL construction, typed value
// encoding, error-body parsing, and list pagination. Every method speaks
// plain JSON fields; the typed `{"stringValue": ..}` representation never
// leaves this module.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::path;
use crate::store::{Document, DocumentStore, Fields};
use crate::transport::TransportConfig;
use crate::value::{decode_fields, encode_fields};

/// Public Firestore endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
/// Database id used by projects that never created a named database.
pub const DEFAULT_DATABASE: &str = "(default)";

const PAGE_SIZE: u32 = 300;

/// Connection parameters for one Firestore database.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Service root; `None` means [`DEFAULT_BASE_URL`]. Point it at an
    /// emulator (e.g. `http://localhost:8080`) for local work.
    pub base_url: Option<Url>,
    pub project_id: String,
    pub database: String,
    /// Web API key, sent as the `key` query parameter.
    pub api_key: Option<SecretString>,
    /// Optional ID token, sent as a bearer `Authorization` header.
    pub id_token: Option<SecretString>,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            base_url: None,
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.into(),
            api_key: None,
            id_token: None,
        }
    }
}

/// HTTP client for the Firestore v1 documents API.
///
/// All paths are relative to
/// `{base}/v1/projects/{project}/databases/{database}/documents/`.
pub struct FirestoreClient {
    http: reqwest::Client,
    documents_url: Url,
    api_key: Option<SecretString>,
    timeout_secs: u64,
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>,
}

impl RawDocument {
    fn into_document(self) -> Result<Document, Error> {
        let id = self
            .name
            .rsplit_once('/')
            .map(|(_, id)| id.to_owned())
            .ok_or_else(|| Error::Deserialization {
                message: "document name has no id segment".into(),
                body: self.name.clone(),
            })?;
        Ok(Document {
            id,
            fields: decode_fields(&self.fields)?,
        })
    }
}

impl FirestoreClient {
    /// Create a client from connection parameters and transport settings.
    pub fn new(config: &FirestoreConfig, transport: &TransportConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.id_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| Error::InvalidCredential(format!("ID token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let http = transport.build_client_with_headers(headers)?;
        let mut client = Self::with_client(http, config)?;
        client.timeout_secs = transport.timeout_secs();
        Ok(client)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The ID token in `config` is ignored here; put it in the client's
    /// default headers if needed.
    pub fn with_client(http: reqwest::Client, config: &FirestoreConfig) -> Result<Self, Error> {
        let base = match &config.base_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        let documents_url = Url::parse(&format!(
            "{}/v1/projects/{}/databases/{}/documents/",
            base.as_str().trim_end_matches('/'),
            config.project_id,
            config.database,
        ))?;
        Ok(Self {
            http,
            documents_url,
            api_key: config.api_key.clone(),
            timeout_secs: 0,
        })
    }

    /// Root of the document namespace.
    pub fn documents_url(&self) -> &Url {
        &self.documents_url
    }

    // ── URL builders ────────────────────────────────────────────────

    /// Each path segment is percent-encoded, so ids holding `#`, `?` or `%`
    /// address their own document.
    fn url(&self, path: &str) -> Result<Url, Error> {
        let mut url = self.documents_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidPath {
                path: path.to_owned(),
                reason: "service URL cannot carry a path".into(),
            })?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }

    // ── Request helpers ─────────────────────────────────────────────

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, Error> {
        let mut request = request.query(query);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.expose_secret())]);
        }
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                Error::Transport(e)
            }
        })
    }

    /// Turn a non-success response into `Error::NotFound` / `Error::Api`.
    async fn check(path: &str, resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                path: path.to_owned(),
            });
        }

        let body = resp.text().await.unwrap_or_default();
        let (message, code) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => (envelope.error.message, envelope.error.status),
            Err(_) => (body, None),
        };
        Err(Error::Api {
            message,
            code,
            status: status.as_u16(),
        })
    }

    async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    fn body(fields: &Fields) -> Value {
        json!({ "fields": encode_fields(fields) })
    }
}

/// Quote a field path segment unless it is a plain identifier.
fn field_path(key: &str) -> String {
    let simple = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        key.to_owned()
    } else {
        format!("`{}`", key.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

impl DocumentStore for FirestoreClient {
    async fn get(&self, path: &str) -> Result<Option<Document>, Error> {
        path::validate_document(path)?;
        let url = self.url(path)?;
        debug!("GET {}", url);

        let resp = self.send(self.http.get(url), &[]).await?;
        match Self::check(path, resp).await {
            Ok(resp) => Self::parse::<RawDocument>(resp)
                .await?
                .into_document()
                .map(Some),
            Err(Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, Error> {
        path::validate_collection(collection)?;
        let url = self.url(collection)?;
        let mut docs = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }
            debug!(collection, page = docs.len(), "GET {}", url);

            let resp = self.send(self.http.get(url.clone()), &query).await?;
            // A collection that was never written lists as empty, not 404.
            let page: ListResponse = match Self::check(collection, resp).await {
                Ok(resp) => Self::parse(resp).await?,
                Err(Error::NotFound { .. }) => break,
                Err(e) => return Err(e),
            };

            for raw in page.documents {
                docs.push(raw.into_document()?);
            }
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(docs)
    }

    async fn set(&self, path: &str, fields: Fields) -> Result<(), Error> {
        path::validate_document(path)?;
        let url = self.url(path)?;
        debug!("PATCH {} (replace)", url);

        let resp = self
            .send(self.http.patch(url).json(&Self::body(&fields)), &[])
            .await?;
        Self::check(path, resp).await?;
        Ok(())
    }

    async fn create(&self, path: &str, fields: Fields) -> Result<bool, Error> {
        path::validate_document(path)?;
        let url = self.url(path)?;
        debug!("PATCH {} (create if absent)", url);

        let resp = self
            .send(
                self.http.patch(url).json(&Self::body(&fields)),
                &[("currentDocument.exists", "false".into())],
            )
            .await?;
        match Self::check(path, resp).await {
            Ok(_) => Ok(true),
            Err(Error::Api {
                code: Some(code), ..
            }) if code == "ALREADY_EXISTS" || code == "FAILED_PRECONDITION" => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, Error> {
        path::validate_collection(collection)?;
        let url = self.url(collection)?;
        debug!("POST {}", url);

        let resp = self
            .send(self.http.post(url).json(&Self::body(&fields)), &[])
            .await?;
        let resp = Self::check(collection, resp).await?;
        let doc = Self::parse::<RawDocument>(resp).await?.into_document()?;
        Ok(doc.id)
    }

    async fn update(&self, path: &str, fields: Fields) -> Result<(), Error> {
        path::validate_document(path)?;
        if fields.is_empty() {
            // An empty mask would be a no-op write; only confirm existence.
            return match self.get(path).await? {
                Some(_) => Ok(()),
                None => Err(Error::NotFound {
                    path: path.to_owned(),
                }),
            };
        }

        let url = self.url(path)?;
        debug!(fields = fields.len(), "PATCH {} (merge)", url);

        let mut query: Vec<(&str, String)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", field_path(key)))
            .collect();
        query.push(("currentDocument.exists", "true".into()));

        let resp = self
            .send(self.http.patch(url).json(&Self::body(&fields)), &query)
            .await?;
        Self::check(path, resp).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        path::validate_document(path)?;
        let url = self.url(path)?;
        debug!("DELETE {}", url);

        let resp = self.send(self.http.delete(url), &[]).await?;
        match Self::check(path, resp).await {
            Ok(_) | Err(Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
