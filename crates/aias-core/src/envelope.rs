// ── Result envelopes ──
//
// Page renderers consume `{success: bool, ...}` objects rather than
// typed results. `Envelope` is that boundary: a successful payload's
// fields are spread next to `success`, a failure becomes `error` plus a
// stable `code`. Aggregated failures also carry their reports.

use serde::ser::{Error as _, SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;

/// A serializable operation result.
#[derive(Debug)]
pub struct Envelope<T>(Result<T, CoreError>);

/// Payload of operations that return a new record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created {
    pub id: String,
}

impl<T> Envelope<T> {
    pub fn new(result: Result<T, CoreError>) -> Self {
        Self(result)
    }

    pub fn is_success(&self) -> bool {
        self.0.is_ok()
    }
}

impl Envelope<Created> {
    /// Wrap the result of an `add_*` call as `{success, id}`.
    pub fn created(result: Result<String, CoreError>) -> Self {
        Self(result.map(|id| Created { id }))
    }
}

impl<T> From<Result<T, CoreError>> for Envelope<T> {
    fn from(result: Result<T, CoreError>) -> Self {
        Self(result)
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.0 {
            Ok(payload) => {
                map.serialize_entry("success", &true)?;
                match serde_json::to_value(payload).map_err(S::Error::custom)? {
                    Value::Object(fields) => {
                        for (key, value) in &fields {
                            if key != "success" {
                                map.serialize_entry(key, value)?;
                            }
                        }
                    }
                    Value::Null => {}
                    other => map.serialize_entry("data", &other)?,
                }
            }
            Err(err) => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", &err.to_string())?;
                map.serialize_entry("code", err.code())?;
                match err {
                    CoreError::ValidationFailed { fields, .. } => {
                        map.serialize_entry("fields", fields)?;
                    }
                    CoreError::ContentUnavailable {
                        section, report, ..
                    } => {
                        map.serialize_entry("section", section)?;
                        map.serialize_entry("report", report)?;
                    }
                    CoreError::ReconcileFailed { report } => {
                        map.serialize_entry("actions", &report.actions)?;
                        map.serialize_entry("errors", &report.errors)?;
                    }
                    _ => {}
                }
            }
        }
        map.end()
    }
}
