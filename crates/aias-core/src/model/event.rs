// ── Event domain types ──

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A chapter event (talk, workshop, site visit, ...).
///
/// `time` is kept as the string the admin form submitted; it is parsed
/// only for display (see [`crate::dates`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    pub title: String,
    pub time: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Seat limit; `None` (stored as `null`) means unlimited.
    #[serde(deserialize_with = "deserialize_seats")]
    pub seats: Option<u32>,
    pub image: String,
    pub description: String,
}

/// An event of the FBD programme. Same shape as [`Event`], stored under
/// `content/fbd/events`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FbdEvent(pub Event);

impl From<Event> for FbdEvent {
    fn from(event: Event) -> Self {
        Self(event)
    }
}

impl std::ops::Deref for FbdEvent {
    type Target = Event;

    fn deref(&self) -> &Event {
        &self.0
    }
}

/// Accept a number, a numeric string, or an empty string (no limit).
///
/// The admin form submits every input as a string, so both spellings
/// exist in the store. Anything else (`"50+"`, `"TBD"`, negatives) reads
/// as no limit rather than failing the record.
fn deserialize_seats<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let seats = match &raw {
        Value::Null => return Ok(None),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    if seats.is_none() {
        warn!(seats = %raw, "unreadable seat limit, treating as unlimited");
    }
    Ok(seats)
}
