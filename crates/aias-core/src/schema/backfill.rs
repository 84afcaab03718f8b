// Missing-field backfill
//
// Compares a stored document with its default shape and produces the
// patch that adds what is strictly missing. Present values are never
// touched, falsy ones included. Nested maps present on both sides are
// filled key by key; because store updates merge top-level fields only,
// the patch carries the whole merged map for such keys.

use aias_api::Fields;
use serde_json::Value;

/// Result of comparing a document against its shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Backfill {
    /// Top-level fields to merge onto the document.
    pub patch: Fields,
    /// Dotted paths of every field that was added.
    pub added: Vec<String>,
}

impl Backfill {
    pub fn is_empty(&self) -> bool {
        self.patch.is_empty()
    }
}

/// Compute the backfill patch for `existing` against `shape`.
pub fn backfill(existing: &Fields, shape: &Fields) -> Backfill {
    let mut result = Backfill::default();
    for (key, default) in shape {
        match (existing.get(key), default) {
            (None, _) => {
                result.patch.insert(key.clone(), default.clone());
                result.added.push(key.clone());
            }
            (Some(Value::Object(present)), Value::Object(nested_shape)) => {
                let mut merged = present.clone();
                let added = fill_nested(&mut merged, nested_shape, key);
                if !added.is_empty() {
                    result.patch.insert(key.clone(), Value::Object(merged));
                    result.added.extend(added);
                }
            }
            // Present, including null / "" / [] / false, or a type mismatch.
            (Some(_), _) => {}
        }
    }
    result
}

fn fill_nested(target: &mut Fields, shape: &Fields, prefix: &str) -> Vec<String> {
    let mut added = Vec::new();
    for (key, default) in shape {
        let dotted = format!("{prefix}.{key}");
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), default.clone());
                added.push(dotted);
            }
            Some(Value::Object(present)) => {
                if let Value::Object(nested_shape) = default {
                    added.extend(fill_nested(present, nested_shape, &dotted));
                }
            }
            Some(_) => {}
        }
    }
    added
}
