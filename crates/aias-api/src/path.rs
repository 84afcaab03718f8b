// Document and collection path helpers
//
// Paths alternate collection and document segments, so a document path
// has an even number of segments (`content/events`) and a collection
// path an odd number (`content/events/items`).

use crate::error::Error;

fn segments(path: &str) -> Result<Vec<&str>, Error> {
    if path.is_empty() {
        return Err(invalid(path, "path is empty"));
    }
    let parts: Vec<&str> = path.split('/').collect();
    if parts.iter().any(|s| s.is_empty()) {
        return Err(invalid(path, "path contains an empty segment"));
    }
    if parts.iter().any(|s| matches!(*s, "." | "..")) {
        return Err(invalid(path, "path contains a relative segment"));
    }
    Ok(parts)
}

fn invalid(path: &str, reason: &str) -> Error {
    Error::InvalidPath {
        path: path.to_owned(),
        reason: reason.to_owned(),
    }
}

/// Check that `path` addresses a document.
pub fn validate_document(path: &str) -> Result<(), Error> {
    if segments(path)?.len() % 2 == 0 {
        Ok(())
    } else {
        Err(invalid(path, "document paths need an even number of segments"))
    }
}

/// Check that `path` addresses a collection.
pub fn validate_collection(path: &str) -> Result<(), Error> {
    if segments(path)?.len() % 2 == 1 {
        Ok(())
    } else {
        Err(invalid(path, "collection paths need an odd number of segments"))
    }
}

/// Split a document path into its collection path and document id.
pub fn split_document(path: &str) -> Result<(&str, &str), Error> {
    validate_document(path)?;
    path.rsplit_once('/')
        .ok_or_else(|| invalid(path, "document path has no collection"))
}

/// Whether `candidate` is a direct child document of `collection`.
pub fn is_child_of(candidate: &str, collection: &str) -> bool {
    candidate
        .strip_prefix(collection)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|id| !id.is_empty() && !id.contains('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_paths_need_even_segments() {
        assert!(validate_document("content/home").is_ok());
        assert!(validate_document("content/events/items/abc").is_ok());
        assert!(validate_document("content").is_err());
        assert!(validate_document("content//home").is_err());
    }

    #[test]
    fn collection_paths_need_odd_segments() {
        assert!(validate_collection("events").is_ok());
        assert!(validate_collection("content/events/items").is_ok());
        assert!(validate_collection("content/events").is_err());
        assert!(validate_collection("").is_err());
    }

    #[test]
    fn relative_segments_are_rejected() {
        assert!(validate_document("content/events/items/..").is_err());
        assert!(validate_collection("content/./items").is_err());
        assert!(validate_document("content/events/items/abc#x").is_ok());
    }

    #[test]
    fn split_document_returns_parent_and_id() {
        let (parent, id) = split_document("content/fbd/events/e1").expect("valid path");
        assert_eq!(parent, "content/fbd/events");
        assert_eq!(id, "e1");
    }

    #[test]
    fn child_detection_ignores_grandchildren() {
        assert!(is_child_of("events/a", "events"));
        assert!(!is_child_of("events/a/sub/b", "events"));
        assert!(!is_child_of("eventsx/a", "events"));
        assert!(!is_child_of("events", "events"));
    }
}
