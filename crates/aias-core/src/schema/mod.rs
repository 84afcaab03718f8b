// ── Store schema ──
//
// One explicit description of the store layout: where every singleton
// document and sub-collection lives, the typed default shape of each,
// and which entity type is stored where. The reader, writer and
// reconciler all work from these tables.

pub mod backfill;
pub mod migrate;

use aias_api::Fields;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{
    AboutSection, AdminList, Article, Course, EducationDocument, Event, FbdDocument, FbdEvent,
    HomeSection, LibraryResource, MagazineDocument,
};

pub use backfill::{Backfill, backfill};
pub use migrate::{LegacySource, MigrationStep, SCHEMA_VERSION};

/// Document and collection paths.
pub mod paths {
    pub const HOME: &str = "content/home";
    pub const ABOUT: &str = "content/about";
    pub const EVENTS: &str = "content/events";
    pub const EVENT_ITEMS: &str = "content/events/items";
    pub const LIBRARY: &str = "content/library";
    pub const LIBRARY_ITEMS: &str = "content/library/items";
    pub const MAGAZINE: &str = "content/magazine";
    pub const ARTICLES: &str = "content/magazine/articles";
    pub const EDUCATION: &str = "content/education";
    pub const COURSES: &str = "content/education/courses";
    pub const FBD: &str = "content/fbd";
    pub const FBD_EVENTS: &str = "content/fbd/events";
    pub const ADMINS: &str = "config/admins";
    pub const SCHEMA: &str = "config/schema";

    /// Flat top-level collections of the version 1 layout.
    pub const LEGACY_EVENTS: &str = "events";
    pub const LEGACY_LIBRARY: &str = "library";
}

// ── Shapes ──────────────────────────────────────────────────────────

/// Default field set of `T`, as stored.
pub fn shape_of<T: Serialize + Default>() -> Fields {
    match serde_json::to_value(T::default()) {
        Ok(Value::Object(fields)) => fields,
        _ => Fields::new(),
    }
}

/// Serialize a value into document fields.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, CoreError> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(CoreError::Internal(format!(
            "expected an object to store, got {other}"
        ))),
    }
}

/// Decode document fields into `T`.
pub fn from_fields<T: DeserializeOwned>(path: &str, fields: Fields) -> Result<T, CoreError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| CoreError::Decode {
        message: format!("{path}: {e}"),
    })
}

/// Parent singletons of the event and library listings carry no fields
/// of their own.
fn empty_shape() -> Fields {
    Fields::new()
}

// ── Tables ──────────────────────────────────────────────────────────

/// An expected singleton document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSpec {
    pub path: &'static str,
    pub shape: fn() -> Fields,
}

impl DocumentSpec {
    pub fn default_fields(&self) -> Fields {
        (self.shape)()
    }
}

/// An expected sub-collection and its per-record default shape.
#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub path: &'static str,
    pub kind: &'static str,
    pub shape: fn() -> Fields,
}

impl CollectionSpec {
    pub fn default_fields(&self) -> Fields {
        (self.shape)()
    }
}

pub const HOME_DOC: DocumentSpec = DocumentSpec {
    path: paths::HOME,
    shape: shape_of::<HomeSection>,
};
pub const ABOUT_DOC: DocumentSpec = DocumentSpec {
    path: paths::ABOUT,
    shape: shape_of::<AboutSection>,
};
pub const EVENTS_DOC: DocumentSpec = DocumentSpec {
    path: paths::EVENTS,
    shape: empty_shape,
};
pub const LIBRARY_DOC: DocumentSpec = DocumentSpec {
    path: paths::LIBRARY,
    shape: empty_shape,
};
pub const MAGAZINE_DOC: DocumentSpec = DocumentSpec {
    path: paths::MAGAZINE,
    shape: shape_of::<MagazineDocument>,
};
pub const EDUCATION_DOC: DocumentSpec = DocumentSpec {
    path: paths::EDUCATION,
    shape: shape_of::<EducationDocument>,
};
pub const FBD_DOC: DocumentSpec = DocumentSpec {
    path: paths::FBD,
    shape: shape_of::<FbdDocument>,
};
pub const ADMINS_DOC: DocumentSpec = DocumentSpec {
    path: paths::ADMINS,
    shape: shape_of::<AdminList>,
};

/// Parent singletons of the five entity collections.
pub const BASE_DOCUMENTS: [DocumentSpec; 5] =
    [EVENTS_DOC, LIBRARY_DOC, MAGAZINE_DOC, EDUCATION_DOC, FBD_DOC];

/// Every singleton a healthy store holds.
pub const DOCUMENTS: [DocumentSpec; 8] = [
    HOME_DOC,
    EVENTS_DOC,
    LIBRARY_DOC,
    MAGAZINE_DOC,
    EDUCATION_DOC,
    FBD_DOC,
    ABOUT_DOC,
    ADMINS_DOC,
];

/// Every entity sub-collection.
pub const COLLECTIONS: [CollectionSpec; 5] = [
    collection::<Event>(),
    collection::<LibraryResource>(),
    collection::<Article>(),
    collection::<Course>(),
    collection::<FbdEvent>(),
];

const fn collection<T: Entity>() -> CollectionSpec {
    CollectionSpec {
        path: T::COLLECTION,
        kind: T::KIND,
        shape: shape_of::<T>,
    }
}

// ── Entities ────────────────────────────────────────────────────────

/// A record type stored in one sub-collection under one parent singleton.
pub trait Entity: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {
    /// Name used in validation and not-found messages.
    const KIND: &'static str;
    const COLLECTION: &'static str;
    const PARENT: DocumentSpec;

    /// Wire names of required fields that are missing or blank.
    fn missing_fields(&self) -> Vec<&'static str>;
}

fn blank<const N: usize>(fields: [(&'static str, &str); N]) -> Vec<&'static str> {
    fields
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
}

impl Entity for Event {
    const KIND: &'static str = "event";
    const COLLECTION: &'static str = paths::EVENT_ITEMS;
    const PARENT: DocumentSpec = EVENTS_DOC;

    fn missing_fields(&self) -> Vec<&'static str> {
        blank([
            ("title", self.title.as_str()),
            ("time", self.time.as_str()),
            ("location", self.location.as_str()),
            ("description", self.description.as_str()),
        ])
    }
}

impl Entity for FbdEvent {
    const KIND: &'static str = "fbd event";
    const COLLECTION: &'static str = paths::FBD_EVENTS;
    const PARENT: DocumentSpec = FBD_DOC;

    fn missing_fields(&self) -> Vec<&'static str> {
        self.0.missing_fields()
    }
}

impl Entity for LibraryResource {
    const KIND: &'static str = "library resource";
    const COLLECTION: &'static str = paths::LIBRARY_ITEMS;
    const PARENT: DocumentSpec = LIBRARY_DOC;

    fn missing_fields(&self) -> Vec<&'static str> {
        blank([
            ("name", self.name.as_str()),
            ("type", self.kind.as_str()),
            ("description", self.description.as_str()),
        ])
    }
}

impl Entity for Article {
    const KIND: &'static str = "article";
    const COLLECTION: &'static str = paths::ARTICLES;
    const PARENT: DocumentSpec = MAGAZINE_DOC;

    fn missing_fields(&self) -> Vec<&'static str> {
        blank([
            ("title", self.title.as_str()),
            ("author", self.author.as_str()),
            ("date", self.date.as_str()),
            ("summary", self.summary.as_str()),
            ("content", self.content.as_str()),
        ])
    }
}

impl Entity for Course {
    const KIND: &'static str = "course";
    const COLLECTION: &'static str = paths::COURSES;
    const PARENT: DocumentSpec = EDUCATION_DOC;

    fn missing_fields(&self) -> Vec<&'static str> {
        blank([("title", self.title.as_str()), ("description", self.description.as_str())])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn event_validation_names_every_blank_field() {
        let event = Event {
            title: "  ".into(),
            time: "t".into(),
            ..Event::default()
        };
        assert_eq!(event.missing_fields(), ["title", "location", "description"]);
    }

    #[test]
    fn complete_article_has_no_missing_fields() {
        let article = Article {
            title: "On Thresholds".into(),
            author: "N. Ali".into(),
            date: "2025-03-01".into(),
            summary: "s".into(),
            content: "c".into(),
        };
        assert!(article.missing_fields().is_empty());
    }

    #[test]
    fn shapes_match_the_stored_defaults() {
        assert_eq!(
            Value::Object(EDUCATION_DOC.default_fields()),
            json!({ "weeklyWorkshop": {
                "weekTitle": "", "lecturerName": "", "description": "", "workshopUrl": ""
            }})
        );
        assert_eq!(
            Value::Object(MAGAZINE_DOC.default_fields()),
            json!({ "featuredArticleId": null, "releases": [] })
        );
        assert_eq!(
            Value::Object(COLLECTIONS[1].default_fields()),
            json!({ "name": "", "type": "", "tags": [], "image": "", "description": "", "link": "" })
        );
        assert!(EVENTS_DOC.default_fields().is_empty());
        assert_eq!(
            Value::Object(COLLECTIONS[0].default_fields()),
            json!({
                "title": "", "time": "", "location": "", "type": "",
                "seats": null, "image": "", "description": ""
            })
        );
    }

    #[test]
    fn every_collection_lives_under_an_expected_document() {
        for spec in COLLECTIONS {
            assert!(
                DOCUMENTS.iter().any(|doc| spec.path.starts_with(doc.path)),
                "{} has no parent document",
                spec.path
            );
        }
    }
}
