#![allow(clippy::unwrap_used)]
// Content writer behaviour against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use aias_api::{Fields, MemoryStore};
use aias_core::schema::paths;
use aias_core::{
    Article, ContentService, CoreError, Course, Event, FbdEvent, LibraryResource,
    UpdateEventRequest, WeeklyWorkshop,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn setup() -> (Arc<MemoryStore>, ContentService<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = ContentService::from_shared(Arc::clone(&store), Duration::from_secs(300));
    (store, service)
}

fn fields(value: Value) -> Fields {
    value.as_object().cloned().unwrap()
}

fn talk() -> Event {
    Event {
        title: "Adaptive Reuse in Old Basra".into(),
        time: "2025-05-01T18:00".into(),
        location: "Hall B".into(),
        kind: "talk".into(),
        description: "Shanasheel houses and their futures.".into(),
        ..Event::default()
    }
}

fn article() -> Article {
    Article {
        title: "On Thresholds".into(),
        author: "N. Ali".into(),
        date: "2025-03-01".into(),
        summary: "Doors, courtyards and the street.".into(),
        content: "Long form text.".into(),
    }
}

// ── Validation ──────────────────────────────────────────────────────

#[tokio::test]
async fn invalid_records_never_reach_the_store() {
    let (store, service) = setup();

    let err = service.writer().add_event(&Event::default()).await.unwrap_err();

    match err {
        CoreError::ValidationFailed { entity, fields } => {
            assert_eq!(entity, "event");
            assert_eq!(fields, ["title", "time", "location", "description"]);
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn library_resources_require_name_type_and_description() {
    let (store, service) = setup();
    let resource = LibraryResource {
        name: "Architects' Data".into(),
        ..LibraryResource::default()
    };

    let err = service
        .writer()
        .add_library_resource(&resource)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::ValidationFailed { ref fields, .. } if fields == &["type", "description"]
    ));
    assert_eq!(store.call_count(), 0);
}

// ── Create / update / delete ────────────────────────────────────────

#[tokio::test]
async fn add_creates_the_parent_and_returns_the_new_id() {
    let (store, service) = setup();

    let id = service.writer().add_event(&talk()).await.unwrap();

    assert!(store.contains(paths::EVENTS));
    assert_eq!(store.count(paths::EVENT_ITEMS), 1);
    let stored = store.fields(&format!("{}/{id}", paths::EVENT_ITEMS)).unwrap();
    assert_eq!(stored["title"], "Adaptive Reuse in Old Basra");
    assert_eq!(stored["type"], "talk");
    assert_eq!(stored["seats"], Value::Null);
}

#[tokio::test]
async fn add_keeps_an_existing_parent_untouched() {
    let (store, service) = setup();
    store.seed(
        paths::EDUCATION,
        fields(json!({ "weeklyWorkshop": { "weekTitle": "Revit" } })),
    );

    service
        .writer()
        .add_course(&Course {
            title: "Revit Basics".into(),
            description: "BIM from zero.".into(),
            ..Course::default()
        })
        .await
        .unwrap();

    let education = store.fields(paths::EDUCATION).unwrap();
    assert_eq!(education["weeklyWorkshop"], json!({ "weekTitle": "Revit" }));
    assert_eq!(store.count(paths::COURSES), 1);
}

#[tokio::test]
async fn update_merges_only_supplied_fields() {
    let (store, service) = setup();
    let writer = service.writer();
    let id = writer.add_event(&talk()).await.unwrap();

    writer
        .update_event(
            &id,
            &UpdateEventRequest {
                location: Some("Main Auditorium".into()),
                seats: Some(Some(40)),
                ..UpdateEventRequest::default()
            },
        )
        .await
        .unwrap();

    let stored = store.fields(&format!("{}/{id}", paths::EVENT_ITEMS)).unwrap();
    assert_eq!(stored["location"], "Main Auditorium");
    assert_eq!(stored["seats"], 40);
    assert_eq!(stored["title"], "Adaptive Reuse in Old Basra");
}

#[tokio::test]
async fn update_can_clear_a_seat_limit() {
    let (store, service) = setup();
    let writer = service.writer();
    let id = writer
        .add_event(&Event {
            seats: Some(25),
            ..talk()
        })
        .await
        .unwrap();

    writer
        .update_event(
            &id,
            &UpdateEventRequest {
                seats: Some(None),
                ..UpdateEventRequest::default()
            },
        )
        .await
        .unwrap();

    let stored = store.fields(&format!("{}/{id}", paths::EVENT_ITEMS)).unwrap();
    assert_eq!(stored["seats"], Value::Null);
    assert_eq!(stored["title"], "Adaptive Reuse in Old Basra");
}

#[tokio::test]
async fn update_of_a_missing_record_is_not_found() {
    let (_store, service) = setup();

    let err = service
        .writer()
        .update_event(
            "missing",
            &UpdateEventRequest {
                title: Some("x".into()),
                ..UpdateEventRequest::default()
            },
        )
        .await
        .unwrap_err();

    match err {
        CoreError::NotFound {
            entity_type,
            identifier,
        } => {
            assert_eq!(entity_type, "event");
            assert_eq!(identifier, "missing");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (store, service) = setup();
    let writer = service.writer();
    let id = writer.add_article(&article()).await.unwrap();

    writer.delete_article(&id).await.unwrap();
    writer.delete_article(&id).await.unwrap();
    writer.delete_article("never-existed").await.unwrap();

    assert_eq!(store.count(paths::ARTICLES), 0);
}

#[tokio::test]
async fn fbd_events_live_under_the_fbd_document() {
    let (store, service) = setup();

    let id = service
        .writer()
        .add_fbd_event(&FbdEvent::from(talk()))
        .await
        .unwrap();

    assert!(store.contains(paths::FBD));
    assert!(store.contains(&format!("{}/{id}", paths::FBD_EVENTS)));
    assert_eq!(store.count(paths::EVENT_ITEMS), 0);
}

// ── Singletons ──────────────────────────────────────────────────────

#[tokio::test]
async fn weekly_workshop_keeps_empty_strings() {
    let (store, service) = setup();

    service
        .writer()
        .update_weekly_workshop(&WeeklyWorkshop {
            week_title: "Parametric Design".into(),
            ..WeeklyWorkshop::default()
        })
        .await
        .unwrap();

    let education = store.fields(paths::EDUCATION).unwrap();
    assert_eq!(
        education["weeklyWorkshop"],
        json!({
            "weekTitle": "Parametric Design",
            "lecturerName": "",
            "description": "",
            "workshopUrl": ""
        })
    );
}

#[tokio::test]
async fn fbd_page_fields_are_merged() {
    let (store, service) = setup();
    store.seed(paths::FBD, fields(json!({ "pageTitle": "Old", "about": "" })));

    service
        .writer()
        .update_fbd_page("Foundations by Design", "Thirty days of drawing.")
        .await
        .unwrap();

    let fbd = store.fields(paths::FBD).unwrap();
    assert_eq!(fbd["pageTitle"], "Foundations by Design");
    assert_eq!(fbd["about"], "Thirty days of drawing.");
}

#[tokio::test]
async fn featured_article_must_exist() {
    let (store, service) = setup();
    let writer = service.writer();

    let err = writer.set_featured_article(Some("ghost")).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    assert!(!store.contains(paths::MAGAZINE));

    let id = writer.add_article(&article()).await.unwrap();
    writer.set_featured_article(Some(id.as_str())).await.unwrap();
    assert_eq!(
        store.fields(paths::MAGAZINE).unwrap()["featuredArticleId"],
        Value::String(id.clone())
    );

    let magazine = service.reader().magazine(false).await.unwrap().data;
    assert_eq!(magazine.featured_article.unwrap().id, id);

    writer.set_featured_article(None).await.unwrap();
    assert_eq!(
        store.fields(paths::MAGAZINE).unwrap()["featuredArticleId"],
        Value::Null
    );
}

// ── Admins ──────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_list_lifecycle() {
    let (store, service) = setup();
    let writer = service.writer();

    assert!(writer.get_admins().await.unwrap().is_empty());

    let err = writer.add_admin("not-an-email").await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidEmail { .. }));
    assert_eq!(store.write_count(), 0);

    let admins = writer.add_admin(" Editor@AIAS.org ").await.unwrap();
    assert_eq!(admins, ["editor@aias.org"]);

    let err = writer.add_admin("editor@aias.org").await.unwrap_err();
    assert!(matches!(err, CoreError::DuplicateAdmin { .. }));

    let admins = writer.add_admin("chair@aias.org").await.unwrap();
    assert_eq!(admins, ["editor@aias.org", "chair@aias.org"]);

    let admins = writer.remove_admin("EDITOR@aias.org").await.unwrap();
    assert_eq!(admins, ["chair@aias.org"]);

    let err = writer.remove_admin("editor@aias.org").await.unwrap_err();
    assert!(matches!(err, CoreError::AdminNotFound { .. }));

    assert_eq!(
        store.fields(paths::ADMINS).unwrap()["admins"],
        json!(["chair@aias.org"])
    );
}
