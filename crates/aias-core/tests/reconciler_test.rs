#![allow(clippy::unwrap_used)]
// Structure reconciler behaviour against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use aias_api::{DocumentStore, Fields, MemoryStore};
use aias_core::schema::paths;
use aias_core::{ContentService, CoreError, ReconcileReport};

// ── Helpers ─────────────────────────────────────────────────────────

fn setup() -> (Arc<MemoryStore>, ContentService<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = ContentService::from_shared(Arc::clone(&store), Duration::from_secs(300));
    (store, service)
}

fn fields(value: Value) -> Fields {
    value.as_object().cloned().unwrap()
}

fn has_action(report: &ReconcileReport, line: &str) -> bool {
    report.actions.iter().any(|a| a == line)
}

// ── Base documents ──────────────────────────────────────────────────

#[tokio::test]
async fn ensure_base_documents_is_idempotent() {
    let (store, service) = setup();
    let reconciler = service.reconciler();

    let first = reconciler.ensure_base_documents().await.unwrap();
    assert_eq!(
        first,
        [
            "created content/events",
            "created content/library",
            "created content/magazine",
            "created content/education",
            "created content/fbd",
        ]
    );
    assert_eq!(store.write_count(), 5);

    store.reset_counters();
    let second = reconciler.ensure_base_documents().await.unwrap();
    assert!(second.iter().all(|line| line.starts_with("validated ")));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn nested_fields_are_backfilled_without_touching_present_ones() {
    let (store, service) = setup();
    store.seed(
        paths::EDUCATION,
        fields(json!({ "weeklyWorkshop": {
            "weekTitle": "Parametric Design",
            "lecturerName": "",
            "description": ""
        }})),
    );

    let actions = service.reconciler().ensure_base_documents().await.unwrap();

    assert!(actions.contains(&"backfilled content/education: weeklyWorkshop.workshopUrl".to_string()));
    assert_eq!(
        store.fields(paths::EDUCATION).unwrap()["weeklyWorkshop"],
        json!({
            "weekTitle": "Parametric Design",
            "lecturerName": "",
            "description": "",
            "workshopUrl": ""
        })
    );
}

#[tokio::test]
async fn base_document_failure_stops_ensure() {
    let (store, service) = setup();
    store.fail_on(paths::MAGAZINE);

    let err = service.reconciler().ensure_base_documents().await.unwrap_err();

    assert_eq!(err.code(), "UNAVAILABLE");
    assert!(store.contains(paths::LIBRARY));
    assert!(!store.contains(paths::EDUCATION));
}

// ── Full pass ───────────────────────────────────────────────────────

#[tokio::test]
async fn healthy_store_is_reported_as_validated() {
    let (_store, service) = setup();
    let reconciler = service.reconciler();
    reconciler.validate_and_fix_structure().await.unwrap();

    let report = reconciler.validate_and_fix_structure().await.unwrap();

    assert!(report.is_clean());
    assert!(has_action(&report, "validated content/home"));
    assert!(has_action(&report, "validated config/admins"));
    assert!(has_action(&report, "schema at version 2"));
    assert!(has_action(&report, "content/events/items: 0 records"));
}

#[tokio::test]
async fn collection_records_are_backfilled() {
    let (store, service) = setup();
    store.seed(
        "content/library/items/l1",
        fields(json!({ "name": "Architects' Data", "type": "book", "description": "Neufert" })),
    );

    let report = service.reconciler().validate_and_fix_structure().await.unwrap();

    assert!(has_action(&report, "content/library/items: 1 records"));
    assert!(has_action(&report, "backfilled 1 records in content/library/items"));
    let stored = store.fields("content/library/items/l1").unwrap();
    assert_eq!(stored["name"], "Architects' Data");
    assert_eq!(stored["tags"], json!([]));
    assert_eq!(stored["link"], "");
}

#[tokio::test]
async fn events_without_a_seat_field_get_an_explicit_null() {
    let (store, service) = setup();
    store.seed(
        "content/events/items/e1",
        fields(json!({
            "title": "Site Visit", "time": "", "location": "", "type": "",
            "image": "", "description": ""
        })),
    );

    let report = service.reconciler().validate_and_fix_structure().await.unwrap();

    assert!(has_action(&report, "backfilled 1 records in content/events/items"));
    let stored = store.fields("content/events/items/e1").unwrap();
    assert_eq!(stored["seats"], Value::Null);
    assert_eq!(stored["title"], "Site Visit");
}

// ── Migration ───────────────────────────────────────────────────────

#[tokio::test]
async fn legacy_collections_are_migrated_by_id() {
    let (store, service) = setup();
    store.seed("events/e1", fields(json!({ "title": "Site Visit" })));
    store.seed("events/e2", fields(json!({ "title": "Studio Crit" })));

    let report = service.reconciler().validate_and_fix_structure().await.unwrap();

    assert!(has_action(
        &report,
        "migrated 2 records from events to content/events/items"
    ));
    assert!(has_action(&report, "recorded schema version 2"));
    assert_eq!(
        store.fields("content/events/items/e1").unwrap()["title"],
        "Site Visit"
    );
    assert_eq!(store.count(paths::EVENT_ITEMS), 2);
    // Legacy data is copied, not moved.
    assert_eq!(store.count(paths::LEGACY_EVENTS), 2);
    assert_eq!(store.fields(paths::SCHEMA).unwrap()["version"], 2);
}

#[tokio::test]
async fn embedded_arrays_are_lifted_into_sub_collections() {
    let (store, service) = setup();
    store.seed(
        paths::EDUCATION,
        fields(json!({ "courses": [
            { "id": "c-7", "title": "Revit Basics" },
            { "title": "History of Iraqi Architecture" }
        ]})),
    );

    let report = service.reconciler().validate_and_fix_structure().await.unwrap();

    assert!(has_action(
        &report,
        "migrated 2 records from content/education.courses to content/education/courses"
    ));
    let first = store.fields("content/education/courses/c-7").unwrap();
    assert_eq!(first["title"], "Revit Basics");
    assert!(!first.contains_key("id"));
    assert_eq!(
        store.fields("content/education/courses/legacy-1").unwrap()["title"],
        "History of Iraqi Architecture"
    );
}

#[tokio::test]
async fn replaying_a_migration_never_duplicates_records() {
    let (store, service) = setup();
    store.seed("events/e1", fields(json!({ "title": "Site Visit" })));
    let reconciler = service.reconciler();
    reconciler.validate_and_fix_structure().await.unwrap();

    // An interrupted run leaves records copied but no marker.
    store.delete(paths::SCHEMA).await.unwrap();
    store.seed("events/e2", fields(json!({ "title": "Studio Crit" })));
    let report = reconciler.validate_and_fix_structure().await.unwrap();

    assert!(has_action(
        &report,
        "migrated 1 records from events to content/events/items"
    ));
    assert_eq!(store.count(paths::EVENT_ITEMS), 2);

    let report = reconciler.validate_and_fix_structure().await.unwrap();
    assert!(has_action(&report, "schema at version 2"));
    assert_eq!(store.count(paths::EVENT_ITEMS), 2);
}

#[tokio::test]
async fn legacy_records_never_land_in_a_live_destination() {
    let (store, service) = setup();
    store.seed("content/events/items/live1", fields(json!({ "title": "Open Studio" })));
    store.seed("events/old1", fields(json!({ "title": "Deleted Talk" })));
    store.seed("events/old2", fields(json!({ "title": "Deleted Tour" })));

    let report = service.reconciler().validate_and_fix_structure().await.unwrap();

    assert!(has_action(
        &report,
        "skipped events: content/events/items not empty"
    ));
    assert!(!report
        .actions
        .iter()
        .any(|a| a.starts_with("migrated ") && a.contains("content/events/items")));
    assert_eq!(store.count(paths::EVENT_ITEMS), 1);
    assert!(!store.contains("content/events/items/old1"));
    // A skipped step is not an error, so the marker is still recorded.
    assert!(has_action(&report, "recorded schema version 2"));
}

#[tokio::test]
async fn embedded_arrays_are_not_lifted_over_live_records() {
    let (store, service) = setup();
    store.seed(
        "content/education/courses/current",
        fields(json!({ "title": "BIM Workflows" })),
    );
    store.seed(
        paths::EDUCATION,
        fields(json!({ "courses": [{ "id": "old", "title": "Retired Course" }] })),
    );

    let report = service.reconciler().validate_and_fix_structure().await.unwrap();

    assert!(has_action(
        &report,
        "skipped content/education.courses: content/education/courses not empty"
    ));
    assert!(!store.contains("content/education/courses/old"));
}

#[tokio::test]
async fn failed_migration_step_leaves_the_marker_unwritten() {
    let (store, service) = setup();
    store.seed("events/e1", fields(json!({ "title": "Site Visit" })));
    store.fail_on("content/events/items/e1");

    let err = service
        .reconciler()
        .validate_and_fix_structure()
        .await
        .unwrap_err();

    let CoreError::ReconcileFailed { report } = err else {
        panic!("expected ReconcileFailed, got {err:?}");
    };
    assert!(report.errors[0].starts_with("content/events/items/e1: "));
    assert!(!store.contains(paths::SCHEMA));
}

// ── Partial failure ─────────────────────────────────────────────────

#[tokio::test]
async fn item_failures_are_collected_while_the_pass_continues() {
    let (store, service) = setup();
    store.fail_on(paths::FBD);

    let err = service
        .reconciler()
        .validate_and_fix_structure()
        .await
        .unwrap_err();

    let CoreError::ReconcileFailed { report } = err else {
        panic!("expected ReconcileFailed, got {err:?}");
    };
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("content/fbd: "));
    assert!(has_action(&report, "created content/home"));
    assert!(has_action(&report, "created config/admins"));
    assert!(store.contains(paths::ABOUT));
}
