// ── Structure reconciler ──
//
// Compares the live store with the layout described in `schema` and
// repairs drift: missing singletons are created, missing fields are
// backfilled, and data still sitting in version 1 locations is copied
// into the current sub-collections. Per-item errors are collected; the
// pass keeps going and reports everything it did.

use std::sync::Arc;

use aias_api::DocumentStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::ContentCache;
use crate::error::CoreError;
use crate::model::SchemaMarker;
use crate::schema::migrate::{self, LegacyRecord, LegacySource, MigrationStep, SCHEMA_VERSION};
use crate::schema::{
    BASE_DOCUMENTS, COLLECTIONS, CollectionSpec, DOCUMENTS, DocumentSpec, backfill, from_fields,
    paths, to_fields,
};

/// What a reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// One line per action taken or check passed.
    pub actions: Vec<String>,
    /// One line per failed item.
    pub errors: Vec<String>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, location: &str, err: impl Into<CoreError>) {
        let err = err.into();
        warn!(location, error = %err, "reconcile step failed");
        self.errors.push(format!("{location}: {err}"));
    }
}

/// Outcome of reconciling one singleton document.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DocumentAction {
    Created,
    Backfilled(Vec<String>),
    Validated,
}

impl DocumentAction {
    fn describe(&self, path: &str) -> String {
        match self {
            Self::Created => format!("created {path}"),
            Self::Backfilled(fields) => format!("backfilled {path}: {}", fields.join(", ")),
            Self::Validated => format!("validated {path}"),
        }
    }
}

/// Heals structural drift in the store.
pub struct StructureReconciler<S> {
    store: Arc<S>,
    cache: Arc<ContentCache>,
}

impl<S> Clone for StructureReconciler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S: DocumentStore> StructureReconciler<S> {
    pub fn new(store: Arc<S>, cache: Arc<ContentCache>) -> Self {
        Self { store, cache }
    }

    /// Create or backfill the five parent singletons.
    ///
    /// Returns one action line per document. A second call on a healthy
    /// store writes nothing and reports only `validated` lines.
    pub async fn ensure_base_documents(&self) -> Result<Vec<String>, CoreError> {
        let mut actions = Vec::with_capacity(BASE_DOCUMENTS.len());
        for spec in &BASE_DOCUMENTS {
            let action = self.reconcile_document(spec).await?;
            actions.push(action.describe(spec.path));
        }
        Ok(actions)
    }

    /// Full pass: singletons, schema migrations, then sub-collections.
    ///
    /// Fails with [`CoreError::ReconcileFailed`] when any item failed; the
    /// carried report still lists every successful action.
    pub async fn validate_and_fix_structure(&self) -> Result<ReconcileReport, CoreError> {
        let mut report = ReconcileReport::default();

        for spec in &DOCUMENTS {
            match self.reconcile_document(spec).await {
                Ok(action) => report.actions.push(action.describe(spec.path)),
                Err(err) => report.error(spec.path, err),
            }
        }

        self.migrate(&mut report).await;

        for spec in &COLLECTIONS {
            self.reconcile_collection(spec, &mut report).await;
        }

        if report.is_clean() {
            info!(actions = report.actions.len(), "structure reconciled");
            Ok(report)
        } else {
            warn!(
                actions = report.actions.len(),
                errors = report.errors.len(),
                "structure reconciled with errors"
            );
            Err(CoreError::ReconcileFailed { report })
        }
    }

    // ── Singletons ───────────────────────────────────────────────────

    async fn reconcile_document(&self, spec: &DocumentSpec) -> Result<DocumentAction, CoreError> {
        let shape = spec.default_fields();
        let Some(doc) = self.store.get(spec.path).await? else {
            if self.store.create(spec.path, shape).await? {
                self.cache.clear();
                info!(path = spec.path, "created missing document");
                return Ok(DocumentAction::Created);
            }
            // Created concurrently between the read and the create.
            return Ok(DocumentAction::Validated);
        };

        let fill = backfill(&doc.fields, &shape);
        if fill.is_empty() {
            debug!(path = spec.path, "document validated");
            return Ok(DocumentAction::Validated);
        }

        self.store.update(spec.path, fill.patch).await?;
        self.cache.clear();
        info!(path = spec.path, fields = ?fill.added, "backfilled document");
        Ok(DocumentAction::Backfilled(fill.added))
    }

    // ── Sub-collections ──────────────────────────────────────────────

    async fn reconcile_collection(&self, spec: &CollectionSpec, report: &mut ReconcileReport) {
        let docs = match self.store.list(spec.path).await {
            Ok(docs) => docs,
            Err(err) => return report.error(spec.path, err),
        };
        report
            .actions
            .push(format!("{}: {} records", spec.path, docs.len()));

        let shape = spec.default_fields();
        let mut backfilled = 0usize;
        for doc in docs {
            let fill = backfill(&doc.fields, &shape);
            if fill.is_empty() {
                continue;
            }
            let path = format!("{}/{}", spec.path, doc.id);
            match self.store.update(&path, fill.patch).await {
                Ok(()) => {
                    debug!(%path, kind = spec.kind, fields = ?fill.added, "backfilled record");
                    backfilled += 1;
                }
                Err(err) => report.error(&path, err),
            }
        }

        if backfilled > 0 {
            self.cache.clear();
            report
                .actions
                .push(format!("backfilled {backfilled} records in {}", spec.path));
        }
    }

    // ── Migrations ───────────────────────────────────────────────────

    /// Bring the store to [`SCHEMA_VERSION`] and record the marker.
    ///
    /// The marker is written only when every step succeeded, so a failed
    /// run is retried by the next pass.
    async fn migrate(&self, report: &mut ReconcileReport) {
        let version = match self.store.get(paths::SCHEMA).await {
            Ok(Some(doc)) => match from_fields::<SchemaMarker>(paths::SCHEMA, doc.fields) {
                Ok(marker) => marker.version,
                Err(err) => return report.error(paths::SCHEMA, err),
            },
            Ok(None) => 1,
            Err(err) => return report.error(paths::SCHEMA, err),
        };

        let steps = migrate::steps_from(version);
        if steps.is_empty() {
            if version > SCHEMA_VERSION {
                warn!(version, known = SCHEMA_VERSION, "store schema is newer than this build");
            }
            report
                .actions
                .push(format!("schema at version {version}"));
            return;
        }

        let errors_before = report.errors.len();
        for step in steps {
            self.run_step(step, report).await;
        }
        if report.errors.len() > errors_before {
            warn!(from = version, "migration incomplete, marker not written");
            return;
        }

        let marker = SchemaMarker {
            version: SCHEMA_VERSION,
            migrated_at: Utc::now().to_rfc3339(),
        };
        let written = match to_fields(&marker) {
            Ok(fields) => self.store.set(paths::SCHEMA, fields).await.map_err(CoreError::from),
            Err(err) => Err(err),
        };
        match written {
            Ok(()) => {
                info!(from = version, to = SCHEMA_VERSION, "schema migrated");
                report
                    .actions
                    .push(format!("recorded schema version {SCHEMA_VERSION}"));
            }
            Err(err) => report.error(paths::SCHEMA, err),
        }
    }

    async fn run_step(&self, step: &MigrationStep, report: &mut ReconcileReport) {
        let Some(records) = self.legacy_records(step.source, report).await else {
            return;
        };
        if records.is_empty() {
            debug!(source = %step.source, "nothing to migrate");
            return;
        }

        // A destination holding anything but earlier copies of these
        // records is live data and must not be mixed with legacy content.
        let existing = match self.store.list(step.destination).await {
            Ok(docs) => docs,
            Err(err) => return report.error(step.destination, err),
        };
        let live = existing
            .iter()
            .filter(|doc| !records.iter().any(|record| record.id == doc.id))
            .count();
        if live > 0 {
            info!(source = %step.source, destination = step.destination, live, "destination not empty, migration skipped");
            report.actions.push(format!(
                "skipped {}: {} not empty",
                step.source, step.destination
            ));
            return;
        }

        let mut migrated = 0usize;
        for record in records {
            let path = format!("{}/{}", step.destination, record.id);
            match self.store.create(&path, record.fields).await {
                Ok(true) => migrated += 1,
                Ok(false) => debug!(%path, "already migrated"),
                Err(err) => report.error(&path, err),
            }
        }

        if migrated > 0 {
            self.cache.clear();
        }
        info!(source = %step.source, destination = step.destination, migrated, "migration step done");
        report.actions.push(format!(
            "migrated {migrated} records from {} to {}",
            step.source, step.destination
        ));
    }

    /// Read the records of a legacy location. `None` when the read failed.
    async fn legacy_records(
        &self,
        source: LegacySource,
        report: &mut ReconcileReport,
    ) -> Option<Vec<LegacyRecord>> {
        match source {
            LegacySource::Collection(path) => match self.store.list(path).await {
                Ok(docs) => Some(docs.into_iter().map(LegacyRecord::from).collect()),
                Err(err) => {
                    report.error(path, err);
                    None
                }
            },
            LegacySource::EmbeddedArray { document, field } => {
                let doc = match self.store.get(document).await {
                    Ok(Some(doc)) => doc,
                    Ok(None) => return Some(Vec::new()),
                    Err(err) => {
                        report.error(document, err);
                        return None;
                    }
                };
                match doc.fields.get(field) {
                    None | Some(Value::Null) => Some(Vec::new()),
                    Some(Value::Array(entries)) => {
                        let (records, rejected) = migrate::embedded_records(entries);
                        for index in rejected {
                            report.error(
                                &format!("{source}[{index}]"),
                                CoreError::Decode {
                                    message: "legacy entry is not an object".into(),
                                },
                            );
                        }
                        Some(records)
                    }
                    Some(_) => {
                        report.error(
                            &source.to_string(),
                            CoreError::Decode {
                                message: "legacy field is not an array".into(),
                            },
                        );
                        None
                    }
                }
            }
        }
    }
}
