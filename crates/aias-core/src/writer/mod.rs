// ── Content writer ──
//
// Create / update / delete for every entity type, plus the singleton
// documents edited from the admin dashboard. Required fields are checked
// before any store call. Every successful write clears the shared content
// cache so the next page load sees it.

pub mod admins;
pub mod requests;

use std::sync::Arc;

use aias_api::{DocumentStore, Fields};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::cache::ContentCache;
use crate::error::CoreError;
use crate::model::{
    AboutSection, Article, Course, Event, FbdEvent, HomeSection, LibraryResource, WeeklyWorkshop,
};
use crate::schema::{self, Entity, paths};

use self::requests::{
    UpdateArticleRequest, UpdateCourseRequest, UpdateEventRequest, UpdateLibraryResourceRequest,
};

/// Writes content through a document store.
pub struct ContentWriter<S> {
    store: Arc<S>,
    cache: Arc<ContentCache>,
}

impl<S> Clone for ContentWriter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S: DocumentStore> ContentWriter<S> {
    pub fn new(store: Arc<S>, cache: Arc<ContentCache>) -> Self {
        Self { store, cache }
    }

    // ── Generic record operations ────────────────────────────────────

    /// Validate, make sure the parent singleton exists, then insert.
    async fn add_record<T: Entity>(&self, item: &T) -> Result<String, CoreError> {
        let missing = item.missing_fields();
        if !missing.is_empty() {
            debug!(kind = T::KIND, ?missing, "rejected record before writing");
            return Err(CoreError::ValidationFailed {
                entity: T::KIND,
                fields: missing,
            });
        }
        let fields = schema::to_fields(item)?;

        self.ensure_document(T::PARENT.path, T::PARENT.default_fields())
            .await?;
        let id = self.store.add(T::COLLECTION, fields).await?;

        self.cache.clear();
        info!(kind = T::KIND, %id, "record added");
        Ok(id)
    }

    /// Merge the supplied fields onto an existing record.
    async fn update_record<T: Entity, P: Serialize>(
        &self,
        id: &str,
        patch: &P,
    ) -> Result<(), CoreError> {
        let path = record_path::<T>(id)?;
        let fields = schema::to_fields(patch)?;

        match self.store.update(&path, fields).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => return Err(not_found::<T>(id)),
            Err(e) => return Err(e.into()),
        }

        self.cache.clear();
        info!(kind = T::KIND, id, "record updated");
        Ok(())
    }

    /// Delete a record. Deleting an absent record succeeds.
    async fn delete_record<T: Entity>(&self, id: &str) -> Result<(), CoreError> {
        let path = record_path::<T>(id)?;
        match self.store.delete(&path).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => debug!(kind = T::KIND, id, "record already absent"),
            Err(e) => return Err(e.into()),
        }

        self.cache.clear();
        info!(kind = T::KIND, id, "record deleted");
        Ok(())
    }

    /// Create `path` with `defaults` unless it already exists.
    async fn ensure_document(&self, path: &str, defaults: Fields) -> Result<(), CoreError> {
        if self.store.create(path, defaults).await? {
            debug!(path, "created missing parent document");
        }
        Ok(())
    }

    // ── Events ───────────────────────────────────────────────────────

    pub async fn add_event(&self, event: &Event) -> Result<String, CoreError> {
        self.add_record(event).await
    }

    pub async fn update_event(&self, id: &str, patch: &UpdateEventRequest) -> Result<(), CoreError> {
        self.update_record::<Event, _>(id, patch).await
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), CoreError> {
        self.delete_record::<Event>(id).await
    }

    // ── Library ──────────────────────────────────────────────────────

    pub async fn add_library_resource(&self, resource: &LibraryResource) -> Result<String, CoreError> {
        self.add_record(resource).await
    }

    pub async fn update_library_resource(
        &self,
        id: &str,
        patch: &UpdateLibraryResourceRequest,
    ) -> Result<(), CoreError> {
        self.update_record::<LibraryResource, _>(id, patch).await
    }

    pub async fn delete_library_resource(&self, id: &str) -> Result<(), CoreError> {
        self.delete_record::<LibraryResource>(id).await
    }

    // ── Magazine ─────────────────────────────────────────────────────

    pub async fn add_article(&self, article: &Article) -> Result<String, CoreError> {
        self.add_record(article).await
    }

    pub async fn update_article(
        &self,
        id: &str,
        patch: &UpdateArticleRequest,
    ) -> Result<(), CoreError> {
        self.update_record::<Article, _>(id, patch).await
    }

    pub async fn delete_article(&self, id: &str) -> Result<(), CoreError> {
        self.delete_record::<Article>(id).await
    }

    /// Point the magazine at a featured article, or clear the pointer.
    pub async fn set_featured_article(&self, id: Option<&str>) -> Result<(), CoreError> {
        if let Some(id) = id {
            let path = record_path::<Article>(id)?;
            if self.store.get(&path).await?.is_none() {
                return Err(not_found::<Article>(id));
            }
        }

        self.ensure_document(paths::MAGAZINE, schema::MAGAZINE_DOC.default_fields())
            .await?;
        let patch = single_field("featuredArticleId", id.map_or(Value::Null, Value::from));
        self.store.update(paths::MAGAZINE, patch).await?;

        self.cache.clear();
        info!(featured = ?id, "featured article set");
        Ok(())
    }

    // ── Education ────────────────────────────────────────────────────

    pub async fn add_course(&self, course: &Course) -> Result<String, CoreError> {
        self.add_record(course).await
    }

    pub async fn update_course(&self, id: &str, patch: &UpdateCourseRequest) -> Result<(), CoreError> {
        self.update_record::<Course, _>(id, patch).await
    }

    pub async fn delete_course(&self, id: &str) -> Result<(), CoreError> {
        self.delete_record::<Course>(id).await
    }

    /// Replace the weekly workshop block wholesale. Empty strings are kept.
    pub async fn update_weekly_workshop(&self, workshop: &WeeklyWorkshop) -> Result<(), CoreError> {
        self.ensure_document(paths::EDUCATION, schema::EDUCATION_DOC.default_fields())
            .await?;
        let patch = single_field("weeklyWorkshop", serde_json::to_value(workshop)?);
        self.store.update(paths::EDUCATION, patch).await?;

        self.cache.clear();
        info!("weekly workshop updated");
        Ok(())
    }

    // ── FBD ──────────────────────────────────────────────────────────

    pub async fn add_fbd_event(&self, event: &FbdEvent) -> Result<String, CoreError> {
        self.add_record(event).await
    }

    pub async fn update_fbd_event(
        &self,
        id: &str,
        patch: &UpdateEventRequest,
    ) -> Result<(), CoreError> {
        self.update_record::<FbdEvent, _>(id, patch).await
    }

    pub async fn delete_fbd_event(&self, id: &str) -> Result<(), CoreError> {
        self.delete_record::<FbdEvent>(id).await
    }

    /// Merge the FBD page title and introduction onto `content/fbd`.
    pub async fn update_fbd_page(&self, page_title: &str, about: &str) -> Result<(), CoreError> {
        self.ensure_document(paths::FBD, schema::FBD_DOC.default_fields())
            .await?;
        let patch = json!({ "pageTitle": page_title, "about": about });
        self.store
            .update(paths::FBD, schema::to_fields(&patch)?)
            .await?;

        self.cache.clear();
        info!("fbd page updated");
        Ok(())
    }

    // ── Pages ────────────────────────────────────────────────────────

    /// Replace the landing page document.
    pub async fn update_home(&self, home: &HomeSection) -> Result<(), CoreError> {
        self.store
            .set(paths::HOME, schema::to_fields(home)?)
            .await?;
        self.cache.clear();
        info!("home page updated");
        Ok(())
    }

    /// Replace the about page document.
    pub async fn update_about(&self, about: &AboutSection) -> Result<(), CoreError> {
        self.store
            .set(paths::ABOUT, schema::to_fields(about)?)
            .await?;
        self.cache.clear();
        info!("about page updated");
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Path of record `id` in `T`'s collection. Ids that would address
/// another location cannot name an existing record.
fn record_path<T: Entity>(id: &str) -> Result<String, CoreError> {
    if id.trim().is_empty() || id.contains('/') || matches!(id, "." | "..") {
        return Err(not_found::<T>(id));
    }
    Ok(format!("{}/{id}", T::COLLECTION))
}

fn not_found<T: Entity>(id: &str) -> CoreError {
    CoreError::NotFound {
        entity_type: T::KIND.into(),
        identifier: id.into(),
    }
}

fn single_field(key: &str, value: Value) -> Fields {
    let mut fields = Fields::new();
    fields.insert(key.to_owned(), value);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_paths_live_in_the_entity_collection() {
        assert_eq!(
            record_path::<Course>("c1").ok().as_deref(),
            Some("content/education/courses/c1")
        );
        assert_eq!(
            record_path::<FbdEvent>("f1").ok().as_deref(),
            Some("content/fbd/events/f1")
        );
    }

    #[test]
    fn ids_that_escape_the_collection_are_not_found() {
        for id in ["", "  ", "a/b", "../x", ".", ".."] {
            assert!(
                matches!(record_path::<Event>(id), Err(CoreError::NotFound { .. })),
                "{id:?} should be rejected"
            );
        }
    }
}
