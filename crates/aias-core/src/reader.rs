// ── Content reader ──
//
// Assembles the content bundle from one round of concurrent store reads,
// substitutes typed defaults for absent singleton documents, and serves
// the result from the shared cache for the freshness window. Any failed
// read fails the whole fetch; the per-section report says which. A stored
// document that does not decode is skipped and listed in the report.

use std::collections::BTreeMap;
use std::sync::Arc;

use aias_api::{Document, DocumentStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::ContentCache;
use crate::error::CoreError;
use crate::model::{
    AboutSection, Article, ContentBundle, Course, EducationDocument, EducationSection, Event,
    FbdDocument, FbdEvent, FbdSection, HomeSection, LibraryResource, MagazineDocument,
    MagazineSection, Record, Section,
};
use crate::schema::{from_fields, paths};

// ── Fetch report ─────────────────────────────────────────────────────

/// What happened to one section during a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "camelCase")]
pub enum SectionOutcome {
    /// Every read for the section returned data.
    Present,
    /// A singleton document was absent or unreadable and its default was
    /// used.
    Defaulted,
    /// A read failed.
    Failed(String),
}

impl SectionOutcome {
    fn rank(&self) -> u8 {
        match self {
            Self::Present => 0,
            Self::Defaulted => 1,
            Self::Failed(_) => 2,
        }
    }
}

/// A stored document left out of the bundle because it did not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub section: Section,
    pub path: String,
    pub reason: String,
}

/// Outcome of every section of one fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchReport {
    outcomes: BTreeMap<Section, SectionOutcome>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<SkippedRecord>,
}

impl FetchReport {
    pub fn outcome(&self, section: Section) -> Option<&SectionOutcome> {
        self.outcomes.get(&section)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &SectionOutcome)> {
        self.outcomes.iter().map(|(section, outcome)| (*section, outcome))
    }

    /// Sections that fell back to their defaults.
    pub fn defaulted(&self) -> Vec<Section> {
        self.sections_where(|o| matches!(o, SectionOutcome::Defaulted))
    }

    /// Sections whose reads failed, in bundle order.
    pub fn failed(&self) -> Vec<Section> {
        self.sections_where(|o| matches!(o, SectionOutcome::Failed(_)))
    }

    pub fn is_complete(&self) -> bool {
        self.failed().is_empty()
    }

    /// Documents that were present but could not be decoded.
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    fn sections_where(&self, pred: impl Fn(&SectionOutcome) -> bool) -> Vec<Section> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| pred(outcome))
            .map(|(section, _)| *section)
            .collect()
    }

    /// Record an outcome; a worse outcome replaces a better one.
    fn note(&mut self, section: Section, outcome: SectionOutcome) {
        match self.outcomes.get(&section) {
            Some(existing) if existing.rank() >= outcome.rank() => {}
            _ => {
                self.outcomes.insert(section, outcome);
            }
        }
    }
}

// ── Results ──────────────────────────────────────────────────────────

/// A fetched bundle.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub bundle: Arc<ContentBundle>,
    pub from_cache: bool,
    pub report: Arc<FetchReport>,
}

/// One projected section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Served<T> {
    pub data: T,
    pub from_cache: bool,
}

// ── Assembly ─────────────────────────────────────────────────────────

type Read<T> = Result<T, aias_api::Error>;

/// Collects section outcomes while decoding read results.
#[derive(Default)]
struct Assembly {
    report: FetchReport,
    failures: Vec<(Section, CoreError)>,
}

impl Assembly {
    fn fail(&mut self, section: Section, path: &str, err: CoreError) {
        warn!(%section, path, error = %err, "content read failed");
        self.report
            .note(section, SectionOutcome::Failed(err.to_string()));
        self.failures.push((section, err));
    }

    fn skip(&mut self, section: Section, path: String, err: &CoreError) {
        warn!(%section, %path, error = %err, "skipping undecodable document");
        self.report.skipped.push(SkippedRecord {
            section,
            path,
            reason: err.to_string(),
        });
    }

    fn document<T: DeserializeOwned + Default>(
        &mut self,
        section: Section,
        path: &str,
        read: Read<Option<Document>>,
    ) -> T {
        match read {
            Ok(Some(doc)) => match from_fields(path, doc.fields) {
                Ok(value) => {
                    self.report.note(section, SectionOutcome::Present);
                    value
                }
                Err(err) => {
                    self.skip(section, path.to_owned(), &err);
                    self.report.note(section, SectionOutcome::Defaulted);
                    T::default()
                }
            },
            Ok(None) => {
                debug!(%section, path, "document absent, using defaults");
                self.report.note(section, SectionOutcome::Defaulted);
                T::default()
            }
            Err(err) => {
                self.fail(section, path, err.into());
                T::default()
            }
        }
    }

    fn collection<T: DeserializeOwned>(
        &mut self,
        section: Section,
        path: &str,
        read: Read<Vec<Document>>,
    ) -> Vec<Record<T>> {
        let docs = match read {
            Ok(docs) => docs,
            Err(err) => {
                self.fail(section, path, err.into());
                return Vec::new();
            }
        };
        let mut records = Vec::with_capacity(docs.len());
        for doc in docs {
            let record_path = format!("{path}/{}", doc.id);
            match Record::from_document(doc) {
                Ok(record) => records.push(record),
                Err(err) => self.skip(section, record_path, &err),
            }
        }
        self.report.note(section, SectionOutcome::Present);
        records
    }

    /// The first failure in bundle order, with the finished report.
    fn finish(mut self) -> Result<FetchReport, CoreError> {
        self.failures.sort_by_key(|(section, _)| *section);
        match self.failures.into_iter().next() {
            None => Ok(self.report),
            Some((section, source)) => Err(CoreError::ContentUnavailable {
                section,
                report: self.report,
                source: Box::new(source),
            }),
        }
    }
}

// ── ContentReader ────────────────────────────────────────────────────

/// Reads the content bundle through the shared cache.
pub struct ContentReader<S> {
    store: Arc<S>,
    cache: Arc<ContentCache>,
}

impl<S> Clone for ContentReader<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S: DocumentStore> ContentReader<S> {
    pub fn new(store: Arc<S>, cache: Arc<ContentCache>) -> Self {
        Self { store, cache }
    }

    /// Fetch the whole bundle.
    ///
    /// Served from cache when a fetch succeeded within the freshness
    /// window and `force_refresh` is false. Otherwise every section is
    /// read concurrently; on success the cache is replaced.
    pub async fn fetch(&self, force_refresh: bool) -> Result<Fetched, CoreError> {
        if force_refresh {
            debug!("forced refresh, bypassing content cache");
        } else if let Some(snapshot) = self.cache.fresh() {
            debug!("serving content from cache");
            return Ok(Fetched {
                bundle: Arc::clone(&snapshot.bundle),
                from_cache: true,
                report: Arc::clone(&snapshot.report),
            });
        }

        let store = self.store.as_ref();
        let (
            home,
            about,
            events,
            library,
            magazine_doc,
            articles,
            education_doc,
            courses,
            fbd_doc,
            fbd_events,
        ) = tokio::join!(
            store.get(paths::HOME),
            store.get(paths::ABOUT),
            store.list(paths::EVENT_ITEMS),
            store.list(paths::LIBRARY_ITEMS),
            store.get(paths::MAGAZINE),
            store.list(paths::ARTICLES),
            store.get(paths::EDUCATION),
            store.list(paths::COURSES),
            store.get(paths::FBD),
            store.list(paths::FBD_EVENTS),
        );

        let mut asm = Assembly::default();
        let home: HomeSection = asm.document(Section::Home, paths::HOME, home);
        let about: AboutSection = asm.document(Section::About, paths::ABOUT, about);
        let events: Vec<Record<Event>> =
            asm.collection(Section::Events, paths::EVENT_ITEMS, events);
        let library: Vec<Record<LibraryResource>> =
            asm.collection(Section::Library, paths::LIBRARY_ITEMS, library);

        let magazine_doc: MagazineDocument =
            asm.document(Section::Magazine, paths::MAGAZINE, magazine_doc);
        let articles: Vec<Record<Article>> =
            asm.collection(Section::Magazine, paths::ARTICLES, articles);

        let education_doc: EducationDocument =
            asm.document(Section::Education, paths::EDUCATION, education_doc);
        let courses: Vec<Record<Course>> =
            asm.collection(Section::Education, paths::COURSES, courses);
        let fbd_doc: FbdDocument = asm.document(Section::Education, paths::FBD, fbd_doc);
        let fbd_events: Vec<Record<FbdEvent>> =
            asm.collection(Section::Education, paths::FBD_EVENTS, fbd_events);

        let report = asm.finish()?;
        let defaulted = report.defaulted();
        if !defaulted.is_empty() {
            warn!(?defaulted, "some sections fell back to defaults");
        }

        let bundle = Arc::new(ContentBundle {
            home,
            events,
            library,
            magazine: MagazineSection::assemble(magazine_doc, articles),
            education: EducationSection {
                weekly_workshop: education_doc.weekly_workshop,
                courses,
                fbd: FbdSection::assemble(fbd_doc, fbd_events),
            },
            about,
        });
        let report = Arc::new(report);
        self.cache.store(Arc::clone(&bundle), Arc::clone(&report));

        info!(
            events = bundle.events.len(),
            library = bundle.library.len(),
            articles = bundle.magazine.articles.len(),
            courses = bundle.education.courses.len(),
            "content fetched"
        );
        Ok(Fetched {
            bundle,
            from_cache: false,
            report,
        })
    }

    async fn project<T>(
        &self,
        force_refresh: bool,
        select: impl FnOnce(&ContentBundle) -> T,
    ) -> Result<Served<T>, CoreError> {
        let fetched = self.fetch(force_refresh).await?;
        Ok(Served {
            data: select(&fetched.bundle),
            from_cache: fetched.from_cache,
        })
    }

    // ── Section accessors ────────────────────────────────────────────

    pub async fn home(&self, force_refresh: bool) -> Result<Served<HomeSection>, CoreError> {
        self.project(force_refresh, |b| b.home.clone()).await
    }

    pub async fn events(
        &self,
        force_refresh: bool,
    ) -> Result<Served<Vec<Record<Event>>>, CoreError> {
        self.project(force_refresh, |b| b.events.clone()).await
    }

    pub async fn library(
        &self,
        force_refresh: bool,
    ) -> Result<Served<Vec<Record<LibraryResource>>>, CoreError> {
        self.project(force_refresh, |b| b.library.clone()).await
    }

    pub async fn magazine(&self, force_refresh: bool) -> Result<Served<MagazineSection>, CoreError> {
        self.project(force_refresh, |b| b.magazine.clone()).await
    }

    pub async fn education(
        &self,
        force_refresh: bool,
    ) -> Result<Served<EducationSection>, CoreError> {
        self.project(force_refresh, |b| b.education.clone()).await
    }

    pub async fn about(&self, force_refresh: bool) -> Result<Served<AboutSection>, CoreError> {
        self.project(force_refresh, |b| b.about.clone()).await
    }

    /// Drop the cached bundle so the next fetch reads the store.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
