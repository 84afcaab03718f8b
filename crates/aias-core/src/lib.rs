// aias-core: Content layer between aias-api and page renderers / admin tooling.

pub mod cache;
pub mod config;
pub mod dates;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod model;
pub mod reader;
pub mod reconciler;
pub mod schema;
pub mod search;
pub mod service;
pub mod writer;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::ContentCache;
pub use config::{StoreConfig, StoreCredentials, TlsVerification};
pub use envelope::Envelope;
pub use error::CoreError;
pub use filter::{Category, CategoryTables, Facets, FilterCriteria, SortOrder, filter_and_sort};
pub use reader::{ContentReader, FetchReport, Fetched, SectionOutcome, Served, SkippedRecord};
pub use reconciler::{ReconcileReport, StructureReconciler};
pub use service::ContentService;
pub use writer::ContentWriter;
pub use writer::requests::*;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Sections
    AboutSection, ContentBundle, EducationSection, FbdSection, HomeSection, MagazineSection,
    Section,
    // Entities
    Article, Course, Event, FbdEvent, LibraryResource, Record, WeeklyWorkshop,
    // Configuration documents
    AdminList, SchemaMarker,
};
