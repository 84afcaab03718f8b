// ── Domain model ──
//
// Every stored entity is a plain struct without an id; `Record<T>` pairs
// it with the store-assigned id. Wire names are camelCase, and every
// struct reads leniently: absent fields take their defaults.

pub mod bundle;
pub mod education;
pub mod event;
pub mod library;
pub mod magazine;
pub mod pages;
pub mod record;
pub mod settings;

pub use bundle::{ContentBundle, Section};
pub use education::{Course, EducationDocument, EducationSection, FbdDocument, FbdSection, WeeklyWorkshop};
pub use event::{Event, FbdEvent};
pub use library::LibraryResource;
pub use magazine::{Article, MagazineDocument, MagazineSection};
pub use pages::{AboutSection, HomeSection, Story};
pub use record::Record;
pub use settings::{AdminList, SchemaMarker};
