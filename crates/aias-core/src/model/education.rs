// ── Education domain types ──

use serde::{Deserialize, Serialize};

use super::event::FbdEvent;
use super::record::Record;

/// A course, stored under `content/education/courses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Course {
    pub title: String,
    pub description: String,
    pub lecturer: String,
    pub link: String,
}

/// The weekly workshop announcement. Empty strings are valid values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeeklyWorkshop {
    pub week_title: String,
    pub lecturer_name: String,
    pub description: String,
    pub workshop_url: String,
}

/// Stored fields of the `content/education` singleton.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationDocument {
    pub weekly_workshop: WeeklyWorkshop,
}

/// Stored fields of the `content/fbd` singleton.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FbdDocument {
    pub page_title: String,
    pub about: String,
}

/// The FBD programme page inside the education section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FbdSection {
    pub page_title: String,
    pub about: String,
    pub events: Vec<Record<FbdEvent>>,
}

impl FbdSection {
    pub fn assemble(document: FbdDocument, events: Vec<Record<FbdEvent>>) -> Self {
        Self {
            page_title: document.page_title,
            about: document.about,
            events,
        }
    }
}

/// The education section of the content bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationSection {
    pub weekly_workshop: WeeklyWorkshop,
    pub courses: Vec<Record<Course>>,
    pub fbd: FbdSection,
}
