use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::education::EducationSection;
use super::event::Event;
use super::library::LibraryResource;
use super::magazine::MagazineSection;
use super::pages::{AboutSection, HomeSection};
use super::record::Record;

/// One named slice of the content bundle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Section {
    Home,
    Events,
    Library,
    Magazine,
    Education,
    About,
}

/// Everything a page needs, assembled from one round of store reads.
///
/// Every section has a typed default, so a bundle read from an empty
/// store still carries every key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentBundle {
    pub home: HomeSection,
    pub events: Vec<Record<Event>>,
    pub library: Vec<Record<LibraryResource>>,
    pub magazine: MagazineSection,
    pub education: EducationSection,
    pub about: AboutSection,
}
