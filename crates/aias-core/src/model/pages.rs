// Free-form page documents (`content/home`, `content/about`).
//
// These pages are authored as loose JSON; only the keys the site
// relies on are typed, the rest round-trip through `extra`.

use aias_api::Fields;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The landing page. Default: `{hero: {}, mission: {}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeSection {
    pub hero: Fields,
    pub mission: Fields,
    #[serde(flatten)]
    pub extra: Fields,
}

/// The chapter's story block on the about page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Story {
    pub paragraphs: Vec<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// The about page.
/// Default: `{story: {paragraphs: []}, values: [], founders: [], team: []}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutSection {
    pub story: Story,
    pub values: Vec<Value>,
    pub founders: Vec<Value>,
    pub team: Vec<Value>,
    #[serde(flatten)]
    pub extra: Fields,
}
