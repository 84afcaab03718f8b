use serde::{Deserialize, Serialize};

/// A library resource: book, paper, dataset, or external link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LibraryResource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tags: Vec<String>,
    pub image: String,
    pub description: String,
    pub link: String,
}
