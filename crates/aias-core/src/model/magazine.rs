// ── Magazine domain types ──

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::Record;

/// A magazine article, stored under `content/magazine/articles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub author: String,
    pub date: String,
    pub summary: String,
    pub content: String,
}

/// Stored fields of the `content/magazine` singleton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MagazineDocument {
    /// Id of the article shown first; `None` falls back to the first listed.
    pub featured_article_id: Option<String>,
    /// Printed issue releases, kept as authored.
    pub releases: Vec<Value>,
}

/// The magazine section of the content bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MagazineSection {
    pub featured_article: Option<Record<Article>>,
    pub articles: Vec<Record<Article>>,
    pub releases: Vec<Value>,
}

impl MagazineSection {
    /// Assemble the section, resolving the featured pointer.
    ///
    /// An unset or dangling `featuredArticleId` selects the first article.
    pub fn assemble(document: MagazineDocument, articles: Vec<Record<Article>>) -> Self {
        let featured_article = document
            .featured_article_id
            .as_deref()
            .and_then(|id| articles.iter().find(|a| a.id == id))
            .or_else(|| articles.first())
            .cloned();
        Self {
            featured_article,
            articles,
            releases: document.releases,
        }
    }
}
