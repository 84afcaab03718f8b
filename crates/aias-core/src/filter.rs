// ── Listing filters and sort orders ──
//
// Faceted filtering (category and any-of tags) and the sort orders the
// listing pages offer, over the typed records of a fetched bundle. The
// category tables carry the en/ar labels the filter panels display.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::dates::{self, Language};
use crate::model::{Article, Course, Event, FbdEvent, LibraryResource, Record};

// ── Categories ───────────────────────────────────────────────────────

/// One selectable category with its display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Value stored on records, e.g. the `type` of an event.
    pub value: String,
    pub en: String,
    pub ar: String,
}

impl Category {
    pub fn new(value: &str, en: &str, ar: &str) -> Self {
        Self {
            value: value.into(),
            en: en.into(),
            ar: ar.into(),
        }
    }

    pub fn label(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.en,
            Language::Ar => &self.ar,
        }
    }

    /// Whether a stored value names this category. Records written by
    /// the admin form carry either the value or the English label.
    pub fn matches(&self, stored: &str) -> bool {
        let stored = stored.trim();
        stored.eq_ignore_ascii_case(&self.value) || stored.eq_ignore_ascii_case(&self.en)
    }
}

/// Category tables of the listing pages. A table missing from a supplied
/// configuration keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryTables {
    pub magazine: Vec<Category>,
    /// Resource types offered by the library upload form.
    pub library: Vec<Category>,
    /// Topic facets of the library page.
    pub library_topics: Vec<Category>,
    pub events: Vec<Category>,
}

impl Default for CategoryTables {
    fn default() -> Self {
        Self {
            magazine: vec![
                Category::new("design", "Design", "التصميم"),
                Category::new("sustainability", "Sustainability", "الاستدامة"),
                Category::new("technology", "Technology", "التكنولوجيا"),
                Category::new("history", "History", "التاريخ"),
                Category::new("inspiration", "Inspiration", "الإلهام"),
                Category::new("community", "Community", "المجتمع"),
            ],
            library: vec![
                Category::new("file", "File", "ملف"),
                Category::new("lecture", "Lecture", "محاضرة"),
            ],
            library_topics: vec![
                Category::new("books", "Books", "كتب"),
                Category::new("guides", "Guides", "أدلة"),
                Category::new("templates", "Templates", "قوالب"),
                Category::new("research", "Research", "أبحاث"),
            ],
            events: vec![
                Category::new("workshop", "Workshop", "ورشة عمل"),
                Category::new("lecture", "Lecture", "محاضرة"),
                Category::new("social", "Social", "اجتماعي"),
            ],
        }
    }
}

// ── Facets ───────────────────────────────────────────────────────────

/// What a listing entity exposes to filters and sort orders.
pub trait Facets {
    fn title(&self) -> &str;

    fn category(&self) -> Option<&str> {
        None
    }

    fn tags(&self) -> &[String] {
        &[]
    }

    /// Stored date string used by the newest and oldest orders.
    fn date(&self) -> Option<&str> {
        None
    }

    fn views(&self) -> u64 {
        0
    }
}

fn non_blank(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

impl Facets for Event {
    fn title(&self) -> &str {
        &self.title
    }

    fn category(&self) -> Option<&str> {
        non_blank(&self.kind)
    }

    fn date(&self) -> Option<&str> {
        non_blank(&self.time)
    }
}

impl Facets for FbdEvent {
    fn title(&self) -> &str {
        &self.0.title
    }

    fn category(&self) -> Option<&str> {
        self.0.category()
    }

    fn date(&self) -> Option<&str> {
        self.0.date()
    }
}

impl Facets for LibraryResource {
    fn title(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        non_blank(&self.kind)
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Facets for Article {
    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> Option<&str> {
        non_blank(&self.date)
    }
}

impl Facets for Course {
    fn title(&self) -> &str {
        &self.title
    }
}

// ── Criteria ─────────────────────────────────────────────────────────

/// Active filters of a listing. An empty list does not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Keep records whose category is any of these.
    pub categories: Vec<String>,
    /// Keep records carrying any of these tags.
    pub tags: Vec<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.tags.is_empty()
    }

    /// Number of active filters, as shown on the filter badge.
    pub fn len(&self) -> usize {
        self.categories.len() + self.tags.len()
    }

    pub fn matches<T: Facets + ?Sized>(&self, item: &T) -> bool {
        let category_ok = self.categories.is_empty()
            || item.category().is_some_and(|category| {
                self.categories
                    .iter()
                    .any(|wanted| wanted.trim().eq_ignore_ascii_case(category.trim()))
            });
        let tags_ok = self.tags.is_empty()
            || item.tags().iter().any(|tag| {
                self.tags
                    .iter()
                    .any(|wanted| wanted.trim().eq_ignore_ascii_case(tag.trim()))
            });
        category_ok && tags_ok
    }
}

/// Sort order of a listing.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// Most viewed first.
    Popular,
    /// Alphabetical by title, ignoring case.
    Title,
}

impl SortOrder {
    /// Records without a readable date sort after dated ones in both date
    /// orders. Ties keep their listing order.
    pub fn compare<T: Facets>(self, a: &T, b: &T) -> Ordering {
        match self {
            Self::Newest => by_date(a, b, |x, y| y.cmp(x)),
            Self::Oldest => by_date(a, b, |x, y| x.cmp(y)),
            Self::Popular => b.views().cmp(&a.views()),
            Self::Title => a.title().to_lowercase().cmp(&b.title().to_lowercase()),
        }
    }
}

fn instant<T: Facets>(item: &T) -> Option<DateTime<Utc>> {
    item.date().and_then(|raw| dates::parse_in(raw, &Utc))
}

fn by_date<T: Facets>(
    a: &T,
    b: &T,
    dated: impl Fn(&DateTime<Utc>, &DateTime<Utc>) -> Ordering,
) -> Ordering {
    match (instant(a), instant(b)) {
        (Some(x), Some(y)) => dated(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter then sort a listing.
pub fn filter_and_sort<'a, T: Facets>(
    records: &'a [Record<T>],
    criteria: &FilterCriteria,
    order: SortOrder,
) -> Vec<&'a Record<T>> {
    let mut selected: Vec<&Record<T>> = records
        .iter()
        .filter(|record| criteria.matches(&record.item))
        .collect();
    selected.sort_by(|a, b| order.compare(&a.item, &b.item));
    selected
}
