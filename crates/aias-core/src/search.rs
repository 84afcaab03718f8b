// ── Bundle search ──
//
// Case-insensitive substring search over the entities of a fetched
// bundle, for the site's search box. Title matches rank ahead of matches
// in descriptions, summaries, tags and other body text.

use serde::Serialize;
use strum::Display;

use crate::model::ContentBundle;

const SNIPPET_CHARS: usize = 140;

/// Entity type of a search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum HitKind {
    Event,
    LibraryResource,
    Article,
    Course,
    FbdEvent,
}

/// One matching entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub kind: HitKind,
    pub id: String,
    pub title: String,
    pub snippet: String,
}

struct Candidate<'a> {
    kind: HitKind,
    id: &'a str,
    title: &'a str,
    body: Vec<&'a str>,
}

impl Candidate<'_> {
    /// 0 for a title match, 1 for a body match, `None` otherwise.
    fn rank(&self, needle: &str) -> Option<u8> {
        if contains(self.title, needle) {
            return Some(0);
        }
        self.body.iter().any(|text| contains(text, needle)).then_some(1)
    }

    fn hit(&self, needle: &str) -> SearchHit {
        let source = self
            .body
            .iter()
            .find(|text| contains(text, needle))
            .or_else(|| self.body.iter().find(|text| !text.trim().is_empty()))
            .copied()
            .unwrap_or_default();
        SearchHit {
            kind: self.kind,
            id: self.id.to_owned(),
            title: self.title.to_owned(),
            snippet: snippet(source),
        }
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn snippet(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= SNIPPET_CHARS {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(SNIPPET_CHARS).collect();
    cut.push('…');
    cut
}

fn candidates(bundle: &ContentBundle) -> Vec<Candidate<'_>> {
    let mut out = Vec::new();
    for event in &bundle.events {
        out.push(Candidate {
            kind: HitKind::Event,
            id: &event.id,
            title: &event.title,
            body: vec![event.description.as_str(), event.location.as_str(), event.kind.as_str()],
        });
    }
    for resource in &bundle.library {
        let mut body = vec![resource.description.as_str(), resource.kind.as_str()];
        body.extend(resource.tags.iter().map(String::as_str));
        out.push(Candidate {
            kind: HitKind::LibraryResource,
            id: &resource.id,
            title: &resource.name,
            body,
        });
    }
    for article in &bundle.magazine.articles {
        out.push(Candidate {
            kind: HitKind::Article,
            id: &article.id,
            title: &article.title,
            body: vec![article.summary.as_str(), article.content.as_str(), article.author.as_str()],
        });
    }
    for course in &bundle.education.courses {
        out.push(Candidate {
            kind: HitKind::Course,
            id: &course.id,
            title: &course.title,
            body: vec![course.description.as_str(), course.lecturer.as_str()],
        });
    }
    for event in &bundle.education.fbd.events {
        out.push(Candidate {
            kind: HitKind::FbdEvent,
            id: &event.id,
            title: &event.title,
            body: vec![event.description.as_str(), event.location.as_str(), event.kind.as_str()],
        });
    }
    out
}

/// Search the bundle. Blank queries match nothing.
pub fn search_bundle(bundle: &ContentBundle, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(u8, SearchHit)> = candidates(bundle)
        .iter()
        .filter_map(|c| c.rank(&needle).map(|rank| (rank, c.hit(&needle))))
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, hit)| hit).collect()
}
