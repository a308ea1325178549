mod fuzzy;
mod index;
mod modal;
mod session;

pub use fuzzy::{FuzzyHit, FuzzyMatcher, FuzzyOptions, SearchKey};
pub use index::{fetch_index, parse_index, IndexError, IndexState, SearchIndex};
pub use modal::SiteSearch;
pub use session::{KeyOutcome, SearchSession, SearchView, MIN_QUERY_CHARS};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Content type of an index entry. Types the site does not know about are
/// kept as-is so their badge still renders.
#[derive(Clone, Debug, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum SearchItemKind {
    Page,
    Project,
    CaseStudy,
    Blog,
    #[strum(default)]
    Other(String),
}

impl SearchItemKind {
    pub fn label(&self) -> &str {
        match self {
            Self::Page => "Page",
            Self::Project => "Project",
            Self::CaseStudy => "Case Study",
            Self::Blog => "Blog Post",
            Self::Other(raw) => raw,
        }
    }

    /// Value used in the badge's modifier class and in the index payload.
    pub fn slug(&self) -> &str {
        match self {
            Self::Page => "page",
            Self::Project => "project",
            Self::CaseStudy => "case-study",
            Self::Blog => "blog",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for SearchItemKind {
    fn from(raw: String) -> Self {
        match Self::from_str(&raw) {
            Ok(kind) => kind,
            Err(_) => Self::Other(raw),
        }
    }
}

impl Serialize for SearchItemKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for SearchItemKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// One record of the prebuilt `search-index.json`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SearchItem {
    #[serde(rename = "type")]
    pub kind: SearchItemKind,
    pub title: String,
    pub excerpt: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parses_known_types() {
        assert_eq!(SearchItemKind::from("case-study".to_string()), SearchItemKind::CaseStudy);
        assert_eq!(SearchItemKind::from("blog".to_string()), SearchItemKind::Blog);
        assert_eq!(SearchItemKind::Blog.label(), "Blog Post");
        assert_eq!(SearchItemKind::CaseStudy.label(), "Case Study");
    }

    #[test]
    fn test_kind_keeps_unknown_type_verbatim() {
        let kind = SearchItemKind::from("talk".to_string());
        assert_eq!(kind, SearchItemKind::Other("talk".to_string()));
        assert_eq!(kind.label(), "talk");
        assert_eq!(kind.slug(), "talk");
    }

    #[test]
    fn test_search_item_contract_deserialize() {
        let json = r#"{
            "type": "project",
            "title": "RAG Assistant",
            "excerpt": "retrieval system",
            "url": "/p/rag",
            "tags": ["ml"]
        }"#;
        let item: SearchItem = serde_json::from_str(json).expect("search item should parse");
        assert_eq!(item.kind, SearchItemKind::Project);
        assert_eq!(item.tags, vec!["ml".to_string()]);
    }

    #[test]
    fn test_search_item_tags_default_to_empty() {
        let json = r#"{"type":"page","title":"About","excerpt":"","url":"/about"}"#;
        let item: SearchItem = serde_json::from_str(json).expect("search item should parse");
        assert!(item.tags.is_empty());
    }

    #[test]
    fn test_rank_hits_point_into_the_searched_slice() {
        let items = vec![
            SearchItem {
                kind: SearchItemKind::Page,
                title: "About".to_string(),
                excerpt: String::new(),
                url: "/about".to_string(),
                tags: vec![],
            },
            SearchItem {
                kind: SearchItemKind::Blog,
                title: "Notes on Iceberg".to_string(),
                excerpt: "table formats".to_string(),
                url: "/blog/iceberg".to_string(),
                tags: vec![],
            },
        ];
        let hits: Vec<FuzzyHit> = FuzzyMatcher::default().rank(&items, "iceberg");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 1);
        assert!(hits[0].score < 1.0);
    }

    #[test]
    fn test_search_item_serializes_type_slug() {
        let item = SearchItem {
            kind: SearchItemKind::CaseStudy,
            title: "Lakehouse".to_string(),
            excerpt: String::new(),
            url: "/cs/lakehouse".to_string(),
            tags: vec![],
        };
        let v = serde_json::to_value(item).expect("should serialize");
        assert_eq!(v["type"], "case-study");
    }
}
