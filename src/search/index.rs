use thiserror::Error;

use super::{FuzzyMatcher, SearchItem};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed index payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for IndexError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

/// The loaded index plus the matcher that ranks it. Read-only once built.
#[derive(Clone, Debug)]
pub struct SearchIndex {
    items: Vec<SearchItem>,
    matcher: FuzzyMatcher,
}

impl SearchIndex {
    pub fn new(items: Vec<SearchItem>) -> Self {
        Self {
            items,
            matcher: FuzzyMatcher::default(),
        }
    }

    pub fn items(&self) -> &[SearchItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Matching items, best first.
    pub fn search(&self, query: &str) -> Vec<SearchItem> {
        self.matcher
            .rank(&self.items, query)
            .into_iter()
            .filter_map(|hit| self.items.get(hit.index).cloned())
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub enum IndexState {
    #[default]
    Loading,
    Ready(SearchIndex),
    /// Load failed; the modal keeps working but never finds anything.
    Failed,
}

impl IndexState {
    pub fn index(&self) -> Option<&SearchIndex> {
        match self {
            Self::Ready(index) => Some(index),
            _ => None,
        }
    }
}

/// Parse the `search-index.json` payload: a JSON array of items.
pub fn parse_index(payload: &str) -> Result<SearchIndex, IndexError> {
    let items: Vec<SearchItem> = serde_json::from_str(payload)?;
    Ok(SearchIndex::new(items))
}

pub async fn fetch_index(url: &str) -> Result<SearchIndex, IndexError> {
    let res = reqwest::get(url).await?;
    if !res.status().is_success() {
        return Err(IndexError::Status(res.status().as_u16()));
    }

    let body = res.text().await?;
    parse_index(&body)
}
