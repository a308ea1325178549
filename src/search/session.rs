use super::{SearchIndex, SearchItem};

/// Shorter trimmed queries show the prompt instead of querying the index.
pub const MIN_QUERY_CHARS: usize = 2;

/// What the results pane shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchView {
    /// "Type at least 2 characters to search".
    #[default]
    Prompt,
    /// "No results found".
    Empty,
    Results,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    /// Selection changed; the selected row should be scrolled into view.
    Moved,
    /// Close the modal and go to this URL.
    Navigate(String),
}

/// Per-open search state. The loaded index lives elsewhere and outlasts it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchSession {
    query: String,
    results: Vec<SearchItem>,
    selected: usize,
    is_open: bool,
    view: SearchView,
}

impl SearchSession {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchItem] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn view(&self) -> SearchView {
        self.view
    }

    /// Returns false when already open.
    pub fn open(&mut self) -> bool {
        if self.is_open {
            return false;
        }
        self.reset();
        self.is_open = true;
        true
    }

    /// Returns false when already closed.
    pub fn close(&mut self) -> bool {
        if !self.is_open {
            return false;
        }
        self.reset();
        self.is_open = false;
        true
    }

    fn reset(&mut self) {
        self.query.clear();
        self.results.clear();
        self.selected = 0;
        self.view = SearchView::Prompt;
    }

    /// Apply a new input value. `index` is `None` while the index is still
    /// loading or failed to load; such queries find nothing.
    pub fn set_query(&mut self, raw: &str, index: Option<&SearchIndex>) {
        self.query = raw.to_string();
        self.selected = 0;

        let query = raw.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            self.results.clear();
            self.view = SearchView::Prompt;
            return;
        }

        self.results = index.map(|i| i.search(query)).unwrap_or_default();
        self.view = if self.results.is_empty() {
            SearchView::Empty
        } else {
            SearchView::Results
        };
    }

    /// Re-run the current query, e.g. once the index has arrived.
    pub fn refresh(&mut self, index: Option<&SearchIndex>) {
        let query = self.query.clone();
        self.set_query(&query, index);
    }

    pub fn handle_key(&mut self, key: &str) -> KeyOutcome {
        if self.results.is_empty() {
            return KeyOutcome::Ignored;
        }

        match key {
            "ArrowDown" => {
                self.selected = (self.selected + 1).min(self.results.len() - 1);
                KeyOutcome::Moved
            }
            "ArrowUp" => {
                self.selected = self.selected.saturating_sub(1);
                KeyOutcome::Moved
            }
            "Enter" => self
                .results
                .get(self.selected)
                .map(|r| KeyOutcome::Navigate(r.url.clone()))
                .unwrap_or(KeyOutcome::Ignored),
            _ => KeyOutcome::Ignored,
        }
    }

    /// URL of a clicked result, independent of the keyboard selection.
    pub fn choose(&self, index: usize) -> Option<String> {
        self.results.get(index).map(|r| r.url.clone())
    }

    pub fn is_selected(&self, index: usize) -> bool {
        !self.results.is_empty() && index == self.selected
    }
}
