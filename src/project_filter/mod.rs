use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;

use crate::dom::{self, Listener};

/// Filter value that shows every card.
pub const ALL: &str = "all";

const EMPTY_STATE_CLASS: &str = "rounded-xl border border-dashed border-slate-700 bg-slate-900/40 p-6 text-sm text-slate-300 md:col-span-2";
const EMPTY_STATE_TEXT: &str =
    "No projects match this filter yet. Choose another filter to explore more work.";

/// Comma-separated `data-tags`, trimmed, blanks dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn card_matches(filter: &str, tags: &[String]) -> bool {
    filter == ALL || tags.iter().any(|t| t == filter)
}

/// Text for the `[data-filter-status]` region.
pub fn status_text(visible: usize, label: &str) -> String {
    match visible {
        0 => format!("No projects match {label}. Showing zero results."),
        1 => format!("Showing 1 project filtered by {label}."),
        n => format!("Showing {n} projects filtered by {label}."),
    }
}

/// Which filter is active and which cards it lets through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    active: String,
    cards: Vec<Vec<String>>,
}

impl FilterState {
    pub fn new(cards: Vec<Vec<String>>) -> Self {
        Self {
            active: ALL.to_string(),
            cards,
        }
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    /// Returns false when `value` is already the active filter.
    pub fn select(&mut self, value: &str) -> bool {
        if self.active == value {
            return false;
        }
        self.active = value.to_string();
        true
    }

    pub fn visible(&self) -> Vec<bool> {
        self.cards
            .iter()
            .map(|tags| card_matches(&self.active, tags))
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible().into_iter().filter(|v| *v).count()
    }
}

struct Filter {
    buttons: Vec<web_sys::HtmlButtonElement>,
    cards: Vec<web_sys::Element>,
    status: Option<web_sys::Element>,
    empty_state: web_sys::HtmlElement,
    state: RefCell<FilterState>,
}

impl Filter {
    fn render(&self) {
        let state = self.state.borrow();

        for button in &self.buttons {
            let active = button.value() == state.active();
            let _ = button.set_attribute("data-state", if active { "active" } else { "inactive" });
            let _ = button.set_attribute("aria-pressed", &active.to_string());
        }

        for (card, show) in self.cards.iter().zip(state.visible()) {
            let _ = card.toggle_attribute_with_force("hidden", !show);
            let _ = card.class_list().toggle_with_force("hidden", !show);
            let _ = card.set_attribute("aria-hidden", &(!show).to_string());
        }

        let visible = state.visible_count();
        self.empty_state.set_hidden(visible > 0);

        if let Some(status) = &self.status {
            status.set_text_content(Some(&status_text(visible, &self.label(state.active()))));
        }
    }

    /// Lower-cased button text for a filter value.
    fn label(&self, value: &str) -> String {
        if value == ALL {
            return "all projects".to_string();
        }
        self.buttons
            .iter()
            .find(|b| b.value() == value)
            .and_then(|b| b.text_content())
            .map(|t| t.to_lowercase())
            .unwrap_or_else(|| value.to_string())
    }

    fn select(&self, value: &str) {
        if self.state.borrow_mut().select(value) {
            self.render();
        }
    }
}

/// Tag filter over the `[data-project-grid]` cards.
pub struct ProjectFilter {
    filter: Rc<Filter>,
    _listeners: Vec<Listener>,
}

impl ProjectFilter {
    pub fn attach() -> Option<Self> {
        let buttons: Vec<web_sys::HtmlButtonElement> = dom::query_all("[data-filter]")
            .into_iter()
            .filter_map(|el| el.dyn_into().ok())
            .collect();
        let cards = dom::query_all("[data-project-card]");
        let grid = dom::query("[data-project-grid]")?;
        if buttons.is_empty() || cards.is_empty() {
            return None;
        }

        let empty_state: web_sys::HtmlElement = dom::document()?
            .create_element("p")
            .ok()?
            .dyn_into()
            .ok()?;
        empty_state.set_class_name(EMPTY_STATE_CLASS);
        empty_state.set_hidden(true);
        empty_state.set_text_content(Some(EMPTY_STATE_TEXT));
        let _ = grid.append_child(&empty_state);

        let tags = cards
            .iter()
            .map(|card| parse_tags(&card.get_attribute("data-tags").unwrap_or_default()))
            .collect();

        let filter = Rc::new(Filter {
            status: dom::query("[data-filter-status]"),
            state: RefCell::new(FilterState::new(tags)),
            buttons,
            cards,
            empty_state,
        });

        let listeners = filter
            .buttons
            .iter()
            .map(|button| {
                let f = filter.clone();
                let value = button.value();
                Listener::new(button, "click", move |_| f.select(&value))
            })
            .collect();

        filter.render();

        Some(Self {
            filter,
            _listeners: listeners,
        })
    }

    pub fn active(&self) -> String {
        self.filter.state.borrow().active().to_string()
    }

    pub fn select(&self, value: &str) {
        self.filter.select(value);
    }

    pub fn destroy(self) {
        self.filter.empty_state.remove();
    }
}
