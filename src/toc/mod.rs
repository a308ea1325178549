mod outline;

pub use outline::TableOfContents;

use regex::Regex;
use std::sync::LazyLock;

/// Gap kept between the viewport top and a heading scrolled into place.
pub(crate) const HEADER_OFFSET_PX: f64 = 80.0;

/// Headings whose top is at or above this line count as "passed".
pub(crate) const ACTIVE_THRESHOLD_PX: f64 = 100.0;

pub(crate) const SCROLL_DEBOUNCE_MS: i32 = 100;

/// Trigger band for the observer: 80px below the top down to 80% of the viewport.
pub(crate) const OBSERVER_ROOT_MARGIN: &str = "-80px 0px -80% 0px";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadingLevel {
    H2,
    H3,
}

impl HeadingLevel {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            _ => None,
        }
    }

    pub fn depth(self) -> u8 {
        match self {
            Self::H2 => 2,
            Self::H3 => 3,
        }
    }
}

/// One outline entry, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocItem {
    pub id: String,
    pub text: String,
    pub level: HeadingLevel,
}

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid slug regex"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static HYPHEN_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("valid hyphen regex"));

/// Anchor id for a heading without one.
///
/// Only surrounding whitespace is trimmed, so text that starts or ends with
/// whitespace keeps a leading/trailing hyphen. Identical headings get
/// identical ids.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lower, "");
    let hyphenated = WHITESPACE_RUNS.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&hyphenated, "-");
    collapsed.trim().to_string()
}

/// Index of the heading the reader is currently in, given each heading's
/// viewport top in document order.
///
/// The walk stops at the first heading below `threshold`. When no heading has
/// been passed yet the first one is chosen.
pub fn closest_heading_above(tops: &[f64], threshold: f64) -> Option<usize> {
    if tops.is_empty() {
        return None;
    }

    let mut closest = None;
    for (i, top) in tops.iter().enumerate() {
        if *top <= threshold {
            closest = Some(i);
        } else {
            break;
        }
    }

    Some(closest.unwrap_or(0))
}

/// First id reported as intersecting, in callback order.
pub fn first_intersecting<'a>(entries: impl IntoIterator<Item = (&'a str, bool)>) -> Option<&'a str> {
    entries
        .into_iter()
        .find(|(_, intersecting)| *intersecting)
        .map(|(id, _)| id)
}

/// The single active-heading cell shared by the observer and the scroll fallback.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrollSpy {
    active: Option<String>,
}

impl ScrollSpy {
    /// Returns false when `id` was already active.
    pub fn activate(&mut self, id: &str) -> bool {
        if self.is_active(id) {
            return false;
        }
        self.active = Some(id.to_string());
        true
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }
}
