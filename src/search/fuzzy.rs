use std::cmp::Ordering;
use std::iter;

use super::SearchItem;

/// Field of a [`SearchItem`] that takes part in ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKey {
    Title,
    Excerpt,
    /// Each tag is matched on its own.
    Tags,
}

impl SearchKey {
    fn values(self, item: &SearchItem) -> Vec<&str> {
        match self {
            Self::Title => vec![item.title.as_str()],
            Self::Excerpt => vec![item.excerpt.as_str()],
            Self::Tags => item.tags.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyOptions {
    pub keys: Vec<(SearchKey, f64)>,
    /// Worst accepted field score; 0 is a perfect match, 1 matches anything.
    pub threshold: f64,
    /// How many characters away from the start a match may drift before the
    /// position alone exceeds a score of 1.
    pub distance: usize,
    pub min_match_char_length: usize,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            keys: vec![
                (SearchKey::Title, 0.4),
                (SearchKey::Excerpt, 0.3),
                (SearchKey::Tags, 0.3),
            ],
            threshold: 0.4,
            distance: 100,
            min_match_char_length: 2,
        }
    }
}

/// Position of a ranked item in the searched slice, with its combined score
/// (lower is better).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzyHit {
    pub index: usize,
    pub score: f64,
}

/// Weighted approximate matcher over title, excerpt and tags.
///
/// Every field value is scored as `edits / pattern_len + start / distance`
/// for its best window, so typos and late matches both cost. Field scores are
/// combined multiplicatively, each raised to its key weight times a length
/// norm that favours short fields.
#[derive(Clone, Debug)]
pub struct FuzzyMatcher {
    options: FuzzyOptions,
}

impl FuzzyMatcher {
    pub fn new(mut options: FuzzyOptions) -> Self {
        let total: f64 = options.keys.iter().map(|(_, w)| *w).sum();
        if total > 0.0 {
            for (_, w) in options.keys.iter_mut() {
                *w /= total;
            }
        }
        Self { options }
    }

    pub fn options(&self) -> &FuzzyOptions {
        &self.options
    }

    /// Ranked hits for `query`, best first. Items with no matching field are
    /// left out; an item whose title equals the query always comes first.
    pub fn rank(&self, items: &[SearchItem], query: &str) -> Vec<FuzzyHit> {
        let pattern = query.trim().to_lowercase();
        if pattern.is_empty() {
            return vec![];
        }

        let mut hits: Vec<(bool, FuzzyHit)> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let score = self.item_score(item, &pattern)?;
                let exact_title = item.title.trim().to_lowercase() == pattern;
                Some((exact_title, FuzzyHit { index, score }))
            })
            .collect();

        // Stable: equal scores keep index order.
        hits.sort_by(|(a_exact, a), (b_exact, b)| match b_exact.cmp(a_exact) {
            Ordering::Equal => a.score.total_cmp(&b.score),
            other => other,
        });

        hits.into_iter().map(|(_, hit)| hit).collect()
    }

    fn item_score(&self, item: &SearchItem, pattern: &str) -> Option<f64> {
        let mut total = 1.0;
        let mut matched = false;

        for (key, weight) in &self.options.keys {
            for value in key.values(item) {
                let Some(score) = self.field_score(pattern, value) else {
                    continue;
                };
                matched = true;
                let base = if score == 0.0 { f64::EPSILON } else { score };
                total *= base.powf(weight * field_norm(value));
            }
        }

        matched.then_some(total)
    }

    /// Best score of `pattern` (already lower-cased) against `text`, if any
    /// window scores within the threshold.
    pub(crate) fn field_score(&self, pattern: &str, text: &str) -> Option<f64> {
        let text = text.to_lowercase();
        if text == pattern {
            return Some(0.0);
        }

        let pattern_len = pattern.chars().count();
        if pattern_len == 0 {
            return None;
        }

        let threshold = self.options.threshold;
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(iter::once(text.len()))
            .collect();
        let text_len = bounds.len() - 1;

        let max_edits = (threshold * pattern_len as f64).floor() as usize;
        let min_window = pattern_len
            .saturating_sub(max_edits)
            .max(self.options.min_match_char_length)
            .max(1);
        let max_window = pattern_len + max_edits;

        let mut best: Option<f64> = None;
        for start in 0..text_len {
            let proximity = self.proximity(start);
            if proximity > threshold {
                break;
            }

            for width in min_window..=max_window {
                if start + width > text_len {
                    break;
                }
                let window = &text[bounds[start]..bounds[start + width]];
                let edits = strsim::levenshtein(pattern, window);
                let score = edits as f64 / pattern_len as f64 + proximity;
                if score <= threshold && best.map_or(true, |b| score < b) {
                    best = Some(score);
                }
            }

            if best == Some(0.0) {
                break;
            }
        }

        best
    }

    fn proximity(&self, start: usize) -> f64 {
        match self.options.distance {
            0 if start == 0 => 0.0,
            0 => 1.0,
            distance => start as f64 / distance as f64,
        }
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(FuzzyOptions::default())
    }
}

/// `1 / sqrt(tokens)`, rounded to three decimals.
fn field_norm(value: &str) -> f64 {
    let tokens = value.split_whitespace().count().max(1) as f64;
    (1.0 / tokens.sqrt() * 1000.0).round() / 1000.0
}
