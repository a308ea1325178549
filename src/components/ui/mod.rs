pub mod search;

// Re-export component symbols so callers can `use crate::components::ui::SearchEmpty` etc.
pub use search::*;
