use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {SearchEmpty, div, "search-empty"}
    clx! {SearchHelp, div, "search-help"}
    clx! {Kbd, kbd, "search-help__key"}
}

pub use components::*;
