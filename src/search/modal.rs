use icons::{Search, X};
use leptos::ev;
use leptos::html;
use leptos::logging::error;
use leptos::mount::UnmountHandle;
use leptos::prelude::*;
use leptos::tachys::view::any_view::AnyViewState;
use leptos::task::spawn_local;
use leptos_dom::helpers::{request_animation_frame, window_event_listener, WindowListenerHandle};

use super::{fetch_index, IndexState, KeyOutcome, SearchIndex, SearchItem, SearchSession, SearchView};
use crate::components::ui::{Kbd, SearchEmpty, SearchHelp};
use crate::config::SiteConfig;
use crate::dom::{self, Listener};

/* ========================================================== */
/*                     ✨ CONTEXT ✨                          */
/* ========================================================== */

#[derive(Clone, Copy)]
struct SearchContext {
    session: RwSignal<SearchSession>,
    index: RwSignal<IndexState>,
    input_ref: NodeRef<html::Input>,
    results_ref: NodeRef<html::Div>,
}

impl SearchContext {
    fn new(index: IndexState) -> Self {
        Self {
            session: RwSignal::new(SearchSession::default()),
            index: RwSignal::new(index),
            input_ref: NodeRef::new(),
            results_ref: NodeRef::new(),
        }
    }

    fn is_open(self) -> bool {
        self.session.with_untracked(|s| s.is_open())
    }

    fn open(self) {
        if !self.session.try_update(|s| s.open()).unwrap_or(false) {
            return;
        }
        dom::set_body_scroll_locked(true);

        // Focus once the modal class has been applied.
        let input_ref = self.input_ref;
        request_animation_frame(move || {
            if let Some(input) = input_ref.get_untracked() {
                let _ = input.focus();
            }
        });
    }

    fn close(self) {
        if self.session.try_update(|s| s.close()).unwrap_or(false) {
            dom::set_body_scroll_locked(false);
        }
    }

    fn on_input(self, value: String) {
        self.index.with_untracked(|state| {
            self.session.update(|s| s.set_query(&value, state.index()));
        });
    }

    fn on_keydown(self, ev: &web_sys::KeyboardEvent) {
        let outcome = self
            .session
            .try_update(|s| s.handle_key(&ev.key()))
            .unwrap_or(KeyOutcome::Ignored);

        match outcome {
            KeyOutcome::Ignored => {}
            KeyOutcome::Moved => {
                ev.prevent_default();
                self.scroll_selected_into_view();
            }
            KeyOutcome::Navigate(url) => {
                ev.prevent_default();
                self.close();
                dom::navigate_to(&url);
            }
        }
    }

    fn choose(self, index: usize) {
        if let Some(url) = self.session.with_untracked(|s| s.choose(index)) {
            self.close();
            dom::navigate_to(&url);
        }
    }

    fn scroll_selected_into_view(self) {
        let results_ref = self.results_ref;
        request_animation_frame(move || {
            let Some(results) = results_ref.get_untracked() else {
                return;
            };
            let Ok(Some(selected)) = results.query_selector(".search-result--selected") else {
                return;
            };

            let options = web_sys::ScrollIntoViewOptions::new();
            options.set_block(web_sys::ScrollLogicalPosition::Nearest);
            options.set_behavior(web_sys::ScrollBehavior::Smooth);
            selected.scroll_into_view_with_scroll_into_view_options(&options);
        });
    }

    /// The fetch may outlive the modal, so every signal access is fallible.
    fn load_index(self, url: String) {
        spawn_local(async move {
            match fetch_index(&url).await {
                Ok(index) => {
                    let _ = self.index.try_set(IndexState::Ready(index));

                    // A query typed while loading found nothing; run it again.
                    let rerun = self
                        .session
                        .try_with_untracked(|s| s.is_open() && !s.query().is_empty())
                        .unwrap_or(false);
                    if rerun {
                        self.index.try_with_untracked(|state| {
                            self.session.update(|s| s.refresh(state.index()));
                        });
                    }
                }
                Err(e) => {
                    error!("[site-search] Failed to load search index: {e}");
                    let _ = self.index.try_set(IndexState::Failed);
                }
            }
        });
    }
}

/* ========================================================== */
/*                     ✨ CONTROLLER ✨                       */
/* ========================================================== */

type MountedModal = UnmountHandle<AnyViewState>;

/// Search overlay appended to `<body>`, opened with Cmd/Ctrl+K or any
/// `[data-search-trigger]` element.
pub struct SiteSearch {
    ctx: SearchContext,
    modal: Option<MountedModal>,
    key_handle: Option<WindowListenerHandle>,
    triggers: Vec<Listener>,
}

impl SiteSearch {
    /// Mount the modal and start loading the index named by `config`.
    pub fn attach(config: &SiteConfig) -> Option<Self> {
        let search = Self::mount(IndexState::Loading)?;
        search.ctx.load_index(config.search_index_url_for_page());
        Some(search)
    }

    /// Mount the modal over an index that is already in memory.
    pub fn with_index(index: SearchIndex) -> Option<Self> {
        Self::mount(IndexState::Ready(index))
    }

    fn mount(index: IndexState) -> Option<Self> {
        let body = dom::document()?.body()?;
        let ctx = SearchContext::new(index);

        let modal = leptos::mount::mount_to(body, move || view! { <SearchModal ctx=ctx /> }.into_any());

        let key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
            if (ev.meta_key() || ev.ctrl_key()) && ev.key() == "k" {
                ev.prevent_default();
                ctx.open();
            }

            if ev.key() == "Escape" && ctx.is_open() {
                ctx.close();
            }
        });

        let triggers = dom::query_all("[data-search-trigger]")
            .iter()
            .map(|trigger| Listener::new(trigger, "click", move |_| ctx.open()))
            .collect();

        Some(Self {
            ctx,
            modal: Some(modal),
            key_handle: Some(key_handle),
            triggers,
        })
    }

    pub fn open(&self) {
        self.ctx.open();
    }

    pub fn close(&self) {
        self.ctx.close();
    }

    pub fn is_open(&self) -> bool {
        self.ctx.is_open()
    }

    pub fn session(&self) -> SearchSession {
        self.ctx.session.get_untracked()
    }

    pub fn index_state(&self) -> IndexState {
        self.ctx.index.get_untracked()
    }

    pub fn destroy(mut self) {
        if let Some(handle) = self.key_handle.take() {
            handle.remove();
        }
        self.triggers.clear();
        self.ctx.close();

        // Unmounting removes the overlay and dialog and disposes their owner.
        drop(self.modal.take());
        self.ctx.session.dispose();
        self.ctx.index.dispose();
    }
}

/* ========================================================== */
/*                     ✨ COMPONENTS ✨                       */
/* ========================================================== */

#[component]
fn SearchModal(ctx: SearchContext) -> impl IntoView {
    let is_open = move || ctx.session.with(|s| s.is_open());

    view! {
        <div
            class=move || if is_open() { "search-overlay search-overlay--active" } else { "search-overlay" }
            data-search-overlay=""
            aria-hidden=move || (!is_open()).to_string()
            on:click=move |_| ctx.close()
        />

        <div
            class=move || if is_open() { "search-modal search-modal--active" } else { "search-modal" }
            data-search-modal=""
            role="dialog"
            aria-modal="true"
            aria-labelledby="search-label"
        >
            <div class="search-input-container">
                <Search class="search-icon" />
                <input
                    node_ref=ctx.input_ref
                    type="text"
                    class="search-input"
                    placeholder="Search site..."
                    id="search-label"
                    aria-label="Search site"
                    prop:value=move || ctx.session.with(|s| s.query().to_string())
                    on:input=move |ev: web_sys::Event| ctx.on_input(event_target_value(&ev))
                    on:keydown=move |ev: web_sys::KeyboardEvent| ctx.on_keydown(&ev)
                />
                <button
                    type="button"
                    class="search-close"
                    aria-label="Close search"
                    on:click=move |_| ctx.close()
                >
                    <X />
                </button>
            </div>

            <div node_ref=ctx.results_ref class="search-results" role="listbox" aria-label="Search results">
                <SearchResults ctx=ctx />
            </div>

            <SearchHelp>
                <Kbd>"↑"</Kbd>
                <Kbd>"↓"</Kbd>
                " to navigate, "
                <Kbd>"Enter"</Kbd>
                " to select, "
                <Kbd>"Esc"</Kbd>
                " to close"
            </SearchHelp>
        </div>
    }
}

#[component]
fn SearchResults(ctx: SearchContext) -> impl IntoView {
    move || {
        ctx.session.with(|s| match s.view() {
            SearchView::Prompt => view! {
                <SearchEmpty>"Type at least 2 characters to search"</SearchEmpty>
            }
            .into_any(),
            SearchView::Empty => view! { <SearchEmpty>"No results found"</SearchEmpty> }.into_any(),
            SearchView::Results => s
                .results()
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    view! {
                        <SearchResultRow
                            ctx=ctx
                            index=index
                            item=item.clone()
                            selected=s.is_selected(index)
                        />
                    }
                })
                .collect_view()
                .into_any(),
        })
    }
}

#[component]
fn SearchResultRow(ctx: SearchContext, index: usize, item: SearchItem, selected: bool) -> impl IntoView {
    let class = if selected { "search-result search-result--selected" } else { "search-result" };
    let badge_class = format!("search-result-type search-result-type--{}", item.kind.slug());
    let label = item.kind.label().to_string();
    let tags = item.tags;

    view! {
        <a
            href=item.url
            class=class
            role="option"
            aria-selected=selected.to_string()
            data-search-result-index=index.to_string()
            on:click=move |ev: web_sys::MouseEvent| {
                ev.prevent_default();
                ctx.choose(index);
            }
        >
            <div class="search-result-header">
                <span class="search-result-title">{item.title}</span>
                <span class=badge_class>{label}</span>
            </div>
            <p class="search-result-excerpt">{item.excerpt}</p>
            {(!tags.is_empty()).then(|| view! {
                <div class="search-result-tags">
                    {tags
                        .into_iter()
                        .map(|tag| view! { <span class="search-result-tag">{tag}</span> })
                        .collect_view()}
                </div>
            })}
        </a>
    }
}
