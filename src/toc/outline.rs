use std::rc::Rc;

use leptos::mount::UnmountHandle;
use leptos::prelude::*;
use leptos::tachys::view::any_view::AnyViewState;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use super::{
    closest_heading_above, first_intersecting, slugify, HeadingLevel, ScrollSpy, TocItem,
    ACTIVE_THRESHOLD_PX, HEADER_OFFSET_PX, OBSERVER_ROOT_MARGIN, SCROLL_DEBOUNCE_MS,
};
use crate::dom::{self, Debouncer, Listener};

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>;
type MountedOutline = UnmountHandle<AnyViewState>;

/// Page outline with scroll spy, attached to `[data-toc]` and `[data-toc-content]`.
pub struct TableOfContents {
    items: Vec<TocItem>,
    active: RwSignal<ScrollSpy>,
    outline: Option<MountedOutline>,
    observer: Option<web_sys::IntersectionObserver>,
    _observer_callback: Option<ObserverCallback>,
    scroll_debounce: Debouncer,
    _scroll_listener: Option<Listener>,
}

impl TableOfContents {
    /// Returns `None` when the page has no outline anchors or no headings.
    pub fn attach() -> Option<Self> {
        let container = dom::query("[data-toc]")?;
        let content = dom::query("[data-toc-content]")?;

        let (items, headings) = extract_headings(&content);
        if items.is_empty() {
            dom::add_class(&container, "hidden");
            return None;
        }

        let active = RwSignal::new(ScrollSpy::default());
        let headings = Rc::new(headings);
        let ids: Rc<Vec<String>> = Rc::new(items.iter().map(|i| i.id.clone()).collect());

        // Initial pass so an entry is active before the first intersection.
        update_active_from_scroll(&headings, &ids, active);
        let outline = render_outline(&container, items.clone(), active);

        let (observer, observer_callback) = observe_headings(&headings, active);

        let scroll_debounce = Debouncer::new(SCROLL_DEBOUNCE_MS);
        let scroll_listener = {
            let debounce = scroll_debounce.clone();
            let headings = headings.clone();
            let ids = ids.clone();
            Listener::on_window("scroll", move |_| {
                let headings = headings.clone();
                let ids = ids.clone();
                debounce.schedule(move || update_active_from_scroll(&headings, &ids, active));
            })
        };

        Some(Self {
            items,
            active,
            outline,
            observer,
            _observer_callback: observer_callback,
            scroll_debounce,
            _scroll_listener: scroll_listener,
        })
    }

    pub fn items(&self) -> &[TocItem] {
        &self.items
    }

    pub fn active_id(&self) -> Option<String> {
        self.active.with_untracked(|s| s.active().map(str::to_string))
    }

    pub fn destroy(mut self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
        self.scroll_debounce.cancel();
        // Unmounting removes the links and disposes their reactive owner.
        drop(self.outline.take());
        self.active.dispose();
        // Listener and observer callback are released on drop.
    }
}

fn extract_headings(content: &web_sys::Element) -> (Vec<TocItem>, Vec<web_sys::Element>) {
    let mut items = Vec::new();
    let mut headings = Vec::new();

    for el in dom::query_all_in(content, "h2, h3") {
        let Some(level) = HeadingLevel::from_tag(&el.tag_name()) else {
            continue;
        };
        let text = el.text_content().unwrap_or_default();

        let mut id = el.id();
        if id.is_empty() {
            id = slugify(&text);
            el.set_id(&id);
        }

        items.push(TocItem { id, text, level });
        headings.push(el);
    }

    (items, headings)
}

fn set_active(active: RwSignal<ScrollSpy>, id: &str) {
    // Skip the write entirely so links do not re-render for a repeated id.
    if active.with_untracked(|s| s.is_active(id)) {
        return;
    }
    active.update(|s| {
        s.activate(id);
    });
}

fn update_active_from_scroll(
    headings: &[web_sys::Element],
    ids: &[String],
    active: RwSignal<ScrollSpy>,
) {
    let tops: Vec<f64> = headings
        .iter()
        .map(|h| h.get_bounding_client_rect().top())
        .collect();

    if let Some(id) = closest_heading_above(&tops, ACTIVE_THRESHOLD_PX).and_then(|i| ids.get(i)) {
        set_active(active, id);
    }
}

fn observe_headings(
    headings: &[web_sys::Element],
    active: RwSignal<ScrollSpy>,
) -> (Option<web_sys::IntersectionObserver>, Option<ObserverCallback>) {
    let callback: ObserverCallback = Closure::new(
        move |entries: js_sys::Array, _observer: web_sys::IntersectionObserver| {
            let entries: Vec<(String, bool)> = entries
                .iter()
                .filter_map(|e| e.dyn_into::<web_sys::IntersectionObserverEntry>().ok())
                .map(|e| (e.target().id(), e.is_intersecting()))
                .collect();

            if let Some(id) = first_intersecting(entries.iter().map(|(id, hit)| (id.as_str(), *hit))) {
                set_active(active, id);
            }
        },
    );

    let init = web_sys::IntersectionObserverInit::new();
    init.set_root_margin(OBSERVER_ROOT_MARGIN);
    init.set_threshold(&JsValue::from_f64(0.0));

    let Ok(observer) =
        web_sys::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
    else {
        // Without observer support the scroll fallback still drives the outline.
        return (None, None);
    };

    for heading in headings {
        observer.observe(heading);
    }

    (Some(observer), Some(callback))
}

fn render_outline(
    container: &web_sys::Element,
    items: Vec<TocItem>,
    active: RwSignal<ScrollSpy>,
) -> Option<MountedOutline> {
    container.set_inner_html("");
    let parent = container.clone().dyn_into::<web_sys::HtmlElement>().ok()?;

    Some(leptos::mount::mount_to(parent, move || {
        view! { <TocOutline items=items active=active /> }.into_any()
    }))
}

/// Smooth-scroll to a heading, leaving room for the fixed header, and record
/// the fragment in history without navigating.
fn scroll_to_heading(id: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(el) = dom::document().and_then(|d| d.get_element_by_id(id)) else {
        return;
    };

    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let top = el.get_bounding_client_rect().top() + scroll_y - HEADER_OFFSET_PX;

    let options = web_sys::ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);

    if let Ok(history) = window.history() {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&format!("#{id}")));
    }
}

#[component]
fn TocOutline(items: Vec<TocItem>, active: RwSignal<ScrollSpy>) -> impl IntoView {
    view! {
        <div class="toc">
            <h2 class="toc__heading">"On this page"</h2>
            <nav class="toc__nav" aria-label="Table of contents">
                <ul class="toc__list">
                    {items
                        .into_iter()
                        .map(|item| view! { <TocLink item=item active=active /> })
                        .collect_view()}
                </ul>
            </nav>
        </div>
    }
}

#[component]
fn TocLink(item: TocItem, active: RwSignal<ScrollSpy>) -> impl IntoView {
    let id = StoredValue::new(item.id.clone());
    let is_active = move || active.with(|s| s.is_active(&id.get_value()));

    view! {
        <li class=format!("toc__item toc__item--level-{}", item.level.depth())>
            <a
                class=move || if is_active() { "toc__link toc__link--active" } else { "toc__link" }
                href=format!("#{}", item.id)
                data-toc-link=item.id.clone()
                aria-current=move || is_active().then_some("location")
                on:click=move |ev: web_sys::MouseEvent| {
                    ev.prevent_default();
                    scroll_to_heading(&id.get_value());
                }
            >
                {item.text}
            </a>
        </li>
    }
}
