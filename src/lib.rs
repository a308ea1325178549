mod components;
mod dom;

pub mod carousel;
pub mod config;
pub mod mobile_menu;
pub mod project_filter;
pub mod search;
pub mod skills_viz;
pub mod toc;

use std::cell::RefCell;

use crate::carousel::TestimonialsCarousel;
use crate::config::SiteConfig;
use crate::mobile_menu::MobileMenu;
use crate::project_filter::ProjectFilter;
use crate::search::SiteSearch;
use crate::skills_viz::SkillsVisualization;
use crate::toc::TableOfContents;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

/// Every enhancement attached to the current page. A member is `None` when
/// the page lacks its markup.
pub struct Site {
    pub toc: Option<TableOfContents>,
    pub search: Option<SiteSearch>,
    pub carousel: Option<TestimonialsCarousel>,
    pub mobile_menu: Option<MobileMenu>,
    pub project_filter: Option<ProjectFilter>,
    pub skills_viz: Option<SkillsVisualization>,
}

impl Site {
    pub fn attach(config: &SiteConfig) -> Self {
        dom::stamp_current_year();

        Self {
            toc: TableOfContents::attach(),
            search: SiteSearch::attach(config),
            carousel: TestimonialsCarousel::attach(),
            mobile_menu: MobileMenu::attach(),
            project_filter: ProjectFilter::attach(),
            skills_viz: SkillsVisualization::attach(),
        }
    }

    pub fn destroy(self) {
        if let Some(toc) = self.toc {
            toc.destroy();
        }
        if let Some(search) = self.search {
            search.destroy();
        }
        if let Some(carousel) = self.carousel {
            carousel.destroy();
        }
        if let Some(menu) = self.mobile_menu {
            menu.destroy();
        }
        if let Some(filter) = self.project_filter {
            filter.destroy();
        }
        if let Some(viz) = self.skills_viz {
            viz.destroy();
        }
    }
}

thread_local! {
    static SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
}

/// Attach every enhancement to the page, replacing a previous attachment.
pub fn start() {
    let site = Site::attach(&SiteConfig::new());
    if let Some(previous) = SITE.with(|s| s.replace(Some(site))) {
        previous.destroy();
    }
}

/// Remove listeners, timers and mounted markup.
pub fn teardown() {
    if let Some(site) = SITE.with(|s| s.take()) {
        site.destroy();
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    dom::on_ready(start);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use std::rc::Rc;

    use crate::search::{parse_index, IndexState, SearchIndex};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fixture(html: &str) -> web_sys::Element {
        let document = dom::document().expect("document");
        let root = document.create_element("div").expect("create fixture");
        root.set_inner_html(html);
        document
            .body()
            .expect("body")
            .append_child(&root)
            .expect("append fixture");
        root
    }

    async fn sleep(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _| {
            web_sys::window()
                .expect("window")
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .expect("set timeout");
        });
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .expect("timeout resolves");
    }

    fn click(selector: &str) {
        dom::query(selector)
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
            .expect("clickable element")
            .click();
    }

    fn key_event(key: &str, ctrl: bool) -> web_sys::KeyboardEvent {
        let init = web_sys::KeyboardEventInit::new();
        init.set_key(key);
        init.set_ctrl_key(ctrl);
        init.set_bubbles(true);
        init.set_cancelable(true);
        web_sys::KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).expect("keydown")
    }

    fn location_hash() -> String {
        web_sys::window()
            .expect("window")
            .location()
            .hash()
            .unwrap_or_default()
    }

    fn search_input() -> web_sys::HtmlInputElement {
        dom::query(".search-input")
            .and_then(|el| el.dyn_into().ok())
            .expect("search input")
    }

    fn type_query(query: &str) {
        let input = search_input();
        input.set_value(query);
        let init = web_sys::EventInit::new();
        init.set_bubbles(true);
        let ev = web_sys::Event::new_with_event_init_dict("input", &init).expect("input event");
        input.dispatch_event(&ev).expect("dispatch input");
    }

    fn rust_index() -> SearchIndex {
        parse_index(
            r##"[
                {"type": "project", "title": "Rust Parser", "excerpt": "a", "url": "#rust-parser", "tags": []},
                {"type": "blog", "title": "Rust Async", "excerpt": "b", "url": "#rust-async", "tags": []},
                {"type": "page", "title": "Rust Notes", "excerpt": "c", "url": "#rust-notes", "tags": []}
            ]"##,
        )
        .expect("index should parse")
    }

    fn selected_rows() -> Vec<web_sys::Element> {
        dom::query_all(".search-result--selected")
    }

    #[wasm_bindgen_test]
    fn test_toc_renders_one_link_per_heading() {
        let root = fixture(
            r#"<aside data-toc></aside>
            <article data-toc-content>
                <h2>Overview</h2><p>a</p>
                <h3 id="setup">Setup</h3><p>b</p>
                <h2>Next Steps!</h2><p>c</p>
            </article>"#,
        );

        let toc = TableOfContents::attach().expect("outline should attach");
        let ids: Vec<&str> = toc.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["overview", "setup", "next-steps"]);

        let links = dom::query_all("[data-toc] a.toc__link");
        assert_eq!(links.len(), 3);
        assert!(dom::query("#next-steps").is_some());

        let active = dom::query_all("[data-toc] .toc__link--active");
        assert_eq!(active.len(), 1);
        assert!(toc.active_id().is_some());

        toc.destroy();
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_toc_hides_without_headings() {
        let root = fixture(r#"<aside data-toc></aside><article data-toc-content><p>x</p></article>"#);

        assert!(TableOfContents::attach().is_none());
        let container = dom::query("[data-toc]").expect("container");
        assert!(container.class_list().contains("hidden"));

        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_search_modal_resets_on_reopen() {
        let search = SiteSearch::attach(&SiteConfig::default()).expect("search should mount");
        assert!(dom::query("[data-search-modal]").is_some());

        search.open();
        assert!(search.is_open());

        type_query("rag");
        assert_eq!(search.session().query(), "rag");

        search.close();
        search.open();
        assert_eq!(search.session().query(), "");
        assert_eq!(search.session().selected_index(), 0);

        search.destroy();
        assert!(dom::query("[data-search-modal]").is_none());
    }

    #[wasm_bindgen_test]
    fn test_mobile_menu_toggles_and_closes() {
        let root = fixture(
            r#"<button data-mobile-menu-button aria-expanded="false"></button>
            <nav data-mobile-menu-drawer><a href="/about">About</a></nav>
            <div data-mobile-menu-overlay></div>"#,
        );

        let menu = MobileMenu::attach().expect("menu should attach");
        menu.toggle();
        assert!(menu.is_open());
        let drawer = dom::query("[data-mobile-menu-drawer]").expect("drawer");
        assert!(drawer.class_list().contains("mobile-menu-drawer--open"));

        menu.close();
        assert!(!menu.is_open());
        let button = dom::query("[data-mobile-menu-button]").expect("button");
        assert_eq!(button.get_attribute("aria-expanded").as_deref(), Some("false"));

        menu.destroy();
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_carousel_shows_one_slide() {
        let root = fixture(
            r#"<section data-testimonials-carousel>
                <div data-testimonials-track>
                    <div data-testimonial-slide>a</div>
                    <div data-testimonial-slide>b</div>
                </div>
                <button data-testimonials-prev></button>
                <button data-testimonials-next></button>
                <p data-testimonials-live></p>
            </section>"#,
        );

        let carousel = TestimonialsCarousel::attach().expect("carousel should attach");
        assert_eq!(dom::query_all(".testimonial-slide--active").len(), 1);

        carousel.next();
        assert_eq!(carousel.state().index(), 1);
        let live = dom::query("[data-testimonials-live]").expect("live region");
        assert_eq!(live.text_content().as_deref(), Some("Testimonial 2 of 2"));

        carousel.destroy();
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_debouncer_keeps_one_pending_timer() {
        let debouncer = dom::Debouncer::new(10_000);
        debouncer.schedule(|| {});
        debouncer.schedule(|| {});
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());
    }

    #[wasm_bindgen_test]
    fn test_debouncer_drops_replaced_and_cancelled_tasks() {
        let token = Rc::new(());
        let debouncer = dom::Debouncer::new(10_000);

        let held = token.clone();
        debouncer.schedule(move || drop(held));
        assert_eq!(Rc::strong_count(&token), 2);

        debouncer.schedule(|| {});
        assert_eq!(Rc::strong_count(&token), 1);

        let held = token.clone();
        debouncer.schedule(move || drop(held));
        debouncer.cancel();
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[wasm_bindgen_test]
    async fn test_debouncer_runs_only_the_last_task() {
        let runs = Rc::new(std::cell::Cell::new(0));
        let debouncer = dom::Debouncer::new(5);
        for n in 1..=3 {
            let runs = runs.clone();
            debouncer.schedule(move || runs.set(runs.get() + n));
        }

        sleep(50).await;
        assert_eq!(runs.get(), 3);
        assert!(!debouncer.is_pending());
    }

    #[wasm_bindgen_test]
    fn test_config_reads_either_env_spelling() {
        let set = |env: &js_sys::Object, key: &str, value: &str| {
            js_sys::Reflect::set(env, &JsValue::from_str(key), &JsValue::from_str(value))
                .expect("set env key");
        };

        let upper = js_sys::Object::new();
        set(&upper, "SEARCH_INDEX_URL", "/upper.json");
        set(&upper, "search_index_url", "/lower.json");
        assert_eq!(SiteConfig::from_env(&upper).search_index_url, "/upper.json");

        let lower = js_sys::Object::new();
        set(&lower, "search_index_url", "/lower.json");
        assert_eq!(SiteConfig::from_env(&lower).search_index_url, "/lower.json");

        assert_eq!(SiteConfig::from_env(&js_sys::Object::new().into()), SiteConfig::default());
        assert_eq!(SiteConfig::from_env(&JsValue::UNDEFINED), SiteConfig::default());
    }

    #[wasm_bindgen_test]
    fn test_toc_destroy_removes_outline() {
        let root = fixture(
            r#"<aside data-toc></aside>
            <article data-toc-content><h2>One</h2><h2>Two</h2></article>"#,
        );

        let toc = TableOfContents::attach().expect("outline should attach");
        assert_eq!(dom::query_all(".toc__link").len(), 2);

        toc.destroy();
        assert!(dom::query_all(".toc__link").is_empty());

        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_toc_link_click_updates_hash() {
        let root = fixture(
            r#"<aside data-toc></aside>
            <article data-toc-content><h2>Intro</h2><h2 id="setup">Setup</h2></article>"#,
        );

        let toc = TableOfContents::attach().expect("outline should attach");
        click("[data-toc-link='setup']");
        assert_eq!(location_hash(), "#setup");

        toc.destroy();
        root.remove();
    }

    #[wasm_bindgen_test]
    async fn test_arrow_keys_move_a_single_selection() {
        let search = SiteSearch::with_index(rust_index()).expect("search should mount");
        search.open();
        type_query("rust");
        sleep(20).await;
        assert_eq!(search.session().results().len(), 3);

        let input = search_input();
        for _ in 0..2 {
            input.dispatch_event(&key_event("ArrowDown", false)).expect("dispatch");
        }
        sleep(20).await;

        let selected = selected_rows();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].get_attribute("aria-selected").as_deref(), Some("true"));
        assert_eq!(selected[0].get_attribute("data-search-result-index").as_deref(), Some("2"));

        // Already on the last row.
        input.dispatch_event(&key_event("ArrowDown", false)).expect("dispatch");
        sleep(20).await;
        let selected = selected_rows();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].get_attribute("data-search-result-index").as_deref(), Some("2"));
        assert_eq!(search.session().selected_index(), 2);

        search.destroy();
    }

    #[wasm_bindgen_test]
    async fn test_result_click_closes_and_navigates() {
        let search = SiteSearch::with_index(rust_index()).expect("search should mount");
        search.open();
        type_query("rust async");
        sleep(20).await;

        click("[data-search-result-index='0']");
        assert!(!search.is_open());
        assert_eq!(location_hash(), "#rust-async");

        search.destroy();
    }

    #[wasm_bindgen_test]
    async fn test_shortcut_opens_and_escape_closes() {
        let search = SiteSearch::with_index(rust_index()).expect("search should mount");
        let window = web_sys::window().expect("window");

        window.dispatch_event(&key_event("k", true)).expect("dispatch");
        assert!(search.is_open());
        sleep(20).await;
        assert!(dom::query(".search-modal--active").is_some());

        window.dispatch_event(&key_event("Escape", false)).expect("dispatch");
        assert!(!search.is_open());
        sleep(20).await;
        assert!(dom::query(".search-modal--active").is_none());

        search.destroy();
    }

    #[wasm_bindgen_test]
    fn test_trigger_opens_and_overlay_closes() {
        let root = fixture(r#"<button type="button" data-search-trigger>Search</button>"#);
        let search = SiteSearch::with_index(rust_index()).expect("search should mount");

        click("[data-search-trigger]");
        assert!(search.is_open());

        click("[data-search-overlay]");
        assert!(!search.is_open());

        search.destroy();
        root.remove();
    }

    #[wasm_bindgen_test]
    async fn test_missing_index_fails() {
        let config = SiteConfig {
            search_index_url: "/missing-search-index.json".to_string(),
        };
        let search = SiteSearch::attach(&config).expect("search should mount");

        for _ in 0..100 {
            if !matches!(search.index_state(), IndexState::Loading) {
                break;
            }
            sleep(20).await;
        }
        assert!(matches!(search.index_state(), IndexState::Failed));

        search.open();
        type_query("rust");
        assert!(search.session().results().is_empty());

        search.destroy();
    }

    #[wasm_bindgen_test]
    fn test_project_filter_hides_other_cards() {
        let root = fixture(
            r#"<button data-filter value="all">All</button>
            <button data-filter value="ml">Machine Learning</button>
            <button data-filter value="devops">DevOps</button>
            <p data-filter-status></p>
            <div data-project-grid>
                <article data-project-card data-tags="ml, data">a</article>
                <article data-project-card data-tags="web">b</article>
            </div>"#,
        );

        let filter = ProjectFilter::attach().expect("filter should attach");
        let status = dom::query("[data-filter-status]").expect("status");
        assert_eq!(
            status.text_content().as_deref(),
            Some("Showing 2 projects filtered by all projects.")
        );

        click("[data-filter][value='ml']");
        assert_eq!(filter.active(), "ml");
        let cards = dom::query_all("[data-project-card]");
        assert!(!cards[0].has_attribute("hidden"));
        assert!(cards[1].has_attribute("hidden"));
        assert_eq!(cards[1].get_attribute("aria-hidden").as_deref(), Some("true"));
        assert_eq!(
            status.text_content().as_deref(),
            Some("Showing 1 project filtered by machine learning.")
        );
        let pressed = dom::query("[data-filter][value='ml']").expect("ml button");
        assert_eq!(pressed.get_attribute("aria-pressed").as_deref(), Some("true"));

        filter.select("devops");
        assert_eq!(
            status.text_content().as_deref(),
            Some("No projects match devops. Showing zero results.")
        );
        let empty = dom::query("[data-project-grid] > p").expect("empty state");
        assert!(!empty.has_attribute("hidden"));

        filter.destroy();
        assert!(dom::query("[data-project-grid] > p").is_none());
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_skills_viz_renders_charts() {
        let root = fixture(
            r#"<div data-skills-viz></div>
            <section data-skill-category="Languages" data-skill-count="6"></section>
            <section data-skill-category="DevOps" data-skill-count="3"></section>"#,
        );

        let viz = SkillsVisualization::attach().expect("chart should attach");
        assert_eq!(viz.categories().len(), 2);
        assert_eq!(dom::query_all(".skills-viz-donut-segment").len(), 2);

        let bars = dom::query_all(".skills-viz-bar-fill");
        assert_eq!(bars.len(), 2);
        let style = |el: &web_sys::Element| el.get_attribute("style").unwrap_or_default();
        assert!(style(&bars[0]).contains("width: 100%"));
        assert!(style(&bars[1]).contains("width: 50%"));

        let stats = dom::query(".skills-viz-stats")
            .and_then(|el| el.text_content())
            .unwrap_or_default();
        assert!(stats.contains("Largest: Languages"));
        assert!(stats.contains("Total Skills"));

        viz.destroy();
        assert!(dom::query(".skills-viz-grid").is_none());
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_skills_viz_needs_categories() {
        let root = fixture(r#"<div data-skills-viz></div>"#);
        assert!(SkillsVisualization::attach().is_none());
        root.remove();
    }
}
