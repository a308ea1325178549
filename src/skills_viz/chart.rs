use icons::{FileText, Tag, TrendingUp};
use leptos::mount::UnmountHandle;
use leptos::prelude::*;
use leptos::tachys::view::any_view::AnyViewState;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use super::{bar_percent, donut_segments, largest, total_count, SkillCategory};
use crate::dom;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>;
type MountedChart = UnmountHandle<AnyViewState>;

const HOVER_SHADOW: &str = "filter: drop-shadow(0 4px 8px rgba(0,0,0,0.3))";

/// Donut and bar charts of the `[data-skill-category]` sections, rendered into
/// `[data-skills-viz]`.
pub struct SkillsVisualization {
    categories: Vec<SkillCategory>,
    chart: Option<MountedChart>,
    observer: Option<web_sys::IntersectionObserver>,
    _observer_callback: Option<ObserverCallback>,
}

impl SkillsVisualization {
    pub fn attach() -> Option<Self> {
        let container = dom::query("[data-skills-viz]")?;
        let categories: Vec<SkillCategory> = dom::query_all("[data-skill-category]")
            .iter()
            .map(|section| {
                let name = section.get_attribute("data-skill-category").unwrap_or_default();
                let count = section.get_attribute("data-skill-count");
                SkillCategory::parse(&name, count.as_deref())
            })
            .collect();
        if categories.is_empty() {
            return None;
        }

        container.set_inner_html("");
        let parent = container.clone().dyn_into::<web_sys::HtmlElement>().ok()?;
        let chart = {
            let categories = categories.clone();
            leptos::mount::mount_to(parent, move || {
                view! { <SkillsDashboard categories=categories /> }.into_any()
            })
        };

        let (observer, observer_callback) = animate_bars_on_view(&container);

        Some(Self {
            categories,
            chart: Some(chart),
            observer,
            _observer_callback: observer_callback,
        })
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    pub fn destroy(mut self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
        drop(self.chart.take());
    }
}

/// Bars get `skills-viz-bar-fill--animated` the first time they scroll into view.
fn animate_bars_on_view(
    container: &web_sys::Element,
) -> (Option<web_sys::IntersectionObserver>, Option<ObserverCallback>) {
    let callback: ObserverCallback = Closure::new(
        move |entries: js_sys::Array, _observer: web_sys::IntersectionObserver| {
            for entry in entries
                .iter()
                .filter_map(|e| e.dyn_into::<web_sys::IntersectionObserverEntry>().ok())
            {
                if entry.is_intersecting() {
                    dom::add_class(&entry.target(), "skills-viz-bar-fill--animated");
                }
            }
        },
    );

    let init = web_sys::IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(0.1));

    let Ok(observer) =
        web_sys::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
    else {
        return (None, None);
    };

    for bar in dom::query_all_in(container, ".skills-viz-bar-fill") {
        observer.observe(&bar);
    }

    (Some(observer), Some(callback))
}

#[component]
fn SkillsDashboard(categories: Vec<SkillCategory>) -> impl IntoView {
    let total = total_count(&categories);
    let count = categories.len() as u32;
    let (top_count, top_name) = largest(&categories)
        .map(|c| (c.count, c.name.clone()))
        .unwrap_or_default();

    view! {
        <div class="skills-viz-grid">
            <SkillsDonut categories=categories.clone() total=total />
            <SkillsBars categories=categories />
        </div>
        <div class="skills-viz-stats">
            <div class="grid gap-4 md:grid-cols-3">
                <MetricCard value=total label="Total Skills".to_string()>
                    <FileText class="h-6 w-6 text-accent" />
                </MetricCard>
                <MetricCard value=count label="Categories".to_string()>
                    <Tag class="h-6 w-6 text-primary" />
                </MetricCard>
                <MetricCard value=top_count label=format!("Largest: {top_name}")>
                    <TrendingUp class="h-6 w-6 text-accent" />
                </MetricCard>
            </div>
        </div>
    }
}

#[component]
fn SkillsDonut(categories: Vec<SkillCategory>, total: u32) -> impl IntoView {
    let hovered: RwSignal<Option<usize>> = RwSignal::new(None);
    let segments = donut_segments(&categories);

    view! {
        <div class="skills-viz-donut">
            <h3 class="skills-viz-heading">"Skills Distribution"</h3>
            <svg
                viewBox="0 0 200 200"
                class="skills-viz-donut-svg"
                role="img"
                aria-label="Skills distribution donut chart"
            >
                <g class="skills-viz-donut-segments">
                    {segments
                        .into_iter()
                        .enumerate()
                        .map(|(i, segment)| {
                            let is_hovered = move || hovered.get() == Some(i);
                            view! {
                                <path
                                    d=segment.path
                                    fill=segment.color
                                    class="skills-viz-donut-segment"
                                    data-label=segment.label
                                    opacity=move || if is_hovered() { "1" } else { "0.9" }
                                    style=move || if is_hovered() { HOVER_SHADOW } else { "" }
                                    on:mouseenter=move |_| hovered.set(Some(i))
                                    on:mouseleave=move |_| hovered.set(None)
                                />
                            }
                        })
                        .collect_view()}
                </g>
                <text x="100" y="95" text-anchor="middle" class="skills-viz-donut-label">
                    {total}
                </text>
                <text x="100" y="110" text-anchor="middle" class="skills-viz-donut-sublabel">
                    "Skills"
                </text>
            </svg>
            <div class="skills-viz-legend">
                {categories
                    .into_iter()
                    .map(|cat| {
                        view! {
                            <div class="skills-viz-legend-item">
                                <span
                                    class="skills-viz-legend-color"
                                    style=format!("background-color: {}", cat.color)
                                ></span>
                                <span class="skills-viz-legend-label">{cat.name}</span>
                                <span class="skills-viz-legend-count">{cat.count}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
fn SkillsBars(categories: Vec<SkillCategory>) -> impl IntoView {
    let max = categories.iter().map(|c| c.count).max().unwrap_or(0);

    view! {
        <div class="skills-viz-bars">
            <h3 class="skills-viz-heading">"Skills by Category"</h3>
            <div class="skills-viz-bars-container">
                {categories
                    .into_iter()
                    .map(|cat| {
                        let style = format!(
                            "width: {}%; background-color: {};",
                            bar_percent(cat.count, max),
                            cat.color
                        );
                        view! {
                            <div class="skills-viz-bar-row">
                                <div class="skills-viz-bar-label">{cat.name}</div>
                                <div class="skills-viz-bar-track">
                                    <div
                                        class="skills-viz-bar-fill"
                                        style=style
                                        data-count=cat.count.to_string()
                                    >
                                        <span class="skills-viz-bar-count">{cat.count}</span>
                                    </div>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
fn MetricCard(value: u32, label: String, children: Children) -> impl IntoView {
    view! {
        <div class="metric-card">
            <div class="metric-card__icon">{children()}</div>
            <div class="flex flex-col gap-1">
                <div class="text-2xl font-bold text-white">{value}</div>
                <div class="text-xs text-slate-400">{label}</div>
            </div>
        </div>
    }
}
