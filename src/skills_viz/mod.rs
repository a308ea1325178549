mod chart;

pub use chart::SkillsVisualization;

use std::f64::consts::PI;

pub(crate) const FALLBACK_COLOR: &str = "#64748b";

const DONUT_CENTER: f64 = 100.0;
const DONUT_RADIUS: f64 = 70.0;
const DONUT_INNER_RADIUS: f64 = 45.0;
/// A closed ring has coincident arc endpoints, which SVG draws as nothing.
const MAX_SWEEP_DEG: f64 = 359.99;

pub fn category_color(name: &str) -> &'static str {
    match name {
        "Languages" => "#3b82f6",
        "Applied ML" => "#0ea5e9",
        "Data & Cloud" => "#06b6d4",
        "Automation" => "#8b5cf6",
        "DevOps" => "#10b981",
        "Analytics" => "#f59e0b",
        "Strengths" => "#ec4899",
        _ => FALLBACK_COLOR,
    }
}

/// Leading decimal digits of `raw`; anything else counts as zero.
fn parse_count(raw: &str) -> u32 {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillCategory {
    pub name: String,
    pub count: u32,
    pub color: &'static str,
}

impl SkillCategory {
    /// From a `[data-skill-category]` section and its `data-skill-count`.
    pub fn parse(name: &str, count: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            count: count.map(parse_count).unwrap_or(0),
            color: category_color(name),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DonutSegment {
    pub path: String,
    pub color: &'static str,
    pub label: String,
}

/// One ring segment per category, clockwise from twelve o'clock.
pub fn donut_segments(categories: &[SkillCategory]) -> Vec<DonutSegment> {
    let total = total_count(categories);
    if total == 0 {
        return vec![];
    }

    let mut start = -90.0;
    categories
        .iter()
        .map(|cat| {
            let sweep = f64::from(cat.count) / f64::from(total) * 360.0;
            let segment = DonutSegment {
                path: segment_path(start, sweep.min(MAX_SWEEP_DEG)),
                color: cat.color,
                label: cat.name.clone(),
            };
            start += sweep;
            segment
        })
        .collect()
}

fn segment_path(start_deg: f64, sweep_deg: f64) -> String {
    let point = |radius: f64, deg: f64| {
        let rad = deg * PI / 180.0;
        (
            DONUT_CENTER + radius * rad.cos(),
            DONUT_CENTER + radius * rad.sin(),
        )
    };

    let end_deg = start_deg + sweep_deg;
    let (x1, y1) = point(DONUT_RADIUS, start_deg);
    let (x2, y2) = point(DONUT_RADIUS, end_deg);
    let (x3, y3) = point(DONUT_INNER_RADIUS, end_deg);
    let (x4, y4) = point(DONUT_INNER_RADIUS, start_deg);
    let large_arc = u8::from(sweep_deg > 180.0);

    format!(
        "M {x1:.3} {y1:.3} A {r} {r} 0 {large_arc} 1 {x2:.3} {y2:.3} L {x3:.3} {y3:.3} A {ir} {ir} 0 {large_arc} 0 {x4:.3} {y4:.3} Z",
        r = DONUT_RADIUS,
        ir = DONUT_INNER_RADIUS,
    )
}

/// Bar width relative to the largest category.
pub fn bar_percent(count: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    f64::from(count) / f64::from(max) * 100.0
}

pub fn total_count(categories: &[SkillCategory]) -> u32 {
    categories.iter().map(|c| c.count).sum()
}

/// First category with the highest count.
pub fn largest(categories: &[SkillCategory]) -> Option<&SkillCategory> {
    categories
        .iter()
        .fold(None, |best: Option<&SkillCategory>, cat| match best {
            Some(b) if cat.count <= b.count => Some(b),
            _ => Some(cat),
        })
}
