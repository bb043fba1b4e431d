//! On-the-fly marker icon synthesis.
//!
//! Pure functions from a [`LocationGroup`] to a renderable descriptor:
//! a fixed pin image for single events, a speech-bubble badge showing the
//! remaining count for single deals, and a tiered circle badge for clusters.
//! Badges are emitted as self-contained SVG documents so any renderer that
//! can rasterize SVG can consume them without knowing the drawing rules.

use crate::core::item::Category;
use crate::spatial::clustering::LocationGroup;

/// Fixed pin shown for single event items
pub const EVENT_PIN_ASSET: &str = "/img/map/event-pin.png";

const BADGE_HEIGHT: u32 = 35;
const BADGE_TAIL_HEIGHT: u32 = 8;
const NEUTRAL_FILL: &str = "#9e9e9e";

/// Renderable icon for one marker
#[derive(Debug, Clone, PartialEq)]
pub enum IconDescriptor {
    /// Fixed image reference
    Pin { asset: &'static str },
    /// Speech-bubble badge with the remaining count for one item.
    /// `height` is the bubble body; the SVG adds the tail beneath it.
    RemainingBadge { svg: String, width: u32, height: u32 },
    /// Filled circle with the item count for a multi-item cell
    ClusterBadge { svg: String, diameter: u32, count: usize },
}

/// Deterministic category→color table; unrecognized categories fall back to
/// a neutral gray
fn category_fill(category: Option<Category>) -> &'static str {
    match category {
        Some(Category::Event) => "#7b1fa2",
        Some(Category::Gourmet) => "#e64a19",
        Some(Category::Retail) => "#1976d2",
        Some(Category::Service) => "#388e3c",
        None => NEUTRAL_FILL,
    }
}

/// Synthesizes the icon for a group.
///
/// Pure and total for any well-formed group; an empty group is a programmer
/// error upstream and fails fast in development builds. Single non-event
/// members are expected to carry a remaining count — items without one must
/// already have been excluded by the candidate constraints.
pub fn icon_for(group: &LocationGroup) -> IconDescriptor {
    debug_assert!(!group.members.is_empty(), "icon_for requires a non-empty group");

    if group.members.len() == 1 {
        let item = &group.members[0];
        if item.is_event() {
            return IconDescriptor::Pin {
                asset: EVENT_PIN_ASSET,
            };
        }
        remaining_badge(item.remaining_count.unwrap_or(0), item.category)
    } else {
        cluster_badge(group.members.len())
    }
}

/// Badge width: 10 px per character plus padding, 90 px minimum
fn badge_width(label: &str) -> u32 {
    let chars = label.chars().count() as u32;
    (chars * 10 + 20).max(90)
}

fn remaining_badge(count: u32, category: Option<Category>) -> IconDescriptor {
    let unit = category.map(|c| c.count_unit()).unwrap_or("個");
    let label = format!("残り{}{}", count, unit);
    let width = badge_width(&label);
    let fill = category_fill(category);
    let total_height = BADGE_HEIGHT + BADGE_TAIL_HEIGHT;
    let tail_left = width / 2 - 6;
    let tail_right = width / 2 + 6;
    let tail_center = width / 2;

    let svg = format!(
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{th}" viewBox="0 0 {w} {th}">"##,
            r##"<rect x="0" y="0" width="{w}" height="{h}" rx="8" fill="{fill}"/>"##,
            r##"<polygon points="{tl},{h} {tr},{h} {tc},{th}" fill="{fill}"/>"##,
            r##"<text x="{tc}" y="23" font-size="14" fill="#ffffff" text-anchor="middle" font-weight="bold">{label}</text>"##,
            r##"</svg>"##
        ),
        w = width,
        h = BADGE_HEIGHT,
        th = total_height,
        fill = fill,
        tl = tail_left,
        tr = tail_right,
        tc = tail_center,
        label = label,
    );

    IconDescriptor::RemainingBadge {
        svg,
        width,
        height: BADGE_HEIGHT,
    }
}

fn cluster_badge(count: usize) -> IconDescriptor {
    // Tiered sizing keeps two- and three-digit counts readable
    let (diameter, font_size) = match count {
        0..=9 => (40, 16),
        10..=99 => (50, 18),
        _ => (60, 20),
    };
    let radius = diameter / 2;
    let text_y = radius + font_size / 2 - 2;

    let svg = format!(
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{d}" height="{d}" viewBox="0 0 {d} {d}">"##,
            r##"<circle cx="{r}" cy="{r}" r="{r}" fill="#d32f2f"/>"##,
            r##"<text x="{r}" y="{ty}" font-size="{fs}" fill="#ffffff" text-anchor="middle" font-weight="bold">{count}</text>"##,
            r##"</svg>"##
        ),
        d = diameter,
        r = radius,
        ty = text_y,
        fs = font_size,
        count = count,
    );

    IconDescriptor::ClusterBadge {
        svg,
        diameter,
        count,
    }
}
