// Pure helpers for turning DOM measurements into engine input. No web_sys
// here so the host tests can include this file directly.

use glam::Vec2;

/// Document scroll position as progress through the scrollable height.
#[inline]
pub fn scroll_progress(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f32 {
    let max = scroll_height - viewport_height;
    if !(max.is_finite() && max > 0.0) || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / max).clamp(0.0, 1.0) as f32
}

/// Inverse of [`scroll_progress`]: the `scrollY` that shows `progress`.
#[inline]
pub fn scroll_offset_for(progress: f32, scroll_height: f64, viewport_height: f64) -> f64 {
    let max = (scroll_height - viewport_height).max(0.0);
    progress.clamp(0.0, 1.0) as f64 * max
}

/// +1 when scrolling down, -1 when scrolling up, 0 when unchanged.
#[inline]
pub fn scroll_direction(previous: f32, current: f32) -> f32 {
    if current > previous {
        1.0
    } else if current < previous {
        -1.0
    } else {
        0.0
    }
}

/// Client coordinates to [0,1] canvas coordinates (origin top-left).
#[inline]
pub fn client_to_uv(client: Vec2, rect_origin: Vec2, rect_size: Vec2) -> Vec2 {
    if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
        return Vec2::splat(0.5);
    }
    ((client - rect_origin) / rect_size).clamp(Vec2::ZERO, Vec2::ONE)
}

/// Keys the page handles itself instead of letting the browser scroll.
#[inline]
pub fn is_navigation_key(key: &str) -> bool {
    matches!(
        key,
        "ArrowDown" | "ArrowUp" | "PageDown" | "PageUp" | "Home" | "End" | " " | "Spacebar"
    )
}

/// Canvas backing size for a CSS size and device pixel ratio, never zero.
#[inline]
pub fn backing_size(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let w = (css_width.max(0.0) * dpr) as u32;
    let h = (css_height.max(0.0) * dpr) as u32;
    (w.max(1), h.max(1))
}
