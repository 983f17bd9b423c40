// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn scroll_progress_spans_the_scrollable_height() {
    assert_eq!(scroll_progress(0.0, 3000.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(1000.0, 3000.0, 1000.0), 0.5);
    assert_eq!(scroll_progress(2000.0, 3000.0, 1000.0), 1.0);
    // overscroll bounce on touch devices
    assert_eq!(scroll_progress(-40.0, 3000.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(2100.0, 3000.0, 1000.0), 1.0);
}

#[test]
fn unscrollable_pages_report_zero() {
    assert_eq!(scroll_progress(10.0, 800.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(10.0, 1000.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(f64::NAN, 3000.0, 1000.0), 0.0);
    assert_eq!(scroll_offset_for(0.7, 800.0, 1000.0), 0.0);
}

#[test]
fn scroll_offset_inverts_progress() {
    for p in [0.0f32, 0.25, 0.55, 1.0] {
        let y = scroll_offset_for(p, 5000.0, 900.0);
        assert!((scroll_progress(y, 5000.0, 900.0) - p).abs() < 1e-6);
    }
    assert_eq!(scroll_offset_for(2.0, 5000.0, 900.0), 4100.0);
}

#[test]
fn direction_follows_the_sign_of_the_change() {
    assert_eq!(scroll_direction(0.2, 0.3), 1.0);
    assert_eq!(scroll_direction(0.3, 0.2), -1.0);
    assert_eq!(scroll_direction(0.3, 0.3), 0.0);
}

#[test]
fn client_coordinates_normalise_to_the_canvas() {
    let origin = Vec2::new(100.0, 50.0);
    let size = Vec2::new(200.0, 100.0);
    assert_eq!(client_to_uv(Vec2::new(100.0, 50.0), origin, size), Vec2::ZERO);
    assert_eq!(client_to_uv(Vec2::new(200.0, 100.0), origin, size), Vec2::splat(0.5));
    assert_eq!(client_to_uv(Vec2::new(900.0, -10.0), origin, size), Vec2::new(1.0, 0.0));
    assert_eq!(client_to_uv(Vec2::new(5.0, 5.0), origin, Vec2::ZERO), Vec2::splat(0.5));
}

#[test]
fn backing_size_is_never_zero() {
    assert_eq!(backing_size(800.0, 600.0, 2.0), (1600, 1200));
    assert_eq!(backing_size(800.0, 600.0, f64::NAN), (800, 600));
    assert_eq!(backing_size(0.0, -5.0, 1.0), (1, 1));
}

#[test]
fn every_navigation_key_moves_the_engine() {
    let boundaries = [0.3, 0.55, 0.8];
    for key in ["ArrowDown", "ArrowUp", "PageDown", "PageUp", "Home", "End", " ", "Spacebar"] {
        assert!(is_navigation_key(key));
        assert!(
            scrollscape_core::key_scroll_target(key, 0.5, &boundaries).is_some(),
            "{key:?} is intercepted but ignored"
        );
    }
    assert!(!is_navigation_key("a"));
    assert!(!is_navigation_key("Tab"));
}
