use crate::input;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let rect = canvas.get_bounding_client_rect();
        let (w_px, h_px) = input::backing_size(rect.width(), rect.height(), w.device_pixel_ratio());
        canvas.set_width(w_px);
        canvas.set_height(h_px);
    }
}

/// Current scroll progress of the page in [0,1].
pub fn page_scroll_progress(window: &web::Window) -> f32 {
    let (height, viewport) = page_extent(window);
    input::scroll_progress(window.scroll_y().unwrap_or(0.0), height, viewport)
}

/// Scroll the page so that it shows `progress`.
pub fn scroll_page_to(window: &web::Window, progress: f32) {
    let (height, viewport) = page_extent(window);
    window.scroll_to_with_x_and_y(0.0, input::scroll_offset_for(progress, height, viewport));
}

fn page_extent(window: &web::Window) -> (f64, f64) {
    let height = window
        .document()
        .and_then(|d| d.document_element())
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    let viewport = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (height, viewport)
}
