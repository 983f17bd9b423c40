use crate::input;
use glam::Vec2;
use scrollscape_core::{Experience, InputEvent};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
fn canvas_uv(canvas: &web::HtmlCanvasElement, client_x: f32, client_y: f32) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    input::client_to_uv(
        Vec2::new(client_x, client_y),
        Vec2::new(rect.left() as f32, rect.top() as f32),
        Vec2::new(rect.width() as f32, rect.height() as f32),
    )
}

pub fn wire_pointer(canvas: &web::HtmlCanvasElement, experience: Rc<RefCell<Experience>>) {
    wire_pointermove(canvas, experience.clone());
    wire_click(canvas, experience.clone());
    wire_touchstart(canvas, experience);
}

fn wire_pointermove(canvas: &web::HtmlCanvasElement, experience: Rc<RefCell<Experience>>) {
    let canvas_cb = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pointer = canvas_uv(&canvas_cb, ev.client_x() as f32, ev.client_y() as f32);
        experience
            .borrow_mut()
            .handle_input(&InputEvent::MouseMove { pointer });
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_click(canvas: &web::HtmlCanvasElement, experience: Rc<RefCell<Experience>>) {
    let canvas_cb = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let pointer = canvas_uv(&canvas_cb, ev.client_x() as f32, ev.client_y() as f32);
        log::debug!("[input] click at ({:.2}, {:.2})", pointer.x, pointer.y);
        experience
            .borrow_mut()
            .handle_input(&InputEvent::Click { pointer });
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_touchstart(canvas: &web::HtmlCanvasElement, experience: Rc<RefCell<Experience>>) {
    let canvas_cb = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        let Some(touch) = ev.touches().get(0) else {
            return;
        };
        let pointer = canvas_uv(&canvas_cb, touch.client_x() as f32, touch.client_y() as f32);
        experience
            .borrow_mut()
            .handle_input(&InputEvent::TouchStart { pointer });
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
    closure.forget();
}
