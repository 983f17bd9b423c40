use crate::{dom, input};
use scrollscape_core::{Experience, InputEvent};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Section navigation: arrow/page keys jump between scene boundaries.
pub fn handle_global_keydown(ev: &web::KeyboardEvent, experience: &Rc<RefCell<Experience>>) {
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    let key = ev.key();
    if !input::is_navigation_key(&key) {
        return;
    }
    let target = experience
        .borrow_mut()
        .handle_input(&InputEvent::KeyDown { key });
    if let (Some(progress), Some(window)) = (target, web::window()) {
        ev.prevent_default();
        dom::scroll_page_to(&window, progress);
    }
}

pub fn wire_keyboard(experience: Rc<RefCell<Experience>>) {
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &experience);
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
