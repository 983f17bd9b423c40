use crate::audio::AudioOut;
use crate::{dom, input};
use scrollscape_core::Experience;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Feed page scroll progress into the experience.
pub fn wire_scroll(experience: Rc<RefCell<Experience>>) {
    let Some(window) = web::window() else {
        return;
    };
    let last = Rc::new(RefCell::new(dom::page_scroll_progress(&window)));
    experience.borrow_mut().update_scroll(*last.borrow(), 1.0);
    let window_cb = window.clone();
    let closure = Closure::wrap(Box::new(move || {
        let progress = dom::page_scroll_progress(&window_cb);
        let direction = input::scroll_direction(*last.borrow(), progress);
        *last.borrow_mut() = progress;
        experience.borrow_mut().update_scroll(progress, direction);
    }) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Pause rendering and audio while the tab is hidden.
pub fn wire_visibility(experience: Rc<RefCell<Experience>>, audio: Option<Rc<AudioOut>>) {
    let Some(document) = dom::window_document() else {
        return;
    };
    let doc_cb = document.clone();
    let closure = Closure::wrap(Box::new(move || {
        let visible = doc_cb.visibility_state() == web::VisibilityState::Visible;
        experience.borrow_mut().set_visible(visible);
        if let Some(a) = &audio {
            if visible {
                a.resume();
            } else {
                a.suspend();
            }
        }
    }) as Box<dyn FnMut()>);
    _ = document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
    closure.forget();
}
