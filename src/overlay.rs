use crate::constants::{ERROR_MESSAGE_ID, ERROR_OVERLAY_ID, START_OVERLAY_ID};
use web_sys as web;

#[inline]
fn set_shown(document: &web::Document, id: &str, shown: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        let cl = el.class_list();
        if shown {
            _ = cl.remove_1("hidden");
            // fallback for environments without CSS class
            _ = el.set_attribute("style", "");
        } else {
            _ = cl.add_1("hidden");
            _ = el.set_attribute("style", "display:none");
        }
    }
}

#[inline]
pub fn show_start(document: &web::Document) {
    set_shown(document, START_OVERLAY_ID, true);
}

#[inline]
pub fn hide_start(document: &web::Document) {
    set_shown(document, START_OVERLAY_ID, false);
}

/// Replace the canvas with a message and the retry button.
pub fn show_error(document: &web::Document, message: &str) {
    if let Some(el) = document.get_element_by_id(ERROR_MESSAGE_ID) {
        el.set_text_content(Some(message));
    }
    hide_start(document);
    set_shown(document, ERROR_OVERLAY_ID, true);
}

#[inline]
pub fn hide_error(document: &web::Document) {
    set_shown(document, ERROR_OVERLAY_ID, false);
}
