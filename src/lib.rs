#![cfg(target_arch = "wasm32")]
use constants::{
    CANVAS_ID, ERROR_RETRY_ID, START_BUTTON_ID, TERRAIN_MESH_ATTR, TERRAIN_SCENE,
};
use instant::Instant;
use scrollscape_core::{default_voices, Experience, ExperienceConfig};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod loader;
mod overlay;
mod render;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn wire_start_button(document: &web::Document, audio: Option<Rc<audio::AudioOut>>) {
    overlay::show_start(document);
    dom::add_click_listener(document, START_BUTTON_ID, move || {
        if let Some(a) = &audio {
            a.resume();
        }
        if let Some(d) = dom::window_document() {
            overlay::hide_start(&d);
        }
    });
}

fn wire_retry_button(document: &web::Document) {
    dom::add_click_listener(document, ERROR_RETRY_ID, || {
        if let Some(w) = web::window() {
            _ = w.location().reload();
        }
    });
}

/// Show the fallback message and offer a reload.
fn fail_visibly(document: &web::Document, message: &str) {
    log::error!("[init] {message}");
    overlay::show_error(document, message);
    wire_retry_button(document);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("scrollscape starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    // Fresh particle layouts and cell colonies on every visit.
    let seed = ((js_sys::Math::random() * u32::MAX as f64) as u64) << 32
        | (js_sys::Math::random() * u32::MAX as f64) as u64;
    log::info!("[init] scene seed {seed:#018x}");
    let config = ExperienceConfig {
        seed,
        ..ExperienceConfig::default()
    };
    let experience = match Experience::new(config) {
        Ok(e) => Rc::new(RefCell::new(e)),
        Err(e) => {
            fail_visibly(&document, &format!("Scene configuration is invalid: {e}"));
            return Ok(());
        }
    };

    // Audio is optional; the visuals run without it.
    let audio = match audio::AudioOut::new(&default_voices()) {
        Ok(a) => Some(Rc::new(a)),
        Err(e) => {
            log::warn!("[audio] unavailable: {:?}", e);
            None
        }
    };
    wire_start_button(&document, audio.clone());

    let gpu = match frame::init_gpu(&canvas).await {
        Ok(g) => g,
        Err(e) => {
            log::warn!("[gpu] init failed: {:?}", e);
            if let Some(a) = &audio {
                a.suspend();
            }
            fail_visibly(
                &document,
                "This browser could not start WebGPU. Try a recent Chrome, Edge or Safari.",
            );
            return Ok(());
        }
    };

    events::wire_scroll(experience.clone());
    events::wire_pointer(&canvas, experience.clone());
    events::wire_keyboard(experience.clone());
    events::wire_visibility(experience.clone(), audio.clone());

    if let Some(path) = canvas.get_attribute(TERRAIN_MESH_ATTR) {
        loader::spawn_mesh_load(experience.clone(), TERRAIN_SCENE, &path);
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        experience,
        gpu,
        audio,
        canvas,
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
