use crate::audio::AudioOut;
use crate::render;
use instant::Instant;
use scrollscape_core::Experience;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub experience: Rc<RefCell<Experience>>,
    pub gpu: render::GpuState<'a>,
    pub audio: Option<Rc<AudioOut>>,
    pub canvas: web::HtmlCanvasElement,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        // The experience clamps long gaps and skips the first frame after a resume.
        if !self.experience.borrow_mut().frame(dt_sec) {
            return;
        }

        let tones = self.experience.borrow_mut().take_tones();
        if let Some(audio) = &self.audio {
            audio.play(&tones);
        }

        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());
        let exp = self.experience.borrow();
        if let Err(e) = self.gpu.render(exp.camera(), exp.visible_graphs()) {
            log::error!("[gpu] render error: {:?}", e);
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> anyhow::Result<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    render::GpuState::new(leaked_canvas).await
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
