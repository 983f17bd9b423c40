use crate::ambient::{default_voices, AmbientEngine, ToneEvent};
use crate::assets::{LoadOutcome, LoadTicket, MeshData};
use crate::camera::CameraState;
use crate::config::ExperienceConfig;
use crate::constants::MAX_FRAME_DT_SEC;
use crate::controller::SceneController;
use crate::error::{AssetError, ConfigError};
use crate::graph::SceneGraph;
use crate::input::{key_scroll_target, InputEvent};
use std::time::Duration;

/// Host-independent application core: scroll in, camera, scene graphs and
/// tones out. The front-end owns the clock and calls [`frame`](Self::frame)
/// once per animation frame.
pub struct Experience {
    config: ExperienceConfig,
    controller: SceneController,
    ambient: AmbientEngine,
    scroll: f32,
    direction: f32,
    visible: bool,
    // first frame after a resume must not see the time spent hidden
    skip_next_dt: bool,
    tones: Vec<ToneEvent>,
    frames: u64,
}

impl Experience {
    pub fn new(config: ExperienceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = SceneController::new(&config)?;
        let ambient = AmbientEngine::new(default_voices(), config.ambient.clone(), config.seed);
        Ok(Self {
            config,
            controller,
            ambient,
            scroll: 0.0,
            direction: 1.0,
            visible: true,
            skip_next_dt: false,
            tones: Vec::new(),
            frames: 0,
        })
    }

    pub fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    /// Latest scroll progress from the host. Takes effect on the next frame.
    pub fn update_scroll(&mut self, progress: f32, direction: f32) {
        self.scroll = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if direction.is_finite() && direction != 0.0 {
            self.direction = direction.signum();
        }
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// Pause or resume. Hidden experiences produce no frames and no sound.
    pub fn set_visible(&mut self, visible: bool) {
        if visible && !self.visible {
            self.skip_next_dt = true;
            log::info!("[experience] resumed");
        } else if !visible && self.visible {
            log::info!("[experience] paused");
        }
        self.visible = visible;
        self.ambient.set_muted(!visible);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Run one frame: camera, then scene content, then audio scheduling.
    /// Returns false (and does nothing) while paused.
    pub fn frame(&mut self, dt_sec: f32) -> bool {
        if !self.visible {
            return false;
        }
        let dt = if std::mem::take(&mut self.skip_next_dt) || !dt_sec.is_finite() {
            0.0
        } else {
            dt_sec.clamp(0.0, MAX_FRAME_DT_SEC)
        };
        self.controller.update_progression(self.scroll);
        self.controller.advance(dt);
        for interaction in self.controller.take_interactions() {
            self.tones.push(self.ambient.interaction_tone(&interaction));
        }
        let weights = self.controller.kind_weights();
        self.ambient
            .tick(Duration::from_secs_f32(dt), &weights, &mut self.tones);
        self.frames += 1;
        true
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Route an input event. Navigation keys move the scroll position and
    /// return the new target so the host can scroll the page to match.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<f32> {
        match event {
            InputEvent::KeyDown { key } => {
                let boundaries = self.controller.boundaries();
                let target = key_scroll_target(key, self.scroll, &boundaries)?;
                let direction = target - self.scroll;
                self.update_scroll(target, direction);
                Some(target)
            }
            _ => {
                self.controller.route_input(event);
                None
            }
        }
    }

    pub fn take_tones(&mut self) -> Vec<ToneEvent> {
        std::mem::take(&mut self.tones)
    }

    pub fn camera(&self) -> &CameraState {
        self.controller.camera()
    }

    pub fn visible_graphs(&self) -> impl Iterator<Item = &SceneGraph> + '_ {
        self.controller.visible_graphs()
    }

    pub fn request_mesh(&self, scene: &str, path: &str) -> Option<LoadTicket> {
        self.controller.request_mesh(scene, path)
    }

    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<MeshData, AssetError>,
    ) -> LoadOutcome {
        self.controller.complete_load(ticket, result)
    }

    pub fn controller(&self) -> &SceneController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SceneController {
        &mut self.controller
    }

    pub fn ambient_mut(&mut self) -> &mut AmbientEngine {
        &mut self.ambient
    }
}
