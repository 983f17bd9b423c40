//! Scroll progression: camera choreography plus scene cross-fades.

use crate::assets::{LoadOutcome, LoadTicket, MeshData};
use crate::camera::{CameraState, CameraTrack};
use crate::config::ExperienceConfig;
use crate::crossfade::{smooth_opacity, FadeSchedule, SceneRange};
use crate::error::{AssetError, ConfigError};
use crate::graph::{FrameParams, SceneGraph};
use crate::input::{InputEvent, Interaction, InteractionKind};
use crate::scenes::{Scene, SceneInstance, SceneKind};
use fnv::FnvHashMap;
use glam::Vec2;
use smallvec::SmallVec;

struct SceneEntry {
    name: String,
    kind: SceneKind,
    range: SceneRange,
    instance: SceneInstance,
    opacity: f32,
    target: f32,
    visible: bool,
    /// Bumped on dispose so in-flight loads can tell they are stale.
    generation: u64,
    disposed: bool,
}

/// Owns the camera track, the fade schedule and every resident scene.
///
/// Per frame the caller runs [`update_progression`](Self::update_progression)
/// and then [`advance`](Self::advance): the camera is always sampled before
/// any scene content is updated.
pub struct SceneController {
    track: CameraTrack,
    camera: CameraState,
    schedule: FadeSchedule,
    entries: Vec<SceneEntry>,
    by_name: FnvHashMap<String, usize>,
    visible: SmallVec<[usize; 4]>,
    scroll: f32,
    time: f32,
    pointer: Vec2,
    lerp_speed: f32,
    visibility_epsilon: f32,
    input_threshold: f32,
    interactions: Vec<Interaction>,
}

impl SceneController {
    pub fn new(config: &ExperienceConfig) -> Result<Self, ConfigError> {
        let track = config.camera_track()?;
        let schedule = config.fade_schedule()?;
        let mut by_name = FnvHashMap::default();
        let mut entries = Vec::with_capacity(config.scenes.len());
        for (i, spec) in config.scenes.iter().enumerate() {
            if by_name.insert(spec.name.clone(), i).is_some() {
                return Err(ConfigError::DuplicateScene(spec.name.clone()));
            }
            let seed = config.seed ^ (i as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
            let instance = init_or_placeholder(&spec.name, spec.kind.build(config, seed));
            let target = schedule.target_opacity(i, 0.0);
            entries.push(SceneEntry {
                name: spec.name.clone(),
                kind: instance.kind(),
                range: spec.range,
                instance,
                opacity: target,
                target,
                visible: false,
                generation: 0,
                disposed: false,
            });
        }
        log::info!(
            "[scenes] {} scenes resident, {} camera keyframes",
            entries.len(),
            track.keyframes().len()
        );
        let camera = track.sample(0.0);
        Ok(Self {
            track,
            camera,
            schedule,
            entries,
            by_name,
            visible: SmallVec::new(),
            scroll: 0.0,
            time: 0.0,
            pointer: Vec2::splat(0.5),
            lerp_speed: config.opacity_lerp_speed,
            visibility_epsilon: config.visibility_epsilon,
            input_threshold: config.input_threshold,
            interactions: Vec::new(),
        })
    }

    /// Sample the camera and recompute every scene's target opacity.
    pub fn update_progression(&mut self, scroll: f32) {
        let s = if scroll.is_finite() {
            scroll.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.scroll = s;
        self.camera = self.track.sample(s);
        for (i, e) in self.entries.iter_mut().enumerate() {
            e.target = self.schedule.target_opacity(i, s);
        }
    }

    /// Smooth opacities toward their targets, fan them out to each scene's
    /// materials and update every scene that is visible enough to matter.
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time += dt;
        self.visible.clear();
        for (i, e) in self.entries.iter_mut().enumerate() {
            if e.disposed {
                continue;
            }
            e.opacity = smooth_opacity(e.opacity, e.target, self.lerp_speed, dt);
            let now_visible = e.opacity > self.visibility_epsilon;
            if now_visible && !e.visible {
                log::debug!("[scenes] enter {}", e.name);
                e.instance.on_enter();
                self.interactions.push(Interaction::new(
                    InteractionKind::SceneEnter,
                    e.target,
                    e.kind,
                ));
            } else if !now_visible && e.visible {
                log::debug!("[scenes] exit {}", e.name);
                e.instance.on_exit();
            }
            e.visible = now_visible;
            let graph = e.instance.graph_mut();
            graph.visible = now_visible;
            graph.set_opacity(e.opacity);
            if now_visible {
                let params = FrameParams {
                    time: self.time,
                    dt,
                    opacity: e.opacity,
                    local_progress: e.range.local_progress(self.scroll),
                    camera_position: self.camera.position,
                    pointer: self.pointer,
                };
                e.instance.update(&params);
                self.visible.push(i);
            }
            e.instance.drain_notifications(&mut self.interactions);
        }
    }

    /// Deliver a pointer event to the most visible scene, if it is visible
    /// enough to take input. Returns the scene that received it.
    pub fn route_input(&mut self, event: &InputEvent) -> Option<SceneKind> {
        let pointer = event.pointer()?;
        self.pointer = pointer;
        let i = self.most_visible()?;
        let e = &mut self.entries[i];
        if e.opacity < self.input_threshold {
            return None;
        }
        let interaction = match event {
            InputEvent::MouseMove { .. } => e.instance.on_mouse_move(pointer),
            InputEvent::Click { .. } => e.instance.on_click(pointer),
            InputEvent::TouchStart { .. } => e
                .instance
                .on_click(pointer)
                .map(|it| Interaction::new(InteractionKind::Touch, it.intensity, it.scene)),
            InputEvent::KeyDown { .. } => None,
        };
        self.interactions.extend(interaction);
        Some(e.kind)
    }

    /// Index of the live scene with the highest displayed opacity.
    pub fn most_visible(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.disposed)
            .max_by(|(_, a), (_, b)| a.opacity.total_cmp(&b.opacity))
            .map(|(i, _)| i)
    }

    pub fn take_interactions(&mut self) -> Vec<Interaction> {
        std::mem::take(&mut self.interactions)
    }

    /// Start an asset load for a scene. The ticket must be handed back to
    /// [`complete_load`](Self::complete_load) once the load settles.
    pub fn request_mesh(&self, name: &str, path: &str) -> Option<LoadTicket> {
        let &scene = self.by_name.get(name)?;
        let e = &self.entries[scene];
        if e.disposed {
            return None;
        }
        log::info!("[assets] requesting {path} for {name}");
        Some(LoadTicket {
            scene,
            generation: e.generation,
            path: path.to_string(),
        })
    }

    /// Install a finished load, unless the requesting scene has since been
    /// disposed. Stale completions leave every scene untouched.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<MeshData, AssetError>,
    ) -> LoadOutcome {
        let Some(e) = self.entries.get_mut(ticket.scene) else {
            return LoadOutcome::Stale;
        };
        if e.disposed || e.generation != ticket.generation {
            log::debug!("[assets] dropping stale load of {}", ticket.path);
            return LoadOutcome::Stale;
        }
        e.instance.install_mesh(result)
    }

    /// Tear a scene down. Its slot stays in the layout but is never updated
    /// or drawn again.
    pub fn dispose_scene(&mut self, name: &str) -> bool {
        let Some(&i) = self.by_name.get(name) else {
            return false;
        };
        let e = &mut self.entries[i];
        if e.disposed {
            return false;
        }
        e.instance.dispose();
        e.generation += 1;
        e.disposed = true;
        e.visible = false;
        e.opacity = 0.0;
        self.visible.retain(|v| *v != i);
        log::info!("[scenes] disposed {name}");
        true
    }

    pub fn dispose_all(&mut self) {
        let names: Vec<String> = self.entries.iter().map(|e| e.name.clone()).collect();
        for name in names {
            self.dispose_scene(&name);
        }
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn track(&self) -> &CameraTrack {
        &self.track
    }

    pub fn schedule(&self) -> &FadeSchedule {
        &self.schedule
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn boundaries(&self) -> Vec<f32> {
        self.schedule.boundaries().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn scene(&self, name: &str) -> Option<&SceneInstance> {
        self.index_of(name).map(|i| &self.entries[i].instance)
    }

    pub fn scene_mut(&mut self, name: &str) -> Option<&mut SceneInstance> {
        let i = self.index_of(name)?;
        Some(&mut self.entries[i].instance)
    }

    /// Kind actually resident under `name` (a placeholder if init failed).
    pub fn kind_of(&self, name: &str) -> Option<SceneKind> {
        self.index_of(name).map(|i| self.entries[i].kind)
    }

    pub fn opacity(&self, name: &str) -> Option<f32> {
        self.index_of(name).map(|i| self.entries[i].opacity)
    }

    pub fn target_opacity(&self, name: &str) -> Option<f32> {
        self.index_of(name).map(|i| self.entries[i].target)
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.index_of(name).is_some_and(|i| self.entries[i].visible)
    }

    /// Displayed opacity per scene kind (the highest if a kind repeats),
    /// indexed like `SceneKind::ALL`.
    pub fn kind_weights(&self) -> [f32; SceneKind::COUNT] {
        let mut w = [0.0f32; SceneKind::COUNT];
        for e in self.entries.iter().filter(|e| !e.disposed) {
            let k = crate::ambient::voice_index(e.kind);
            w[k] = w[k].max(e.opacity);
        }
        w
    }

    /// Graphs of the scenes drawn this frame, in layout order.
    pub fn visible_graphs(&self) -> impl Iterator<Item = &SceneGraph> + '_ {
        self.visible
            .iter()
            .map(move |&i| self.entries[i].instance.graph())
    }
}

fn init_or_placeholder(name: &str, mut instance: SceneInstance) -> SceneInstance {
    match instance.init() {
        Ok(()) => instance,
        Err(e) => {
            log::warn!("[scenes] {name} failed to initialise ({e}); using placeholder");
            let mut placeholder = SceneInstance::Placeholder(crate::scenes::PlaceholderScene::new());
            if let Err(e) = placeholder.init() {
                log::error!("[scenes] placeholder for {name} failed too: {e}");
            }
            placeholder
        }
    }
}
