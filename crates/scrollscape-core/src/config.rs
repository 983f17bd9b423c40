use crate::ambient::AmbientParams;
use crate::camera::{CameraKeyframe, CameraTrack};
use crate::cells::ColonyConfig;
use crate::constants::{
    DEFAULT_FADE_MARGIN, DEFAULT_FOV_DEG, INPUT_OPACITY_THRESHOLD, OPACITY_LERP_SPEED,
    VISIBILITY_EPSILON,
};
use crate::crossfade::{FadeSchedule, SceneRange};
use crate::easing::Easing;
use crate::error::ConfigError;
use crate::geometry::GeometryConfig;
use crate::particles::ParticleConfig;
use crate::scenes::SceneKind;
use crate::terrain::TerrainConfig;
use fnv::FnvHashSet;
use glam::Vec3;

/// One entry of the scroll layout.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSpec {
    pub name: String,
    pub kind: SceneKind,
    pub range: SceneRange,
}

impl SceneSpec {
    pub fn new(name: impl Into<String>, kind: SceneKind, start: f32, end: f32) -> Self {
        Self {
            name: name.into(),
            kind,
            range: SceneRange::new(start, end),
        }
    }
}

/// Everything the experience needs, fixed at construction.
#[derive(Clone, Debug)]
pub struct ExperienceConfig {
    pub keyframes: Vec<CameraKeyframe>,
    /// Shared by the camera track and the cross-fade ramps.
    pub easing: Easing,
    pub scenes: Vec<SceneSpec>,
    pub fade_margin: f32,
    pub opacity_lerp_speed: f32,
    pub visibility_epsilon: f32,
    pub input_threshold: f32,
    pub terrain: TerrainConfig,
    pub particles: ParticleConfig,
    pub colony: ColonyConfig,
    pub geometry: GeometryConfig,
    pub ambient: AmbientParams,
    pub seed: u64,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            keyframes: default_keyframes(),
            easing: Easing::STANDARD,
            scenes: default_scenes(),
            fade_margin: DEFAULT_FADE_MARGIN,
            opacity_lerp_speed: OPACITY_LERP_SPEED,
            visibility_epsilon: VISIBILITY_EPSILON,
            input_threshold: INPUT_OPACITY_THRESHOLD,
            terrain: TerrainConfig::default(),
            particles: ParticleConfig::default(),
            colony: ColonyConfig::default(),
            geometry: GeometryConfig::default(),
            ambient: AmbientParams::default(),
            seed: 0x5C01_15CA_9E00_0001,
        }
    }
}

impl ExperienceConfig {
    pub fn ranges(&self) -> Vec<SceneRange> {
        self.scenes.iter().map(|s| s.range).collect()
    }

    pub fn camera_track(&self) -> Result<CameraTrack, ConfigError> {
        CameraTrack::new(self.keyframes.clone(), self.easing)
    }

    pub fn fade_schedule(&self) -> Result<FadeSchedule, ConfigError> {
        FadeSchedule::new(self.ranges(), self.fade_margin, self.easing)
    }

    /// Check the layout-level constraints: camera track, scene ranges, fade
    /// margin, unique names and the shared tuning values.
    ///
    /// Per-scene parameter sets are checked by each scene's `init`; a scene
    /// that rejects its parameters is replaced by a placeholder instead of
    /// failing the whole experience.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera_track()?;
        self.fade_schedule()?;
        let mut names = FnvHashSet::default();
        for spec in &self.scenes {
            if !names.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateScene(spec.name.clone()));
            }
        }
        check_unit("opacity_lerp_speed", self.opacity_lerp_speed, false)?;
        check_unit("visibility_epsilon", self.visibility_epsilon, true)?;
        check_unit("input_threshold", self.input_threshold, true)?;
        if !(self.ambient.bpm.is_finite() && self.ambient.bpm > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "ambient.bpm",
                reason: "must be a positive number",
            });
        }
        if self.ambient.scale.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "ambient.scale",
                reason: "needs at least one degree",
            });
        }
        Ok(())
    }
}

fn check_unit(name: &'static str, v: f32, allow_zero: bool) -> Result<(), ConfigError> {
    let ok = v.is_finite() && v <= 1.0 && if allow_zero { v >= 0.0 } else { v > 0.0 };
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: "must lie in [0, 1]",
        })
    }
}

/// Terrain, network, cells, geometry.
pub fn default_scenes() -> Vec<SceneSpec> {
    vec![
        SceneSpec::new("terrain", SceneKind::Terrain, 0.0, 0.3),
        SceneSpec::new("network", SceneKind::Network, 0.3, 0.55),
        SceneSpec::new("cells", SceneKind::Cells, 0.55, 0.8),
        SceneSpec::new("geometry", SceneKind::Geometry, 0.8, 1.0),
    ]
}

/// High fly-over of the terrain, a dive into the network, a close look at
/// the colony and a pull-back in front of the lattice.
pub fn default_keyframes() -> Vec<CameraKeyframe> {
    vec![
        CameraKeyframe::new(0.0, Vec3::new(0.0, 18.0, 40.0), Vec3::new(-0.45, 0.0, 0.0), DEFAULT_FOV_DEG),
        CameraKeyframe::new(0.15, Vec3::new(8.0, 12.0, 28.0), Vec3::new(-0.35, 0.25, 0.0), 70.0),
        CameraKeyframe::new(0.3, Vec3::new(0.0, 4.0, 20.0), Vec3::new(-0.15, 0.0, 0.0), 65.0),
        CameraKeyframe::new(0.45, Vec3::new(0.0, 0.0, 14.0), Vec3::new(0.0, 0.0, 0.0), 60.0),
        CameraKeyframe::new(0.6, Vec3::new(-2.0, 1.0, 9.0), Vec3::new(-0.05, -0.15, 0.0), 55.0),
        CameraKeyframe::new(0.75, Vec3::new(0.0, 0.0, 7.0), Vec3::new(0.0, 0.0, 0.0), 50.0),
        CameraKeyframe::new(0.9, Vec3::new(0.0, 0.0, 11.0), Vec3::new(0.0, 0.0, 0.05), 55.0),
        CameraKeyframe::new(1.0, Vec3::new(0.0, 0.0, 13.0), Vec3::new(0.0, 0.0, 0.0), 60.0),
    ]
}
