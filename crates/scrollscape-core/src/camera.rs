use crate::constants::DEFAULT_FOV_DEG;
use crate::easing::{lerp, Easing};
use crate::error::ConfigError;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// An authored camera pose at a given scroll fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraKeyframe {
    pub scroll: f32,
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl CameraKeyframe {
    pub fn new(scroll: f32, position: Vec3, rotation: Vec3, fov: f32) -> Self {
        Self {
            scroll,
            position,
            rotation,
            fov,
        }
    }

    fn is_finite(&self) -> bool {
        self.scroll.is_finite()
            && self.position.is_finite()
            && self.rotation.is_finite()
            && self.fov.is_finite()
    }
}

/// Camera pose for the current frame, read by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub rotation: Vec3,
    pub fov: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            rotation: Vec3::ZERO,
            fov: DEFAULT_FOV_DEG,
        }
    }
}

impl From<&CameraKeyframe> for CameraState {
    fn from(k: &CameraKeyframe) -> Self {
        Self {
            position: k.position,
            rotation: k.rotation,
            fov: k.fov,
        }
    }
}

impl CameraState {
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Viewing direction; the unrotated camera looks down -Z.
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    /// World to view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position).inverse()
    }

    pub fn projection_matrix(&self, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
        let fovy = self.fov.clamp(1.0, 179.0).to_radians();
        Mat4::perspective_rh(fovy, aspect.max(1e-3), znear, zfar)
    }
}

/// Piecewise keyframe interpolation over scroll progress.
///
/// The keyframe list is validated on construction: at least two entries,
/// the first at 0, the last at 1, strictly increasing in between.
#[derive(Clone, Debug)]
pub struct CameraTrack {
    keyframes: Vec<CameraKeyframe>,
    easing: Easing,
}

impl CameraTrack {
    pub fn new(keyframes: Vec<CameraKeyframe>, easing: Easing) -> Result<Self, ConfigError> {
        if keyframes.len() < 2 {
            return Err(ConfigError::TooFewKeyframes(keyframes.len()));
        }
        if let Some(i) = keyframes.iter().position(|k| !k.is_finite()) {
            return Err(ConfigError::NonFiniteKeyframe(i));
        }
        easing.validate()?;
        let first = keyframes[0].scroll;
        let last = keyframes[keyframes.len() - 1].scroll;
        if first != 0.0 || last != 1.0 {
            return Err(ConfigError::KeyframeBounds { first, last });
        }
        for i in 1..keyframes.len() {
            if keyframes[i].scroll <= keyframes[i - 1].scroll {
                return Err(ConfigError::KeyframesNotIncreasing {
                    index: i,
                    prev: i - 1,
                    value: keyframes[i].scroll,
                    prev_value: keyframes[i - 1].scroll,
                });
            }
        }
        Ok(Self { keyframes, easing })
    }

    pub fn keyframes(&self) -> &[CameraKeyframe] {
        &self.keyframes
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Index `i` of the segment `[keyframes[i], keyframes[i + 1]]` holding `scroll`.
    /// Out-of-range input lands on the first or last segment.
    pub fn segment_index(&self, scroll: f32) -> usize {
        let last_segment = self.keyframes.len() - 2;
        (0..last_segment)
            .find(|&i| scroll <= self.keyframes[i + 1].scroll)
            .unwrap_or(last_segment)
    }

    /// Interpolated camera pose at `scroll`. Exact at every keyframe.
    pub fn sample(&self, scroll: f32) -> CameraState {
        let s = if scroll.is_finite() {
            scroll.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let i = self.segment_index(s);
        let a = &self.keyframes[i];
        let b = &self.keyframes[i + 1];
        let span = b.scroll - a.scroll;
        let local = if span > f32::EPSILON {
            ((s - a.scroll) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let t = self.easing.apply(local);
        CameraState {
            position: lerp_vec3(a.position, b.position, t),
            rotation: lerp_vec3(a.rotation, b.rotation, t),
            fov: lerp(a.fov, b.fov, t),
        }
    }
}

#[inline]
fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}
