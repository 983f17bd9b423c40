use crate::error::ConfigError;

/// Control ordinates of the reference ease-in/ease-out curve.
pub const BEZIER_C2: f32 = 0.46;
pub const BEZIER_C4: f32 = 0.94;

/// Shape of a 0..1 ramp. Shared by camera interpolation and scene fades.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    SmoothStep,
    /// One-dimensional cubic bezier with end points 0 and 1 and inner control
    /// ordinates `c2`, `c4`. Monotonic while `0 <= c2 <= c4 <= 1`.
    Bezier { c2: f32, c4: f32 },
}

impl Easing {
    pub const STANDARD: Easing = Easing::Bezier {
        c2: BEZIER_C2,
        c4: BEZIER_C4,
    };

    /// Reject bezier ordinates that would overshoot, run backwards or produce
    /// NaN. The fixed variants are always valid.
    pub fn validate(self) -> Result<(), ConfigError> {
        match self {
            Easing::Linear | Easing::SmoothStep => Ok(()),
            Easing::Bezier { c2, c4 } => {
                let ordered = c2.is_finite() && c4.is_finite() && 0.0 <= c2 && c2 <= c4 && c4 <= 1.0;
                if ordered {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidEasing { c2, c4 })
                }
            }
        }
    }

    /// Map `t` in [0,1] to the eased value. Input is clamped, NaN maps to 0.
    /// `apply(0) == 0` and `apply(1) == 1` exactly for every variant.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
            Easing::Bezier { c2, c4 } => cubic_bezier(t, c2, c4),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::STANDARD
    }
}

/// `3(1-t)^2 t c2 + 3(1-t) t^2 c4 + t^3`
#[inline]
pub fn cubic_bezier(t: f32, c2: f32, c4: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * c2 + 3.0 * u * t * t * c4 + t * t * t
}

/// Endpoint-exact linear interpolation: returns `a` at 0 and `b` at 1.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}
