use thiserror::Error;

/// Construction-time configuration problems. These are never clamped or
/// guessed around: the caller gets the error and decides what to do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("camera track needs at least 2 keyframes, got {0}")]
    TooFewKeyframes(usize),
    #[error("first keyframe must sit at scroll 0 and last at scroll 1 (got {first} and {last})")]
    KeyframeBounds { first: f32, last: f32 },
    #[error("keyframe {index} is not strictly after keyframe {prev} ({value} <= {prev_value})")]
    KeyframesNotIncreasing {
        index: usize,
        prev: usize,
        value: f32,
        prev_value: f32,
    },
    #[error("keyframe {0} contains a non-finite value")]
    NonFiniteKeyframe(usize),
    #[error("bezier easing ordinates must satisfy 0 <= c2 <= c4 <= 1 (got {c2}, {c4})")]
    InvalidEasing { c2: f32, c4: f32 },
    #[error("scene layout is empty")]
    NoScenes,
    #[error("scene ranges must start at 0 and end at 1 (got {start} and {end})")]
    RangeBounds { start: f32, end: f32 },
    #[error("scene range {index} is empty or inverted ({start}..{end})")]
    EmptyRange { index: usize, start: f32, end: f32 },
    #[error("scene range {index} does not start where range {prev} ends ({start} != {prev_end})")]
    RangeGap {
        index: usize,
        prev: usize,
        start: f32,
        prev_end: f32,
    },
    #[error("fade margin must be finite and non-negative, got {0}")]
    InvalidFadeMargin(f32),
    #[error("fade margin {margin} makes scene {index} overlap both neighbours (range width {width})")]
    FadeOverlap { index: usize, margin: f32, width: f32 },
    #[error("duplicate scene name '{0}'")]
    DuplicateScene(String),
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetError {
    #[error("failed to fetch '{path}': {reason}")]
    Fetch { path: String, reason: String },
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("mesh has no triangles")]
    EmptyMesh,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("scene '{scene}' rejected its configuration: {source}")]
    Config {
        scene: &'static str,
        #[source]
        source: ConfigError,
    },
}
