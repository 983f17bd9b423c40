use crate::scenes::SceneKind;
use glam::Vec2;

/// Input normalised by the front-end. Pointer coordinates are in [0,1] with
/// the origin at the top-left of the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    MouseMove { pointer: Vec2 },
    Click { pointer: Vec2 },
    TouchStart { pointer: Vec2 },
    KeyDown { key: String },
}

impl InputEvent {
    pub fn pointer(&self) -> Option<Vec2> {
        match self {
            InputEvent::MouseMove { pointer }
            | InputEvent::Click { pointer }
            | InputEvent::TouchStart { pointer } => Some(*pointer),
            InputEvent::KeyDown { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionKind {
    Hover,
    Click,
    Touch,
    Division,
    SceneEnter,
}

/// Fire-and-forget notification for the audio layer. Dropping one is fine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interaction {
    pub kind: InteractionKind,
    /// 0..1
    pub intensity: f32,
    pub scene: SceneKind,
}

impl Interaction {
    pub fn new(kind: InteractionKind, intensity: f32, scene: SceneKind) -> Self {
        Self {
            kind,
            intensity: if intensity.is_finite() {
                intensity.clamp(0.0, 1.0)
            } else {
                0.0
            },
            scene,
        }
    }
}

// Keys that step back or forward one section.
const NEXT_KEYS: [&str; 4] = ["ArrowDown", "PageDown", " ", "Spacebar"];
const PREV_KEYS: [&str; 2] = ["ArrowUp", "PageUp"];

/// Scroll position a navigation key should jump to, given the current
/// progress and the section boundaries (ascending, excluding 0 and 1).
pub fn key_scroll_target(key: &str, progress: f32, boundaries: &[f32]) -> Option<f32> {
    const STEP_EPS: f32 = 1e-3;
    match key {
        "Home" => Some(0.0),
        "End" => Some(1.0),
        k if NEXT_KEYS.contains(&k) => Some(
            boundaries
                .iter()
                .copied()
                .find(|b| *b > progress + STEP_EPS)
                .unwrap_or(1.0),
        ),
        k if PREV_KEYS.contains(&k) => Some(
            boundaries
                .iter()
                .rev()
                .copied()
                .find(|b| *b < progress - STEP_EPS)
                .unwrap_or(0.0),
        ),
        _ => None,
    }
}
