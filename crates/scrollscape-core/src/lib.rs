//! Scroll-driven scene progression engine.
//!
//! Everything here is platform independent: the web front-end feeds scroll,
//! pointer and frame-time input in, and reads camera state, scene graphs and
//! tone events out.

pub mod ambient;
pub mod assets;
pub mod camera;
pub mod cells;
pub mod config;
pub mod constants;
pub mod controller;
pub mod crossfade;
pub mod easing;
pub mod error;
pub mod experience;
pub mod geometry;
pub mod graph;
pub mod input;
pub mod noise;
pub mod particles;
pub mod scenes;
pub mod terrain;

pub use ambient::*;
pub use assets::{parse_obj, LoadOutcome, LoadTicket, MeshData};
pub use camera::{CameraKeyframe, CameraState, CameraTrack};
pub use config::*;
pub use controller::SceneController;
pub use crossfade::{FadeSchedule, SceneRange};
pub use easing::Easing;
pub use error::{AssetError, ConfigError, SceneError};
pub use experience::Experience;
pub use graph::{FrameParams, Geometry, Material, RenderNode, SceneGraph};
pub use input::{key_scroll_target, InputEvent, Interaction, InteractionKind};
pub use scenes::{Scene, SceneInstance, SceneKind};
