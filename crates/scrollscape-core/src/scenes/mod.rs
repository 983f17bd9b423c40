//! The closed set of scenes the controller can host.

mod cells;
mod geometry;
mod network;
mod placeholder;
mod terrain;

pub use cells::CellScene;
pub use geometry::GeometryScene;
pub use network::NetworkScene;
pub use placeholder::PlaceholderScene;
pub use terrain::TerrainScene;

use crate::assets::{LoadOutcome, MeshData};
use crate::config::ExperienceConfig;
use crate::error::{AssetError, SceneError};
use crate::graph::{FrameParams, SceneGraph};
use crate::input::Interaction;
use glam::Vec2;

/// Lifecycle and per-frame contract shared by every scene.
pub trait Scene {
    fn kind(&self) -> SceneKind;

    /// Build geometry. Called once by the controller before first use.
    fn init(&mut self) -> Result<(), SceneError>;

    /// Advance simulation and refresh the scene graph. Only called while the
    /// scene is visible.
    fn update(&mut self, params: &FrameParams);

    /// Release geometry. The scene must not be updated afterwards.
    fn dispose(&mut self);

    fn graph(&self) -> &SceneGraph;

    fn graph_mut(&mut self) -> &mut SceneGraph;

    fn on_enter(&mut self) {}

    fn on_exit(&mut self) {}

    fn on_mouse_move(&mut self, _pointer: Vec2) -> Option<Interaction> {
        None
    }

    fn on_click(&mut self, _pointer: Vec2) -> Option<Interaction> {
        None
    }

    /// Install the result of an asset load. Scenes without a mesh slot
    /// ignore it.
    fn install_mesh(&mut self, _result: Result<MeshData, AssetError>) -> LoadOutcome {
        LoadOutcome::Stale
    }

    /// Move notifications raised by the simulation itself into `out`.
    fn drain_notifications(&mut self, _out: &mut Vec<Interaction>) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Terrain,
    Network,
    Cells,
    Geometry,
    Placeholder,
}

impl SceneKind {
    pub const COUNT: usize = 5;

    pub const ALL: [SceneKind; Self::COUNT] = [
        SceneKind::Terrain,
        SceneKind::Network,
        SceneKind::Cells,
        SceneKind::Geometry,
        SceneKind::Placeholder,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SceneKind::Terrain => "terrain",
            SceneKind::Network => "network",
            SceneKind::Cells => "cells",
            SceneKind::Geometry => "geometry",
            SceneKind::Placeholder => "placeholder",
        }
    }

    /// Construct an uninitialised scene of this kind.
    pub fn build(self, config: &ExperienceConfig, seed: u64) -> SceneInstance {
        match self {
            SceneKind::Terrain => SceneInstance::Terrain(TerrainScene::new(config.terrain.clone())),
            SceneKind::Network => {
                SceneInstance::Network(NetworkScene::new(config.particles.clone(), seed))
            }
            SceneKind::Cells => {
                let mut colony = config.colony.clone();
                colony.seed ^= seed;
                SceneInstance::Cells(CellScene::new(colony))
            }
            SceneKind::Geometry => {
                SceneInstance::Geometry(GeometryScene::new(config.geometry.clone()))
            }
            SceneKind::Placeholder => SceneInstance::Placeholder(PlaceholderScene::new()),
        }
    }
}

pub enum SceneInstance {
    Terrain(TerrainScene),
    Network(NetworkScene),
    Cells(CellScene),
    Geometry(GeometryScene),
    Placeholder(PlaceholderScene),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            SceneInstance::Terrain($s) => $body,
            SceneInstance::Network($s) => $body,
            SceneInstance::Cells($s) => $body,
            SceneInstance::Geometry($s) => $body,
            SceneInstance::Placeholder($s) => $body,
        }
    };
}

impl Scene for SceneInstance {
    fn kind(&self) -> SceneKind {
        dispatch!(self, s => s.kind())
    }

    fn init(&mut self) -> Result<(), SceneError> {
        dispatch!(self, s => s.init())
    }

    fn update(&mut self, params: &FrameParams) {
        dispatch!(self, s => s.update(params))
    }

    fn dispose(&mut self) {
        dispatch!(self, s => s.dispose())
    }

    fn graph(&self) -> &SceneGraph {
        dispatch!(self, s => s.graph())
    }

    fn graph_mut(&mut self) -> &mut SceneGraph {
        dispatch!(self, s => s.graph_mut())
    }

    fn on_enter(&mut self) {
        dispatch!(self, s => s.on_enter())
    }

    fn on_exit(&mut self) {
        dispatch!(self, s => s.on_exit())
    }

    fn on_mouse_move(&mut self, pointer: Vec2) -> Option<Interaction> {
        dispatch!(self, s => s.on_mouse_move(pointer))
    }

    fn on_click(&mut self, pointer: Vec2) -> Option<Interaction> {
        dispatch!(self, s => s.on_click(pointer))
    }

    fn install_mesh(&mut self, result: Result<MeshData, AssetError>) -> LoadOutcome {
        dispatch!(self, s => s.install_mesh(result))
    }

    fn drain_notifications(&mut self, out: &mut Vec<Interaction>) {
        dispatch!(self, s => s.drain_notifications(out))
    }
}

/// Copy `src` into a line geometry in place, reusing its buffers.
pub(crate) fn write_lines(
    geometry: &mut crate::graph::Geometry,
    src: &[glam::Vec3],
    alphas: Option<&[f32]>,
) {
    if let crate::graph::Geometry::Lines {
        positions,
        alphas: dst_alphas,
        draw_count,
    } = geometry
    {
        positions.clear();
        positions.extend_from_slice(src);
        dst_alphas.clear();
        match alphas {
            Some(a) => dst_alphas.extend_from_slice(a),
            None => dst_alphas.resize(src.len(), 1.0),
        }
        *draw_count = src.len() - src.len() % 2;
    }
}
