use super::{Scene, SceneKind};
use crate::assets::{LoadOutcome, MeshData};
use crate::error::{AssetError, SceneError};
use crate::graph::{FrameParams, Geometry, Material, RenderNode, SceneGraph};
use crate::input::{Interaction, InteractionKind};
use crate::terrain::{TerrainConfig, TerrainMesh};
use glam::{Quat, Vec2};

const NODE: &str = "terrain";
// Growth completes halfway through the scene's range.
const GROWTH_PER_PROGRESS: f32 = 2.0;
const TILT_MAX: f32 = 0.12;
const TILT_FOLLOW: f32 = 0.05;

pub struct TerrainScene {
    config: TerrainConfig,
    mesh: Option<TerrainMesh>,
    graph: SceneGraph,
    growth: f32,
    tilt_target: Vec2,
    tilt: Vec2,
}

impl TerrainScene {
    pub fn new(config: TerrainConfig) -> Self {
        Self {
            config,
            mesh: None,
            graph: SceneGraph::default(),
            growth: 0.0,
            tilt_target: Vec2::ZERO,
            tilt: Vec2::ZERO,
        }
    }

    pub fn mesh(&self) -> Option<&TerrainMesh> {
        self.mesh.as_ref()
    }

    fn install(&mut self, mut mesh: TerrainMesh) {
        mesh.set_growth(&self.config, self.growth);
        self.mesh = Some(mesh);
        self.sync_node();
    }

    fn sync_node(&mut self) {
        let Some(mesh) = &self.mesh else {
            return;
        };
        let geometry = Geometry::Triangles {
            positions: mesh.positions().to_vec(),
            normals: mesh.normals().to_vec(),
            indices: mesh.indices().to_vec(),
        };
        match self.graph.find_mut(NODE) {
            Some(node) => node.set_geometry(geometry),
            None => {
                let mut node = RenderNode::new(NODE, geometry, Material::new([0.32, 0.45, 0.38], 1.0));
                node.material.opacity = self.graph.opacity();
                self.graph.nodes.push(node);
            }
        }
    }

    fn procedural_fallback(&self) -> TerrainMesh {
        match TerrainMesh::grid(&self.config) {
            Ok(grid) => grid,
            Err(e) => {
                log::warn!("[terrain] procedural grid unavailable ({e}); using octahedron");
                TerrainMesh::from_mesh(&MeshData::octahedron(self.config.size * 0.1))
            }
        }
    }
}

impl Scene for TerrainScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Terrain
    }

    fn init(&mut self) -> Result<(), SceneError> {
        let mesh = TerrainMesh::grid(&self.config).map_err(|source| SceneError::Config {
            scene: "terrain",
            source,
        })?;
        self.install(mesh);
        Ok(())
    }

    fn update(&mut self, params: &FrameParams) {
        self.growth = (params.local_progress * GROWTH_PER_PROGRESS).clamp(0.0, 1.0);
        let changed = match &mut self.mesh {
            Some(mesh) => mesh.set_growth(&self.config, self.growth),
            None => false,
        };
        if changed {
            self.sync_node();
        }
        self.tilt += (self.tilt_target - self.tilt) * TILT_FOLLOW;
        if let Some(node) = self.graph.find_mut(NODE) {
            node.rotation = Quat::from_rotation_x(self.tilt.y * TILT_MAX)
                * Quat::from_rotation_y(params.time * 0.02 + self.tilt.x * TILT_MAX);
        }
    }

    fn dispose(&mut self) {
        self.mesh = None;
        self.graph.nodes.clear();
    }

    fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    fn on_mouse_move(&mut self, pointer: Vec2) -> Option<Interaction> {
        self.tilt_target = (pointer - Vec2::splat(0.5)) * 2.0;
        None
    }

    fn on_click(&mut self, pointer: Vec2) -> Option<Interaction> {
        Some(Interaction::new(
            InteractionKind::Click,
            1.0 - pointer.y,
            SceneKind::Terrain,
        ))
    }

    fn install_mesh(&mut self, result: Result<MeshData, AssetError>) -> LoadOutcome {
        match result {
            Ok(mut data) => {
                data.fit_to(self.config.size);
                log::info!(
                    "[terrain] installed loaded mesh ({} triangles)",
                    data.triangle_count()
                );
                self.install(TerrainMesh::from_mesh(&data));
                LoadOutcome::Installed
            }
            Err(e) => {
                log::warn!("[terrain] mesh load failed: {e}; keeping procedural terrain");
                if self.mesh.is_none() {
                    let fallback = self.procedural_fallback();
                    self.install(fallback);
                }
                LoadOutcome::FallbackInstalled
            }
        }
    }
}
