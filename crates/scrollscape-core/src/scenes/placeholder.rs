use super::{write_lines, Scene, SceneKind};
use crate::assets::MeshData;
use crate::error::SceneError;
use crate::graph::{FrameParams, Geometry, Material, RenderNode, SceneGraph};
use glam::Quat;

const NODE: &str = "placeholder";

/// Stand-in used when a scene fails to initialise: a slowly turning wire
/// octahedron.
pub struct PlaceholderScene {
    graph: SceneGraph,
}

impl PlaceholderScene {
    pub fn new() -> Self {
        Self {
            graph: SceneGraph::default(),
        }
    }
}

impl Default for PlaceholderScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for PlaceholderScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Placeholder
    }

    fn init(&mut self) -> Result<(), SceneError> {
        let mesh = MeshData::octahedron(2.0);
        let mut lines = Vec::with_capacity(mesh.indices.len() * 2);
        for tri in mesh.indices.chunks_exact(3) {
            for k in 0..3 {
                lines.push(mesh.positions[tri[k] as usize]);
                lines.push(mesh.positions[tri[(k + 1) % 3] as usize]);
            }
        }
        let mut geometry = Geometry::empty_lines();
        write_lines(&mut geometry, &lines, None);
        self.graph = SceneGraph::new(vec![RenderNode::new(
            NODE,
            geometry,
            Material::new([0.6, 0.65, 0.75], 0.8),
        )]);
        Ok(())
    }

    fn update(&mut self, params: &FrameParams) {
        if let Some(node) = self.graph.find_mut(NODE) {
            node.rotation = Quat::from_rotation_y(params.time * 0.3) * Quat::from_rotation_x(0.4);
        }
    }

    fn dispose(&mut self) {
        self.graph.nodes.clear();
    }

    fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }
}
