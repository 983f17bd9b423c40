use super::{write_lines, Scene, SceneKind};
use crate::error::SceneError;
use crate::graph::{FrameParams, Geometry, Material, RenderNode, SceneGraph};
use crate::input::{Interaction, InteractionKind};
use crate::particles::{ParticleConfig, ParticleGraph};
use glam::{Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

const ROOT: &str = "particles";
const LINKS: &str = "links";
const IMPULSE_STRENGTH: f32 = 0.05;
const SPEED_RELAX: f32 = 0.02;
const LINK_ALPHA: f32 = 0.6;
// Fraction of the link alpha left once the camera is inside the cube.
const LINK_NEAR_FLOOR: f32 = 0.35;

pub struct NetworkScene {
    config: ParticleConfig,
    seed: u64,
    network: Option<ParticleGraph>,
    graph: SceneGraph,
    pointer: Vec2,
    spin: Vec2,
}

impl NetworkScene {
    pub fn new(config: ParticleConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            network: None,
            graph: SceneGraph::default(),
            pointer: Vec2::splat(0.5),
            spin: Vec2::ZERO,
        }
    }

    pub fn network(&self) -> Option<&ParticleGraph> {
        self.network.as_ref()
    }

    fn sync_nodes(&mut self) {
        let Some(net) = &self.network else {
            return;
        };
        let Some(root) = self.graph.find_mut(ROOT) else {
            return;
        };
        if let Geometry::Points { positions, .. } = &mut root.geometry {
            positions.clear();
            positions.extend(net.positions());
        }
        root.touch();
        if let Some(links) = root.children.iter_mut().find(|c| c.label == LINKS) {
            write_lines(&mut links.geometry, net.line_positions(), Some(net.line_alphas()));
            links.touch();
        }
    }

    /// Pointer position on the z = 0 plane of the particle cube.
    fn pointer_to_world(&self, pointer: Vec2) -> Vec3 {
        let r = self.config.half_extent;
        Vec3::new((pointer.x - 0.5) * 2.0 * r, (0.5 - pointer.y) * 2.0 * r, 0.0)
    }
}

/// Link alpha for a camera `distance` from the cube centre. Links thin out as
/// the camera flies in so the interior does not turn into a web of lines.
fn link_alpha_at(distance: f32, half_extent: f32) -> f32 {
    let far = half_extent * 2.5;
    let k = if distance.is_finite() && far > half_extent {
        ((distance - half_extent) / (far - half_extent)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    LINK_ALPHA * (LINK_NEAR_FLOOR + (1.0 - LINK_NEAR_FLOOR) * k)
}

impl Scene for NetworkScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Network
    }

    fn init(&mut self) -> Result<(), SceneError> {
        self.config.validate().map_err(|source| SceneError::Config {
            scene: "network",
            source,
        })?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut net = ParticleGraph::new(self.config.clone(), &mut rng);
        net.tick(0.0);
        self.network = Some(net);
        let links = RenderNode::new(LINKS, Geometry::empty_lines(), Material::new([0.55, 0.75, 1.0], LINK_ALPHA));
        let root = RenderNode::new(
            ROOT,
            Geometry::Points {
                positions: Vec::new(),
                size: 3.0,
            },
            Material::new([0.85, 0.92, 1.0], 1.0),
        )
        .with_child(links);
        self.graph = SceneGraph::new(vec![root]);
        self.sync_nodes();
        Ok(())
    }

    fn update(&mut self, params: &FrameParams) {
        if let Some(net) = &mut self.network {
            net.tick(params.dt);
            net.relax_speeds(SPEED_RELAX);
        }
        self.sync_nodes();
        let target = (self.pointer - Vec2::splat(0.5)) * 0.6;
        self.spin += (target - self.spin) * 0.05;
        let link_alpha = link_alpha_at(params.camera_position.length(), self.config.half_extent);
        if let Some(root) = self.graph.find_mut(ROOT) {
            root.rotation = Quat::from_rotation_y(params.time * 0.05 + self.spin.x)
                * Quat::from_rotation_x(self.spin.y);
            if let Some(links) = root.children.iter_mut().find(|c| c.label == LINKS) {
                links.material.base_alpha = link_alpha;
            }
        }
    }

    fn dispose(&mut self) {
        self.network = None;
        self.graph.nodes.clear();
    }

    fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    fn on_mouse_move(&mut self, pointer: Vec2) -> Option<Interaction> {
        self.pointer = pointer;
        None
    }

    fn on_click(&mut self, pointer: Vec2) -> Option<Interaction> {
        let origin = self.pointer_to_world(pointer);
        let net = self.network.as_mut()?;
        net.impulse(origin, net.config().min_distance * 2.0, IMPULSE_STRENGTH);
        let capacity = (net.particles().len() as u32 * net.config().max_connections).max(1) as f32 * 0.5;
        let density = net.edges().len() as f32 / capacity;
        Some(Interaction::new(InteractionKind::Click, 0.4 + 0.6 * density, SceneKind::Network))
    }
}
