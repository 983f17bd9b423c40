use super::{write_lines, Scene, SceneKind};
use crate::error::SceneError;
use crate::geometry::{GeometryConfig, SacredGeometry};
use crate::graph::{FrameParams, Geometry, Material, RenderNode, SceneGraph};
use crate::input::{Interaction, InteractionKind};
use glam::{Quat, Vec2};

const CIRCLES: &str = "circles";
const METATRON: &str = "metatron";
// The lattice is fully unfolded two thirds of the way through the range.
const UNFOLD_PER_PROGRESS: f32 = 1.5;
// Pointer distance from the canvas centre that counts as over the figure.
const HOVER_RADIUS: f32 = 0.2;

pub struct GeometryScene {
    config: GeometryConfig,
    formation: Option<SacredGeometry>,
    graph: SceneGraph,
    tilt: Vec2,
    hovering: bool,
}

impl GeometryScene {
    pub fn new(config: GeometryConfig) -> Self {
        Self {
            config,
            formation: None,
            graph: SceneGraph::default(),
            tilt: Vec2::ZERO,
            hovering: false,
        }
    }

    pub fn formation(&self) -> Option<&SacredGeometry> {
        self.formation.as_ref()
    }

    fn sync_nodes(&mut self) {
        let Some(f) = &self.formation else {
            return;
        };
        let Some(root) = self.graph.find_mut(CIRCLES) else {
            return;
        };
        write_lines(&mut root.geometry, f.circle_lines(), None);
        root.touch();
        if let Some(m) = root.children.iter_mut().find(|c| c.label == METATRON) {
            write_lines(&mut m.geometry, f.metatron_lines(), Some(f.metatron_alphas()));
            m.touch();
        }
    }
}

impl Scene for GeometryScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Geometry
    }

    fn init(&mut self) -> Result<(), SceneError> {
        self.config.validate().map_err(|source| SceneError::Config {
            scene: "geometry",
            source,
        })?;
        let mut formation = SacredGeometry::new(self.config.clone());
        formation.set_unfold(0.0);
        formation.update(0.0);
        self.formation = Some(formation);
        let metatron = RenderNode::new(METATRON, Geometry::empty_lines(), Material::new([0.7, 0.6, 1.0], 0.45));
        let circles = RenderNode::new(CIRCLES, Geometry::empty_lines(), Material::new([0.95, 0.85, 0.55], 0.9))
            .with_child(metatron);
        self.graph = SceneGraph::new(vec![circles]);
        self.sync_nodes();
        Ok(())
    }

    fn update(&mut self, params: &FrameParams) {
        let rebuilt = match &mut self.formation {
            Some(f) => {
                f.set_unfold(params.local_progress * UNFOLD_PER_PROGRESS);
                f.update(params.dt)
            }
            None => false,
        };
        if rebuilt {
            self.sync_nodes();
        }
        let rotation = self.formation.as_ref().map_or(0.0, |f| f.rotation());
        if let Some(root) = self.graph.find_mut(CIRCLES) {
            root.rotation = Quat::from_rotation_x(self.tilt.y * 0.3)
                * Quat::from_rotation_y(self.tilt.x * 0.3)
                * Quat::from_rotation_z(rotation);
        }
    }

    fn on_exit(&mut self) {
        self.hovering = false;
    }

    fn dispose(&mut self) {
        self.formation = None;
        self.graph.nodes.clear();
    }

    fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    fn on_mouse_move(&mut self, pointer: Vec2) -> Option<Interaction> {
        self.tilt = (pointer - Vec2::splat(0.5)) * 2.0;
        let centre_dist = (pointer - Vec2::splat(0.5)).length();
        let over = centre_dist < HOVER_RADIUS;
        let entered = over && !self.hovering;
        self.hovering = over;
        entered.then(|| {
            Interaction::new(
                InteractionKind::Hover,
                1.0 - centre_dist / HOVER_RADIUS,
                SceneKind::Geometry,
            )
        })
    }

    fn on_click(&mut self, pointer: Vec2) -> Option<Interaction> {
        let centre_dist = (pointer - Vec2::splat(0.5)).length();
        Some(Interaction::new(
            InteractionKind::Click,
            1.0 - centre_dist,
            SceneKind::Geometry,
        ))
    }
}
