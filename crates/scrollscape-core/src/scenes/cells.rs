use super::{Scene, SceneKind};
use crate::cells::{CellColony, ColonyConfig};
use crate::error::SceneError;
use crate::graph::{FrameParams, Geometry, Material, RenderNode, SceneGraph};
use crate::input::{Interaction, InteractionKind};
use glam::{Quat, Vec2, Vec3};

const MEMBRANES: &str = "membranes";
const NUCLEI: &str = "nuclei";
const SPHERE_RINGS: u32 = 8;
const SPHERE_SEGMENTS: u32 = 12;

/// Unit UV sphere: positions double as normals.
fn unit_sphere() -> (Vec<Vec3>, Vec<u32>) {
    let mut positions = Vec::new();
    for r in 0..=SPHERE_RINGS {
        let phi = r as f32 / SPHERE_RINGS as f32 * std::f32::consts::PI;
        for s in 0..=SPHERE_SEGMENTS {
            let theta = s as f32 / SPHERE_SEGMENTS as f32 * std::f32::consts::TAU;
            positions.push(Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()));
        }
    }
    let stride = SPHERE_SEGMENTS + 1;
    let mut indices = Vec::new();
    for r in 0..SPHERE_RINGS {
        for s in 0..SPHERE_SEGMENTS {
            let a = r * stride + s;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    (positions, indices)
}

pub struct CellScene {
    config: ColonyConfig,
    colony: Option<CellColony>,
    graph: SceneGraph,
    sphere: (Vec<Vec3>, Vec<u32>),
    notifications: Vec<Interaction>,
}

impl CellScene {
    pub fn new(config: ColonyConfig) -> Self {
        Self {
            config,
            colony: None,
            graph: SceneGraph::default(),
            sphere: unit_sphere(),
            notifications: Vec::new(),
        }
    }

    pub fn colony(&self) -> Option<&CellColony> {
        self.colony.as_ref()
    }

    pub fn colony_mut(&mut self) -> Option<&mut CellColony> {
        self.colony.as_mut()
    }

    /// Rebuild membrane triangles and nucleus points from the active cells.
    fn sync_nodes(&mut self) {
        let Some(colony) = &self.colony else {
            return;
        };
        let (template, template_indices) = &self.sphere;
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();
        let mut nuclei = Vec::new();
        for cell in colony.active_cells() {
            let d = cell.deformation();
            let radius = cell.radius();
            // stretch along the division axis, squeeze across it
            let align = Quat::from_rotation_arc(Vec3::X, cell.division_axis.try_normalize().unwrap_or(Vec3::X));
            let stretch = Vec3::new(d.elongation, d.compression, d.compression) * radius;
            let base = positions.len() as u32;
            for p in template {
                positions.push(cell.position + align * (*p * stretch));
                normals.push((align * (*p / stretch.max(Vec3::splat(1e-4)))).try_normalize().unwrap_or(Vec3::Y));
            }
            indices.extend(template_indices.iter().map(|i| base + i));
            let n = cell.division_axis * d.nucleus_offset * radius;
            if d.nucleus_offset > 0.0 {
                nuclei.push(cell.position + n);
                nuclei.push(cell.position - n);
            } else {
                nuclei.push(cell.position);
            }
        }
        if let Some(node) = self.graph.find_mut(MEMBRANES) {
            node.set_geometry(Geometry::Triangles {
                positions,
                normals,
                indices,
            });
        }
        if let Some(node) = self.graph.find_mut(NUCLEI) {
            node.set_geometry(Geometry::Points {
                positions: nuclei,
                size: 4.0,
            });
        }
    }
}

impl Scene for CellScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Cells
    }

    fn init(&mut self) -> Result<(), SceneError> {
        self.config.validate().map_err(|source| SceneError::Config {
            scene: "cells",
            source,
        })?;
        self.colony = Some(CellColony::new(self.config.clone()));
        let nuclei = RenderNode::new(
            NUCLEI,
            Geometry::Points {
                positions: Vec::new(),
                size: 4.0,
            },
            Material::new([1.0, 0.85, 0.6], 1.0),
        );
        let membranes = RenderNode::new(
            MEMBRANES,
            Geometry::Triangles {
                positions: Vec::new(),
                normals: Vec::new(),
                indices: Vec::new(),
            },
            Material::new([0.85, 0.45, 0.55], 0.55),
        )
        .with_child(nuclei);
        self.graph = SceneGraph::new(vec![membranes]);
        self.sync_nodes();
        Ok(())
    }

    fn update(&mut self, params: &FrameParams) {
        let Some(colony) = &mut self.colony else {
            return;
        };
        for ev in colony.tick(params.dt) {
            let intensity = 1.0 - ev.generation as f32 / (colony.config().max_generations as f32 + 1.0);
            self.notifications
                .push(Interaction::new(InteractionKind::Division, intensity, SceneKind::Cells));
        }
        self.sync_nodes();
        if let Some(node) = self.graph.find_mut(MEMBRANES) {
            node.rotation = Quat::from_rotation_y(params.time * 0.03);
        }
    }

    fn dispose(&mut self) {
        self.colony = None;
        self.graph.nodes.clear();
        self.notifications.clear();
    }

    fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Start over once the colony can no longer grow.
    fn on_enter(&mut self) {
        if let Some(colony) = &mut self.colony {
            let max_gen = colony.config().max_generations;
            let saturated = colony.active_count() >= colony.config().max_cells
                || colony.active_cells().all(|c| c.generation >= max_gen);
            if saturated {
                log::info!("[cells] colony saturated; reseeding mother cell");
                colony.reset();
            }
        }
    }

    fn on_click(&mut self, _pointer: Vec2) -> Option<Interaction> {
        let colony = self.colony.as_mut()?;
        let candidate = colony
            .active_cells()
            .filter(|c| colony.is_eligible(c))
            .map(|c| c.id)
            .next();
        let divided = candidate.is_some_and(|id| colony.force_division(id));
        let intensity = if divided { 1.0 } else { 0.3 };
        Some(Interaction::new(InteractionKind::Click, intensity, SceneKind::Cells))
    }

    fn drain_notifications(&mut self, out: &mut Vec<Interaction>) {
        out.append(&mut self.notifications);
    }
}
