// Flattens scene graphs into lit, premultiplied vertex lists for the GPU.
// Pure Rust so the host tests can include it.

use glam::{Mat3, Mat4, Vec3};
use scrollscape_core::{Geometry, RenderNode, SceneGraph};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

#[derive(Clone, Copy, Debug)]
pub struct Lighting {
    /// Unit vector pointing towards the light.
    pub direction: Vec3,
    pub ambient: f32,
    pub diffuse: f32,
}

// World-space half length of a point marker per unit of point size.
const POINT_SCALE: f32 = 0.025;

/// Geometry for one frame, grouped by topology.
#[derive(Default)]
pub struct FrameBatch {
    pub triangles: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub lines: Vec<Vertex>,
}

impl FrameBatch {
    pub fn clear(&mut self) {
        self.triangles.clear();
        self.indices.clear();
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.lines.is_empty()
    }

    /// Append every node of a visible graph.
    pub fn push_graph(&mut self, graph: &SceneGraph, light: &Lighting) {
        if !graph.visible {
            return;
        }
        graph.visit(|node, world| self.push_node(node, world, light));
    }

    fn push_node(&mut self, node: &RenderNode, world: Mat4, light: &Lighting) {
        let alpha = node.material.alpha();
        if alpha <= 0.0 {
            return;
        }
        let [r, g, b] = node.material.color;
        let base = Vec3::new(r, g, b);
        match &node.geometry {
            Geometry::Triangles {
                positions,
                normals,
                indices,
            } => {
                let normal_mat = Mat3::from_mat4(world).inverse().transpose();
                let start = self.triangles.len() as u32;
                for (i, p) in positions.iter().enumerate() {
                    let n = normals
                        .get(i)
                        .map(|n| (normal_mat * *n).normalize_or_zero())
                        .unwrap_or(Vec3::ZERO);
                    let lambert = n.dot(light.direction).max(0.0);
                    let lit = base * (light.ambient + light.diffuse * lambert);
                    self.triangles.push(vertex(world.transform_point3(*p), lit, alpha));
                }
                let count = positions.len() as u32;
                self.indices.extend(
                    indices
                        .chunks_exact(3)
                        .filter(|t| t.iter().all(|i| *i < count))
                        .flatten()
                        .map(|i| start + i),
                );
            }
            Geometry::Lines {
                positions,
                alphas,
                draw_count,
            } => {
                let live = (*draw_count).min(positions.len());
                let live = live - live % 2;
                for (i, p) in positions[..live].iter().enumerate() {
                    let a = alpha * alphas.get(i).copied().unwrap_or(1.0).clamp(0.0, 1.0);
                    self.lines.push(vertex(world.transform_point3(*p), base, a));
                }
            }
            Geometry::Points { positions, size } => {
                let h = size * POINT_SCALE;
                for p in positions {
                    let c = world.transform_point3(*p);
                    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
                        self.lines.push(vertex(c - axis * h, base, alpha));
                        self.lines.push(vertex(c + axis * h, base, alpha));
                    }
                }
            }
        }
    }
}

#[inline]
fn vertex(p: Vec3, rgb: Vec3, alpha: f32) -> Vertex {
    let c = rgb.clamp(Vec3::ZERO, Vec3::ONE) * alpha;
    Vertex {
        position: p.to_array(),
        color: [c.x, c.y, c.z, alpha],
    }
}
