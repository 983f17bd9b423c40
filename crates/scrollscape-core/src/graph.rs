//! Renderable scene description handed to the front-end renderer.
//!
//! Scenes own a [`SceneGraph`] and rewrite node geometry in place; the
//! renderer only reads it. Per-frame values travel in [`FrameParams`] instead
//! of being poked into materials.

use glam::{Mat4, Quat, Vec2, Vec3};

/// Values every scene receives on `update`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameParams {
    /// Seconds since the experience started (only advances while running).
    pub time: f32,
    pub dt: f32,
    /// Displayed opacity of the receiving scene.
    pub opacity: f32,
    /// Scroll progress through the receiving scene's own range.
    pub local_progress: f32,
    pub camera_position: Vec3,
    /// Last pointer position, normalised to [0,1] with the origin top-left.
    pub pointer: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Triangles {
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    },
    /// Line-segment list: vertices `2k` and `2k + 1` form segment `k`.
    /// Only the first `draw_count` vertices are live.
    Lines {
        positions: Vec<Vec3>,
        alphas: Vec<f32>,
        draw_count: usize,
    },
    Points {
        positions: Vec<Vec3>,
        size: f32,
    },
}

impl Geometry {
    pub fn empty_lines() -> Self {
        Geometry::Lines {
            positions: Vec::new(),
            alphas: Vec::new(),
            draw_count: 0,
        }
    }

    /// Vertices the renderer should draw.
    pub fn live_vertex_count(&self) -> usize {
        match self {
            Geometry::Triangles { indices, .. } => indices.len(),
            Geometry::Lines {
                positions,
                draw_count,
                ..
            } => (*draw_count).min(positions.len()),
            Geometry::Points { positions, .. } => positions.len(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    /// Authored alpha of the element at full scene visibility.
    pub base_alpha: f32,
    /// Scene opacity, written by the controller every frame.
    pub opacity: f32,
}

impl Material {
    pub const fn new(color: [f32; 3], base_alpha: f32) -> Self {
        Self {
            color,
            base_alpha,
            opacity: 1.0,
        }
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        (self.base_alpha * self.opacity).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct RenderNode {
    pub label: &'static str,
    pub geometry: Geometry,
    pub material: Material,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Bumped whenever `geometry` changes.
    pub revision: u64,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn new(label: &'static str, geometry: Geometry, material: Material) -> Self {
        Self {
            label,
            geometry,
            material,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            revision: 0,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: RenderNode) -> Self {
        self.children.push(child);
        self
    }

    #[inline]
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Replace geometry and mark the node changed.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.touch();
    }

    #[inline]
    pub fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.material.opacity = opacity;
        for c in &mut self.children {
            c.set_opacity(opacity);
        }
    }

    fn visit<F: FnMut(&RenderNode, Mat4)>(&self, parent: Mat4, f: &mut F) {
        let world = parent * self.local_transform();
        f(self, world);
        for c in &self.children {
            c.visit(world, f);
        }
    }

    fn find_mut(&mut self, label: &str) -> Option<&mut RenderNode> {
        if self.label == label {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(label))
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    pub nodes: Vec<RenderNode>,
    pub visible: bool,
    opacity: f32,
}

impl SceneGraph {
    pub fn new(nodes: Vec<RenderNode>) -> Self {
        Self {
            nodes,
            visible: false,
            opacity: 0.0,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Write `opacity` into every material in the tree.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        for n in &mut self.nodes {
            n.set_opacity(opacity);
        }
    }

    /// Depth-first walk with accumulated world transforms.
    pub fn visit<F: FnMut(&RenderNode, Mat4)>(&self, mut f: F) {
        for n in &self.nodes {
            n.visit(Mat4::IDENTITY, &mut f);
        }
    }

    /// First node (depth-first) with the given label.
    pub fn find_mut(&mut self, label: &str) -> Option<&mut RenderNode> {
        self.nodes.iter_mut().find_map(|n| n.find_mut(label))
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(|_, _| count += 1);
        count
    }
}
