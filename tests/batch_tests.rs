// Host-side tests for flattening scene graphs into GPU vertex batches.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod batch {
    include!("../src/render/batch.rs");
}

use batch::*;
use glam::Vec3;
use scrollscape_core::{Geometry, Material, RenderNode, SceneGraph};

fn light() -> Lighting {
    Lighting {
        direction: Vec3::Y,
        ambient: 0.25,
        diffuse: 0.75,
    }
}

fn shown(nodes: Vec<RenderNode>, opacity: f32) -> SceneGraph {
    let mut g = SceneGraph::new(nodes);
    g.visible = true;
    g.set_opacity(opacity);
    g
}

fn close(a: [f32; 4], b: [f32; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
}

fn triangle(normal: Vec3) -> RenderNode {
    RenderNode::new(
        "tri",
        Geometry::Triangles {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Z],
            normals: vec![normal; 3],
            indices: vec![0, 1, 2],
        },
        Material::new([1.0, 0.5, 0.0], 1.0),
    )
}

#[test]
fn hidden_graphs_add_nothing() {
    let mut g = SceneGraph::new(vec![triangle(Vec3::Y)]);
    g.set_opacity(1.0);
    let mut batch = FrameBatch::default();
    batch.push_graph(&g, &light());
    assert!(batch.is_empty());

    // visible but fully faded
    let g = shown(vec![triangle(Vec3::Y)], 0.0);
    batch.push_graph(&g, &light());
    assert!(batch.is_empty());
}

#[test]
fn triangles_are_lit_and_premultiplied() {
    let g = shown(vec![triangle(Vec3::Y), triangle(Vec3::NEG_Y)], 0.5);
    let mut batch = FrameBatch::default();
    batch.push_graph(&g, &light());
    assert_eq!(batch.triangles.len(), 6);
    // facing the light: full colour, then scaled by alpha
    assert!(close(batch.triangles[0].color, [0.5, 0.25, 0.0, 0.5]));
    // facing away: ambient only
    assert!(close(batch.triangles[3].color, [0.125, 0.0625, 0.0, 0.5]));
    // second mesh indexes its own vertices
    assert_eq!(batch.indices, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn out_of_range_triangles_are_dropped() {
    let node = RenderNode::new(
        "broken",
        Geometry::Triangles {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Z],
            normals: vec![Vec3::Y; 3],
            indices: vec![0, 1, 2, 0, 2, 9],
        },
        Material::new([1.0; 3], 1.0),
    );
    let mut batch = FrameBatch::default();
    batch.push_graph(&shown(vec![node], 1.0), &light());
    assert_eq!(batch.indices, vec![0, 1, 2]);
}

#[test]
fn lines_respect_draw_count_and_per_vertex_alpha() {
    let node = RenderNode::new(
        "links",
        Geometry::Lines {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            alphas: vec![0.5, 0.5, 1.0, 1.0],
            // odd counts never draw half a segment
            draw_count: 3,
        },
        Material::new([1.0, 1.0, 1.0], 1.0),
    );
    let mut batch = FrameBatch::default();
    batch.push_graph(&shown(vec![node], 0.8), &light());
    assert_eq!(batch.lines.len(), 2);
    assert!(close(batch.lines[0].color, [0.4, 0.4, 0.4, 0.4]));
    assert!(batch.indices.is_empty());
}

#[test]
fn points_become_axis_crosses() {
    let mut node = RenderNode::new(
        "dots",
        Geometry::Points {
            positions: vec![Vec3::ZERO, Vec3::splat(2.0)],
            size: 4.0,
        },
        Material::new([1.0; 3], 1.0),
    );
    node.translation = Vec3::new(10.0, 0.0, 0.0);
    let mut batch = FrameBatch::default();
    batch.push_graph(&shown(vec![node], 1.0), &light());
    assert_eq!(batch.lines.len(), 12);
    // first arm runs along x around the translated centre
    let start = Vec3::from_array(batch.lines[0].position);
    let end = Vec3::from_array(batch.lines[1].position);
    assert!(start.distance(Vec3::new(9.9, 0.0, 0.0)) < 1e-5);
    assert!(end.distance(Vec3::new(10.1, 0.0, 0.0)) < 1e-5);
}

#[test]
fn child_nodes_inherit_parent_transform() {
    let child = RenderNode::new(
        "child",
        Geometry::Lines {
            positions: vec![Vec3::ZERO, Vec3::X],
            alphas: vec![1.0, 1.0],
            draw_count: 2,
        },
        Material::new([1.0; 3], 1.0),
    );
    let mut parent = RenderNode::new("parent", Geometry::empty_lines(), Material::new([1.0; 3], 1.0))
        .with_child(child);
    parent.translation = Vec3::new(0.0, 5.0, 0.0);
    let mut batch = FrameBatch::default();
    batch.push_graph(&shown(vec![parent], 1.0), &light());
    assert_eq!(batch.lines.len(), 2);
    assert_eq!(batch.lines[1].position, [1.0, 5.0, 0.0]);
}
