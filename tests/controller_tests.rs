// Host-side tests for scroll progression, scene lifecycle and input routing.

use glam::Vec2;
use scrollscape_core::ambient::voice_index;
use scrollscape_core::cells::DivisionOdds;
use scrollscape_core::{
    AssetError, ConfigError, ExperienceConfig, InputEvent, InteractionKind, LoadOutcome, MeshData,
    Scene, SceneController, SceneInstance, SceneKind, SceneSpec,
};

const FRAME: f32 = 1.0 / 60.0;

fn controller() -> SceneController {
    SceneController::new(&ExperienceConfig::default()).unwrap()
}

fn settle(c: &mut SceneController, scroll: f32) {
    for _ in 0..600 {
        c.update_progression(scroll);
        c.advance(FRAME);
    }
}

fn terrain_vertices(c: &SceneController) -> Option<usize> {
    match c.scene("terrain")? {
        SceneInstance::Terrain(t) => t.mesh().map(|m| m.vertex_count()),
        _ => None,
    }
}

#[test]
fn layout_is_built_from_config() {
    let c = controller();
    assert_eq!(c.len(), 4);
    assert_eq!(c.boundaries(), vec![0.3, 0.55, 0.8]);
    assert_eq!(c.kind_of("terrain"), Some(SceneKind::Terrain));
    assert_eq!(c.kind_of("geometry"), Some(SceneKind::Geometry));
    assert_eq!(c.kind_of("missing"), None);
    // opacities start at their scroll-0 targets
    assert_eq!(c.opacity("terrain"), Some(1.0));
    assert_eq!(c.opacity("network"), Some(0.0));
}

#[test]
fn camera_is_sampled_before_scene_content() {
    let mut c = controller();
    c.update_progression(0.5);
    let expected = c.track().sample(0.5);
    assert_eq!(*c.camera(), expected);
    c.advance(FRAME);
    assert_eq!(*c.camera(), expected);
    assert_eq!(c.scroll(), 0.5);
}

#[test]
fn opacities_converge_on_their_targets() {
    let mut c = controller();
    settle(&mut c, 0.42);
    assert_eq!(c.target_opacity("network"), Some(1.0));
    assert_eq!(c.opacity("network"), Some(1.0));
    assert_eq!(c.opacity("terrain"), Some(0.0));
    assert!(c.is_visible("network"));
    assert!(!c.is_visible("terrain"));
    let g = c.scene("network").unwrap().graph();
    assert!(g.visible);
    assert_eq!(g.opacity(), 1.0);
}

#[test]
fn never_more_than_two_scenes_drawn_once_settled() {
    let mut c = controller();
    for step in 0..=20 {
        let s = step as f32 / 20.0;
        settle(&mut c, s);
        let drawn = c.visible_graphs().count();
        assert!((1..=2).contains(&drawn), "{drawn} scenes drawn at {s}");
    }
}

#[test]
fn first_frame_announces_the_entering_scene() {
    let mut c = controller();
    c.update_progression(0.0);
    c.advance(FRAME);
    let enters: Vec<_> = c
        .take_interactions()
        .into_iter()
        .filter(|i| i.kind == InteractionKind::SceneEnter)
        .collect();
    assert_eq!(enters.len(), 1);
    assert_eq!(enters[0].scene, SceneKind::Terrain);
    assert!(c.take_interactions().is_empty());
}

#[test]
fn input_goes_to_the_most_visible_scene() {
    let mut c = controller();
    settle(&mut c, 0.0);
    c.take_interactions();

    let click = InputEvent::Click {
        pointer: Vec2::new(0.5, 0.25),
    };
    assert_eq!(c.route_input(&click), Some(SceneKind::Terrain));
    let got = c.take_interactions();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].kind, InteractionKind::Click);
    assert!((got[0].intensity - 0.75).abs() < 1e-6);

    let touch = InputEvent::TouchStart {
        pointer: Vec2::new(0.5, 0.5),
    };
    assert_eq!(c.route_input(&touch), Some(SceneKind::Terrain));
    assert_eq!(c.take_interactions()[0].kind, InteractionKind::Touch);

    let key = InputEvent::KeyDown { key: "a".into() };
    assert_eq!(c.route_input(&key), None);
}

#[test]
fn faint_scenes_do_not_take_input() {
    let config = ExperienceConfig {
        input_threshold: 0.9,
        ..ExperienceConfig::default()
    };
    let mut c = SceneController::new(&config).unwrap();
    settle(&mut c, 0.3);
    let click = InputEvent::Click {
        pointer: Vec2::splat(0.5),
    };
    assert_eq!(c.route_input(&click), None);
}

#[test]
fn failing_scene_is_replaced_by_a_placeholder() {
    let mut config = ExperienceConfig::default();
    config.particles.min_distance = -1.0;
    let mut c = SceneController::new(&config).unwrap();
    assert_eq!(c.kind_of("network"), Some(SceneKind::Placeholder));
    assert_eq!(c.kind_of("terrain"), Some(SceneKind::Terrain));
    settle(&mut c, 0.42);
    let g = c.scene("network").unwrap().graph();
    assert!(g.visible);
    assert_eq!(g.node_count(), 1);
}

#[test]
fn mesh_load_installs_into_live_scene() {
    let mut c = controller();
    let ticket = c.request_mesh("terrain", "valley.obj").unwrap();
    assert_eq!(ticket.path, "valley.obj");
    let outcome = c.complete_load(&ticket, Ok(MeshData::octahedron(1.0)));
    assert_eq!(outcome, LoadOutcome::Installed);
    assert_eq!(terrain_vertices(&c), Some(6));
}

#[test]
fn failed_load_keeps_procedural_terrain() {
    let mut c = controller();
    let before = terrain_vertices(&c);
    let ticket = c.request_mesh("terrain", "missing.obj").unwrap();
    let err = AssetError::Fetch {
        path: "missing.obj".into(),
        reason: "HTTP 404".into(),
    };
    assert_eq!(c.complete_load(&ticket, Err(err)), LoadOutcome::FallbackInstalled);
    assert!(before.is_some());
    assert_eq!(terrain_vertices(&c), before);
}

#[test]
fn load_finishing_after_dispose_is_dropped() {
    let mut c = controller();
    let ticket = c.request_mesh("terrain", "valley.obj").unwrap();
    assert!(c.dispose_scene("terrain"));
    let outcome = c.complete_load(&ticket, Ok(MeshData::octahedron(1.0)));
    assert_eq!(outcome, LoadOutcome::Stale);
    assert_eq!(terrain_vertices(&c), None);
    assert!(c.scene("terrain").unwrap().graph().nodes.is_empty());
    assert!(c.request_mesh("terrain", "valley.obj").is_none());
    assert!(c.request_mesh("nowhere", "valley.obj").is_none());
}

#[test]
fn disposed_scenes_are_never_drawn() {
    let mut c = controller();
    assert!(c.dispose_scene("terrain"));
    assert!(!c.dispose_scene("terrain"));
    assert!(!c.dispose_scene("nowhere"));
    settle(&mut c, 0.0);
    assert_eq!(c.visible_graphs().count(), 0);
    assert_eq!(c.opacity("terrain"), Some(0.0));
    assert_ne!(c.most_visible(), c.index_of("terrain"));

    c.dispose_all();
    settle(&mut c, 0.5);
    assert_eq!(c.visible_graphs().count(), 0);
    assert_eq!(c.most_visible(), None);
}

#[test]
fn kind_weights_follow_displayed_opacity() {
    let mut c = controller();
    settle(&mut c, 1.0);
    let w = c.kind_weights();
    assert_eq!(w[voice_index(SceneKind::Geometry)], 1.0);
    assert_eq!(w[voice_index(SceneKind::Terrain)], 0.0);
}

#[test]
fn cell_divisions_reach_the_interaction_queue() {
    let mut config = ExperienceConfig::default();
    config.colony.odds = DivisionOdds::Forced(1.0);
    config.colony.division_cooldown = 0.0;
    let mut c = SceneController::new(&config).unwrap();
    settle(&mut c, 0.67);
    let divisions = c
        .take_interactions()
        .into_iter()
        .filter(|i| i.kind == InteractionKind::Division && i.scene == SceneKind::Cells)
        .count();
    assert!(divisions > 0);
}

#[test]
fn duplicate_names_are_a_config_error() {
    let config = ExperienceConfig {
        scenes: vec![
            SceneSpec::new("a", SceneKind::Terrain, 0.0, 0.5),
            SceneSpec::new("a", SceneKind::Network, 0.5, 1.0),
        ],
        ..ExperienceConfig::default()
    };
    assert_eq!(
        SceneController::new(&config).err(),
        Some(ConfigError::DuplicateScene("a".into()))
    );
}
