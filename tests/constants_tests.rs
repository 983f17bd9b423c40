// Host-side tests for front-end constants and how they line up with the engine.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn dom_ids_are_distinct() {
    let ids = [
        CANVAS_ID,
        START_OVERLAY_ID,
        START_BUTTON_ID,
        ERROR_OVERLAY_ID,
        ERROR_MESSAGE_ID,
        ERROR_RETRY_ID,
    ];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        assert!(!a.contains(' '), "{a} is not a valid element id");
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert!(TERRAIN_MESH_ATTR.starts_with("data-"));
}

#[test]
fn mesh_override_targets_a_default_scene() {
    let scenes = scrollscape_core::default_scenes();
    let spec = scenes.iter().find(|s| s.name == TERRAIN_SCENE);
    assert_eq!(
        spec.map(|s| s.kind),
        Some(scrollscape_core::SceneKind::Terrain)
    );
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn audio_levels_are_sane() {
    for gain in [MASTER_GAIN, REVERB_WET, DELAY_WET, VOICE_LEVEL, REVERB_SEND, DELAY_SEND] {
        assert!((0.0..=1.0).contains(&gain));
    }
    // feedback at or above unity never decays
    assert!(DELAY_FEEDBACK > 0.0 && DELAY_FEEDBACK < 1.0);
    assert!(DELAY_TIME_SEC > 0.0 && DELAY_TIME_SEC < 2.0);
    assert!(REVERB_DECAY_SEC > 0.0 && REVERB_DECAY_SEC <= REVERB_SECONDS);
    assert!(TONE_LEAD_SEC >= 0.0 && TONE_ATTACK_SEC > 0.0 && TONE_STOP_PAD_SEC > 0.0);
    assert!(DELAY_TONE_HZ > 20.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn lighting_stays_in_range() {
    assert!(AMBIENT_LIGHT > 0.0);
    assert!(AMBIENT_LIGHT + DIFFUSE_LIGHT <= 1.0 + 1e-6);
    assert!(glam::Vec3::from_array(LIGHT_DIR).length() > 0.0);
    assert!(CLEAR_COLOR.iter().all(|c| (0.0..=1.0).contains(c)));
    assert!(INITIAL_VERTEX_CAPACITY.is_power_of_two());
}
