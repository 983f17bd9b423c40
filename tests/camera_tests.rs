// Host-side tests for keyframe interpolation and easing.

use glam::Vec3;
use scrollscape_core::easing::{cubic_bezier, BEZIER_C2, BEZIER_C4};
use scrollscape_core::{default_keyframes, CameraKeyframe, CameraTrack, ConfigError, Easing};

fn two_key_track() -> CameraTrack {
    CameraTrack::new(
        vec![
            CameraKeyframe::new(0.0, Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 75.0),
            CameraKeyframe::new(1.0, Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 0.5, 0.0), 50.0),
        ],
        Easing::STANDARD,
    )
    .unwrap()
}

#[test]
fn easing_endpoints_are_exact() {
    for e in [Easing::Linear, Easing::SmoothStep, Easing::STANDARD] {
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(1.0), 1.0);
    }
}

#[test]
fn standard_easing_matches_reference_curve() {
    let mid = Easing::STANDARD.apply(0.5);
    assert!((mid - 0.65).abs() < 1e-5, "got {mid}");
    assert_eq!(mid, cubic_bezier(0.5, BEZIER_C2, BEZIER_C4));
}

#[test]
fn standard_easing_is_monotonic_and_clamped() {
    let mut prev = 0.0;
    for i in 0..=200 {
        let v = Easing::STANDARD.apply(i as f32 / 200.0);
        assert!(v >= prev);
        prev = v;
    }
    assert_eq!(Easing::STANDARD.apply(-3.0), 0.0);
    assert_eq!(Easing::STANDARD.apply(7.0), 1.0);
    assert_eq!(Easing::STANDARD.apply(f32::NAN), 0.0);
}

#[test]
fn sample_hits_every_keyframe_exactly() {
    let keys = default_keyframes();
    let track = CameraTrack::new(keys.clone(), Easing::STANDARD).unwrap();
    for k in &keys {
        let s = track.sample(k.scroll);
        assert_eq!(s.position, k.position, "position at {}", k.scroll);
        assert_eq!(s.rotation, k.rotation, "rotation at {}", k.scroll);
        assert_eq!(s.fov, k.fov, "fov at {}", k.scroll);
    }
}

#[test]
fn midway_sample_lies_between_neighbours() {
    let s = two_key_track().sample(0.5);
    assert!(s.fov > 50.0 && s.fov < 75.0);
    assert!(s.position.x > 0.0 && s.position.x < 10.0);
    // eased: the camera is past the linear midpoint
    assert!(s.position.x > 5.0);
}

#[test]
fn out_of_range_scroll_clamps_to_ends() {
    let track = two_key_track();
    assert_eq!(track.sample(-0.5), track.sample(0.0));
    assert_eq!(track.sample(1.5), track.sample(1.0));
    assert_eq!(track.sample(f32::NAN), track.sample(0.0));
}

#[test]
fn segment_lookup_picks_containing_pair() {
    let track = CameraTrack::new(default_keyframes(), Easing::Linear).unwrap();
    assert_eq!(track.segment_index(0.0), 0);
    assert_eq!(track.segment_index(0.1), 0);
    assert_eq!(track.segment_index(0.2), 1);
    assert_eq!(track.segment_index(1.0), track.keyframes().len() - 2);
}

#[test]
fn invalid_tracks_are_rejected() {
    let k = |s: f32| CameraKeyframe::new(s, Vec3::ZERO, Vec3::ZERO, 60.0);

    assert_eq!(
        CameraTrack::new(vec![k(0.0)], Easing::STANDARD).unwrap_err(),
        ConfigError::TooFewKeyframes(1)
    );
    assert!(matches!(
        CameraTrack::new(vec![k(0.1), k(1.0)], Easing::STANDARD),
        Err(ConfigError::KeyframeBounds { .. })
    ));
    assert!(matches!(
        CameraTrack::new(vec![k(0.0), k(0.9)], Easing::STANDARD),
        Err(ConfigError::KeyframeBounds { .. })
    ));
    assert!(matches!(
        CameraTrack::new(vec![k(0.0), k(0.5), k(0.5), k(1.0)], Easing::STANDARD),
        Err(ConfigError::KeyframesNotIncreasing { index: 2, .. })
    ));
    let mut bad = k(0.5);
    bad.fov = f32::INFINITY;
    assert_eq!(
        CameraTrack::new(vec![k(0.0), bad, k(1.0)], Easing::STANDARD).unwrap_err(),
        ConfigError::NonFiniteKeyframe(1)
    );
}

#[test]
fn bezier_ordinates_are_validated() {
    let keys = || {
        vec![
            CameraKeyframe::new(0.0, Vec3::ZERO, Vec3::ZERO, 60.0),
            CameraKeyframe::new(1.0, Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 60.0),
        ]
    };
    for (c2, c4) in [(f32::NAN, BEZIER_C4), (1.8, 1.6), (0.6, 0.4), (-0.1, 0.5), (0.2, f32::INFINITY)] {
        assert!(
            matches!(
                CameraTrack::new(keys(), Easing::Bezier { c2, c4 }),
                Err(ConfigError::InvalidEasing { .. })
            ),
            "accepted c2={c2} c4={c4}"
        );
    }
    for e in [Easing::Linear, Easing::SmoothStep, Easing::STANDARD, Easing::Bezier { c2: 0.0, c4: 1.0 }] {
        let track = CameraTrack::new(keys(), e).unwrap();
        for step in 0..=20 {
            let x = track.sample(step as f32 / 20.0).position.x;
            assert!((0.0..=10.0).contains(&x), "{e:?} left the segment: {x}");
        }
    }
}

#[test]
fn unrotated_camera_looks_down_negative_z() {
    let state = two_key_track().sample(0.0);
    let f = state.forward();
    assert!((f - Vec3::NEG_Z).length() < 1e-6);
    let view = state.view_matrix();
    let eye = view.transform_point3(state.position);
    assert!(eye.length() < 1e-5);
}
