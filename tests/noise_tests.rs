// Host-side tests for gradient noise and the fractal sums built on it.

use scrollscape_core::noise::{elevation, fbm, perlin, warped_fbm};

#[test]
fn lattice_points_are_zero() {
    for x in -3..3 {
        for y in -3..3 {
            assert_eq!(perlin(x as f32, y as f32), 0.0);
        }
    }
}

#[test]
fn noise_is_deterministic() {
    for i in 0..50 {
        let x = i as f32 * 0.37 - 4.0;
        let y = i as f32 * 0.11 + 2.5;
        assert_eq!(perlin(x, y), perlin(x, y));
        assert_eq!(fbm(x, y, 3.0), fbm(x, y, 3.0));
        assert_eq!(elevation(x, y, 3.0), warped_fbm(x, y, 3.0));
    }
}

#[test]
fn noise_is_continuous() {
    let h = 1e-3;
    for i in 0..100 {
        let x = i as f32 * 0.173;
        let y = i as f32 * 0.091;
        assert!((perlin(x + h, y) - perlin(x, y)).abs() < 0.01);
        assert!((fbm(x, y + h, 1.0) - fbm(x, y, 1.0)).abs() < 0.05);
    }
}

#[test]
fn fractal_sum_stays_bounded() {
    for i in 0..400 {
        let x = (i % 20) as f32 * 0.61 - 6.0;
        let y = (i / 20) as f32 * 0.47 - 5.0;
        let v = warped_fbm(x, y, 17.0);
        assert!(v.is_finite());
        assert!(v.abs() < 2.0, "{v} at ({x}, {y})");
    }
}

#[test]
fn seed_moves_the_sample() {
    let differs = (0..20).any(|i| {
        let x = i as f32 * 0.3 + 0.15;
        fbm(x, x * 0.5, 0.0) != fbm(x, x * 0.5, 17.0)
    });
    assert!(differs);
}

#[test]
fn non_finite_input_is_flat() {
    assert_eq!(perlin(f32::NAN, 1.0), 0.0);
    assert_eq!(perlin(0.5, f32::INFINITY), 0.0);
}
