//! Deterministic 2D gradient noise and fractal sums built on top of it.
//!
//! All functions are pure. The permutation table is built once, on first use,
//! and shared read-only afterwards.

use crate::constants::{FBM_GAIN, FBM_LACUNARITY, FBM_OCTAVES, WARP_STRENGTH};
use std::sync::OnceLock;

static PERMUTATION: OnceLock<[u8; 512]> = OnceLock::new();

// Fixed shuffle seed so every build produces the same terrain.
const PERMUTATION_SEED: u32 = 0x5EED_1A7E;

fn build_permutation() -> [u8; 512] {
    let mut base = [0u8; 256];
    for (i, v) in base.iter_mut().enumerate() {
        *v = i as u8;
    }
    // Fisher-Yates driven by xorshift32
    let mut s = PERMUTATION_SEED;
    for i in (1..256usize).rev() {
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        let j = (s as usize) % (i + 1);
        base.swap(i, j);
    }
    let mut table = [0u8; 512];
    for i in 0..512 {
        table[i] = base[i & 255];
    }
    table
}

#[inline]
fn permutation() -> &'static [u8; 512] {
    PERMUTATION.get_or_init(build_permutation)
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn grad(hash: u8, x: f32, y: f32) -> f32 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

/// Single-octave gradient noise. Zero on integer lattice points, roughly
/// within [-1, 1] elsewhere.
pub fn perlin(x: f32, y: f32) -> f32 {
    if !x.is_finite() || !y.is_finite() {
        return 0.0;
    }
    let p = permutation();
    let xf = x.floor();
    let yf = y.floor();
    let xi = (xf as i64 & 255) as usize;
    let yi = (yf as i64 & 255) as usize;
    let x = x - xf;
    let y = y - yf;
    let u = fade(x);
    let v = fade(y);

    let aa = p[p[xi] as usize + yi];
    let ab = p[p[xi] as usize + yi + 1];
    let ba = p[p[xi + 1] as usize + yi];
    let bb = p[p[xi + 1] as usize + yi + 1];

    let x1 = lerp(grad(aa, x, y), grad(ba, x - 1.0, y), u);
    let x2 = lerp(grad(ab, x, y - 1.0), grad(bb, x - 1.0, y - 1.0), u);
    lerp(x1, x2, v)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fractal sum of six octaves; amplitude halves and frequency grows ~2.1x per
/// octave. The seed shifts the sample position, so different seeds read
/// different parts of the same lattice.
pub fn fbm(x: f32, y: f32, seed: f32) -> f32 {
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    let mut sum = 0.0;
    for _ in 0..FBM_OCTAVES {
        sum += amplitude * perlin(x * frequency + seed, y * frequency + seed);
        amplitude *= FBM_GAIN;
        frequency *= FBM_LACUNARITY;
    }
    sum
}

/// Second-order domain warp: two fbm evaluations displace the coordinates
/// of a third.
pub fn warped_fbm(x: f32, y: f32, seed: f32) -> f32 {
    let qx = fbm(x, y, seed);
    let qy = fbm(x + 5.2, y + 1.3, seed);
    fbm(x + WARP_STRENGTH * qx, y + WARP_STRENGTH * qy, seed)
}

/// Elevation in roughly [-1, 1] before any amplitude scaling.
#[inline]
pub fn elevation(x: f32, y: f32, seed: f32) -> f32 {
    warped_fbm(x, y, seed)
}
