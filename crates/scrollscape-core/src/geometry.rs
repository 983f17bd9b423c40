//! Flower-of-life lattice with metatron connecting lines.

use crate::error::ConfigError;
use glam::Vec3;
use std::f32::consts::{FRAC_PI_3, TAU};

#[derive(Clone, Debug, PartialEq)]
pub struct GeometryConfig {
    /// Rings of circles around the centre circle at full unfold.
    pub rings: u32,
    pub radius: f32,
    /// Line segments per circle outline.
    pub circle_segments: u32,
    /// Radians per second.
    pub spin_speed: f32,
    /// Relative radius modulation.
    pub breath_amount: f32,
    /// Breath cycles per second.
    pub breath_rate: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            rings: 2,
            radius: 1.5,
            circle_segments: 48,
            spin_speed: 0.12,
            breath_amount: 0.06,
            breath_rate: 0.15,
        }
    }
}

impl GeometryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.circle_segments < 3 {
            return Err(ConfigError::InvalidParameter {
                name: "geometry.circle_segments",
                reason: "needs at least 3 segments",
            });
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "geometry.radius",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

/// Circle centres of a hexagonal lattice, grouped by ring (ring 0 is the
/// single centre). Ring `k` holds `6k` centres at hex distance `k`.
pub fn lattice_centres(rings: u32, spacing: f32) -> Vec<(u32, Vec3)> {
    let mut out = vec![(0, Vec3::ZERO)];
    // axial hex directions in the XY plane
    let dirs: [Vec3; 6] = std::array::from_fn(|i| {
        let a = i as f32 * FRAC_PI_3;
        Vec3::new(a.cos(), a.sin(), 0.0) * spacing
    });
    for ring in 1..=rings {
        let mut p = dirs[4] * ring as f32;
        for side in 0..6 {
            for _ in 0..ring {
                out.push((ring, p));
                p += dirs[side];
            }
        }
    }
    out
}

/// Formation state. `unfold` in [0,1] reveals rings outward.
pub struct SacredGeometry {
    config: GeometryConfig,
    centres: Vec<(u32, Vec3)>,
    unfold: f32,
    rotation: f32,
    time: f32,
    circle_lines: Vec<Vec3>,
    metatron_lines: Vec<Vec3>,
    metatron_alphas: Vec<f32>,
    built_key: Option<(u32, i32)>,
}

impl SacredGeometry {
    pub fn new(config: GeometryConfig) -> Self {
        let centres = lattice_centres(config.rings, config.radius);
        let mut g = Self {
            config,
            centres,
            unfold: 1.0,
            rotation: 0.0,
            time: 0.0,
            circle_lines: Vec::new(),
            metatron_lines: Vec::new(),
            metatron_alphas: Vec::new(),
            built_key: None,
        };
        g.rebuild_if_needed();
        g
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_unfold(&mut self, unfold: f32) {
        self.unfold = if unfold.is_finite() {
            unfold.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Rings currently shown (the centre circle is always shown).
    pub fn visible_rings(&self) -> u32 {
        (self.unfold * self.config.rings as f32).round() as u32
    }

    pub fn visible_centres(&self) -> impl Iterator<Item = Vec3> + '_ {
        let rings = self.visible_rings();
        self.centres
            .iter()
            .filter(move |(r, _)| *r <= rings)
            .map(|(_, c)| *c)
    }

    fn breath_scale(&self) -> f32 {
        1.0 + self.config.breath_amount * (self.time * self.config.breath_rate * TAU).sin()
    }

    /// Advance spin and breath; returns true when line buffers were rebuilt.
    pub fn update(&mut self, dt: f32) -> bool {
        let dt = dt.max(0.0);
        self.time += dt;
        self.rotation = (self.rotation + self.config.spin_speed * dt) % TAU;
        self.rebuild_if_needed()
    }

    fn rebuild_if_needed(&mut self) -> bool {
        // breath quantised to 1/200 so a still formation is not rebuilt
        let key = (self.visible_rings(), (self.breath_scale() * 200.0).round() as i32);
        if self.built_key == Some(key) {
            return false;
        }
        self.built_key = Some(key);
        let scale = self.breath_scale();
        let r = self.config.radius * scale;
        let centres: Vec<Vec3> = self.visible_centres().map(|c| c * scale).collect();

        self.circle_lines.clear();
        let segs = self.config.circle_segments;
        for c in &centres {
            for s in 0..segs {
                let a0 = s as f32 / segs as f32 * TAU;
                let a1 = (s + 1) as f32 / segs as f32 * TAU;
                self.circle_lines.push(*c + Vec3::new(a0.cos(), a0.sin(), 0.0) * r);
                self.circle_lines.push(*c + Vec3::new(a1.cos(), a1.sin(), 0.0) * r);
            }
        }

        self.metatron_lines.clear();
        self.metatron_alphas.clear();
        // neighbours and second neighbours of the lattice
        let reach = 2.0 * r + 1e-3;
        for i in 0..centres.len() {
            for j in (i + 1)..centres.len() {
                let d = centres[i].distance(centres[j]);
                if d <= reach {
                    let alpha = 1.0 - 0.5 * (d / reach);
                    self.metatron_lines.push(centres[i]);
                    self.metatron_lines.push(centres[j]);
                    self.metatron_alphas.push(alpha);
                    self.metatron_alphas.push(alpha);
                }
            }
        }
        true
    }

    pub fn circle_lines(&self) -> &[Vec3] {
        &self.circle_lines
    }

    pub fn metatron_lines(&self) -> &[Vec3] {
        &self.metatron_lines
    }

    pub fn metatron_alphas(&self) -> &[f32] {
        &self.metatron_alphas
    }
}
