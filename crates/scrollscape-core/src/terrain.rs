//! Height-field synthesis over a regular grid.

use crate::assets::MeshData;
use crate::constants::{
    TERRAIN_GROWTH_EPSILON, TERRAIN_MIN_VISIBLE_FRACTION, TERRAIN_RESOLUTION, TERRAIN_SIZE,
};
use crate::error::ConfigError;
use crate::noise;
use glam::{Vec2, Vec3};

/// Large-scale sinusoidal shaping added on top of the fractal noise:
/// `amplitude * sin(x * frequency.x + phase) * cos(y * frequency.y + phase)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacroTerm {
    pub amplitude: f32,
    pub frequency: Vec2,
    pub phase: f32,
}

impl MacroTerm {
    #[inline]
    pub fn eval(&self, x: f32, y: f32) -> f32 {
        self.amplitude * (x * self.frequency.x + self.phase).sin() * (y * self.frequency.y + self.phase).cos()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TerrainConfig {
    /// Vertices per side.
    pub resolution: u32,
    /// World-space edge length of the square grid.
    pub size: f32,
    pub seed: f32,
    /// World units to noise units.
    pub noise_scale: f32,
    /// Noise output is multiplied by this before macro shaping.
    pub amplitude: f32,
    pub macro_terms: Vec<MacroTerm>,
    pub min_height: f32,
    pub max_height: f32,
    /// Share of the height kept at growth 0.
    pub min_visible_fraction: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            resolution: TERRAIN_RESOLUTION,
            size: TERRAIN_SIZE,
            seed: 17.0,
            noise_scale: 0.045,
            amplitude: 9.0,
            macro_terms: vec![
                // long ridge running across the valley
                MacroTerm {
                    amplitude: 2.5,
                    frequency: Vec2::new(0.08, 0.02),
                    phase: 0.4,
                },
                // broad undulation
                MacroTerm {
                    amplitude: 1.5,
                    frequency: Vec2::new(0.03, 0.11),
                    phase: 1.9,
                },
                MacroTerm {
                    amplitude: -1.2,
                    frequency: Vec2::new(0.15, 0.15),
                    phase: 0.0,
                },
            ],
            min_height: -6.0,
            max_height: 12.0,
            min_visible_fraction: TERRAIN_MIN_VISIBLE_FRACTION,
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution < 2 {
            return Err(ConfigError::InvalidParameter {
                name: "terrain.resolution",
                reason: "needs at least 2 vertices per side",
            });
        }
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "terrain.size",
                reason: "must be positive",
            });
        }
        if !(self.min_height <= self.max_height) {
            return Err(ConfigError::InvalidParameter {
                name: "terrain.min_height",
                reason: "must not exceed max_height",
            });
        }
        if !(0.0..=1.0).contains(&self.min_visible_fraction) {
            return Err(ConfigError::InvalidParameter {
                name: "terrain.min_visible_fraction",
                reason: "must be within [0, 1]",
            });
        }
        Ok(())
    }

    /// Clamped elevation at full growth.
    pub fn base_height(&self, x: f32, y: f32) -> f32 {
        let n = noise::elevation(x * self.noise_scale, y * self.noise_scale, self.seed) * self.amplitude;
        let shaped = self.macro_terms.iter().fold(n, |h, t| h + t.eval(x, y));
        if shaped.is_finite() {
            shaped.clamp(self.min_height, self.max_height)
        } else {
            0.0
        }
    }

    /// Multiplier applied to base heights for a growth value.
    #[inline]
    pub fn growth_factor(&self, growth: f32) -> f32 {
        let g = if growth.is_finite() {
            growth.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.min_visible_fraction + g * (1.0 - self.min_visible_fraction)
    }

    /// Final height: never flatter than `min_visible_fraction` of the base.
    pub fn height_at(&self, x: f32, y: f32, growth: f32) -> f32 {
        self.base_height(x, y) * self.growth_factor(growth)
    }
}

/// Grid or loaded surface whose vertex heights follow a growth parameter.
///
/// Heights are only regenerated when growth moves by more than a small
/// epsilon; every regeneration rewrites all positions and normals and bumps
/// `revision`.
pub struct TerrainMesh {
    base_positions: Vec<Vec2>,
    base_heights: Vec<f32>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    growth_factor: f32,
    growth: Option<f32>,
    revision: u64,
}

impl TerrainMesh {
    /// Procedural square grid centred on the origin, Y up.
    pub fn grid(config: &TerrainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let n = config.resolution as usize;
        let step = config.size / (n - 1) as f32;
        let half = config.size * 0.5;
        let mut base_positions = Vec::with_capacity(n * n);
        let mut base_heights = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let x = col as f32 * step - half;
                let y = row as f32 * step - half;
                base_positions.push(Vec2::new(x, y));
                base_heights.push(config.base_height(x, y));
            }
        }
        let mut indices = Vec::with_capacity((n - 1) * (n - 1) * 6);
        for row in 0..n - 1 {
            for col in 0..n - 1 {
                let i0 = (row * n + col) as u32;
                let i1 = i0 + 1;
                let i2 = i0 + n as u32;
                let i3 = i2 + 1;
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }
        Ok(Self::from_parts(base_positions, base_heights, indices))
    }

    /// Use a loaded mesh as the surface: x/z become base positions, y the
    /// base height.
    pub fn from_mesh(mesh: &MeshData) -> Self {
        let base_positions = mesh.positions.iter().map(|p| Vec2::new(p.x, p.z)).collect();
        let base_heights = mesh.positions.iter().map(|p| p.y).collect();
        Self::from_parts(base_positions, base_heights, mesh.indices.clone())
    }

    fn from_parts(base_positions: Vec<Vec2>, base_heights: Vec<f32>, indices: Vec<u32>) -> Self {
        let positions = base_positions
            .iter()
            .zip(&base_heights)
            .map(|(p, h)| Vec3::new(p.x, *h, p.y))
            .collect::<Vec<_>>();
        let normals = vec![Vec3::Y; positions.len()];
        let mut mesh = Self {
            base_positions,
            base_heights,
            positions,
            normals,
            indices,
            growth_factor: 1.0,
            growth: None,
            revision: 0,
        };
        mesh.recompute_normals();
        mesh
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn growth(&self) -> Option<f32> {
        self.growth
    }

    /// Apply a growth value. Returns true when heights were regenerated.
    pub fn set_growth(&mut self, config: &TerrainConfig, growth: f32) -> bool {
        let g = if growth.is_finite() {
            growth.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if let Some(prev) = self.growth {
            // always land exactly on the ends of the range
            let at_end = (g == 0.0 || g == 1.0) && prev != g;
            if (g - prev).abs() < TERRAIN_GROWTH_EPSILON && !at_end {
                return false;
            }
        }
        self.growth = Some(g);
        self.growth_factor = config.growth_factor(g);
        self.regenerate();
        true
    }

    fn regenerate(&mut self) {
        let f = self.growth_factor;
        for ((p, base), h) in self
            .positions
            .iter_mut()
            .zip(&self.base_positions)
            .zip(&self.base_heights)
        {
            *p = Vec3::new(base.x, h * f, base.y);
        }
        self.recompute_normals();
        self.revision = self.revision.wrapping_add(1);
    }

    /// Area-weighted vertex normals from the triangle list.
    fn recompute_normals(&mut self) {
        for n in &mut self.normals {
            *n = Vec3::ZERO;
        }
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if a >= self.positions.len() || b >= self.positions.len() || c >= self.positions.len() {
                continue;
            }
            let face = (self.positions[b] - self.positions[a]).cross(self.positions[c] - self.positions[a]);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }
        for n in &mut self.normals {
            *n = n.try_normalize().unwrap_or(Vec3::Y);
        }
    }
}
