//! Point cloud with distance-threshold links, rebuilt every tick.

use crate::constants::{
    PARTICLE_COUNT, PARTICLE_HALF_EXTENT, PARTICLE_MAX_CONNECTIONS, PARTICLE_MAX_SPEED,
    PARTICLE_MIN_DISTANCE, REFERENCE_FRAME_RATE,
};
use crate::error::ConfigError;
use glam::Vec3;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Displacement per reference frame.
    pub velocity: Vec3,
    pub connections: u32,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            connections: 0,
        }
    }
}

/// Link between particles `a < b`; `alpha = 1 - distance / min_distance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub alpha: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    pub count: usize,
    pub half_extent: f32,
    pub min_distance: f32,
    pub max_connections: u32,
    pub max_speed: f32,
    /// When true, motion is `velocity * dt * 60`; when false, `velocity` is
    /// applied once per tick regardless of frame time.
    pub frame_rate_independent: bool,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            half_extent: PARTICLE_HALF_EXTENT,
            min_distance: PARTICLE_MIN_DISTANCE,
            max_connections: PARTICLE_MAX_CONNECTIONS,
            max_speed: PARTICLE_MAX_SPEED,
            frame_rate_independent: true,
        }
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.half_extent.is_finite() && self.half_extent > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "particle.half_extent",
                reason: "must be positive",
            });
        }
        if !(self.min_distance.is_finite() && self.min_distance > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "particle.min_distance",
                reason: "must be positive",
            });
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "particle.max_speed",
                reason: "must be non-negative",
            });
        }
        Ok(())
    }
}

/// Moving points in a cube of half-extent `R`, linked when closer than
/// `min_distance`, with each point linked at most `max_connections` times.
///
/// The pairwise scan is O(n^2); fine for the ~150 points this is used with.
pub struct ParticleGraph {
    config: ParticleConfig,
    particles: Vec<Particle>,
    edges: Vec<Edge>,
    line_positions: Vec<Vec3>,
    line_alphas: Vec<f32>,
}

impl ParticleGraph {
    /// Spawn `config.count` particles with random positions and velocities.
    pub fn new<R: Rng>(config: ParticleConfig, rng: &mut R) -> Self {
        let r = config.half_extent;
        let v = config.max_speed;
        let particles = (0..config.count)
            .map(|_| {
                let position = Vec3::new(
                    rng.gen_range(-r..=r),
                    rng.gen_range(-r..=r),
                    rng.gen_range(-r..=r),
                );
                let velocity = if v > 0.0 {
                    Vec3::new(
                        rng.gen_range(-v..=v),
                        rng.gen_range(-v..=v),
                        rng.gen_range(-v..=v),
                    )
                } else {
                    Vec3::ZERO
                };
                Particle::new(position, velocity)
            })
            .collect();
        Self::from_particles(config, particles)
    }

    /// Build from explicit particles (count in `config` is ignored).
    pub fn from_particles(config: ParticleConfig, particles: Vec<Particle>) -> Self {
        let capacity = particles.len() * config.max_connections as usize / 2 + 1;
        Self {
            config,
            particles,
            edges: Vec::with_capacity(capacity),
            line_positions: Vec::with_capacity(capacity * 2),
            line_alphas: Vec::with_capacity(capacity * 2),
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Segment list (two vertices per edge) for the current edges.
    pub fn line_positions(&self) -> &[Vec3] {
        &self.line_positions
    }

    pub fn line_alphas(&self) -> &[f32] {
        &self.line_alphas
    }

    /// Vertices to draw this frame; stale entries past it are ignored.
    pub fn draw_count(&self) -> usize {
        self.edges.len() * 2
    }

    pub fn tick(&mut self, dt_sec: f32) {
        for p in &mut self.particles {
            p.connections = 0;
        }
        self.integrate(dt_sec);
        self.rebuild_edges();
    }

    fn integrate(&mut self, dt_sec: f32) {
        let step = if self.config.frame_rate_independent {
            dt_sec.max(0.0) * REFERENCE_FRAME_RATE
        } else {
            1.0
        };
        let r = self.config.half_extent;
        for p in &mut self.particles {
            p.position += p.velocity * step;
            // Reflect only while heading outward so an overshooting particle
            // is not flipped back and forth.
            for axis in 0..3 {
                let pos = p.position[axis];
                let vel = p.velocity[axis];
                if (pos > r && vel > 0.0) || (pos < -r && vel < 0.0) {
                    p.velocity[axis] = -vel;
                }
            }
        }
    }

    fn rebuild_edges(&mut self) {
        self.edges.clear();
        self.line_positions.clear();
        self.line_alphas.clear();
        let max = self.config.max_connections;
        let min_d = self.config.min_distance;
        let n = self.particles.len();
        for i in 0..n {
            if self.particles[i].connections >= max {
                continue;
            }
            for j in (i + 1)..n {
                if self.particles[i].connections >= max {
                    break;
                }
                if self.particles[j].connections >= max {
                    continue;
                }
                let pi = self.particles[i].position;
                let pj = self.particles[j].position;
                let d = pi.distance(pj);
                if d < min_d {
                    let alpha = 1.0 - d / min_d;
                    self.edges.push(Edge { a: i, b: j, alpha });
                    self.line_positions.push(pi);
                    self.line_positions.push(pj);
                    self.line_alphas.push(alpha);
                    self.line_alphas.push(alpha);
                    self.particles[i].connections += 1;
                    self.particles[j].connections += 1;
                }
            }
        }
    }

    /// Positions of every particle, for point rendering.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    /// Kick every particle away from `origin` with a falloff over `radius`.
    pub fn impulse(&mut self, origin: Vec3, radius: f32, strength: f32) {
        if radius <= 0.0 {
            return;
        }
        let limit = self.config.max_speed * 4.0;
        for p in &mut self.particles {
            let offset = p.position - origin;
            let d = offset.length();
            if d < radius && d > 1e-5 {
                let falloff = 1.0 - d / radius;
                p.velocity += offset / d * strength * falloff;
                p.velocity = p.velocity.clamp_length_max(limit);
            }
        }
    }

    /// Pull velocities back toward the configured speed limit.
    pub fn relax_speeds(&mut self, factor: f32) {
        let max = self.config.max_speed;
        for p in &mut self.particles {
            let speed = p.velocity.length();
            if speed > max {
                let target = speed + (max - speed) * factor.clamp(0.0, 1.0);
                p.velocity = p.velocity / speed * target;
            }
        }
    }
}
