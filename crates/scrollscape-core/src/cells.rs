//! Cell colony: age, division eligibility, phased division and inheritance.
//!
//! Cells live in a dense arena. Divided cells are only marked inactive; a
//! periodic sweep prunes the oldest inactive records once the arena grows
//! past a soft ceiling.

use crate::constants::{
    CELL_CLEANUP_INTERVAL_SEC, CELL_DIVISION_COOLDOWN_SEC, CELL_DIVISION_DURATION_SEC,
    CELL_MAX_ACTIVE, CELL_MAX_GENERATIONS, CELL_RADIUS, CELL_SOFT_CEILING, REFERENCE_FRAME_RATE,
};
use crate::error::ConfigError;
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type CellId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthPattern {
    /// Daughters split along the local X axis.
    Radial,
    /// Each division picks a random axis in the horizontal plane.
    Spiral,
}

impl GrowthPattern {
    fn flipped(self) -> Self {
        match self {
            GrowthPattern::Radial => GrowthPattern::Spiral,
            GrowthPattern::Spiral => GrowthPattern::Radial,
        }
    }
}

/// Heritable traits. All fields are bounded; mutation is a clamped random walk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Genetics {
    /// Hue shift in [0, 1].
    pub color_bias: f32,
    /// Radius multiplier in [0.6, 1.4].
    pub size_bias: f32,
    /// Division eagerness in [0, 1].
    pub division_tendency: f32,
    pub growth_pattern: GrowthPattern,
}

impl Default for Genetics {
    fn default() -> Self {
        Self {
            color_bias: 0.5,
            size_bias: 1.0,
            division_tendency: 0.8,
            growth_pattern: GrowthPattern::Radial,
        }
    }
}

const SIZE_BIAS_MIN: f32 = 0.6;
const SIZE_BIAS_MAX: f32 = 1.4;

impl Genetics {
    fn mutated<R: Rng>(&self, rng: &mut R, amount: f32, flip_chance: f32) -> Self {
        let mut jitter = |v: f32, lo: f32, hi: f32| {
            if amount > 0.0 {
                (v + rng.gen_range(-amount..=amount)).clamp(lo, hi)
            } else {
                v
            }
        };
        let color_bias = jitter(self.color_bias, 0.0, 1.0);
        let size_bias = jitter(self.size_bias, SIZE_BIAS_MIN, SIZE_BIAS_MAX);
        let division_tendency = jitter(self.division_tendency, 0.0, 1.0);
        let growth_pattern = if rng.gen::<f32>() < flip_chance {
            self.growth_pattern.flipped()
        } else {
            self.growth_pattern
        };
        Self {
            color_bias,
            size_bias,
            division_tendency,
            growth_pattern,
        }
    }
}

/// Ordered phases of a division, selected by progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DivisionPhase {
    Preparation,
    Stretching,
    Separation,
    Completion,
}

impl DivisionPhase {
    pub fn from_progress(progress: f32) -> Self {
        match progress {
            p if p < 0.25 => DivisionPhase::Preparation,
            p if p < 0.6 => DivisionPhase::Stretching,
            p if p < 0.9 => DivisionPhase::Separation,
            _ => DivisionPhase::Completion,
        }
    }

    /// `[start, end)` progress span of the phase.
    pub fn span(self) -> (f32, f32) {
        match self {
            DivisionPhase::Preparation => (0.0, 0.25),
            DivisionPhase::Stretching => (0.25, 0.6),
            DivisionPhase::Separation => (0.6, 0.9),
            DivisionPhase::Completion => (0.9, 1.0),
        }
    }
}

/// Rendering hints for a dividing cell. Not part of the state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deformation {
    /// Stretch along the division axis (1 = round).
    pub elongation: f32,
    /// Squeeze across the axis (1 = round).
    pub compression: f32,
    pub membrane_tension: f32,
    /// Distance of each nucleus from the centre, in cell radii.
    pub nucleus_offset: f32,
}

impl Deformation {
    pub const ROUND: Deformation = Deformation {
        elongation: 1.0,
        compression: 1.0,
        membrane_tension: 0.0,
        nucleus_offset: 0.0,
    };
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub position: Vec3,
    pub age: f32,
    pub generation: u32,
    pub dividing: bool,
    pub division_progress: f32,
    pub division_axis: Vec3,
    pub genetics: Genetics,
    pub parent: Option<CellId>,
    pub active: bool,
}

impl Cell {
    pub fn phase(&self) -> Option<DivisionPhase> {
        self.dividing
            .then(|| DivisionPhase::from_progress(self.division_progress))
    }

    pub fn radius(&self) -> f32 {
        CELL_RADIUS * self.genetics.size_bias
    }

    pub fn deformation(&self) -> Deformation {
        let Some(phase) = self.phase() else {
            return Deformation::ROUND;
        };
        let (start, end) = phase.span();
        let local = ((self.division_progress - start) / (end - start)).clamp(0.0, 1.0);
        match phase {
            DivisionPhase::Preparation => Deformation {
                elongation: 1.0 + 0.05 * local,
                compression: 1.0,
                membrane_tension: 0.3 * local,
                nucleus_offset: 0.0,
            },
            DivisionPhase::Stretching => Deformation {
                elongation: 1.05 + 0.45 * local,
                compression: 1.0 - 0.15 * local,
                membrane_tension: 0.3 + 0.4 * local,
                nucleus_offset: 0.35 * local,
            },
            DivisionPhase::Separation => Deformation {
                elongation: 1.5 + 0.3 * local,
                compression: 0.85 - 0.25 * local,
                membrane_tension: 0.7 + 0.3 * local,
                nucleus_offset: 0.35 + 0.4 * local,
            },
            DivisionPhase::Completion => Deformation {
                elongation: 1.8,
                compression: 0.6,
                membrane_tension: 1.0 - local,
                nucleus_offset: 0.75 + 0.25 * local,
            },
        }
    }
}

/// How the per-tick division chance is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DivisionOdds {
    /// Tiered base probability times environment, tendency, pressure and time scale.
    Tiered,
    /// Fixed probability per eligibility check. A value >= 1 always divides.
    Forced(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColonyConfig {
    pub division_cooldown: f32,
    pub division_duration: f32,
    pub max_generations: u32,
    pub max_cells: usize,
    pub environment_factor: f32,
    pub time_scale: f32,
    /// Daughter offset from the parent, in parent radii.
    pub spacing: f32,
    pub mutation: f32,
    pub pattern_flip_chance: f32,
    pub soft_ceiling: usize,
    pub cleanup_interval: f32,
    pub odds: DivisionOdds,
    pub seed: u64,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            division_cooldown: CELL_DIVISION_COOLDOWN_SEC,
            division_duration: CELL_DIVISION_DURATION_SEC,
            max_generations: CELL_MAX_GENERATIONS,
            max_cells: CELL_MAX_ACTIVE,
            environment_factor: 1.0,
            time_scale: 1.0,
            spacing: 1.1,
            mutation: 0.05,
            pattern_flip_chance: 0.05,
            soft_ceiling: CELL_SOFT_CEILING,
            cleanup_interval: CELL_CLEANUP_INTERVAL_SEC,
            odds: DivisionOdds::Tiered,
            seed: 7,
        }
    }
}

impl ColonyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.division_duration.is_finite() && self.division_duration > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "colony.division_duration",
                reason: "must be positive",
            });
        }
        if self.max_cells == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "colony.max_cells",
                reason: "must allow at least the mother cell",
            });
        }
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "colony.time_scale",
                reason: "must be non-negative",
            });
        }
        Ok(())
    }
}

/// Emitted when a cell finishes dividing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DivisionEvent {
    pub parent: CellId,
    pub children: [CellId; 2],
    pub generation: u32,
    pub position: Vec3,
}

pub struct CellColony {
    config: ColonyConfig,
    cells: Vec<Cell>,
    active_count: usize,
    rng: StdRng,
    next_id: CellId,
    cleanup_timer: f32,
}

impl CellColony {
    /// Colony seeded with a generation-0 mother cell at the origin.
    pub fn new(config: ColonyConfig) -> Self {
        Self::with_mother(config, Genetics::default())
    }

    pub fn with_mother(config: ColonyConfig, genetics: Genetics) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let mut colony = Self {
            config,
            cells: Vec::with_capacity(CELL_SOFT_CEILING),
            active_count: 0,
            rng,
            next_id: 0,
            cleanup_timer: 0.0,
        };
        colony.spawn(Vec3::ZERO, 0, genetics, None);
        colony
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ColonyConfig {
        &mut self.config
    }

    /// Every record, including inactive (divided) cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn active_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.active)
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    fn spawn(&mut self, position: Vec3, generation: u32, genetics: Genetics, parent: Option<CellId>) -> CellId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.cells.push(Cell {
            id,
            position,
            age: 0.0,
            generation,
            dividing: false,
            division_progress: 0.0,
            division_axis: Vec3::X,
            genetics,
            parent,
            active: true,
        });
        self.active_count += 1;
        id
    }

    /// Tiered so the first divisions come quickly and a crowded colony calms down.
    pub fn base_probability(population: usize) -> f32 {
        match population {
            0 | 1 => 0.02,
            2..=4 => 0.008,
            5..=8 => 0.004,
            _ => 0.0015,
        }
    }

    pub fn population_pressure(&self) -> f32 {
        let ratio = self.active_count as f32 / self.config.max_cells as f32;
        (1.0 - ratio).max(0.1)
    }

    fn pending_divisions(&self) -> usize {
        self.cells.iter().filter(|c| c.active && c.dividing).count()
    }

    /// Guards that do not involve chance.
    pub fn is_eligible(&self, cell: &Cell) -> bool {
        cell.active
            && !cell.dividing
            && cell.age > self.config.division_cooldown
            && cell.generation < self.config.max_generations
            // each pending division adds one cell when it completes
            && self.active_count + self.pending_divisions() < self.config.max_cells
    }

    fn division_probability(&self, cell: &Cell, dt_sec: f32) -> f32 {
        match self.config.odds {
            DivisionOdds::Forced(p) => p,
            DivisionOdds::Tiered => {
                // base odds are per reference frame
                let frames = dt_sec.max(0.0) * REFERENCE_FRAME_RATE;
                Self::base_probability(self.active_count)
                    * self.config.environment_factor
                    * cell.genetics.division_tendency
                    * self.population_pressure()
                    * self.config.time_scale
                    * frames
            }
        }
    }

    /// Advance ages, run eligibility draws, progress divisions and complete
    /// the finished ones. Returns the divisions completed this tick.
    pub fn tick(&mut self, dt_sec: f32) -> Vec<DivisionEvent> {
        let dt = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };
        let scaled = dt * self.config.time_scale;
        let mut finished = Vec::new();

        for i in 0..self.cells.len() {
            if !self.cells[i].active {
                continue;
            }
            self.cells[i].age += scaled;
            if self.cells[i].dividing {
                let c = &mut self.cells[i];
                c.division_progress = (c.division_progress + scaled / self.config.division_duration).min(1.0);
                if c.division_progress >= 1.0 {
                    finished.push(i);
                }
            } else if self.is_eligible(&self.cells[i]) {
                let p = self.division_probability(&self.cells[i], dt);
                if p >= 1.0 || self.rng.gen::<f32>() < p {
                    self.begin_division(i);
                }
            }
        }

        let events = finished
            .into_iter()
            .filter_map(|i| self.complete_division(i))
            .collect();

        self.relax_positions(dt);

        self.cleanup_timer += dt;
        if self.cleanup_timer >= self.config.cleanup_interval {
            self.cleanup_timer = 0.0;
            self.sweep();
        }
        events
    }

    fn begin_division(&mut self, index: usize) {
        let axis = match self.cells[index].genetics.growth_pattern {
            GrowthPattern::Radial => Vec3::X,
            GrowthPattern::Spiral => {
                let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
                Quat::from_rotation_y(angle) * Vec3::X
            }
        };
        let c = &mut self.cells[index];
        c.dividing = true;
        c.division_progress = 0.0;
        c.division_axis = axis;
        log::debug!("[cells] cell {} (gen {}) begins dividing", c.id, c.generation);
    }

    /// Start dividing `id` immediately if the non-random guards allow it.
    pub fn force_division(&mut self, id: CellId) -> bool {
        let Some(index) = self.cells.iter().position(|c| c.id == id) else {
            return false;
        };
        if !self.is_eligible(&self.cells[index]) {
            return false;
        }
        self.begin_division(index);
        true
    }

    /// Replace the parent with two daughters. A parent already at the
    /// generation ceiling (or a full colony) is reset instead: no-op division.
    fn complete_division(&mut self, index: usize) -> Option<DivisionEvent> {
        let parent = self.cells[index].clone();
        if parent.generation >= self.config.max_generations || self.active_count >= self.config.max_cells {
            log::warn!(
                "[cells] refusing division of cell {} at generation {}",
                parent.id,
                parent.generation
            );
            let c = &mut self.cells[index];
            c.dividing = false;
            c.division_progress = 0.0;
            return None;
        }

        let offset = parent.division_axis * parent.radius() * self.config.spacing * 0.5;
        let generation = parent.generation + 1;
        let mutation = self.config.mutation;
        let flip = self.config.pattern_flip_chance;
        let g0 = parent.genetics.mutated(&mut self.rng, mutation, flip);
        let g1 = parent.genetics.mutated(&mut self.rng, mutation, flip);

        {
            let c = &mut self.cells[index];
            c.active = false;
            c.dividing = false;
        }
        self.active_count -= 1;

        let a = self.spawn(parent.position + offset, generation, g0, Some(parent.id));
        let b = self.spawn(parent.position - offset, generation, g1, Some(parent.id));
        log::debug!("[cells] cell {} divided into {} and {} (gen {})", parent.id, a, b, generation);
        Some(DivisionEvent {
            parent: parent.id,
            children: [a, b],
            generation,
            position: parent.position,
        })
    }

    /// Push overlapping active cells apart and drift the colony toward the origin.
    fn relax_positions(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let active: Vec<usize> = (0..self.cells.len()).filter(|&i| self.cells[i].active).collect();
        let mut pushes = vec![Vec3::ZERO; active.len()];
        for (ai, &i) in active.iter().enumerate() {
            for (bj, &j) in active.iter().enumerate().skip(ai + 1) {
                let delta = self.cells[i].position - self.cells[j].position;
                let min = self.cells[i].radius() + self.cells[j].radius();
                let d = delta.length();
                if d < min && d > 1e-5 {
                    let push = delta / d * (min - d) * 0.5;
                    pushes[ai] += push;
                    pushes[bj] -= push;
                }
            }
        }
        let k = (dt * 2.0).min(1.0);
        for (ai, &i) in active.iter().enumerate() {
            // dividing cells keep their place so the split stays readable
            if self.cells[i].dividing {
                continue;
            }
            let c = &mut self.cells[i];
            c.position += pushes[ai] * k;
            c.position -= c.position * (0.02 * k);
        }
    }

    /// Drop the oldest inactive records while the arena is over its soft ceiling.
    /// Returns the number of records removed.
    pub fn sweep(&mut self) -> usize {
        let excess = self.cells.len().saturating_sub(self.config.soft_ceiling);
        if excess == 0 {
            return 0;
        }
        let mut inactive: Vec<CellId> = self.cells.iter().filter(|c| !c.active).map(|c| c.id).collect();
        inactive.sort_unstable();
        inactive.truncate(excess);
        if inactive.is_empty() {
            return 0;
        }
        let before = self.cells.len();
        self.cells.retain(|c| c.active || inactive.binary_search(&c.id).is_err());
        let removed = before - self.cells.len();
        log::debug!("[cells] swept {} inactive cells", removed);
        removed
    }

    /// Reset to a single mother cell.
    pub fn reset(&mut self) {
        let genetics = Genetics::default();
        self.cells.clear();
        self.active_count = 0;
        self.cleanup_timer = 0.0;
        self.spawn(Vec3::ZERO, 0, genetics, None);
    }
}
