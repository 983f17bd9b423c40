//! Generative ambient score that follows the visible scenes.

use crate::constants::{AMBIENT_BPM, AMBIENT_ROOT_MIDI};
use crate::input::{Interaction, InteractionKind};
use crate::scenes::SceneKind;
use rand::prelude::*;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VoiceConfig {
    pub waveform: Waveform,
    /// Octave offset from the root.
    pub octave: i32,
    /// Trigger chance per eighth note at full scene opacity.
    pub density: f32,
    pub base_duration_sec: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AmbientParams {
    pub bpm: f32,
    pub root_midi: i32,
    pub scale: &'static [i32],
    pub master_gain: f32,
}

impl Default for AmbientParams {
    fn default() -> Self {
        Self {
            bpm: AMBIENT_BPM,
            root_midi: AMBIENT_ROOT_MIDI,
            scale: MINOR_PENTATONIC,
            master_gain: 0.6,
        }
    }
}

pub const MINOR_PENTATONIC: &[i32] = &[0, 3, 5, 7, 10, 12];

/// Tone request handed to the synthesiser. Scheduling is relative to "now".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToneEvent {
    pub voice: usize,
    pub frequency_hz: f32,
    pub velocity: f32,
    pub duration_sec: f32,
}

/// Voice settings for each scene kind, indexed like `SceneKind::ALL`.
pub fn default_voices() -> Vec<VoiceConfig> {
    SceneKind::ALL
        .iter()
        .map(|kind| match kind {
            SceneKind::Terrain => VoiceConfig {
                waveform: Waveform::Sine,
                octave: -1,
                density: 0.25,
                base_duration_sec: 1.6,
            },
            SceneKind::Network => VoiceConfig {
                waveform: Waveform::Triangle,
                octave: 1,
                density: 0.45,
                base_duration_sec: 0.35,
            },
            SceneKind::Cells => VoiceConfig {
                waveform: Waveform::Sine,
                octave: 0,
                density: 0.3,
                base_duration_sec: 0.8,
            },
            SceneKind::Geometry => VoiceConfig {
                waveform: Waveform::Triangle,
                octave: 0,
                density: 0.2,
                base_duration_sec: 2.4,
            },
            SceneKind::Placeholder => VoiceConfig {
                waveform: Waveform::Sine,
                octave: -1,
                density: 0.1,
                base_duration_sec: 1.0,
            },
        })
        .collect()
}

pub fn voice_index(kind: SceneKind) -> usize {
    SceneKind::ALL.iter().position(|k| *k == kind).unwrap_or(0)
}

pub struct AmbientEngine {
    pub configs: Vec<VoiceConfig>,
    pub params: AmbientParams,
    rngs: Vec<StdRng>,
    beat_accum: f64,
    muted: bool,
}

impl AmbientEngine {
    pub fn new(configs: Vec<VoiceConfig>, params: AmbientParams, seed: u64) -> Self {
        // Per-voice streams so one voice's draws never shift another's
        let rngs = (0..configs.len())
            .map(|i| {
                let mix = seed ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                StdRng::seed_from_u64(mix)
            })
            .collect();
        Self {
            configs,
            params,
            rngs,
            beat_accum: 0.0,
            muted: false,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Advance the eighth-note grid. `weights[i]` is the opacity of the scene
    /// voice `i` belongs to; a missing weight counts as silent.
    pub fn tick(&mut self, dt: Duration, weights: &[f32], out: &mut Vec<ToneEvent>) {
        if self.params.bpm <= 0.0 {
            return;
        }
        let step = 30.0 / self.params.bpm as f64;
        self.beat_accum += dt.as_secs_f64();
        while self.beat_accum >= step {
            self.beat_accum -= step;
            if !self.muted {
                self.schedule_step(weights, out);
            }
        }
    }

    fn schedule_step(&mut self, weights: &[f32], out: &mut Vec<ToneEvent>) {
        for (i, cfg) in self.configs.iter().enumerate() {
            let weight = weights.get(i).copied().unwrap_or(0.0).clamp(0.0, 1.0);
            if weight <= 0.0 {
                continue;
            }
            let rng = &mut self.rngs[i];
            if rng.gen::<f32>() >= cfg.density * weight {
                continue;
            }
            let degree = *self.params.scale.choose(rng).unwrap_or(&0);
            let midi = self.params.root_midi + degree + cfg.octave * 12;
            let velocity = (0.3 + rng.gen::<f32>() * 0.5) * weight * self.params.master_gain;
            let duration = cfg.base_duration_sec * (0.8 + rng.gen::<f32>() * 0.4);
            out.push(ToneEvent {
                voice: i,
                frequency_hz: midi_to_hz(midi as f32),
                velocity,
                duration_sec: duration,
            });
        }
    }

    /// One-shot accent for an interaction notification.
    pub fn interaction_tone(&self, interaction: &Interaction) -> ToneEvent {
        let scale = self.params.scale;
        let top = scale.len().saturating_sub(1);
        let degree_index = ((interaction.intensity * top as f32).round() as usize).min(top);
        let degree = scale.get(degree_index).copied().unwrap_or(0);
        let (octave, duration) = match interaction.kind {
            InteractionKind::Hover => (1, 0.2),
            InteractionKind::Click | InteractionKind::Touch => (1, 0.5),
            InteractionKind::Division => (2, 0.35),
            InteractionKind::SceneEnter => (0, 1.8),
        };
        let midi = self.params.root_midi + degree + octave * 12;
        ToneEvent {
            voice: voice_index(interaction.scene),
            frequency_hz: midi_to_hz(midi as f32),
            velocity: (0.35 + 0.5 * interaction.intensity) * self.params.master_gain,
            duration_sec: duration,
        }
    }
}

pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * (2.0_f32).powf((midi - 69.0) / 12.0)
}
