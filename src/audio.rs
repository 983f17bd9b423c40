use crate::constants::*;
use scrollscape_core::{ToneEvent, VoiceConfig, Waveform};
use web_sys as web;

pub struct FxBuses {
    pub master_gain: web::GainNode,
    pub reverb_in: web::GainNode,
    pub delay_in: web::GainNode,
}

/// Per-voice level plus effect sends.
pub struct VoiceBus {
    pub gain: web::GainNode,
    pub delay_send: web::GainNode,
    pub reverb_send: web::GainNode,
}

/// The WebAudio side of the experience. Dropping notes is acceptable, so every
/// node failure after set-up is silently skipped.
pub struct AudioOut {
    pub ctx: web::AudioContext,
    pub fx: FxBuses,
    pub voices: Vec<VoiceBus>,
    pub waveforms: Vec<Waveform>,
}

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(audio_ctx)
        .map_err(|e| anyhow::anyhow!("{} GainNode error: {:?}", label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

pub fn build_fx_buses(audio_ctx: &web::AudioContext) -> anyhow::Result<FxBuses> {
    let master_gain = create_gain(audio_ctx, MASTER_GAIN, "Master")?;
    _ = master_gain.connect_with_audio_node(&audio_ctx.destination());

    // Reverb bus
    let reverb_in = create_gain(audio_ctx, 1.0, "Reverb in")?;
    let reverb = web::ConvolverNode::new(audio_ctx)
        .map_err(|e| anyhow::anyhow!("ConvolverNode error: {:?}", e))?;
    reverb.set_normalize(true);
    // Long, soft stereo impulse response made from decaying noise
    {
        let sr = audio_ctx.sample_rate();
        let len = (sr * REVERB_SECONDS) as u32;
        if let Ok(ir) = audio_ctx.create_buffer(2, len, sr) {
            let mut seeds: [u32; 2] = [0x1234_ABCD, 0x7890_FEDC];
            for (ch, seed) in seeds.iter_mut().enumerate() {
                let mut buf: Vec<f32> = vec![0.0; len as usize];
                for (i, v) in buf.iter_mut().enumerate() {
                    // xorshift32
                    let mut x = *seed;
                    x ^= x << 13;
                    x ^= x >> 17;
                    x ^= x << 5;
                    *seed = x;
                    let n = (x as f32 / u32::MAX as f32) * 2.0 - 1.0;
                    let t = i as f32 / sr;
                    *v = n * (-t / REVERB_DECAY_SEC).exp();
                }
                _ = ir.copy_to_channel(&mut buf, ch as i32);
            }
            reverb.set_buffer(Some(&ir));
        }
    }
    let reverb_wet = create_gain(audio_ctx, REVERB_WET, "Reverb wet")?;
    _ = reverb_in.connect_with_audio_node(&reverb);
    _ = reverb.connect_with_audio_node(&reverb_wet);
    _ = reverb_wet.connect_with_audio_node(&master_gain);

    // Delay bus with a darkened feedback loop
    let delay_in = create_gain(audio_ctx, 1.0, "Delay in")?;
    let delay = audio_ctx
        .create_delay_with_max_delay_time(2.0)
        .map_err(|e| anyhow::anyhow!("DelayNode error: {:?}", e))?;
    delay.delay_time().set_value(DELAY_TIME_SEC);
    let delay_tone = web::BiquadFilterNode::new(audio_ctx)
        .map_err(|e| anyhow::anyhow!("BiquadFilterNode error: {:?}", e))?;
    delay_tone.set_type(web::BiquadFilterType::Lowpass);
    delay_tone.frequency().set_value(DELAY_TONE_HZ);
    let delay_feedback = create_gain(audio_ctx, DELAY_FEEDBACK, "Delay feedback")?;
    let delay_wet = create_gain(audio_ctx, DELAY_WET, "Delay wet")?;
    _ = delay_in.connect_with_audio_node(&delay);
    _ = delay.connect_with_audio_node(&delay_tone);
    _ = delay_tone.connect_with_audio_node(&delay_feedback);
    _ = delay_feedback.connect_with_audio_node(&delay);
    _ = delay_tone.connect_with_audio_node(&delay_wet);
    _ = delay_wet.connect_with_audio_node(&master_gain);

    Ok(FxBuses {
        master_gain,
        reverb_in,
        delay_in,
    })
}

pub fn wire_voices(audio_ctx: &web::AudioContext, fx: &FxBuses, count: usize) -> anyhow::Result<Vec<VoiceBus>> {
    let mut voices = Vec::with_capacity(count);
    for _ in 0..count {
        let gain = create_gain(audio_ctx, VOICE_LEVEL, "Voice gain")?;
        _ = gain.connect_with_audio_node(&fx.master_gain);
        let delay_send = create_gain(audio_ctx, DELAY_SEND, "Delay send")?;
        _ = delay_send.connect_with_audio_node(&fx.delay_in);
        let reverb_send = create_gain(audio_ctx, REVERB_SEND, "Reverb send")?;
        _ = reverb_send.connect_with_audio_node(&fx.reverb_in);
        voices.push(VoiceBus {
            gain,
            delay_send,
            reverb_send,
        });
    }
    Ok(voices)
}

impl AudioOut {
    pub fn new(voice_configs: &[VoiceConfig]) -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let fx = build_fx_buses(&ctx)?;
        let voices = wire_voices(&ctx, &fx, voice_configs.len())?;
        Ok(Self {
            ctx,
            fx,
            voices,
            waveforms: voice_configs.iter().map(|c| c.waveform).collect(),
        })
    }

    pub fn resume(&self) {
        _ = self.ctx.resume();
    }

    pub fn suspend(&self) {
        _ = self.ctx.suspend();
    }

    pub fn is_running(&self) -> bool {
        self.ctx.state() == web::AudioContextState::Running
    }

    pub fn play(&self, tones: &[ToneEvent]) {
        if !self.is_running() {
            return;
        }
        for tone in tones {
            let (Some(bus), Some(wf)) = (self.voices.get(tone.voice), self.waveforms.get(tone.voice))
            else {
                continue;
            };
            trigger_one_shot(&self.ctx, *wf, tone, bus);
        }
    }
}

// Fire a simple one-shot oscillator routed through a voice's gain and sends
pub fn trigger_one_shot(audio_ctx: &web::AudioContext, waveform: Waveform, tone: &ToneEvent, bus: &VoiceBus) {
    let Ok(src) = web::OscillatorNode::new(audio_ctx) else {
        return;
    };
    src.set_type(match waveform {
        Waveform::Sine => web::OscillatorType::Sine,
        Waveform::Square => web::OscillatorType::Square,
        Waveform::Saw => web::OscillatorType::Sawtooth,
        Waveform::Triangle => web::OscillatorType::Triangle,
    });
    src.frequency().set_value(tone.frequency_hz);
    let Ok(g) = web::GainNode::new(audio_ctx) else {
        return;
    };
    let duration = tone.duration_sec.max(0.05) as f64;
    g.gain().set_value(0.0);
    let t0 = audio_ctx.current_time() + TONE_LEAD_SEC;
    _ = g
        .gain()
        .linear_ramp_to_value_at_time(tone.velocity.clamp(0.0, 1.0), t0 + TONE_ATTACK_SEC);
    _ = g.gain().linear_ramp_to_value_at_time(0.0, t0 + duration);
    _ = src.connect_with_audio_node(&g);
    _ = g.connect_with_audio_node(&bus.gain);
    _ = g.connect_with_audio_node(&bus.delay_send);
    _ = g.connect_with_audio_node(&bus.reverb_send);
    _ = src.start_with_when(t0);
    _ = src.stop_with_when(t0 + duration + TONE_STOP_PAD_SEC);
}
