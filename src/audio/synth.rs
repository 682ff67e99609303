//! Oscillator voices and the pure offline mixer.
//!
//! The engine *schedules* voices against an absolute clock; this module
//! renders any `[start, start+duration)` window of the schedule to
//! interleaved stereo `f32`, deterministically. Filters and noise are
//! stateful per voice, so each voice is synthesized from its own t = 0
//! on every render; voices are short enough that this stays cheap.

use std::path::Path;

use crate::audio::engine::AudioSettings;
use crate::foundation::error::{StoryError, StoryResult};

/// Mix output sample rate.
pub const SAMPLE_RATE: u32 = 44_100;

/// Mix output channel count (stereo, voices are center-panned).
pub const CHANNELS: u16 = 2;

/// SplitMix64; deterministic noise and randomized SFX pitches.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Seeded generator.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

/// Gain stage a voice is routed through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bus {
    /// Speech bed.
    Narration,
    /// Generated background music.
    Music,
    /// One-shot effects and ambient loops.
    Sfx,
}

/// Oscillator shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// Pure tone.
    Sine,
    /// Odd-harmonic buzz; the "upbeat" arpeggio voice.
    Square,
    /// Soft thud tone; footsteps.
    Triangle,
    /// White noise; whoosh/splash sources.
    Noise,
}

/// Per-voice amplitude envelope.
///
/// Linear attack, optional exponential decay (time constant in seconds),
/// linear release fade at the end of the window.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Envelope {
    /// Linear ramp-up time.
    pub attack_sec: f64,
    /// Exponential decay time constant after the attack; `None` sustains.
    pub decay_tau_sec: Option<f64>,
    /// Linear fade-out time at the end of the voice.
    pub release_sec: f64,
}

impl Envelope {
    /// Sustained with short edge fades (drones, ambient beds).
    pub fn sustain(attack_sec: f64, release_sec: f64) -> Self {
        Self {
            attack_sec,
            decay_tau_sec: None,
            release_sec,
        }
    }

    /// Plucked: fast attack, exponential decay.
    pub fn pluck(attack_sec: f64, decay_tau_sec: f64) -> Self {
        Self {
            attack_sec,
            decay_tau_sec: Some(decay_tau_sec),
            release_sec: 0.0,
        }
    }

    fn gain(&self, t: f64, duration: f64) -> f64 {
        let mut g = if self.attack_sec > 0.0 {
            (t / self.attack_sec).clamp(0.0, 1.0)
        } else {
            1.0
        };
        if let Some(tau) = self.decay_tau_sec
            && t > self.attack_sec
            && tau > 0.0
        {
            g *= (-(t - self.attack_sec) / tau).exp();
        }
        if self.release_sec > 0.0 {
            let rem = (duration - t).max(0.0);
            g *= (rem / self.release_sec).clamp(0.0, 1.0);
        }
        g
    }
}

/// Output filter applied to a voice.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    /// Pass-through.
    None,
    /// One-pole lowpass.
    Lowpass {
        /// Cutoff frequency.
        cutoff_hz: f64,
    },
    /// State-variable bandpass.
    Bandpass {
        /// Center frequency.
        center_hz: f64,
        /// Resonance; higher is narrower.
        q: f64,
    },
}

/// One scheduled oscillator event.
///
/// `freq` is a piecewise-linear contour over the voice's own normalized
/// time (fraction, Hz); a single point is a constant pitch. Once
/// scheduled, a voice plays out unless the whole bus is stopped, the
/// same fire-and-forget contract as scheduling against an audio clock.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Voice {
    /// Absolute start on the engine clock, seconds.
    pub start_sec: f64,
    /// Length in seconds.
    pub duration_sec: f64,
    /// Routing bus.
    pub bus: Bus,
    /// Oscillator shape.
    pub waveform: Waveform,
    /// Frequency contour `(fraction of duration, Hz)`, sorted by fraction.
    pub freq: Vec<(f64, f64)>,
    /// Voice gain before bus/master gains.
    pub gain: f64,
    /// Amplitude envelope.
    pub envelope: Envelope,
    /// Output filter.
    pub filter: Filter,
    /// Seed for noise waveforms.
    pub seed: u64,
}

impl Voice {
    fn freq_at(&self, frac: f64) -> f64 {
        match self.freq.as_slice() {
            [] => 0.0,
            [(_, hz)] => *hz,
            points => {
                let idx = points.partition_point(|(f, _)| *f <= frac);
                if idx == 0 {
                    return points[0].1;
                }
                if idx >= points.len() {
                    return points[points.len() - 1].1;
                }
                let (f0, hz0) = points[idx - 1];
                let (f1, hz1) = points[idx];
                if f1 <= f0 {
                    return hz0;
                }
                hz0 + (hz1 - hz0) * (frac - f0) / (f1 - f0)
            }
        }
    }

    fn end_sec(&self) -> f64 {
        self.start_sec + self.duration_sec
    }
}

struct FilterState {
    low: f64,
    band: f64,
    lp: f64,
}

impl FilterState {
    fn new() -> Self {
        Self {
            low: 0.0,
            band: 0.0,
            lp: 0.0,
        }
    }

    fn process(&mut self, filter: Filter, x: f64) -> f64 {
        match filter {
            Filter::None => x,
            Filter::Lowpass { cutoff_hz } => {
                let dt = 1.0 / f64::from(SAMPLE_RATE);
                let rc = 1.0 / (std::f64::consts::TAU * cutoff_hz.max(1.0));
                let alpha = dt / (rc + dt);
                self.lp += alpha * (x - self.lp);
                self.lp
            }
            Filter::Bandpass { center_hz, q } => {
                let f = 2.0
                    * (std::f64::consts::PI * (center_hz.max(1.0) / f64::from(SAMPLE_RATE)))
                        .sin();
                let damp = 1.0 / q.max(0.1);
                self.low += f * self.band;
                let high = x - self.low - damp * self.band;
                self.band += f * high;
                self.band
            }
        }
    }
}

fn oscillator_sample(waveform: Waveform, phase_cycles: f64, rng: &mut Rng64) -> f64 {
    let x = phase_cycles.rem_euclid(1.0);
    match waveform {
        Waveform::Sine => (x * std::f64::consts::TAU).sin(),
        Waveform::Square => {
            if x < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => {
            if x < 0.5 {
                4.0 * x - 1.0
            } else {
                3.0 - 4.0 * x
            }
        }
        Waveform::Noise => rng.next_f64_01() * 2.0 - 1.0,
    }
}

fn bus_gain(settings: &AudioSettings, bus: Bus) -> f64 {
    let bus_volume = match bus {
        Bus::Narration => settings.narration_volume,
        Bus::Music => settings.music_volume,
        Bus::Sfx => settings.sfx_volume,
    };
    settings.master_volume * bus_volume
}

/// Render `[start_sec, start_sec + duration_sec)` of the schedule to
/// interleaved stereo `f32`, clamped to `[-1, 1]`.
///
/// Bus gains are read from `settings` at mix time, so a settings change
/// applies to everything not yet rendered.
pub fn render_range(
    voices: &[Voice],
    settings: &AudioSettings,
    start_sec: f64,
    duration_sec: f64,
) -> StoryResult<Vec<f32>> {
    if !duration_sec.is_finite() || duration_sec < 0.0 {
        return Err(StoryError::audio("render duration must be finite and >= 0"));
    }
    let frames = (duration_sec * f64::from(SAMPLE_RATE)).round() as usize;
    let mut out = vec![0.0f32; frames * usize::from(CHANNELS)];
    let end_sec = start_sec + duration_sec;
    let window_start_frame = (start_sec * f64::from(SAMPLE_RATE)).round() as i64;

    for voice in voices {
        if voice.duration_sec <= 0.0 || voice.end_sec() <= start_sec || voice.start_sec >= end_sec
        {
            continue;
        }
        let gain = voice.gain * bus_gain(settings, voice.bus);
        if gain <= 0.0 {
            continue;
        }

        // Synthesize from the voice's own start for deterministic phase,
        // noise, and filter state.
        let dt = 1.0 / f64::from(SAMPLE_RATE);
        let voice_frames = (voice.duration_sec * f64::from(SAMPLE_RATE)).round() as usize;
        let voice_start_frame = (voice.start_sec * f64::from(SAMPLE_RATE)).round() as i64;
        let mut rng = Rng64::new(voice.seed);
        let mut filter = FilterState::new();
        let mut phase = 0.0f64;

        for i in 0..voice_frames {
            let t = i as f64 * dt;
            let frac = t / voice.duration_sec;
            phase += voice.freq_at(frac) * dt;
            let raw = oscillator_sample(voice.waveform, phase, &mut rng);
            // Index in integer sample space so each voice frame lands in
            // exactly one output frame regardless of window offsets.
            let frame = voice_start_frame + i as i64 - window_start_frame;
            if frame < 0 {
                // Still advance oscillator/filter/noise state.
                filter.process(voice.filter, raw);
                continue;
            }
            if frame >= frames as i64 {
                break;
            }
            let shaped = filter.process(voice.filter, raw);
            let sample = (shaped * voice.envelope.gain(t, voice.duration_sec) * gain) as f32;
            let idx = frame as usize * usize::from(CHANNELS);
            out[idx] += sample;
            out[idx + 1] += sample;
        }
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    Ok(out)
}

/// Write an interleaved mix to a raw little-endian f32 file.
pub fn write_mix_f32le(samples_interleaved: &[f32], out_path: &Path) -> StoryResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            StoryError::audio(format!(
                "failed to create mix output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        StoryError::audio(format!(
            "failed to write mix file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/synth.rs"]
mod tests;
