//! The procedural audio engine: gain buses, settings, and schedulers for
//! mood music, one-shot effects, ambient beds, and narration.
//!
//! The engine is an explicit handle owned by whatever drives scene
//! playback (constructor injection, not a global). `initialize()` builds
//! the voice graph and is idempotent; `dispose()` tears it down, and
//! every playback method is a no-op until the next `initialize()`.

use crate::acting::mapper::Mood;
use crate::audio::synth::{self, Bus, Envelope, Filter, Rng64, Voice, Waveform};
use crate::foundation::error::StoryResult;

/// Process-wide mixing state.
///
/// Constructed with defaults at engine init, mutated by settings patches,
/// read on every mix. Persistence belongs to an external collaborator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioSettings {
    /// Master gain in `[0, 1]`; everything chains through it.
    pub master_volume: f64,
    /// Narration bus gain in `[0, 1]`.
    pub narration_volume: f64,
    /// Music bus gain in `[0, 1]`.
    pub music_volume: f64,
    /// SFX/ambient bus gain in `[0, 1]`.
    pub sfx_volume: f64,
    /// Speak narration automatically when a scene plays.
    pub auto_narration: bool,
    /// Preferred narrator voice id for the TTS collaborator.
    pub narrator_voice: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            narration_volume: 1.0,
            music_volume: 0.5,
            sfx_volume: 0.7,
            auto_narration: true,
            narrator_voice: "default".to_string(),
        }
    }
}

/// Partial update for [`AudioSettings`]; unset fields are left untouched.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct AudioSettingsPatch {
    /// New master gain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_volume: Option<f64>,
    /// New narration gain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration_volume: Option<f64>,
    /// New music gain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_volume: Option<f64>,
    /// New SFX gain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sfx_volume: Option<f64>,
    /// New auto-narration flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_narration: Option<bool>,
    /// New narrator voice id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrator_voice: Option<String>,
}

/// Major or minor tonality for generated music.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Major scale.
    Major,
    /// Natural minor scale.
    Minor,
}

/// Coarse synthesis style per mood.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicStyle {
    /// Square-wave arpeggio, driving.
    Upbeat,
    /// Sine arpeggio, gentle.
    Soft,
    /// Sine arpeggio, slow and sparse.
    Ambient,
}

/// Tempo/key/style profile the synthesizer runs a mood with.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MusicProfile {
    /// Beats per minute.
    pub tempo_bpm: f64,
    /// Scale tonality.
    pub key: Key,
    /// Arpeggio voicing style.
    pub style: MusicStyle,
}

/// Mood → music profile table; unknown moods use the neutral entry.
pub fn music_profile(mood: Mood) -> MusicProfile {
    match mood {
        Mood::Happy => MusicProfile {
            tempo_bpm: 120.0,
            key: Key::Major,
            style: MusicStyle::Upbeat,
        },
        Mood::Sad => MusicProfile {
            tempo_bpm: 80.0,
            key: Key::Minor,
            style: MusicStyle::Soft,
        },
        Mood::Exciting => MusicProfile {
            tempo_bpm: 140.0,
            key: Key::Major,
            style: MusicStyle::Upbeat,
        },
        Mood::Calm => MusicProfile {
            tempo_bpm: 90.0,
            key: Key::Major,
            style: MusicStyle::Soft,
        },
        Mood::Mysterious => MusicProfile {
            tempo_bpm: 100.0,
            key: Key::Minor,
            style: MusicStyle::Ambient,
        },
        Mood::Neutral => MusicProfile {
            tempo_bpm: 100.0,
            key: Key::Major,
            style: MusicStyle::Soft,
        },
    }
}

/// Synthesized one-shot effect families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SfxKind {
    /// Rubbery sine sweep.
    Boing,
    /// Two soft triangle pulses.
    Footsteps,
    /// Four quick triangle pulses.
    FootstepsFast,
    /// Short rising chirps.
    Giggle,
    /// Band-passed noise swipe.
    Whoosh,
    /// Low-passed noise burst.
    Splash,
    /// Sharp noise clap.
    Clap,
    /// Low triangle knocks.
    Knock,
}

/// Action keyword → SFX table; unmapped actions are silently ignored.
const SFX_TABLE: &[(&str, SfxKind)] = &[
    ("jump", SfxKind::Boing),
    ("land", SfxKind::Boing),
    ("walk", SfxKind::Footsteps),
    ("run", SfxKind::FootstepsFast),
    ("laugh", SfxKind::Giggle),
    ("dance", SfxKind::Giggle),
    ("wave", SfxKind::Whoosh),
    ("whoosh", SfxKind::Whoosh),
    ("splash", SfxKind::Splash),
    ("swim", SfxKind::Splash),
    ("clap", SfxKind::Clap),
    ("knock", SfxKind::Knock),
];

/// Ambient bed per scene setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientKind {
    /// Breeze and birdsong.
    Meadow,
    /// Dense rustle.
    Forest,
    /// Surf wash.
    Beach,
    /// Cricket shimmer.
    Night,
    /// Light breeze and chatter.
    Park,
    /// Near-silent room tone.
    Bedroom,
}

fn ambient_for_background(background: &str) -> Option<AmbientKind> {
    let b = background.to_lowercase();
    for (keyword, kind) in [
        ("meadow", AmbientKind::Meadow),
        ("forest", AmbientKind::Forest),
        ("wood", AmbientKind::Forest),
        ("beach", AmbientKind::Beach),
        ("ocean", AmbientKind::Beach),
        ("night", AmbientKind::Night),
        ("stars", AmbientKind::Night),
        ("park", AmbientKind::Park),
        ("bedroom", AmbientKind::Bedroom),
        ("room", AmbientKind::Bedroom),
    ] {
        if b.contains(keyword) {
            return Some(kind);
        }
    }
    None
}

/// Speech request sent to the TTS collaborator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpeechRequest {
    /// Text to speak.
    pub text: String,
    /// Speaking rate multiplier.
    pub rate: f64,
    /// Pitch multiplier.
    pub pitch: f64,
    /// Playback volume in `[0, 1]`.
    pub volume: f64,
    /// Preferred voice id.
    pub voice: String,
}

/// How an utterance ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Spoke to the end.
    Completed,
    /// Canceled by new speech or scene teardown; treated as success.
    Interrupted,
}

/// Callbacks fired by the TTS collaborator.
#[derive(Default)]
pub struct SpeechEvents {
    /// Lip-sync amplitude callback in `[0, 1]` (mouth openness).
    pub on_mouth_shape: Option<Box<dyn FnMut(f64) + Send>>,
    /// Completion callback; fires for both outcomes.
    pub on_complete: Option<Box<dyn FnOnce(SpeechOutcome) + Send>>,
}

impl SpeechEvents {
    fn complete(mut self, outcome: SpeechOutcome) {
        if let Some(cb) = self.on_complete.take() {
            cb(outcome);
        }
    }
}

/// External text-to-speech boundary.
///
/// Implementations may be local voices or network services; the engine
/// treats both uniformly and tolerates delayed or failed completion.
pub trait SpeechSynthesizer {
    /// Speak; completion is reported through `events`. Starting new speech
    /// while the previous utterance is live must interrupt it, and the
    /// interrupted utterance's completion fires as
    /// [`SpeechOutcome::Interrupted`] (success, not an error).
    /// Implementations must fire `events.on_complete` on every path,
    /// including failures, so scene transitions never hang on a broken
    /// provider.
    fn speak(&mut self, request: SpeechRequest, events: SpeechEvents) -> StoryResult<()>;

    /// Cancel the in-flight utterance, if any; idempotent.
    fn cancel(&mut self);
}

/// TTS stand-in that completes every utterance immediately and silently.
#[derive(Debug, Default)]
pub struct NullSpeech;

impl SpeechSynthesizer for NullSpeech {
    fn speak(&mut self, _request: SpeechRequest, events: SpeechEvents) -> StoryResult<()> {
        events.complete(SpeechOutcome::Completed);
        Ok(())
    }

    fn cancel(&mut self) {}
}

#[derive(Debug, Default)]
struct VoiceGraph {
    voices: Vec<Voice>,
    clock_sec: f64,
    music_live: bool,
    ambient_live: bool,
}

/// The procedural audio engine handle.
pub struct AudioEngine {
    settings: AudioSettings,
    graph: Option<VoiceGraph>,
    speech: Box<dyn SpeechSynthesizer + Send>,
    rng: Rng64,
}

impl std::fmt::Debug for AudioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioEngine")
            .field("settings", &self.settings)
            .field("initialized", &self.graph.is_some())
            .finish()
    }
}

impl AudioEngine {
    /// New engine with default settings and the given TTS collaborator.
    pub fn new(speech: Box<dyn SpeechSynthesizer + Send>) -> Self {
        Self {
            settings: AudioSettings::default(),
            graph: None,
            speech,
            rng: Rng64::new(0x5357_4D4F_5449_4F4E),
        }
    }

    /// Engine with a [`NullSpeech`] collaborator (tests, headless export).
    pub fn without_speech() -> Self {
        Self::new(Box::new(NullSpeech))
    }

    /// Build the voice graph; returns immediately if already built.
    pub fn initialize(&mut self) {
        if self.graph.is_some() {
            return;
        }
        tracing::debug!("audio engine initialized");
        self.graph = Some(VoiceGraph::default());
    }

    /// Whether [`AudioEngine::initialize`] has completed.
    pub fn is_initialized(&self) -> bool {
        self.graph.is_some()
    }

    /// Stop all audio and release the graph; the engine must be
    /// re-initialized before further use.
    pub fn dispose(&mut self) {
        self.speech.cancel();
        if self.graph.take().is_some() {
            tracing::debug!("audio engine disposed");
        }
    }

    /// Current mixing settings.
    pub fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    /// Merge a partial settings update; affected gains apply to every mix
    /// from now on.
    pub fn update_settings(&mut self, patch: AudioSettingsPatch) {
        if let Some(v) = patch.master_volume {
            self.settings.master_volume = v.clamp(0.0, 1.0);
        }
        if let Some(v) = patch.narration_volume {
            self.settings.narration_volume = v.clamp(0.0, 1.0);
        }
        if let Some(v) = patch.music_volume {
            self.settings.music_volume = v.clamp(0.0, 1.0);
        }
        if let Some(v) = patch.sfx_volume {
            self.settings.sfx_volume = v.clamp(0.0, 1.0);
        }
        if let Some(v) = patch.auto_narration {
            self.settings.auto_narration = v;
        }
        if let Some(v) = patch.narrator_voice {
            self.settings.narrator_voice = v;
        }
    }

    /// Advance the engine clock to an absolute time in seconds.
    pub fn set_clock(&mut self, clock_sec: f64) {
        if let Some(graph) = &mut self.graph {
            graph.clock_sec = clock_sec.max(0.0);
        }
    }

    /// Currently scheduled voices (renderer/exporter boundary).
    pub fn voices(&self) -> &[Voice] {
        self.graph.as_ref().map_or(&[], |g| g.voices.as_slice())
    }

    /// Mix a window of the schedule with the current settings.
    pub fn render_range(&self, start_sec: f64, duration_sec: f64) -> StoryResult<Vec<f32>> {
        let voices = self.voices();
        synth::render_range(voices, &self.settings, start_sec, duration_sec)
    }

    /// Stop and discard generated music.
    ///
    /// In-flight notes are truncated at the clock; notes that already
    /// finished are left in the schedule so past renders stay stable.
    /// Stopping when nothing plays is a normal race during rapid mood
    /// changes, not an error.
    pub fn stop_music(&mut self) {
        let Some(graph) = &mut self.graph else {
            return;
        };
        let now = graph.clock_sec;
        graph.voices.retain_mut(|v| {
            if v.bus != Bus::Music {
                return true;
            }
            if v.start_sec >= now {
                return false;
            }
            if v.start_sec + v.duration_sec > now {
                v.duration_sec = now - v.start_sec;
            }
            true
        });
        graph.music_live = false;
    }

    /// Start mood-based background music at the current clock.
    ///
    /// One low sine drone (root an octave down) plus a 32-step arpeggio
    /// cycling scale degrees `[0, 2, 4, 2]`, all scheduled up-front at
    /// absolute times so playback is independent of caller jitter.
    #[tracing::instrument(skip(self))]
    pub fn play_mood_music(&mut self, mood: Mood) {
        if self.graph.is_none() {
            return;
        }
        self.stop_music();
        let profile = music_profile(mood);
        let beat_sec = 60.0 / profile.tempo_bpm;
        const ROOT_HZ: f64 = 261.63; // C4
        const STEPS: usize = 32;
        const ARP_DEGREES: [usize; 4] = [0, 2, 4, 2];
        let scale: [i32; 7] = match profile.key {
            Key::Major => [0, 2, 4, 5, 7, 9, 11],
            Key::Minor => [0, 2, 3, 5, 7, 8, 10],
        };
        let arp_wave = match profile.style {
            MusicStyle::Upbeat => Waveform::Square,
            MusicStyle::Soft | MusicStyle::Ambient => Waveform::Sine,
        };
        let arp_gain = match profile.style {
            MusicStyle::Ambient => 0.12,
            _ => 0.18,
        };

        let Some(graph) = self.graph.as_mut() else {
            return;
        };
        let start = graph.clock_sec;
        let pattern_sec = beat_sec * STEPS as f64;

        graph.voices.push(Voice {
            start_sec: start,
            duration_sec: pattern_sec,
            bus: Bus::Music,
            waveform: Waveform::Sine,
            freq: vec![(0.0, ROOT_HZ / 2.0)],
            gain: 0.1,
            envelope: Envelope::sustain(0.5, 0.5),
            filter: Filter::None,
            seed: 0,
        });

        for step in 0..STEPS {
            let degree = ARP_DEGREES[step % ARP_DEGREES.len()];
            let semitones = scale[degree];
            let hz = ROOT_HZ * 2f64.powf(f64::from(semitones) / 12.0);
            graph.voices.push(Voice {
                start_sec: start + step as f64 * beat_sec,
                duration_sec: beat_sec,
                bus: Bus::Music,
                waveform: arp_wave,
                freq: vec![(0.0, hz)],
                gain: arp_gain,
                envelope: Envelope::pluck(0.05, beat_sec * 0.4),
                filter: Filter::None,
                seed: 0,
            });
        }
        graph.music_live = true;
        tracing::debug!(
            tempo = profile.tempo_bpm,
            "scheduled mood music pattern"
        );
    }

    /// Synthesize a one-shot effect for an action keyword.
    ///
    /// Unmapped actions play nothing and report no error.
    #[tracing::instrument(skip(self))]
    pub fn play_sfx(&mut self, action: &str) {
        if self.graph.is_none() {
            return;
        }
        let Some((_, kind)) = SFX_TABLE.iter().find(|(keyword, _)| *keyword == action) else {
            return;
        };
        let kind = *kind;
        let seed = self.rng.next_u64();
        let mut pitch_rng = Rng64::new(seed);
        let Some(graph) = self.graph.as_mut() else {
            return;
        };
        let now = graph.clock_sec;
        match kind {
            SfxKind::Boing => graph.voices.push(Voice {
                start_sec: now,
                duration_sec: 0.3,
                bus: Bus::Sfx,
                waveform: Waveform::Sine,
                freq: vec![(0.0, 200.0), (0.5, 800.0), (1.0, 400.0)],
                gain: 0.5,
                envelope: Envelope::pluck(0.005, 0.12),
                filter: Filter::None,
                seed,
            }),
            SfxKind::Footsteps | SfxKind::FootstepsFast => {
                let (count, spacing) = if kind == SfxKind::FootstepsFast {
                    (4, 0.12)
                } else {
                    (2, 0.25)
                };
                for i in 0..count {
                    let hz = 100.0 + pitch_rng.next_f64_01() * 50.0;
                    graph.voices.push(Voice {
                        start_sec: now + i as f64 * spacing,
                        duration_sec: 0.08,
                        bus: Bus::Sfx,
                        waveform: Waveform::Triangle,
                        freq: vec![(0.0, hz)],
                        gain: 0.4,
                        envelope: Envelope::pluck(0.003, 0.03),
                        filter: Filter::None,
                        seed,
                    });
                }
            }
            SfxKind::Giggle => {
                for i in 0..3 {
                    let base = 320.0 + 60.0 * i as f64;
                    graph.voices.push(Voice {
                        start_sec: now + i as f64 * 0.09,
                        duration_sec: 0.07,
                        bus: Bus::Sfx,
                        waveform: Waveform::Sine,
                        freq: vec![(0.0, base), (1.0, base * 1.5)],
                        gain: 0.3,
                        envelope: Envelope::pluck(0.005, 0.03),
                        filter: Filter::None,
                        seed,
                    });
                }
            }
            SfxKind::Whoosh => graph.voices.push(Voice {
                start_sec: now,
                duration_sec: 0.4,
                bus: Bus::Sfx,
                waveform: Waveform::Noise,
                freq: Vec::new(),
                gain: 0.35,
                envelope: Envelope {
                    attack_sec: 0.1,
                    decay_tau_sec: Some(0.15),
                    release_sec: 0.1,
                },
                filter: Filter::Bandpass {
                    center_hz: 1000.0,
                    q: 2.0,
                },
                seed,
            }),
            SfxKind::Splash => graph.voices.push(Voice {
                start_sec: now,
                duration_sec: 0.5,
                bus: Bus::Sfx,
                waveform: Waveform::Noise,
                freq: Vec::new(),
                gain: 0.4,
                envelope: Envelope::pluck(0.01, 0.18),
                filter: Filter::Lowpass { cutoff_hz: 800.0 },
                seed,
            }),
            SfxKind::Clap => graph.voices.push(Voice {
                start_sec: now,
                duration_sec: 0.05,
                bus: Bus::Sfx,
                waveform: Waveform::Noise,
                freq: Vec::new(),
                gain: 0.5,
                envelope: Envelope::pluck(0.001, 0.015),
                filter: Filter::Bandpass {
                    center_hz: 2000.0,
                    q: 1.5,
                },
                seed,
            }),
            SfxKind::Knock => {
                for i in 0..2 {
                    graph.voices.push(Voice {
                        start_sec: now + i as f64 * 0.18,
                        duration_sec: 0.08,
                        bus: Bus::Sfx,
                        waveform: Waveform::Triangle,
                        freq: vec![(0.0, 80.0)],
                        gain: 0.5,
                        envelope: Envelope::pluck(0.002, 0.03),
                        filter: Filter::None,
                        seed,
                    });
                }
            }
        }
    }

    /// Start the ambient bed for a scene background; fades in at half the
    /// SFX bus level. Backgrounds with no mapped ambience stay silent.
    #[tracing::instrument(skip(self))]
    pub fn play_ambient(&mut self, background: &str) {
        if self.graph.is_none() {
            return;
        }
        self.stop_ambient();
        let Some(kind) = ambient_for_background(background) else {
            return;
        };
        let seed = self.rng.next_u64();
        let Some(graph) = self.graph.as_mut() else {
            return;
        };
        let now = graph.clock_sec;
        // A long bed; the coordinator stops it at scene end.
        const BED_SEC: f64 = 120.0;
        let (filter, gain, extra_tone) = match kind {
            AmbientKind::Meadow => (
                Filter::Lowpass { cutoff_hz: 1400.0 },
                0.5,
                Some((1800.0, 0.06)),
            ),
            AmbientKind::Forest => (Filter::Lowpass { cutoff_hz: 900.0 }, 0.5, None),
            AmbientKind::Beach => (Filter::Lowpass { cutoff_hz: 500.0 }, 0.5, None),
            AmbientKind::Night => (
                Filter::Bandpass {
                    center_hz: 3200.0,
                    q: 4.0,
                },
                0.35,
                None,
            ),
            AmbientKind::Park => (Filter::Lowpass { cutoff_hz: 1200.0 }, 0.45, None),
            AmbientKind::Bedroom => (Filter::Lowpass { cutoff_hz: 300.0 }, 0.15, None),
        };
        graph.voices.push(Voice {
            start_sec: now,
            duration_sec: BED_SEC,
            bus: Bus::Sfx,
            waveform: Waveform::Noise,
            freq: Vec::new(),
            gain: gain * 0.5,
            envelope: Envelope::sustain(1.0, 1.0),
            filter,
            seed,
        });
        if let Some((hz, tone_gain)) = extra_tone {
            graph.voices.push(Voice {
                start_sec: now,
                duration_sec: BED_SEC,
                bus: Bus::Sfx,
                waveform: Waveform::Sine,
                freq: vec![(0.0, hz), (0.5, hz * 1.05), (1.0, hz)],
                gain: tone_gain * 0.5,
                envelope: Envelope::sustain(1.5, 1.5),
                filter: Filter::None,
                seed,
            });
        }
        graph.ambient_live = true;
    }

    /// Fade the ambient bed out rather than hard-cutting it.
    pub fn stop_ambient(&mut self) {
        let Some(graph) = &mut self.graph else {
            return;
        };
        if !graph.ambient_live {
            return;
        }
        let now = graph.clock_sec;
        const FADE_SEC: f64 = 0.8;
        for v in &mut graph.voices {
            if v.bus == Bus::Sfx
                && v.start_sec < now
                && v.start_sec + v.duration_sec > now + FADE_SEC
            {
                v.duration_sec = (now + FADE_SEC) - v.start_sec;
                v.envelope.release_sec = FADE_SEC;
            }
        }
        graph.ambient_live = false;
    }

    /// Speak narration through the TTS collaborator.
    ///
    /// With auto-narration disabled (or the engine uninitialized) no audio
    /// plays but `on_complete` still fires; callers must not assume
    /// narration always plays. Provider failures are logged and swallowed
    /// so the scene continues silently.
    #[tracing::instrument(skip(self, events), fields(len = text.len()))]
    pub fn play_narration(&mut self, text: &str, events: SpeechEvents) {
        if self.graph.is_none() || !self.settings.auto_narration {
            events.complete(SpeechOutcome::Completed);
            return;
        }
        // Starting new speech interrupts the previous utterance; the
        // interruption resolves as success on the old callback's side.
        self.speech.cancel();
        let request = SpeechRequest {
            text: text.to_string(),
            rate: 0.9,
            pitch: 1.1,
            volume: self.settings.narration_volume * self.settings.master_volume,
            voice: self.settings.narrator_voice.clone(),
        };
        if let Err(e) = self.speech.speak(request, events) {
            tracing::warn!(error = %e, "narration synthesis failed; scene continues silently");
        }
    }

    /// Cancel in-flight narration explicitly.
    pub fn stop_narration(&mut self) {
        self.speech.cancel();
    }

    /// Whether generated music is currently live.
    pub fn music_live(&self) -> bool {
        self.graph.as_ref().is_some_and(|g| g.music_live)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/engine.rs"]
mod tests;
