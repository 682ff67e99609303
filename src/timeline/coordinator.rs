//! The timeline coordinator: the composition root that keeps narration
//! text, scene duration, pose animation, camera, and audio consistent.

use std::collections::BTreeMap;

use crate::acting::mapper::{self, Mood};
use crate::animation::actions;
use crate::animation::ease::MotionCurve;
use crate::animation::inbetween::curve_for_action;
use crate::audio::engine::{AudioEngine, SpeechEvents};
use crate::foundation::core::{Affine, PartTransform, TimeMs, Vec2};
use crate::foundation::error::{StoryError, StoryResult};
use crate::rig::library::RigLibrary;
use crate::rig::model::ResolvedPart;
use crate::timeline::scene::{CameraState, Scene};

/// Per-scene playback state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// No scene loaded.
    Idle,
    /// Scene loaded and resolved, not yet playing.
    Loading,
    /// Clock advancing.
    Playing,
    /// Clock frozen mid-scene.
    Paused,
    /// Clock reached the scene duration.
    Finished,
}

/// A character with its acting choices resolved for the loaded scene.
#[derive(Clone, Debug)]
struct ResolvedCharacter {
    rig_id: String,
    position: Vec2,
    scale: f64,
    flip: bool,
    action: String,
    expression: String,
    talking: bool,
    curve: MotionCurve,
}

/// An SFX cue detected in the narration, scheduled at a point in scene
/// time proportional to where the keyword sits in the text.
#[derive(Clone, Debug, PartialEq)]
struct SfxCue {
    at: TimeMs,
    action: String,
    fired: bool,
}

/// How long a fired SFX cue counts as "active" in frame samples.
const SFX_ACTIVE_WINDOW_MS: f64 = 600.0;

struct LoadedScene {
    scene: Scene,
    duration: TimeMs,
    characters: Vec<ResolvedCharacter>,
    cues: Vec<SfxCue>,
}

/// Pose of one character at one instant, in paint order.
#[derive(Clone, Debug, serde::Serialize)]
pub struct CharacterPose {
    /// Rig the parts belong to.
    pub rig_id: String,
    /// Resolved action driving the pose.
    pub action: String,
    /// Resolved expression.
    pub expression: String,
    /// Parts with world transforms, ascending global z.
    pub parts: Vec<ResolvedPart>,
}

/// Audio activity visible at one instant.
#[derive(Clone, Debug, serde::Serialize)]
pub struct AudioEvents {
    /// Mood the music bed is playing.
    pub music_mood: Mood,
    /// Background whose ambient bed is looping, if mapped.
    pub ambient_background: Option<String>,
    /// SFX actions triggered recently enough to still be audible.
    pub active_sfx: Vec<String>,
}

/// Everything the renderer and exporter need for one frame.
#[derive(Clone, Debug, serde::Serialize)]
pub struct FrameSample {
    /// Sample time.
    pub time: TimeMs,
    /// Character poses in scene order.
    pub characters: Vec<CharacterPose>,
    /// Interpolated camera state.
    pub camera: CameraState,
    /// Active audio events.
    pub audio: AudioEvents,
}

/// Drives one scene at a time: resolves duration and acting, schedules
/// audio alongside visual playback, and answers per-frame state queries.
pub struct Timeline {
    library: RigLibrary,
    audio: AudioEngine,
    state: PlaybackState,
    t: TimeMs,
    loaded: Option<LoadedScene>,
}

impl Timeline {
    /// New coordinator over a rig library and an audio engine handle.
    ///
    /// The audio engine is injected so its lifecycle belongs to whoever
    /// owns scene playback; `Timeline` initializes it on first load and
    /// disposes nothing it did not create.
    pub fn new(library: RigLibrary, audio: AudioEngine) -> Self {
        Self {
            library,
            audio,
            state: PlaybackState::Idle,
            t: TimeMs(0.0),
            loaded: None,
        }
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current scene clock.
    pub fn time(&self) -> TimeMs {
        self.t
    }

    /// Effective duration of the loaded scene.
    pub fn duration(&self) -> Option<TimeMs> {
        self.loaded.as_ref().map(|l| l.duration)
    }

    /// The audio engine, e.g. for settings patches or offline mixing.
    pub fn audio(&self) -> &AudioEngine {
        &self.audio
    }

    /// Mutable audio engine access.
    pub fn audio_mut(&mut self) -> &mut AudioEngine {
        &mut self.audio
    }

    /// Load a scene, replacing any previous one.
    ///
    /// Tears the previous scene's audio down first (stop narration, stop
    /// music, fade ambient) so nothing bleeds across the scene boundary,
    /// then resolves duration, per-character acting and curves, SFX cues,
    /// and schedules the new scene's music and ambient bed.
    #[tracing::instrument(skip(self, scene), fields(background = %scene.background))]
    pub fn load_scene(&mut self, scene: Scene) -> StoryResult<()> {
        scene.validate()?;

        // Previous scene teardown happens before the new Loading state.
        self.audio.stop_narration();
        self.audio.stop_music();
        self.audio.stop_ambient();
        self.state = PlaybackState::Loading;
        self.t = TimeMs(0.0);

        let duration = scene.effective_duration();
        let suggestion = mapper::analyze_narration(&scene.narration)
            .into_iter()
            .next()
            .ok_or_else(|| StoryError::evaluation("narration analysis returned no suggestion"))?;

        let mut characters = Vec::with_capacity(scene.characters.len());
        for (i, c) in scene.characters.iter().enumerate() {
            let rig = self.library.get_or_fallback(&c.rig).ok_or_else(|| {
                StoryError::evaluation(format!(
                    "no rig '{}' and no fallback rig available",
                    c.rig
                ))
            })?;
            // The mapper's suggestion lands on the lead; the rest idle.
            let action = c.action.clone().unwrap_or_else(|| {
                if i == 0 {
                    suggestion.suggested_action.clone()
                } else {
                    "idle".to_string()
                }
            });
            let expression = c.expression.clone().unwrap_or_else(|| {
                if i == 0 {
                    suggestion.suggested_expression.clone()
                } else {
                    "neutral".to_string()
                }
            });
            let talking = c.talking || (i == 0 && suggestion.is_talking);
            characters.push(ResolvedCharacter {
                rig_id: rig.id.clone(),
                position: c.position,
                scale: c.scale,
                flip: c.flip,
                curve: curve_for_action(&action),
                action,
                expression,
                talking,
            });
        }

        let cues = detect_sfx_cues(&scene.narration, duration);

        self.audio.initialize();
        self.audio.set_clock(0.0);
        self.audio.play_mood_music(scene.mood);
        self.audio.play_ambient(&scene.background);

        self.loaded = Some(LoadedScene {
            scene,
            duration,
            characters,
            cues,
        });
        Ok(())
    }

    /// Begin or resume playback; starts narration on the first play.
    pub fn play(&mut self, speech_events: SpeechEvents) -> StoryResult<()> {
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| StoryError::evaluation("no scene loaded"))?;
        match self.state {
            PlaybackState::Loading => {
                let text = loaded
                    .scene
                    .dialogue
                    .clone()
                    .unwrap_or_else(|| loaded.scene.narration.clone());
                self.audio.play_narration(&text, speech_events);
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Playing => {}
            PlaybackState::Idle | PlaybackState::Finished => {
                return Err(StoryError::evaluation(
                    "scene must be loaded before playing",
                ));
            }
        }
        Ok(())
    }

    /// Freeze the clock mid-scene.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Advance the clock by `dt_ms`.
    ///
    /// Fires SFX cues the clock crosses and transitions to `Finished`
    /// at the scene duration, stopping narration and music so the next
    /// scene starts clean. No-op unless `Playing`.
    pub fn advance(&mut self, dt_ms: f64) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(loaded) = &mut self.loaded else {
            return;
        };
        self.t = TimeMs((self.t.0 + dt_ms.max(0.0)).min(loaded.duration.0));
        self.audio.set_clock(self.t.as_secs());
        for cue in &mut loaded.cues {
            if !cue.fired && cue.at.0 <= self.t.0 {
                cue.fired = true;
                self.audio.play_sfx(&cue.action);
            }
        }
        if self.t.0 >= loaded.duration.0 {
            self.state = PlaybackState::Finished;
            self.audio.stop_narration();
            self.audio.stop_music();
            self.audio.stop_ambient();
        }
    }

    /// Drop the loaded scene and return to `Idle`, tearing audio down.
    pub fn unload(&mut self) {
        self.audio.stop_narration();
        self.audio.stop_music();
        self.audio.stop_ambient();
        self.loaded = None;
        self.t = TimeMs(0.0);
        self.state = PlaybackState::Idle;
    }

    /// Sample the scene at an arbitrary time.
    ///
    /// Pure in `t`: repeated calls with the same `t` return the same
    /// poses regardless of playback order, which is what the exporter
    /// relies on for out-of-order frame requests.
    #[tracing::instrument(skip(self))]
    pub fn sample(&self, t: TimeMs) -> StoryResult<FrameSample> {
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| StoryError::evaluation("no scene loaded"))?;
        let t = TimeMs(t.0.clamp(0.0, loaded.duration.0));

        let mut characters = Vec::with_capacity(loaded.characters.len());
        for c in &loaded.characters {
            let rig = self.library.get(&c.rig_id).ok_or_else(|| {
                StoryError::evaluation(format!("loaded scene references missing rig '{}'", c.rig_id))
            })?;

            let phase = t.0 / actions::cycle_ms(&c.action);
            let mut overrides = actions::pose_offsets(&c.action, phase, c.curve);
            if c.talking && c.action != "talk" {
                let talk_phase = t.0 / actions::cycle_ms("talk");
                merge_offsets(
                    &mut overrides,
                    actions::pose_offsets("talk", talk_phase, MotionCurve::EaseOut),
                );
            }
            merge_offsets(&mut overrides, actions::expression_offsets(&c.expression));

            let mut parts = rig.resolve_pose(&overrides)?;
            let flip = if c.flip { -1.0 } else { 1.0 };
            let placement = Affine::translate(c.position)
                * Affine::scale_non_uniform(c.scale * flip, c.scale);
            for part in &mut parts {
                part.world = placement * part.world;
            }
            characters.push(CharacterPose {
                rig_id: c.rig_id.clone(),
                action: c.action.clone(),
                expression: c.expression.clone(),
                parts,
            });
        }

        let active_sfx = loaded
            .cues
            .iter()
            .filter(|cue| cue.at.0 <= t.0 && t.0 < cue.at.0 + SFX_ACTIVE_WINDOW_MS)
            .map(|cue| cue.action.clone())
            .collect();

        Ok(FrameSample {
            time: t,
            characters,
            camera: loaded.scene.camera_at(t),
            audio: AudioEvents {
                music_mood: loaded.scene.mood,
                ambient_background: Some(loaded.scene.background.clone())
                    .filter(|_| !loaded.scene.background.is_empty()),
                active_sfx,
            },
        })
    }
}

/// Combine two offset maps; where both touch a part, the deltas compose
/// (positions and rotations add, scales multiply).
fn merge_offsets(
    base: &mut BTreeMap<String, PartTransform>,
    extra: BTreeMap<String, PartTransform>,
) {
    for (id, delta) in extra {
        match base.get_mut(&id) {
            Some(existing) => {
                existing.position += delta.position;
                existing.rotation_deg += delta.rotation_deg;
                existing.scale = Vec2::new(
                    existing.scale.x * delta.scale.x,
                    existing.scale.y * delta.scale.y,
                );
            }
            None => {
                base.insert(id, delta);
            }
        }
    }
}

/// Place one cue per detected action keyword, at a scene time
/// proportional to where the keyword sits in the narration.
fn detect_sfx_cues(narration: &str, duration: TimeMs) -> Vec<SfxCue> {
    let lower = narration.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }
    const KEYWORDS: &[(&str, &str)] = &[
        ("jump", "jump"),
        ("walk", "walk"),
        ("run", "run"),
        ("laugh", "laugh"),
        ("wave", "wave"),
        ("splash", "splash"),
        ("swim", "swim"),
        ("clap", "clap"),
        ("knock", "knock"),
        ("danc", "dance"),
    ];
    let mut cues = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if let Some((_, action)) = KEYWORDS.iter().find(|(k, _)| word.contains(k)) {
            cues.push(SfxCue {
                at: TimeMs(duration.0 * (i as f64 / words.len() as f64)),
                action: (*action).to_string(),
                fired: false,
            });
        }
    }
    cues
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/coordinator.rs"]
mod tests;
