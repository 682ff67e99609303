//! Storymotion drives short animated, narrated 2D scenes.
//!
//! It positions jointed character rigs, interpolates poses and a virtual
//! camera across time, derives acting choices from free-text narration,
//! and schedules a synchronized procedural audio bed (mood music, sound
//! effects, ambient loops) over a scene of computed duration.
//!
//! # Pipeline overview
//!
//! 1. **Rig**: immutable skeletal [`CharacterRig`]s from a validated
//!    [`RigLibrary`].
//! 2. **Acting**: [`analyze_narration`] + [`calculate_scene_duration`]
//!    turn narration text into an action, an expression, a talking flag,
//!    and a scene length.
//! 3. **Motion**: the easing table ([`MotionCurve`]), inbetweening, and
//!    per-action pose offsets produce deterministic poses for any `t`.
//! 4. **Audio**: the [`AudioEngine`] schedules oscillator voices against
//!    an absolute clock; [`render_range`] mixes any window to stereo f32.
//! 5. **Timeline**: the [`Timeline`] coordinator ties it all to one
//!    per-scene clock and answers per-frame pose/camera/audio queries.
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: pose sampling and audio mixing are pure
//!   for a given input, so exporters may request frames out of order.
//! - **Presentation stays external**: rendering, encoding, persistence,
//!   and the editing UI consume this engine through plain data.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod acting {
    pub mod mapper;
}
mod animation {
    pub mod actions;
    pub mod ease;
    pub mod inbetween;
}
mod audio {
    pub mod engine;
    pub mod synth;
}
mod foundation {
    pub mod core;
    pub mod error;
}
mod rig {
    pub mod library;
    pub mod model;
}
mod timeline {
    pub mod coordinator;
    pub mod scene;
}

pub use acting::mapper::{
    ActingSuggestion, MIN_SCENE_DURATION, Mood, analyze_narration, calculate_scene_duration,
};
pub use animation::actions::{cycle_ms, expression_offsets, pose_offsets};
pub use animation::ease::{
    MotionCurve, anticipation, bounce_out, ease_in_cubic, ease_in_out_cubic, ease_linear,
    ease_out_cubic, elastic_out, impact_squash, overshoot, spring,
};
pub use animation::inbetween::{
    AnimationKeyframe, DEFAULT_MAX_DEFORMATION, InbetweenFrame, KeyValue, SquashStretch,
    arc_interpolation, bezier_interpolation, calculate_squash_stretch, convert_frame_rate,
    curve_for_action, estimate_velocity, generate_inbetweens, impact_squash_stretch,
    validate_keyframes,
};
pub use audio::engine::{
    AmbientKind, AudioEngine, AudioSettings, AudioSettingsPatch, Key, MusicProfile, MusicStyle,
    NullSpeech, SfxKind, SpeechEvents, SpeechOutcome, SpeechRequest, SpeechSynthesizer,
    music_profile,
};
pub use audio::synth::{
    Bus, CHANNELS, Envelope, Filter, Rng64, SAMPLE_RATE, Voice, Waveform, render_range,
    write_mix_f32le,
};
pub use foundation::core::{Affine, CubicBez, Fps, PartTransform, Point, TimeMs, Vec2};
pub use foundation::error::{StoryError, StoryResult};
pub use rig::library::{AnimalKind, HumanVariant, RigLibrary, animal_rig, human_rig};
pub use rig::model::{
    CharacterRig, ResolvedPart, RigCategory, RigPalette, Shape, ShapeStyle, SpritePart,
};
pub use timeline::coordinator::{
    AudioEvents, CharacterPose, FrameSample, PlaybackState, Timeline,
};
pub use timeline::scene::{CameraKeyframe, CameraState, Scene, SceneCharacter};
