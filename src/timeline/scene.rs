//! Scene data supplied by the editor boundary.

use crate::acting::mapper::{self, Mood};
use crate::animation::ease::MotionCurve;
use crate::foundation::core::{TimeMs, Vec2};
use crate::foundation::error::{StoryError, StoryResult};

/// One character placed in a scene.
///
/// Instance overrides layer on top of the shared rig defaults; the rig
/// itself is never mutated by a scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneCharacter {
    /// Rig id or display name (resolved case-insensitively).
    pub rig: String,
    /// World position of the rig origin.
    pub position: Vec2,
    /// Uniform instance scale.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Mirror horizontally.
    #[serde(default)]
    pub flip: bool,
    /// Action override; `None` defers to the narration mapper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Expression override; `None` defers to the narration mapper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Whether this character is talking.
    #[serde(default)]
    pub talking: bool,
}

fn default_scale() -> f64 {
    1.0
}

/// A camera target at a point in scene time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraKeyframe {
    /// Scene-relative time.
    pub time: TimeMs,
    /// Zoom factor; 1 is the full stage.
    pub zoom: f64,
    /// Pan offset in stage pixels.
    pub pan: Vec2,
    /// Curve applied toward the next keyframe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<MotionCurve>,
}

/// Interpolated camera state at one instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CameraState {
    /// Zoom factor.
    pub zoom: f64,
    /// Pan offset.
    pub pan: Vec2,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

/// One narrated scene as supplied by the editor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    /// Narration text; drives acting, duration, and speech.
    pub narration: String,
    /// Background setting id (also selects the ambient bed).
    pub background: String,
    /// Emotional classification; parameterizes the music.
    #[serde(default)]
    pub mood: Mood,
    /// Characters in the scene; the first is the narrative lead.
    #[serde(default)]
    pub characters: Vec<SceneCharacter>,
    /// Camera keyframes; empty means a static full-stage camera.
    #[serde(default)]
    pub camera: Vec<CameraKeyframe>,
    /// Explicit duration override; wins over the computed duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    /// Optional spoken dialogue line distinct from the narration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
}

impl Scene {
    /// Validate scene invariants.
    pub fn validate(&self) -> StoryResult<()> {
        if let Some(d) = self.duration_ms
            && (!d.is_finite() || d <= 0.0)
        {
            return Err(StoryError::validation(
                "scene duration_ms must be finite and > 0 when set",
            ));
        }
        if !self
            .camera
            .windows(2)
            .all(|w| w[0].time.0 <= w[1].time.0)
        {
            return Err(StoryError::validation(
                "camera keyframes must be sorted by non-decreasing time",
            ));
        }
        for kf in &self.camera {
            if !kf.zoom.is_finite() || kf.zoom <= 0.0 {
                return Err(StoryError::validation("camera zoom must be > 0"));
            }
        }
        for (i, c) in self.characters.iter().enumerate() {
            if c.rig.trim().is_empty() {
                return Err(StoryError::validation(format!(
                    "character {i} rig reference must be non-empty"
                )));
            }
            if !c.scale.is_finite() || c.scale <= 0.0 {
                return Err(StoryError::validation(format!(
                    "character {i} scale must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    /// Effective playback duration: the explicit override if present,
    /// otherwise computed from the narration.
    pub fn effective_duration(&self) -> TimeMs {
        match self.duration_ms {
            Some(d) => TimeMs(d),
            None => mapper::calculate_scene_duration(&self.narration, mapper::MIN_SCENE_DURATION),
        }
    }

    /// Apply the narration mapper's suggestion to this scene.
    ///
    /// The suggestion lands on the *first* character only; the rest react:
    /// they go idle when the lead talks, and adopt the happy expression
    /// only when the suggestion itself was happy. Never called by the
    /// engine on its own; the editor decides whether to apply it.
    pub fn auto_enhance(&mut self) {
        let Some(suggestion) = mapper::analyze_narration(&self.narration).into_iter().next()
        else {
            return;
        };
        let mut iter = self.characters.iter_mut();
        let Some(lead) = iter.next() else {
            return;
        };
        lead.action = Some(suggestion.suggested_action.clone());
        lead.expression = Some(suggestion.suggested_expression.clone());
        lead.talking = suggestion.is_talking;
        for other in iter {
            if suggestion.is_talking {
                other.action = Some("idle".to_string());
                other.talking = false;
            }
            if suggestion.suggested_expression == "happy" {
                other.expression = Some("happy".to_string());
            }
        }
    }

    /// Camera state at `t`, interpolated through the keyframes.
    pub fn camera_at(&self, t: TimeMs) -> CameraState {
        match self.camera.as_slice() {
            [] => CameraState::default(),
            [only] => CameraState {
                zoom: only.zoom,
                pan: only.pan,
            },
            keys => {
                let idx = keys.partition_point(|k| k.time.0 <= t.0);
                if idx == 0 {
                    let k = &keys[0];
                    return CameraState {
                        zoom: k.zoom,
                        pan: k.pan,
                    };
                }
                if idx >= keys.len() {
                    let k = &keys[keys.len() - 1];
                    return CameraState {
                        zoom: k.zoom,
                        pan: k.pan,
                    };
                }
                let a = &keys[idx - 1];
                let b = &keys[idx];
                let denom = b.time.0 - a.time.0;
                let raw = if denom <= 0.0 {
                    1.0
                } else {
                    (t.0 - a.time.0) / denom
                };
                let eased = a.curve.unwrap_or(MotionCurve::EaseInOut).apply(raw);
                CameraState {
                    zoom: a.zoom + (b.zoom - a.zoom) * eased,
                    pan: Vec2::new(
                        a.pan.x + (b.pan.x - a.pan.x) * eased,
                        a.pan.y + (b.pan.y - a.pan.y) * eased,
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/scene.rs"]
mod tests;
