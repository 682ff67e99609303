//! Narration-to-acting heuristics.
//!
//! The keyword tables below are scanned in declaration order and the
//! first matching entry wins, regardless of where the keyword appears in
//! the text. That ordering is a behavioral contract: reordering a table
//! silently changes which action or expression a narration resolves to.

use crate::foundation::core::TimeMs;

/// Coarse emotional classification of a scene; parameterizes the music
/// synthesizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// Bright and major.
    Happy,
    /// Slow and minor.
    Sad,
    /// Fast and driving.
    Exciting,
    /// Gentle and sparse.
    Calm,
    /// Minor and ambient.
    Mysterious,
    /// Unremarkable default.
    #[default]
    Neutral,
}

/// Acting choices derived from one narration string.
///
/// Not persisted; recomputed on demand as a pure function of the text.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActingSuggestion {
    /// Action the lead character should perform.
    pub suggested_action: String,
    /// Facial expression for the lead character.
    pub suggested_expression: String,
    /// Whether the narration contains direct speech.
    pub is_talking: bool,
}

/// Action keyword table, scanned in declaration order.
const ACTION_TABLE: &[(&str, &str)] = &[
    ("walk", "walk"),
    ("run", "run"),
    ("jump", "jump"),
    ("wave", "wave"),
    ("danc", "dance"),
    ("sit", "sit"),
    ("play", "play"),
    ("explor", "explore"),
    ("discover", "surprised"),
    ("found", "surprised"),
    ("said", "talk"),
    ("asked", "talk"),
    ("replied", "talk"),
    ("exclaimed", "talk"),
    ("whispered", "talk"),
    ("shouted", "talk"),
    ("laughed", "dance"),
    ("smiled", "idle"),
    ("cried", "sad"),
    ("hugged", "wave"),
];

/// Expression keyword table, scanned in declaration order.
const EXPRESSION_TABLE: &[(&str, &str)] = &[
    ("happy", "happy"),
    ("excited", "happy"),
    ("joy", "happy"),
    ("glad", "happy"),
    ("delighted", "happy"),
    ("sad", "sad"),
    ("unhappy", "sad"),
    ("upset", "sad"),
    ("disappointed", "sad"),
    ("surprised", "surprised"),
    ("amazed", "surprised"),
    ("shocked", "surprised"),
    ("wow", "surprised"),
    ("angry", "angry"),
    ("mad", "angry"),
    ("furious", "angry"),
    ("scared", "surprised"),
    ("afraid", "surprised"),
    ("worried", "sad"),
];

fn contains_quote(text: &str) -> bool {
    text.contains('"') || text.contains('\u{201c}') || text.contains('\u{201d}')
}

/// Derive acting choices from narration text.
///
/// Returns exactly one suggestion today; the list shape is reserved for
/// future multi-beat narrations.
pub fn analyze_narration(text: &str) -> Vec<ActingSuggestion> {
    let lower = text.to_lowercase();

    let mut action = ACTION_TABLE
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, action)| (*action).to_string());

    let expression = EXPRESSION_TABLE
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or_else(|| "neutral".to_string(), |(_, e)| (*e).to_string());

    // Direct speech forces talking; if no action keyword matched, talking
    // is also the action.
    let is_talking = contains_quote(text) || action.as_deref() == Some("talk");
    if contains_quote(text) && action.is_none() {
        action = Some("talk".to_string());
    }

    vec![ActingSuggestion {
        suggested_action: action.unwrap_or_else(|| "idle".to_string()),
        suggested_expression: expression,
        is_talking,
    }]
}

/// Default minimum scene duration.
pub const MIN_SCENE_DURATION: TimeMs = TimeMs(4000.0);

/// Reading pace the narrator is assumed to hold.
const WORDS_PER_MINUTE: f64 = 130.0;

/// Fixed lead-in added for transitions and animation settling.
const TRANSITION_BUFFER_MS: f64 = 2000.0;

/// Compute how long a scene should play for its narration.
///
/// Word count at 130 wpm plus a 2 s transition buffer, floored at
/// `min_duration`. This is the sole source of truth for scene length and
/// must be recomputed whenever the narration text changes.
pub fn calculate_scene_duration(narration: &str, min_duration: TimeMs) -> TimeMs {
    let words = narration.split_whitespace().count() as f64;
    let speech_ms = words / WORDS_PER_MINUTE * 60_000.0;
    TimeMs((speech_ms + TRANSITION_BUFFER_MS).max(min_duration.0))
}

#[cfg(test)]
#[path = "../../tests/unit/acting/mapper.rs"]
mod tests;
