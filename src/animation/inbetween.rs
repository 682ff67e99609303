//! Inbetween generation, squash/stretch, motion paths, and frame-rate
//! retargeting.
//!
//! All sampling here is a pure function of normalized time so the exporter
//! can pull deterministic poses at arbitrary `t`.

use crate::animation::ease::{self, MotionCurve};
use crate::foundation::core::{CubicBez, Fps, Point, TimeMs, Vec2};
use crate::foundation::error::{StoryError, StoryResult};

/// Animated value of one keyframe; scalar or 2D.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum KeyValue {
    /// Scalar property (rotation, opacity, zoom...).
    Scalar(f64),
    /// 2D property (position, scale, pan...).
    Vec2(Vec2),
}

impl KeyValue {
    fn lerp(a: KeyValue, b: KeyValue, t: f64) -> StoryResult<KeyValue> {
        match (a, b) {
            (KeyValue::Scalar(x), KeyValue::Scalar(y)) => Ok(KeyValue::Scalar(x + (y - x) * t)),
            (KeyValue::Vec2(x), KeyValue::Vec2(y)) => Ok(KeyValue::Vec2(Vec2::new(
                x.x + (y.x - x.x) * t,
                x.y + (y.y - x.y) * t,
            ))),
            _ => Err(StoryError::animation(
                "cannot interpolate between scalar and vec2 keyframes",
            )),
        }
    }

    /// Component squash/stretch velocity reacts to: the scalar itself, or
    /// the y component for 2D motion.
    fn motion_component(self) -> f64 {
        match self {
            KeyValue::Scalar(v) => v,
            KeyValue::Vec2(v) => v.y,
        }
    }
}

/// A timestamped target value for one animated property.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationKeyframe {
    /// Scene-relative time.
    pub time: TimeMs,
    /// Target value.
    pub value: KeyValue,
    /// Curve applied toward the next keyframe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<MotionCurve>,
}

/// One generated sample between two keyframes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct InbetweenFrame {
    /// Sample time.
    pub time: TimeMs,
    /// Eased value.
    pub value: KeyValue,
    /// Squash scale factor, only for squash-stretch curves.
    pub squash: Option<f64>,
    /// Stretch scale factor, only for squash-stretch curves.
    pub stretch: Option<f64>,
}

/// Paired deformation factors applied on perpendicular axes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SquashStretch {
    /// Horizontal (compression) factor.
    pub squash: f64,
    /// Vertical (elongation) factor.
    pub stretch: f64,
}

/// Validate that keyframe times are monotonically non-decreasing.
pub fn validate_keyframes(keys: &[AnimationKeyframe]) -> StoryResult<()> {
    if !keys.windows(2).all(|w| w[0].time.0 <= w[1].time.0) {
        return Err(StoryError::animation(
            "keyframes must be sorted by non-decreasing time",
        ));
    }
    Ok(())
}

/// Generate `frame_count + 1` samples between two keyframes, inclusive of
/// both ends, at uniform time steps.
///
/// For [`MotionCurve::SquashStretch`] each sample also carries deformation
/// factors derived from the estimated velocity at that sample.
pub fn generate_inbetweens(
    start: &AnimationKeyframe,
    end: &AnimationKeyframe,
    frame_count: usize,
    curve: MotionCurve,
) -> StoryResult<Vec<InbetweenFrame>> {
    if frame_count == 0 {
        return Err(StoryError::animation("frame_count must be > 0"));
    }
    if end.time.0 < start.time.0 {
        return Err(StoryError::animation("end keyframe precedes start"));
    }

    let duration_ms = end.time.0 - start.time.0;
    let mut out = Vec::with_capacity(frame_count + 1);
    for i in 0..=frame_count {
        let t = i as f64 / frame_count as f64;
        let eased = curve.apply(t);
        let value = KeyValue::lerp(start.value, end.value, eased)?;
        let (squash, stretch) = if matches!(curve, MotionCurve::SquashStretch) {
            let velocity = estimate_velocity(start.value, end.value, duration_ms, t);
            let d = calculate_squash_stretch(velocity, DEFAULT_MAX_DEFORMATION);
            (Some(d.squash), Some(d.stretch))
        } else {
            (None, None)
        };
        out.push(InbetweenFrame {
            time: TimeMs(start.time.0 + duration_ms * t),
            value,
            squash,
            stretch,
        });
    }
    Ok(out)
}

/// Default deformation clamp for squash/stretch.
pub const DEFAULT_MAX_DEFORMATION: f64 = 0.3;

/// Instantaneous velocity estimate at normalized time `t`.
///
/// `(Δvalue/duration) · 4t(1−t) · 1000`, a parabola peaking at the
/// midpoint. Hand-tuned for squash-stretch feel, not physically
/// accurate.
pub fn estimate_velocity(start: KeyValue, end: KeyValue, duration_ms: f64, t: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 0.0;
    }
    let delta = end.motion_component() - start.motion_component();
    (delta / duration_ms) * 4.0 * t * (1.0 - t) * 1000.0
}

/// Map velocity to squash/stretch factors.
///
/// Positive velocity (moving up/forward) stretches (`stretch > 1`,
/// `squash < 1`); negative velocity compresses. Deformation magnitude is
/// clamped to `max_deformation`.
pub fn calculate_squash_stretch(velocity: f64, max_deformation: f64) -> SquashStretch {
    let d = (velocity.abs() * 0.001).min(max_deformation);
    if velocity >= 0.0 {
        SquashStretch {
            squash: 1.0 - d,
            stretch: 1.0 + d,
        }
    } else {
        SquashStretch {
            squash: 1.0 + d,
            stretch: 1.0 - d,
        }
    }
}

/// Deformation factors for a landing impact at normalized time `t`:
/// quick squash-in over the first 30 % of the window, recovery after.
pub fn impact_squash_stretch(t: f64, intensity: f64) -> SquashStretch {
    let d = ease::impact_squash(t, intensity);
    SquashStretch {
        squash: 1.0 + d,
        stretch: 1.0 - d,
    }
}

/// Interpolate along a jumping/thrown arc.
///
/// Linear travel plus a sinusoidal vertical lift peaking at `t = 0.5`,
/// proportional to `arc_height` and the horizontal travel distance.
pub fn arc_interpolation(start: Vec2, end: Vec2, t: f64, arc_height: f64) -> Vec2 {
    let t = t.clamp(0.0, 1.0);
    let x = start.x + (end.x - start.x) * t;
    let y = start.y + (end.y - start.y) * t;
    let travel = (end.x - start.x).abs();
    let lift = (t * std::f64::consts::PI).sin() * arc_height * (travel / 100.0).max(1.0);
    Vec2::new(x, y - lift)
}

/// Standard cubic Bezier with two control points.
pub fn bezier_interpolation(p0: Vec2, c1: Vec2, c2: Vec2, p1: Vec2, t: f64) -> Vec2 {
    let bez = CubicBez::new(
        Point::new(p0.x, p0.y),
        Point::new(c1.x, c1.y),
        Point::new(c2.x, c2.y),
        Point::new(p1.x, p1.y),
    );
    use kurbo::ParamCurve as _;
    bez.eval(t.clamp(0.0, 1.0)).to_vec2()
}

/// Retarget a keyframe list to a new frame rate.
///
/// Walks consecutive keyframe pairs, generates `round(target/original)`
/// inbetweens per pair, drops the duplicated boundary frame between
/// segments, and appends the final keyframe unmodified.
pub fn convert_frame_rate(
    keyframes: &[AnimationKeyframe],
    original_fps: Fps,
    target_fps: Fps,
) -> StoryResult<Vec<AnimationKeyframe>> {
    validate_keyframes(keyframes)?;
    if keyframes.len() < 2 {
        return Ok(keyframes.to_vec());
    }

    let per_pair = ((target_fps.as_f64() / original_fps.as_f64()).round() as usize).max(1);
    let mut out = Vec::new();
    for pair in keyframes.windows(2) {
        let curve = pair[0].curve.unwrap_or(MotionCurve::Linear);
        let samples = generate_inbetweens(&pair[0], &pair[1], per_pair, curve)?;
        // The last sample duplicates the next segment's first; drop it.
        for s in &samples[..samples.len() - 1] {
            out.push(AnimationKeyframe {
                time: s.time,
                value: s.value,
                curve: pair[0].curve,
            });
        }
    }
    out.push(*keyframes.last().ok_or_else(|| {
        StoryError::animation("keyframe list unexpectedly empty")
    })?);
    Ok(out)
}

/// Motion curve that "feels right" for a named action.
///
/// Callers rely on this table to avoid hand-tuning every action; unknown
/// actions get the smooth default.
pub fn curve_for_action(action: &str) -> MotionCurve {
    match action {
        "walk" => MotionCurve::EaseInOut,
        "run" => MotionCurve::spring(),
        "jump" => MotionCurve::anticipation(),
        "land" => MotionCurve::SquashStretch,
        "wave" => MotionCurve::Elastic,
        "talk" => MotionCurve::EaseOut,
        "surprised" => MotionCurve::overshoot(),
        "dance" => MotionCurve::spring(),
        _ => MotionCurve::EaseInOut,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/inbetween.rs"]
mod tests;
