//! Per-action procedural pose offsets.
//!
//! Each action maps a normalized cycle phase to joint-level transform
//! deltas keyed by part id. Sampling is pure in the phase, so the
//! exporter can query arbitrary times. Parts a rig does not have are
//! simply ignored when the overrides are applied.

use std::collections::BTreeMap;

use crate::animation::ease::MotionCurve;
use crate::foundation::core::{PartTransform, Vec2};

/// Length of one animation cycle for an action, in milliseconds.
pub fn cycle_ms(action: &str) -> f64 {
    match action {
        "run" => 500.0,
        "walk" => 900.0,
        "jump" => 1000.0,
        "land" => 600.0,
        "wave" => 800.0,
        "dance" => 700.0,
        "talk" => 300.0,
        "surprised" => 1200.0,
        _ => 2000.0, // idle breathing
    }
}

fn delta(position: Vec2, rotation_deg: f64, scale: Vec2) -> PartTransform {
    PartTransform {
        position,
        rotation_deg,
        scale,
        pivot: Vec2::new(0.5, 0.5), // ignored by compose; the part's pivot wins
    }
}

fn swing(phase: f64) -> f64 {
    (phase * std::f64::consts::TAU).sin()
}

const UNIT: Vec2 = Vec2::new(1.0, 1.0);

/// Joint offsets for `action` at cycle `phase ∈ [0,1)`.
///
/// `curve` shapes the non-cyclic actions (jump arc, surprise pop); cyclic
/// actions run on raw sine swings.
pub fn pose_offsets(
    action: &str,
    phase: f64,
    curve: MotionCurve,
) -> BTreeMap<String, PartTransform> {
    let phase = phase.rem_euclid(1.0);
    let mut out = BTreeMap::new();
    let mut set = |id: &str, d: PartTransform| {
        out.insert(id.to_string(), d);
    };

    match action {
        "walk" => {
            let s = swing(phase);
            set("leg_left", delta(Vec2::ZERO, 18.0 * s, UNIT));
            set("leg_right", delta(Vec2::ZERO, -18.0 * s, UNIT));
            set("arm_left", delta(Vec2::ZERO, -14.0 * s, UNIT));
            set("arm_right", delta(Vec2::ZERO, 14.0 * s, UNIT));
            // Body bobs twice per stride.
            let bob = (phase * 2.0 * std::f64::consts::TAU).sin().abs();
            set("torso", delta(Vec2::new(0.0, -2.0 * bob), 0.0, UNIT));
            set("body", delta(Vec2::new(0.0, -2.0 * bob), 0.0, UNIT));
        }
        "run" => {
            let s = swing(phase);
            set("leg_left", delta(Vec2::ZERO, 34.0 * s, UNIT));
            set("leg_right", delta(Vec2::ZERO, -34.0 * s, UNIT));
            set("arm_left", delta(Vec2::ZERO, -28.0 * s, UNIT));
            set("arm_right", delta(Vec2::ZERO, 28.0 * s, UNIT));
            let bob = (phase * 2.0 * std::f64::consts::TAU).sin().abs();
            set("torso", delta(Vec2::new(0.0, -5.0 * bob), 4.0, UNIT));
            set("body", delta(Vec2::new(0.0, -5.0 * bob), 4.0, UNIT));
        }
        "jump" => {
            // One jump per cycle: crouch, rise, fall.
            let lift = curve.apply(phase);
            let height = -60.0 * (lift * std::f64::consts::PI).sin().max(0.0);
            set("torso", delta(Vec2::new(0.0, height), 0.0, UNIT));
            set("body", delta(Vec2::new(0.0, height), 0.0, UNIT));
            let tuck = (phase * std::f64::consts::PI).sin().max(0.0);
            set("leg_left", delta(Vec2::ZERO, 20.0 * tuck, UNIT));
            set("leg_right", delta(Vec2::ZERO, -20.0 * tuck, UNIT));
            set("arm_left", delta(Vec2::ZERO, -40.0 * tuck, UNIT));
            set("arm_right", delta(Vec2::ZERO, 40.0 * tuck, UNIT));
        }
        "land" => {
            let d = crate::animation::inbetween::impact_squash_stretch(phase, 0.25);
            set(
                "torso",
                delta(Vec2::ZERO, 0.0, Vec2::new(d.squash, d.stretch)),
            );
            set(
                "body",
                delta(Vec2::ZERO, 0.0, Vec2::new(d.squash, d.stretch)),
            );
        }
        "wave" => {
            let s = swing(phase);
            set("arm_right", delta(Vec2::ZERO, -130.0 + 25.0 * s, UNIT));
            set("wing", delta(Vec2::ZERO, -40.0 + 15.0 * s, UNIT));
            set("head", delta(Vec2::ZERO, 4.0 * s, UNIT));
        }
        "talk" => {
            // Mouth flap plus a slight head bob; amplitude-envelope lip
            // sync is layered on top by the narration callback.
            let open = 0.5 + 0.5 * swing(phase).abs();
            set("mouth", delta(Vec2::ZERO, 0.0, Vec2::new(1.0, 0.4 + open)));
            set("beak", delta(Vec2::ZERO, 6.0 * swing(phase), UNIT));
            set("head", delta(Vec2::ZERO, 2.0 * swing(phase * 0.5), UNIT));
        }
        "dance" => {
            let s = swing(phase);
            set("torso", delta(Vec2::new(4.0 * s, -3.0 * s.abs()), 6.0 * s, UNIT));
            set("body", delta(Vec2::new(4.0 * s, -3.0 * s.abs()), 6.0 * s, UNIT));
            set("arm_left", delta(Vec2::ZERO, -150.0 - 20.0 * s, UNIT));
            set("arm_right", delta(Vec2::ZERO, 150.0 - 20.0 * s, UNIT));
            set("leg_left", delta(Vec2::ZERO, 10.0 * s, UNIT));
            set("leg_right", delta(Vec2::ZERO, -10.0 * s, UNIT));
        }
        "surprised" => {
            // Pop in over the first half of the cycle, then hold.
            let pop = curve.apply((phase * 2.0).min(1.0));
            set(
                "head",
                delta(Vec2::new(0.0, -4.0 * pop), 0.0, Vec2::new(1.0, 1.0)),
            );
            set("arm_left", delta(Vec2::ZERO, -70.0 * pop, UNIT));
            set("arm_right", delta(Vec2::ZERO, 70.0 * pop, UNIT));
            set(
                "torso",
                delta(Vec2::ZERO, 0.0, Vec2::new(1.0, 1.0 + 0.05 * pop)),
            );
        }
        "sit" => {
            set("torso", delta(Vec2::new(0.0, 18.0), 0.0, UNIT));
            set("body", delta(Vec2::new(0.0, 18.0), 0.0, UNIT));
            set("leg_left", delta(Vec2::ZERO, 80.0, UNIT));
            set("leg_right", delta(Vec2::ZERO, -80.0, UNIT));
        }
        "sad" => {
            set("head", delta(Vec2::new(0.0, 4.0), 8.0, UNIT));
            set("torso", delta(Vec2::ZERO, 0.0, Vec2::new(1.0, 0.96)));
            set("arm_left", delta(Vec2::ZERO, -4.0, UNIT));
            set("arm_right", delta(Vec2::ZERO, 4.0, UNIT));
        }
        _ => {
            // Idle: slow breathing.
            let s = swing(phase);
            set("torso", delta(Vec2::ZERO, 0.0, Vec2::new(1.0, 1.0 + 0.015 * s)));
            set("body", delta(Vec2::ZERO, 0.0, Vec2::new(1.0, 1.0 + 0.015 * s)));
            set("head", delta(Vec2::new(0.0, 1.0 * s), 0.0, UNIT));
            set("tail", delta(Vec2::ZERO, 8.0 * s, UNIT));
        }
    }
    out
}

/// Facial overrides for an expression, layered over the action offsets.
pub fn expression_offsets(expression: &str) -> BTreeMap<String, PartTransform> {
    let mut out = BTreeMap::new();
    let mut set = |id: &str, d: PartTransform| {
        out.insert(id.to_string(), d);
    };
    match expression {
        "happy" => {
            set("mouth", delta(Vec2::ZERO, 0.0, Vec2::new(1.3, 1.1)));
        }
        "sad" => {
            set("mouth", delta(Vec2::new(0.0, 2.0), 0.0, Vec2::new(0.8, 0.6)));
            set("eye_left", delta(Vec2::ZERO, 0.0, Vec2::new(1.0, 0.7)));
            set("eye_right", delta(Vec2::ZERO, 0.0, Vec2::new(1.0, 0.7)));
        }
        "surprised" => {
            set("eye_left", delta(Vec2::ZERO, 0.0, Vec2::new(1.4, 1.4)));
            set("eye_right", delta(Vec2::ZERO, 0.0, Vec2::new(1.4, 1.4)));
            set("mouth", delta(Vec2::ZERO, 0.0, Vec2::new(0.8, 1.6)));
        }
        "angry" => {
            set("eye_left", delta(Vec2::ZERO, -12.0, Vec2::new(1.1, 0.6)));
            set("eye_right", delta(Vec2::ZERO, 12.0, Vec2::new(1.1, 0.6)));
            set("mouth", delta(Vec2::ZERO, 0.0, Vec2::new(1.1, 0.5)));
        }
        _ => {}
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/animation/actions.rs"]
mod tests;
