use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn every_curve_starts_at_zero_and_ends_at_one() {
    let curves = [
        MotionCurve::Linear,
        MotionCurve::EaseIn,
        MotionCurve::EaseOut,
        MotionCurve::EaseInOut,
        MotionCurve::spring(),
        MotionCurve::Bounce,
        MotionCurve::Elastic,
        MotionCurve::anticipation(),
        MotionCurve::overshoot(),
        MotionCurve::SquashStretch,
    ];
    for curve in curves {
        assert!(approx(curve.apply(0.0), 0.0), "{curve:?} at 0");
        assert!(approx(curve.apply(1.0), 1.0), "{curve:?} at 1");
    }
}

#[test]
fn apply_clamps_out_of_range_time() {
    assert!(approx(MotionCurve::EaseIn.apply(-0.5), 0.0));
    assert!(approx(MotionCurve::EaseIn.apply(1.5), 1.0));
}

#[test]
fn cubic_inflection_sits_at_the_midpoint() {
    assert!(approx(ease_in_out_cubic(0.5), 0.5));
    assert!(ease_in_cubic(0.5) < 0.5);
    assert!(ease_out_cubic(0.5) > 0.5);
}

#[test]
fn underdamped_spring_overshoots_before_settling() {
    // Default tension/damping: zeta = 10 / (2 * 10) = 0.5, underdamped.
    let peak = (1..100)
        .map(|i| spring(i as f64 / 100.0, 100.0, 10.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
    assert!(approx(spring(1.0, 100.0, 10.0), 1.0));
}

#[test]
fn overdamped_spring_never_exceeds_one() {
    for i in 0..=100 {
        let v = spring(i as f64 / 100.0, 100.0, 40.0);
        assert!(v <= 1.0 + 1e-9);
    }
}

#[test]
fn bounce_out_segment_joints_line_up() {
    assert!(approx(bounce_out(1.0 / 2.75), 1.0));
    assert!(approx(bounce_out(1.0), 1.0));
    assert!(bounce_out(0.9) < 1.0);
}

#[test]
fn elastic_out_rings_past_one() {
    // 2^(-2) * sin(150 deg) + 1 = 1.125 at t = 0.2.
    assert!(approx(elastic_out(0.2), 1.125));
    assert!(approx(elastic_out(0.0), 0.0));
    assert!(approx(elastic_out(1.0), 1.0));
}

#[test]
fn anticipation_pulls_back_then_releases() {
    let amount = 0.15;
    assert!(anticipation(0.1, amount) < 0.0);
    assert!(approx(anticipation(0.1, amount), -0.075));
    // Continuous at the 20 % handoff.
    assert!(approx(anticipation(0.2, amount), -amount));
    assert!(approx(anticipation(1.0, amount), 1.0));
}

#[test]
fn overshoot_peaks_then_settles() {
    let amount = 0.2;
    assert!(approx(overshoot(0.7, amount), 1.0 + amount));
    assert!(overshoot(0.85, amount) > 1.0);
    assert!(approx(overshoot(1.0, amount), 1.0));
    assert!(approx(overshoot(0.0, amount), 0.0));
}

#[test]
fn impact_squash_peaks_at_thirty_percent() {
    assert!(approx(impact_squash(0.0, 0.25), 0.0));
    assert!(approx(impact_squash(0.3, 0.25), 0.25));
    assert!(approx(impact_squash(1.0, 0.25), 0.0));
    assert!(impact_squash(0.15, 0.25) < 0.25);
}

#[test]
fn serde_defaults_fill_missing_parameters() {
    let spring: MotionCurve = serde_json::from_str(r#"{"kind":"spring"}"#).unwrap();
    assert_eq!(
        spring,
        MotionCurve::Spring {
            tension: 100.0,
            damping: 10.0
        }
    );
    let inout: MotionCurve = serde_json::from_str(r#"{"kind":"ease-in-out"}"#).unwrap();
    assert_eq!(inout, MotionCurve::EaseInOut);
    assert_eq!(
        serde_json::to_string(&MotionCurve::SquashStretch).unwrap(),
        r#"{"kind":"squash-stretch"}"#
    );
}
