use super::*;

#[test]
fn cycle_lengths_match_the_action_table() {
    assert_eq!(cycle_ms("run"), 500.0);
    assert_eq!(cycle_ms("walk"), 900.0);
    assert_eq!(cycle_ms("jump"), 1000.0);
    assert_eq!(cycle_ms("talk"), 300.0);
    assert_eq!(cycle_ms("idle"), 2000.0);
    assert_eq!(cycle_ms("ponder"), 2000.0);
}

#[test]
fn walk_swings_limbs_in_opposition() {
    // Quarter phase is the peak of the sine swing.
    let offsets = pose_offsets("walk", 0.25, MotionCurve::EaseInOut);
    let left = offsets["leg_left"].rotation_deg;
    let right = offsets["leg_right"].rotation_deg;
    assert!((left - 18.0).abs() < 1e-9);
    assert!((left + right).abs() < 1e-9);
    // Arms counter the legs.
    assert!(offsets["arm_left"].rotation_deg < 0.0);
    // Offsets cover both humanoid and animal root ids.
    assert!(offsets.contains_key("torso"));
    assert!(offsets.contains_key("body"));
}

#[test]
fn run_swings_harder_than_walk() {
    let walk = pose_offsets("walk", 0.25, MotionCurve::EaseInOut);
    let run = pose_offsets("run", 0.25, MotionCurve::spring());
    assert!(run["leg_left"].rotation_deg.abs() > walk["leg_left"].rotation_deg.abs());
}

#[test]
fn phase_wraps_around_the_cycle() {
    let a = pose_offsets("walk", 0.25, MotionCurve::EaseInOut);
    let b = pose_offsets("walk", 1.25, MotionCurve::EaseInOut);
    assert_eq!(a, b);
}

#[test]
fn jump_rises_mid_cycle() {
    let mid = pose_offsets("jump", 0.5, MotionCurve::anticipation());
    assert!(mid["torso"].position.y < 0.0);
    let start = pose_offsets("jump", 0.0, MotionCurve::anticipation());
    assert!(start["torso"].position.y.abs() < 1e-9);
}

#[test]
fn landing_squashes_the_body() {
    // Inside the impact window the body compresses horizontally wide.
    let offsets = pose_offsets("land", 0.3, MotionCurve::SquashStretch);
    let scale = offsets["torso"].scale;
    assert!(scale.x > 1.0);
    assert!(scale.y < 1.0);
    // Fully recovered at the end of the cycle.
    let recovered = pose_offsets("land", 0.999, MotionCurve::SquashStretch);
    assert!((recovered["torso"].scale.x - 1.0).abs() < 0.01);
}

#[test]
fn talking_opens_the_mouth() {
    let offsets = pose_offsets("talk", 0.25, MotionCurve::EaseOut);
    assert!(offsets["mouth"].scale.y > 1.0);
    assert!(offsets.contains_key("beak"));
}

#[test]
fn idle_breathes_gently() {
    let rest = pose_offsets("idle", 0.0, MotionCurve::EaseInOut);
    assert!((rest["torso"].scale.y - 1.0).abs() < 1e-9);
    let inhale = pose_offsets("idle", 0.25, MotionCurve::EaseInOut);
    assert!(inhale["torso"].scale.y > 1.0);
    assert!(inhale["torso"].scale.y < 1.05);
}

#[test]
fn expressions_only_touch_the_face() {
    let happy = expression_offsets("happy");
    assert!(happy.contains_key("mouth"));
    assert!(!happy.contains_key("torso"));

    let surprised = expression_offsets("surprised");
    assert!(surprised["eye_left"].scale.x > 1.0);

    assert!(expression_offsets("neutral").is_empty());
    assert!(expression_offsets("???").is_empty());
}
