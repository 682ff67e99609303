use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn time_ms_converts_to_seconds() {
    assert!(approx(TimeMs(1500.0).as_secs(), 1.5));
    assert!(approx(TimeMs::from_secs(2.5).0, 2500.0));
}

#[test]
fn fps_rejects_zero_terms() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(25, 1).unwrap();
    assert!(approx(fps.as_f64(), 25.0));
    assert!(approx(fps.frame_duration_ms(), 40.0));
}

#[test]
fn default_transform_is_identity() {
    let tr = PartTransform::default();
    assert!(tr.validate().is_ok());
    let p = tr.to_affine(Vec2::new(10.0, 10.0)) * Point::new(3.0, 4.0);
    assert!(approx(p.x, 3.0));
    assert!(approx(p.y, 4.0));
}

#[test]
fn translation_moves_points() {
    let tr = PartTransform {
        position: Vec2::new(5.0, 7.0),
        ..PartTransform::default()
    };
    let p = tr.to_affine(Vec2::new(10.0, 10.0)) * Point::new(0.0, 0.0);
    assert!(approx(p.x, 5.0));
    assert!(approx(p.y, 7.0));
}

#[test]
fn rotation_pins_the_pivot() {
    // Pivot at the box center (5, 5); rotating must leave it fixed.
    let tr = PartTransform {
        rotation_deg: 90.0,
        ..PartTransform::default()
    };
    let p = tr.to_affine(Vec2::new(10.0, 10.0)) * Point::new(5.0, 5.0);
    assert!(approx(p.x, 5.0));
    assert!(approx(p.y, 5.0));
}

#[test]
fn scale_expands_around_the_pivot() {
    let tr = PartTransform {
        scale: Vec2::new(2.0, 2.0),
        ..PartTransform::default()
    };
    // Point one unit right of the pivot lands two units right.
    let p = tr.to_affine(Vec2::new(10.0, 10.0)) * Point::new(6.0, 5.0);
    assert!(approx(p.x, 7.0));
    assert!(approx(p.y, 5.0));
}

#[test]
fn validate_rejects_bad_values() {
    let nan = PartTransform {
        position: Vec2::new(f64::NAN, 0.0),
        ..PartTransform::default()
    };
    assert!(nan.validate().is_err());

    let pivot_out = PartTransform {
        pivot: Vec2::new(1.5, 0.5),
        ..PartTransform::default()
    };
    assert!(pivot_out.validate().is_err());
}

#[test]
fn compose_adds_and_multiplies() {
    let base = PartTransform {
        position: Vec2::new(1.0, 2.0),
        rotation_deg: 10.0,
        scale: Vec2::new(2.0, 1.0),
        pivot: Vec2::new(0.5, 0.1),
    };
    let delta = PartTransform {
        position: Vec2::new(3.0, -1.0),
        rotation_deg: 5.0,
        scale: Vec2::new(1.5, 3.0),
        pivot: Vec2::new(0.0, 0.0),
    };
    let out = base.compose(delta);
    assert!(approx(out.position.x, 4.0));
    assert!(approx(out.position.y, 1.0));
    assert!(approx(out.rotation_deg, 15.0));
    assert!(approx(out.scale.x, 3.0));
    assert!(approx(out.scale.y, 3.0));
    // The base part's pivot wins; overrides carry deltas only.
    assert!(approx(out.pivot.y, 0.1));
}
