use super::*;

fn character(rig: &str) -> SceneCharacter {
    SceneCharacter {
        rig: rig.to_string(),
        position: Vec2::new(100.0, 200.0),
        scale: 1.0,
        flip: false,
        action: None,
        expression: None,
        talking: false,
    }
}

fn scene(narration: &str) -> Scene {
    Scene {
        narration: narration.to_string(),
        background: "meadow".to_string(),
        mood: Mood::Neutral,
        characters: vec![character("mia")],
        camera: Vec::new(),
        duration_ms: None,
        dialogue: None,
    }
}

fn camera_key(time_ms: f64, zoom: f64, pan: Vec2) -> CameraKeyframe {
    CameraKeyframe {
        time: TimeMs(time_ms),
        zoom,
        pan,
        curve: Some(MotionCurve::Linear),
    }
}

#[test]
fn validation_catches_bad_fields() {
    assert!(scene("ok").validate().is_ok());

    let mut s = scene("ok");
    s.duration_ms = Some(0.0);
    assert!(s.validate().is_err());

    let mut s = scene("ok");
    s.camera = vec![camera_key(1000.0, 1.0, Vec2::ZERO), camera_key(0.0, 1.0, Vec2::ZERO)];
    assert!(s.validate().is_err());

    let mut s = scene("ok");
    s.camera = vec![camera_key(0.0, 0.0, Vec2::ZERO)];
    assert!(s.validate().is_err());

    let mut s = scene("ok");
    s.characters[0].rig = "  ".to_string();
    assert!(s.validate().is_err());

    let mut s = scene("ok");
    s.characters[0].scale = -1.0;
    assert!(s.validate().is_err());
}

#[test]
fn explicit_duration_overrides_the_narration() {
    let mut s = scene("one two three four five six seven eight nine ten");
    assert!((s.effective_duration().0 - 6615.384615384615).abs() < 0.01);
    s.duration_ms = Some(1234.0);
    assert_eq!(s.effective_duration().0, 1234.0);
}

#[test]
fn auto_enhance_directs_the_lead() {
    let mut s = scene("\"Let's go!\" said Mia happily.");
    s.characters.push(character("sam"));
    s.auto_enhance();

    let lead = &s.characters[0];
    assert_eq!(lead.action.as_deref(), Some("talk"));
    assert_eq!(lead.expression.as_deref(), Some("happy"));
    assert!(lead.talking);

    // Supporting characters idle while the lead talks and share the joy.
    let other = &s.characters[1];
    assert_eq!(other.action.as_deref(), Some("idle"));
    assert!(!other.talking);
    assert_eq!(other.expression.as_deref(), Some("happy"));
}

#[test]
fn auto_enhance_leaves_quiet_scenes_alone() {
    let mut s = scene("Mia jumped over the log.");
    s.characters.push(character("sam"));
    s.auto_enhance();
    assert_eq!(s.characters[0].action.as_deref(), Some("jump"));
    // No talking, neutral suggestion: supporting cast untouched.
    let other = &s.characters[1];
    assert!(other.action.is_none());
    assert!(other.expression.is_none());
}

#[test]
fn auto_enhance_tolerates_an_empty_cast() {
    let mut s = scene("hello");
    s.characters.clear();
    s.auto_enhance();
    assert!(s.characters.is_empty());
}

#[test]
fn static_camera_when_no_keyframes() {
    let s = scene("ok");
    let cam = s.camera_at(TimeMs(500.0));
    assert_eq!(cam.zoom, 1.0);
    assert_eq!(cam.pan, Vec2::ZERO);
}

#[test]
fn camera_interpolates_between_keyframes() {
    let mut s = scene("ok");
    s.camera = vec![
        camera_key(0.0, 1.0, Vec2::ZERO),
        camera_key(1000.0, 2.0, Vec2::new(100.0, 0.0)),
    ];
    let mid = s.camera_at(TimeMs(500.0));
    assert!((mid.zoom - 1.5).abs() < 1e-9);
    assert!((mid.pan.x - 50.0).abs() < 1e-9);

    // Clamped on both sides.
    assert_eq!(s.camera_at(TimeMs(-10.0)).zoom, 1.0);
    assert_eq!(s.camera_at(TimeMs(5000.0)).zoom, 2.0);
}

#[test]
fn camera_defaults_to_a_smooth_curve() {
    let mut s = scene("ok");
    s.camera = vec![
        CameraKeyframe {
            time: TimeMs(0.0),
            zoom: 1.0,
            pan: Vec2::ZERO,
            curve: None,
        },
        camera_key(1000.0, 2.0, Vec2::ZERO),
    ];
    // Ease-in-out starts slower than linear.
    let early = s.camera_at(TimeMs(250.0));
    assert!(early.zoom < 1.25);
}

#[test]
fn scenes_deserialize_with_defaults() {
    let s: Scene = serde_json::from_str(r#"{"narration":"Hi there","background":"meadow"}"#).unwrap();
    assert_eq!(s.mood, Mood::Neutral);
    assert!(s.characters.is_empty());
    assert!(s.camera.is_empty());
    assert!(s.duration_ms.is_none());

    let with_cast: Scene = serde_json::from_str(
        r#"{
            "narration": "Mia waved.",
            "background": "beach",
            "mood": "happy",
            "characters": [{"rig": "mia", "position": {"x": 10.0, "y": 20.0}}]
        }"#,
    )
    .unwrap();
    assert_eq!(with_cast.mood, Mood::Happy);
    assert_eq!(with_cast.characters[0].scale, 1.0);
    assert!(!with_cast.characters[0].flip);
}
