use super::*;

fn palette() -> RigPalette {
    RigPalette {
        primary: "#111111".into(),
        secondary: "#222222".into(),
        skin: "#333333".into(),
        hair: "#444444".into(),
        eyes: "#555555".into(),
    }
}

#[test]
fn builtin_cast_is_complete() {
    let lib = RigLibrary::builtin().unwrap();
    assert_eq!(lib.iter().count(), 5);
    for id in ["mia", "sam", "captain-zara", "whiskers", "pip"] {
        assert!(lib.get(id).is_some(), "missing builtin rig {id}");
    }
}

#[test]
fn lookup_is_case_insensitive_over_id_and_name() {
    let lib = RigLibrary::builtin().unwrap();
    assert_eq!(lib.get("MIA").unwrap().id, "mia");
    assert_eq!(lib.get("Captain Zara").unwrap().id, "captain-zara");
    assert_eq!(lib.get("wHiSkErS").unwrap().id, "whiskers");
    assert!(lib.get("nobody").is_none());
}

#[test]
fn fallback_degrades_to_first_child_rig() {
    let lib = RigLibrary::builtin().unwrap();
    assert_eq!(lib.get_or_fallback("nobody").unwrap().id, "mia");
    // A resolvable reference is never redirected.
    assert_eq!(lib.get_or_fallback("pip").unwrap().id, "pip");
}

#[test]
fn duplicate_ids_are_rejected_case_insensitively() {
    let mut lib = RigLibrary::builtin().unwrap();
    let dup = human_rig(
        "MIA",
        "Other Mia",
        RigCategory::Child,
        &palette(),
        HumanVariant::Casual,
    )
    .unwrap();
    assert!(lib.insert(dup).is_err());
}

#[test]
fn human_rig_hangs_off_the_torso() {
    let rig = human_rig(
        "kid",
        "Kid",
        RigCategory::Child,
        &palette(),
        HumanVariant::Casual,
    )
    .unwrap();
    assert_eq!(rig.root_part_id, "torso");
    for id in [
        "torso",
        "arm_left",
        "arm_right",
        "leg_left",
        "leg_right",
        "head",
        "mouth",
    ] {
        assert!(rig.parts.contains_key(id), "missing part {id}");
    }
    // Limb pivots sit at the joints, not the visual centers.
    let head = &rig.parts["head"];
    assert!((head.transform.pivot.y - 0.92).abs() < 1e-9);
    let mouth = &rig.parts["mouth"];
    assert!((mouth.transform.pivot.y - 0.0).abs() < 1e-9);
}

#[test]
fn child_rigs_get_bigger_heads() {
    let child = human_rig(
        "kid",
        "Kid",
        RigCategory::Child,
        &palette(),
        HumanVariant::Casual,
    )
    .unwrap();
    let adult = human_rig(
        "grown",
        "Grown",
        RigCategory::Adult,
        &palette(),
        HumanVariant::Casual,
    )
    .unwrap();
    let head_radius = |rig: &CharacterRig| match &rig.parts["head"].shape {
        Shape::Ellipse { radius, .. } => radius.x,
        _ => panic!("head should be an ellipse"),
    };
    assert!(head_radius(&child) > head_radius(&adult));
    assert!(child.height < adult.height);
}

#[test]
fn animal_rigs_carry_their_kind_parts() {
    let cat = animal_rig("cat", "Cat", AnimalKind::Cat, &palette()).unwrap();
    assert!(cat.parts.contains_key("ear_left"));
    assert!(cat.parts.contains_key("tail"));

    let bird = animal_rig("bird", "Bird", AnimalKind::Bird, &palette()).unwrap();
    assert!(bird.parts.contains_key("beak"));
    assert!(bird.parts.contains_key("wing"));
    assert!(!bird.parts.contains_key("tail"));
}
