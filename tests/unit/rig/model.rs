use super::*;
use crate::foundation::core::Point;

fn palette() -> RigPalette {
    RigPalette {
        primary: "#111111".into(),
        secondary: "#222222".into(),
        skin: "#333333".into(),
        hair: "#444444".into(),
        eyes: "#555555".into(),
    }
}

fn part(id: &str, z_index: i32, parent: Option<&str>, children: &[&str]) -> SpritePart {
    SpritePart {
        id: id.to_string(),
        name: id.to_string(),
        z_index,
        transform: PartTransform::default(),
        parent: parent.map(str::to_string),
        children: children.iter().map(|c| (*c).to_string()).collect(),
        shape: Shape::Ellipse {
            radius: Vec2::new(5.0, 5.0),
            style: ShapeStyle::default(),
        },
    }
}

fn rig(parts: Vec<SpritePart>, root: &str) -> CharacterRig {
    CharacterRig {
        id: "test".into(),
        name: "Test".into(),
        category: RigCategory::Child,
        width: 100.0,
        height: 100.0,
        palette: palette(),
        parts: parts.into_iter().map(|p| (p.id.clone(), p)).collect(),
        root_part_id: root.to_string(),
    }
}

#[test]
fn two_part_rig_validates() {
    let r = rig(
        vec![
            part("torso", 1, None, &["head"]),
            part("head", 2, Some("torso"), &[]),
        ],
        "torso",
    );
    assert!(r.validate().is_ok());
}

#[test]
fn missing_root_is_rejected() {
    let r = rig(vec![part("torso", 1, None, &[])], "ghost");
    let err = r.validate().unwrap_err().to_string();
    assert!(err.contains("does not exist"));
}

#[test]
fn second_parentless_part_is_rejected() {
    let r = rig(
        vec![part("torso", 1, None, &[]), part("floater", 2, None, &[])],
        "torso",
    );
    let err = r.validate().unwrap_err().to_string();
    assert!(err.contains("parentless"));
}

#[test]
fn dangling_parent_is_rejected() {
    let r = rig(
        vec![
            part("torso", 1, None, &["head"]),
            part("head", 2, Some("ghost"), &[]),
        ],
        "torso",
    );
    let err = r.validate().unwrap_err().to_string();
    assert!(err.contains("missing parent"));
}

#[test]
fn asymmetric_child_link_is_rejected() {
    // Parent does not list the child.
    let r = rig(
        vec![
            part("torso", 1, None, &[]),
            part("head", 2, Some("torso"), &[]),
        ],
        "torso",
    );
    let err = r.validate().unwrap_err().to_string();
    assert!(err.contains("does not list child"));
}

#[test]
fn duplicate_child_edge_is_a_cycle() {
    let r = rig(
        vec![
            part("torso", 1, None, &["head", "head"]),
            part("head", 2, Some("torso"), &[]),
        ],
        "torso",
    );
    let err = r.validate().unwrap_err().to_string();
    assert!(err.contains("cycle"));
}

#[test]
fn unreachable_part_is_rejected() {
    // Self-referential island: link-symmetric but disconnected.
    let r = rig(
        vec![
            part("torso", 1, None, &[]),
            part("island", 2, Some("island"), &["island"]),
        ],
        "torso",
    );
    let err = r.validate().unwrap_err().to_string();
    assert!(err.contains("not reachable"));
}

#[test]
fn rest_pose_sorts_by_paint_order() {
    let r = rig(
        vec![
            part("torso", 3, None, &["head", "arm"]),
            part("head", 5, Some("torso"), &[]),
            part("arm", 1, Some("torso"), &[]),
        ],
        "torso",
    );
    let parts = r.rest_pose().unwrap();
    let order: Vec<&str> = parts.iter().map(|p| p.part_id.as_str()).collect();
    assert_eq!(order, vec!["arm", "torso", "head"]);
}

#[test]
fn overrides_compose_onto_defaults() {
    let mut with_offset = rig(
        vec![
            part("torso", 1, None, &["head"]),
            part("head", 2, Some("torso"), &[]),
        ],
        "torso",
    );
    if let Some(head) = with_offset.parts.get_mut("head") {
        head.transform.position = Vec2::new(0.0, -10.0);
    }

    let rest = with_offset.rest_pose().unwrap();
    let mut overrides = BTreeMap::new();
    overrides.insert(
        "head".to_string(),
        PartTransform {
            position: Vec2::new(0.0, -5.0),
            ..PartTransform::default()
        },
    );
    let posed = with_offset.resolve_pose(&overrides).unwrap();

    let origin = Point::new(5.0, 5.0); // pivot of the 10x10 ellipse box
    let rest_head = rest.iter().find(|p| p.part_id == "head").unwrap();
    let posed_head = posed.iter().find(|p| p.part_id == "head").unwrap();
    let rest_y = (rest_head.world * origin).y;
    let posed_y = (posed_head.world * origin).y;
    assert!((rest_y - posed_y - 5.0).abs() < 1e-9);
}

#[test]
fn child_inherits_parent_motion() {
    let r = rig(
        vec![
            part("torso", 1, None, &["head"]),
            part("head", 2, Some("torso"), &[]),
        ],
        "torso",
    );
    let mut overrides = BTreeMap::new();
    overrides.insert(
        "torso".to_string(),
        PartTransform {
            position: Vec2::new(7.0, 0.0),
            ..PartTransform::default()
        },
    );
    let rest = r.rest_pose().unwrap();
    let posed = r.resolve_pose(&overrides).unwrap();
    let p = Point::new(0.0, 0.0);
    for id in ["torso", "head"] {
        let a = rest.iter().find(|q| q.part_id == id).unwrap().world * p;
        let b = posed.iter().find(|q| q.part_id == id).unwrap().world * p;
        assert!((b.x - a.x - 7.0).abs() < 1e-9, "part {id} did not move");
    }
}
