//! Built-in character rig factories and lookup.
//!
//! Factories are pure: given an id, a name, and a palette they return a
//! fully populated, already-validated [`CharacterRig`]. Pivots are chosen
//! so limbs rotate at their joints, and `z_index` encodes global paint
//! order (far limbs behind the torso, face on top).

use std::collections::BTreeMap;

use crate::foundation::core::{PartTransform, Vec2};
use crate::foundation::error::{StoryError, StoryResult};
use crate::rig::model::{CharacterRig, RigCategory, RigPalette, Shape, ShapeStyle, SpritePart};

/// Body style variants supported by [`human_rig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumanVariant {
    /// Shirt and trousers.
    Casual,
    /// Triangular dress silhouette.
    Dress,
}

/// Animal body plans supported by [`animal_rig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalKind {
    /// Pointy ears, long tail.
    Cat,
    /// Floppy ears, short tail.
    Dog,
    /// Beak and wings instead of arms.
    Bird,
    /// Tall ears, round tail.
    Rabbit,
}

fn fill(color: &str) -> ShapeStyle {
    ShapeStyle {
        fill: Some(color.to_string()),
        stroke: None,
        stroke_width: 0.0,
    }
}

struct RigBuilder {
    parts: BTreeMap<String, SpritePart>,
    root: Option<String>,
}

impl RigBuilder {
    fn new() -> Self {
        Self {
            parts: BTreeMap::new(),
            root: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn part(
        &mut self,
        id: &str,
        name: &str,
        z_index: i32,
        parent: Option<&str>,
        position: Vec2,
        pivot: Vec2,
        shape: Shape,
    ) -> &mut Self {
        if let Some(parent_id) = parent {
            // Factories declare parents before children.
            if let Some(p) = self.parts.get_mut(parent_id) {
                p.children.push(id.to_string());
            }
        } else {
            self.root = Some(id.to_string());
        }
        self.parts.insert(
            id.to_string(),
            SpritePart {
                id: id.to_string(),
                name: name.to_string(),
                z_index,
                transform: PartTransform {
                    position,
                    pivot,
                    ..PartTransform::default()
                },
                parent: parent.map(str::to_string),
                children: Vec::new(),
                shape,
            },
        );
        self
    }

    fn finish(
        self,
        id: &str,
        name: &str,
        category: RigCategory,
        width: f64,
        height: f64,
        palette: RigPalette,
    ) -> StoryResult<CharacterRig> {
        let root_part_id = self
            .root
            .ok_or_else(|| StoryError::validation("rig factory declared no root part"))?;
        let rig = CharacterRig {
            id: id.to_string(),
            name: name.to_string(),
            category,
            width,
            height,
            palette,
            parts: self.parts,
            root_part_id,
        };
        rig.validate()?;
        Ok(rig)
    }
}

/// Build a humanoid rig.
///
/// `category` controls proportions (children get bigger heads and shorter
/// limbs); `variant` selects the torso silhouette.
pub fn human_rig(
    id: &str,
    name: &str,
    category: RigCategory,
    palette: &RigPalette,
    variant: HumanVariant,
) -> StoryResult<CharacterRig> {
    let child = matches!(category, RigCategory::Child);
    let head_r = if child { 26.0 } else { 22.0 };
    let torso = if child {
        Vec2::new(44.0, 52.0)
    } else {
        Vec2::new(48.0, 68.0)
    };
    let limb_len = if child { 34.0 } else { 46.0 };
    let limb_w = 10.0;
    let height = head_r * 2.0 + torso.y + limb_len + 8.0;
    let width = torso.x + limb_w * 2.0 + 16.0;

    let torso_shape = match variant {
        HumanVariant::Casual => Shape::Rect {
            size: torso,
            corner_radius: 10.0,
            style: fill(&palette.primary),
        },
        HumanVariant::Dress => Shape::Polygon {
            points: vec![
                Vec2::new(-torso.x * 0.35, -torso.y * 0.5),
                Vec2::new(torso.x * 0.35, -torso.y * 0.5),
                Vec2::new(torso.x * 0.6, torso.y * 0.5),
                Vec2::new(-torso.x * 0.6, torso.y * 0.5),
            ],
            style: fill(&palette.primary),
        },
    };

    let mut b = RigBuilder::new();
    // Torso is the root; everything hangs off it.
    b.part(
        "torso",
        "Torso",
        3,
        None,
        Vec2::new(0.0, 0.0),
        Vec2::new(0.5, 0.5),
        torso_shape,
    );
    // Far limbs paint behind the torso.
    b.part(
        "arm_left",
        "Left Arm",
        2,
        Some("torso"),
        Vec2::new(-torso.x * 0.5 - limb_w * 0.5, -torso.y * 0.4),
        Vec2::new(0.5, 0.08), // shoulder joint
        Shape::Rect {
            size: Vec2::new(limb_w, limb_len),
            corner_radius: limb_w * 0.5,
            style: fill(&palette.skin),
        },
    );
    b.part(
        "arm_right",
        "Right Arm",
        4,
        Some("torso"),
        Vec2::new(torso.x * 0.5 + limb_w * 0.5, -torso.y * 0.4),
        Vec2::new(0.5, 0.08),
        Shape::Rect {
            size: Vec2::new(limb_w, limb_len),
            corner_radius: limb_w * 0.5,
            style: fill(&palette.skin),
        },
    );
    b.part(
        "leg_left",
        "Left Leg",
        1,
        Some("torso"),
        Vec2::new(-torso.x * 0.22, torso.y * 0.5),
        Vec2::new(0.5, 0.05), // hip joint
        Shape::Rect {
            size: Vec2::new(limb_w + 2.0, limb_len),
            corner_radius: limb_w * 0.5,
            style: fill(&palette.secondary),
        },
    );
    b.part(
        "leg_right",
        "Right Leg",
        2,
        Some("torso"),
        Vec2::new(torso.x * 0.22, torso.y * 0.5),
        Vec2::new(0.5, 0.05),
        Shape::Rect {
            size: Vec2::new(limb_w + 2.0, limb_len),
            corner_radius: limb_w * 0.5,
            style: fill(&palette.secondary),
        },
    );
    b.part(
        "head",
        "Head",
        5,
        Some("torso"),
        Vec2::new(0.0, -torso.y * 0.5 - head_r),
        Vec2::new(0.5, 0.92), // neck joint
        Shape::Ellipse {
            radius: Vec2::new(head_r, head_r),
            style: fill(&palette.skin),
        },
    );
    b.part(
        "hair",
        "Hair",
        6,
        Some("head"),
        Vec2::new(0.0, -head_r * 0.55),
        Vec2::new(0.5, 0.5),
        Shape::Ellipse {
            radius: Vec2::new(head_r * 0.95, head_r * 0.6),
            style: fill(&palette.hair),
        },
    );
    b.part(
        "eye_left",
        "Left Eye",
        7,
        Some("head"),
        Vec2::new(-head_r * 0.38, -head_r * 0.1),
        Vec2::new(0.5, 0.5),
        Shape::Ellipse {
            radius: Vec2::new(3.5, 4.5),
            style: fill(&palette.eyes),
        },
    );
    b.part(
        "eye_right",
        "Right Eye",
        7,
        Some("head"),
        Vec2::new(head_r * 0.38, -head_r * 0.1),
        Vec2::new(0.5, 0.5),
        Shape::Ellipse {
            radius: Vec2::new(3.5, 4.5),
            style: fill(&palette.eyes),
        },
    );
    b.part(
        "mouth",
        "Mouth",
        7,
        Some("head"),
        Vec2::new(0.0, head_r * 0.45),
        Vec2::new(0.5, 0.0), // hinge at the top lip for talk cycles
        Shape::Ellipse {
            radius: Vec2::new(6.0, 3.0),
            style: fill("#7a3b2e"),
        },
    );

    b.finish(id, name, category, width, height, palette.clone())
}

/// Build a quadruped/bird rig.
pub fn animal_rig(
    id: &str,
    name: &str,
    kind: AnimalKind,
    palette: &RigPalette,
) -> StoryResult<CharacterRig> {
    let body = Vec2::new(64.0, 36.0);
    let head_r = 18.0;
    let leg = Vec2::new(8.0, 22.0);

    let mut b = RigBuilder::new();
    b.part(
        "body",
        "Body",
        3,
        None,
        Vec2::new(0.0, 0.0),
        Vec2::new(0.5, 0.5),
        Shape::Ellipse {
            radius: Vec2::new(body.x * 0.5, body.y * 0.5),
            style: fill(&palette.primary),
        },
    );
    for (part_id, name, x, z) in [
        ("leg_back", "Back Leg", -body.x * 0.3, 1),
        ("leg_front", "Front Leg", body.x * 0.3, 2),
    ] {
        b.part(
            part_id,
            name,
            z,
            Some("body"),
            Vec2::new(x, body.y * 0.4),
            Vec2::new(0.5, 0.05),
            Shape::Rect {
                size: leg,
                corner_radius: leg.x * 0.5,
                style: fill(&palette.primary),
            },
        );
    }
    b.part(
        "head",
        "Head",
        5,
        Some("body"),
        Vec2::new(body.x * 0.5 + head_r * 0.4, -body.y * 0.45),
        Vec2::new(0.2, 0.85), // neck joint at the lower-left of the head
        Shape::Ellipse {
            radius: Vec2::new(head_r, head_r),
            style: fill(&palette.primary),
        },
    );
    b.part(
        "eye",
        "Eye",
        7,
        Some("head"),
        Vec2::new(head_r * 0.35, -head_r * 0.15),
        Vec2::new(0.5, 0.5),
        Shape::Ellipse {
            radius: Vec2::new(3.0, 3.5),
            style: fill(&palette.eyes),
        },
    );

    match kind {
        AnimalKind::Cat | AnimalKind::Rabbit => {
            let ear_h = if matches!(kind, AnimalKind::Rabbit) {
                head_r * 1.4
            } else {
                head_r * 0.7
            };
            for (part_id, name, x) in [
                ("ear_left", "Left Ear", -head_r * 0.5),
                ("ear_right", "Right Ear", head_r * 0.5),
            ] {
                b.part(
                    part_id,
                    name,
                    4,
                    Some("head"),
                    Vec2::new(x, -head_r * 0.9),
                    Vec2::new(0.5, 1.0), // hinge at the base
                    Shape::Polygon {
                        points: vec![
                            Vec2::new(-5.0, 0.0),
                            Vec2::new(5.0, 0.0),
                            Vec2::new(0.0, -ear_h),
                        ],
                        style: fill(&palette.primary),
                    },
                );
            }
            b.part(
                "tail",
                "Tail",
                2,
                Some("body"),
                Vec2::new(-body.x * 0.55, -body.y * 0.1),
                Vec2::new(1.0, 0.5), // hinge where it meets the body
                Shape::Rect {
                    size: Vec2::new(
                        if matches!(kind, AnimalKind::Cat) {
                            26.0
                        } else {
                            10.0
                        },
                        7.0,
                    ),
                    corner_radius: 3.5,
                    style: fill(&palette.secondary),
                },
            );
        }
        AnimalKind::Dog => {
            for (part_id, name, x) in [
                ("ear_left", "Left Ear", -head_r * 0.55),
                ("ear_right", "Right Ear", head_r * 0.55),
            ] {
                b.part(
                    part_id,
                    name,
                    4,
                    Some("head"),
                    Vec2::new(x, -head_r * 0.6),
                    Vec2::new(0.5, 0.0),
                    Shape::Ellipse {
                        radius: Vec2::new(5.0, 10.0),
                        style: fill(&palette.secondary),
                    },
                );
            }
            b.part(
                "tail",
                "Tail",
                2,
                Some("body"),
                Vec2::new(-body.x * 0.52, -body.y * 0.2),
                Vec2::new(1.0, 0.5),
                Shape::Rect {
                    size: Vec2::new(16.0, 6.0),
                    corner_radius: 3.0,
                    style: fill(&palette.secondary),
                },
            );
        }
        AnimalKind::Bird => {
            b.part(
                "beak",
                "Beak",
                6,
                Some("head"),
                Vec2::new(head_r * 0.95, head_r * 0.05),
                Vec2::new(0.0, 0.5),
                Shape::Polygon {
                    points: vec![
                        Vec2::new(0.0, -4.0),
                        Vec2::new(10.0, 0.0),
                        Vec2::new(0.0, 4.0),
                    ],
                    style: fill(&palette.secondary),
                },
            );
            b.part(
                "wing",
                "Wing",
                4,
                Some("body"),
                Vec2::new(-body.x * 0.05, -body.y * 0.1),
                Vec2::new(0.8, 0.15), // shoulder
                Shape::Ellipse {
                    radius: Vec2::new(body.x * 0.3, body.y * 0.25),
                    style: fill(&palette.secondary),
                },
            );
        }
    }

    b.finish(
        id,
        name,
        RigCategory::Animal,
        body.x + head_r * 2.0,
        body.y + leg.y + head_r,
        palette.clone(),
    )
}

/// Read-only collection of rigs, keyed by id with name as a secondary key.
#[derive(Clone, Debug, Default)]
pub struct RigLibrary {
    rigs: Vec<CharacterRig>,
}

impl RigLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Library populated with the built-in cast.
    pub fn builtin() -> StoryResult<Self> {
        let mut lib = Self::new();
        lib.insert(human_rig(
            "mia",
            "Mia",
            RigCategory::Child,
            &RigPalette {
                primary: "#e8604c".into(),
                secondary: "#3b6ea5".into(),
                skin: "#f2c9a0".into(),
                hair: "#5a3a22".into(),
                eyes: "#2e2a27".into(),
            },
            HumanVariant::Dress,
        )?)?;
        lib.insert(human_rig(
            "sam",
            "Sam",
            RigCategory::Child,
            &RigPalette {
                primary: "#4c9a63".into(),
                secondary: "#7a5230".into(),
                skin: "#c98a5b".into(),
                hair: "#1f1b18".into(),
                eyes: "#2e2a27".into(),
            },
            HumanVariant::Casual,
        )?)?;
        lib.insert(human_rig(
            "captain-zara",
            "Captain Zara",
            RigCategory::Adult,
            &RigPalette {
                primary: "#3f4a8a".into(),
                secondary: "#c9a227".into(),
                skin: "#a66a3f".into(),
                hair: "#3b2d24".into(),
                eyes: "#20303f".into(),
            },
            HumanVariant::Casual,
        )?)?;
        lib.insert(animal_rig(
            "whiskers",
            "Whiskers",
            AnimalKind::Cat,
            &RigPalette {
                primary: "#b8845a".into(),
                secondary: "#8a6240".into(),
                skin: "#b8845a".into(),
                hair: "#8a6240".into(),
                eyes: "#3d5a32".into(),
            },
        )?)?;
        lib.insert(animal_rig(
            "pip",
            "Pip",
            AnimalKind::Bird,
            &RigPalette {
                primary: "#e8c23f".into(),
                secondary: "#d97b29".into(),
                skin: "#e8c23f".into(),
                hair: "#d97b29".into(),
                eyes: "#2e2a27".into(),
            },
        )?)?;
        Ok(lib)
    }

    /// Add a rig; fails on duplicate id (case-insensitive).
    pub fn insert(&mut self, rig: CharacterRig) -> StoryResult<()> {
        if self
            .rigs
            .iter()
            .any(|r| r.id.eq_ignore_ascii_case(&rig.id))
        {
            return Err(StoryError::validation(format!(
                "duplicate rig id '{}'",
                rig.id
            )));
        }
        self.rigs.push(rig);
        Ok(())
    }

    /// Case-insensitive lookup: by id first, then by display name.
    pub fn get(&self, id_or_name: &str) -> Option<&CharacterRig> {
        self.rigs
            .iter()
            .find(|r| r.id.eq_ignore_ascii_case(id_or_name))
            .or_else(|| {
                self.rigs
                    .iter()
                    .find(|r| r.name.eq_ignore_ascii_case(id_or_name))
            })
    }

    /// Lookup that degrades to the first child-category rig.
    ///
    /// A broken rig reference should render *some* character rather than an
    /// empty scene; `None` only when the library has no fallback either.
    pub fn get_or_fallback(&self, id_or_name: &str) -> Option<&CharacterRig> {
        self.get(id_or_name).or_else(|| {
            self.rigs
                .iter()
                .find(|r| matches!(r.category, RigCategory::Child))
        })
    }

    /// All rigs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CharacterRig> {
        self.rigs.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rig/library.rs"]
mod tests;
