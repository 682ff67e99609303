use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::{PartTransform, Vec2};
use crate::foundation::error::{StoryError, StoryResult};

/// Coarse character classification used for library grouping and fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RigCategory {
    /// Child-proportioned humanoid.
    Child,
    /// Adult-proportioned humanoid.
    Adult,
    /// Quadruped or bird.
    Animal,
    /// Fantasy creature.
    Fantasy,
}

/// Named palette applied by the rig factories.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RigPalette {
    /// Primary clothing/body color.
    pub primary: String,
    /// Secondary clothing/accent color.
    pub secondary: String,
    /// Skin color.
    pub skin: String,
    /// Hair color.
    pub hair: String,
    /// Eye color.
    pub eyes: String,
}

/// Fill and stroke styling for a shape.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShapeStyle {
    /// Fill color (CSS-style string), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Stroke color, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Stroke width in pixels.
    #[serde(default)]
    pub stroke_width: f64,
}

/// Drawable primitive carried by a rig part.
///
/// `Group` nests shapes only; parts nest exclusively through the skeleton.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned ellipse.
    Ellipse {
        /// Radii in local pixels.
        radius: Vec2,
        /// Styling.
        style: ShapeStyle,
    },
    /// Axis-aligned rectangle, optionally rounded.
    Rect {
        /// Size in local pixels.
        size: Vec2,
        /// Corner radius.
        #[serde(default)]
        corner_radius: f64,
        /// Styling.
        style: ShapeStyle,
    },
    /// SVG path data.
    Path {
        /// SVG path `d` attribute string.
        d: String,
        /// Styling.
        style: ShapeStyle,
    },
    /// Closed polygon.
    Polygon {
        /// Vertices in local pixels.
        points: Vec<Vec2>,
        /// Styling.
        style: ShapeStyle,
    },
    /// Nested group of shapes (never parts).
    Group {
        /// Child shapes painted in order.
        shapes: Vec<Shape>,
    },
}

impl Shape {
    fn validate(&self) -> StoryResult<()> {
        match self {
            Self::Ellipse { radius, .. } => {
                if radius.x <= 0.0 || radius.y <= 0.0 {
                    return Err(StoryError::validation("ellipse radius must be > 0"));
                }
            }
            Self::Rect { size, .. } => {
                if size.x <= 0.0 || size.y <= 0.0 {
                    return Err(StoryError::validation("rect size must be > 0"));
                }
            }
            Self::Path { d, .. } => {
                if d.trim().is_empty() {
                    return Err(StoryError::validation("path d must be non-empty"));
                }
            }
            Self::Polygon { points, .. } => {
                if points.len() < 3 {
                    return Err(StoryError::validation("polygon needs at least 3 points"));
                }
            }
            Self::Group { shapes } => {
                for s in shapes {
                    s.validate()?;
                }
            }
        }
        Ok(())
    }

    /// Local bounding-box size used to resolve the pivot in pixels.
    pub fn bounds(&self) -> Vec2 {
        match self {
            Self::Ellipse { radius, .. } => Vec2::new(radius.x * 2.0, radius.y * 2.0),
            Self::Rect { size, .. } => *size,
            Self::Path { .. } => Vec2::ZERO,
            Self::Polygon { points, .. } => {
                let (mut max_x, mut max_y) = (0.0f64, 0.0f64);
                for p in points {
                    max_x = max_x.max(p.x.abs());
                    max_y = max_y.max(p.y.abs());
                }
                Vec2::new(max_x * 2.0, max_y * 2.0)
            }
            Self::Group { shapes } => {
                let mut out = Vec2::ZERO;
                for s in shapes {
                    let b = s.bounds();
                    out.x = out.x.max(b.x);
                    out.y = out.y.max(b.y);
                }
                out
            }
        }
    }
}

/// One node in a rig skeleton.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SpritePart {
    /// Stable part identifier, unique within the rig.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Global paint order across the whole rig; higher paints on top.
    pub z_index: i32,
    /// Default (rest-pose) transform relative to the parent.
    pub transform: PartTransform,
    /// Parent part id; `None` exactly for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Child part ids in declaration order.
    #[serde(default)]
    pub children: Vec<String>,
    /// Drawable primitive.
    pub shape: Shape,
}

/// Immutable, shared skeletal rig for one character.
///
/// Scenes reference rigs by id and layer per-instance overrides on top;
/// the rig itself is never mutated at playback time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CharacterRig {
    /// Stable rig identifier.
    pub id: String,
    /// Display name (lookup is case-insensitive over id and name).
    pub name: String,
    /// Library category.
    pub category: RigCategory,
    /// Design-space width in pixels.
    pub width: f64,
    /// Design-space height in pixels.
    pub height: f64,
    /// Palette the factories painted this rig with.
    pub palette: RigPalette,
    /// Part arena keyed by part id.
    pub parts: BTreeMap<String, SpritePart>,
    /// Id of the unique root part.
    pub root_part_id: String,
}

impl CharacterRig {
    /// Validate skeleton invariants.
    ///
    /// Checks, in order: the root exists and has no parent, no other part
    /// is parentless, every `parent`/`children` reference resolves and is
    /// symmetric, each transform is well-formed, and a visited-set walk
    /// from the root reaches every part exactly once (no cycles, no
    /// orphans). Any inconsistency is fatal at load time.
    pub fn validate(&self) -> StoryResult<()> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(StoryError::validation("rig width/height must be > 0"));
        }
        let root = self.parts.get(&self.root_part_id).ok_or_else(|| {
            StoryError::validation(format!(
                "rig '{}' root part '{}' does not exist",
                self.id, self.root_part_id
            ))
        })?;
        if root.parent.is_some() {
            return Err(StoryError::validation(format!(
                "rig '{}' root part '{}' must not have a parent",
                self.id, self.root_part_id
            )));
        }

        for (id, part) in &self.parts {
            if *id != part.id {
                return Err(StoryError::validation(format!(
                    "rig '{}' part key '{}' does not match part id '{}'",
                    self.id, id, part.id
                )));
            }
            if part.parent.is_none() && *id != self.root_part_id {
                return Err(StoryError::validation(format!(
                    "rig '{}' has a second parentless part '{}'",
                    self.id, id
                )));
            }
            if let Some(parent_id) = &part.parent {
                let parent = self.parts.get(parent_id).ok_or_else(|| {
                    StoryError::validation(format!(
                        "rig '{}' part '{}' references missing parent '{}'",
                        self.id, id, parent_id
                    ))
                })?;
                if !parent.children.contains(id) {
                    return Err(StoryError::validation(format!(
                        "rig '{}' parent '{}' does not list child '{}'",
                        self.id, parent_id, id
                    )));
                }
            }
            for child_id in &part.children {
                let child = self.parts.get(child_id).ok_or_else(|| {
                    StoryError::validation(format!(
                        "rig '{}' part '{}' references missing child '{}'",
                        self.id, id, child_id
                    ))
                })?;
                if child.parent.as_deref() != Some(id) {
                    return Err(StoryError::validation(format!(
                        "rig '{}' child '{}' does not point back to parent '{}'",
                        self.id, child_id, id
                    )));
                }
            }
            part.transform.validate()?;
            part.shape.validate()?;
        }

        let mut visited = BTreeSet::new();
        let mut stack = vec![self.root_part_id.as_str()];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                return Err(StoryError::validation(format!(
                    "rig '{}' skeleton contains a cycle through part '{}'",
                    self.id, id
                )));
            }
            // Every id on the stack was resolved in the reference pass.
            for child in &self.parts[id].children {
                stack.push(child.as_str());
            }
        }
        if visited.len() != self.parts.len() {
            let orphan = self
                .parts
                .keys()
                .find(|id| !visited.contains(id.as_str()))
                .map(String::as_str)
                .unwrap_or("?");
            return Err(StoryError::validation(format!(
                "rig '{}' part '{}' is not reachable from the root",
                self.id, orphan
            )));
        }
        Ok(())
    }

    /// Resolve world transforms for every part in the rest pose.
    ///
    /// Equivalent to [`CharacterRig::resolve_pose`] with no overrides.
    pub fn rest_pose(&self) -> StoryResult<Vec<ResolvedPart>> {
        self.resolve_pose(&BTreeMap::new())
    }

    /// Resolve world transforms with per-part local overrides applied.
    ///
    /// Overrides are composed onto the part's default transform (positions
    /// and rotations add, scales multiply). Output is sorted by ascending
    /// global `z_index`, which is the paint order the renderer must use.
    pub fn resolve_pose(
        &self,
        overrides: &BTreeMap<String, PartTransform>,
    ) -> StoryResult<Vec<ResolvedPart>> {
        let mut out = Vec::with_capacity(self.parts.len());
        let mut stack = vec![(self.root_part_id.as_str(), kurbo::Affine::IDENTITY)];
        while let Some((id, parent_affine)) = stack.pop() {
            let part = self
                .parts
                .get(id)
                .ok_or_else(|| StoryError::evaluation(format!("unknown part '{id}'")))?;
            let local = match overrides.get(id) {
                Some(delta) => part.transform.compose(*delta),
                None => part.transform,
            };
            let world = parent_affine * local.to_affine(part.shape.bounds());
            out.push(ResolvedPart {
                part_id: part.id.clone(),
                z_index: part.z_index,
                world,
            });
            for child in &part.children {
                stack.push((child.as_str(), world));
            }
        }
        out.sort_by(|a, b| (a.z_index, &a.part_id).cmp(&(b.z_index, &b.part_id)));
        Ok(out)
    }
}

/// A part with its world transform, ready for the renderer boundary.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ResolvedPart {
    /// Part identifier.
    pub part_id: String,
    /// Global paint order.
    pub z_index: i32,
    /// Fully composed world transform.
    pub world: kurbo::Affine,
}

#[cfg(test)]
#[path = "../../tests/unit/rig/model.rs"]
mod tests;
