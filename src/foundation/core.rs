use crate::foundation::error::{StoryError, StoryResult};

pub use kurbo::{Affine, CubicBez, Point, Vec2};

/// Scene-relative time in milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
)]
pub struct TimeMs(pub f64);

impl TimeMs {
    /// Time in whole seconds.
    pub fn as_secs(self) -> f64 {
        self.0 / 1000.0
    }

    /// Build from seconds.
    pub fn from_secs(secs: f64) -> Self {
        Self(secs * 1000.0)
    }
}

/// Frame rate as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator; must be > 0.
    pub num: u32,
    /// Denominator; must be > 0.
    pub den: u32,
}

impl Fps {
    /// Construct a validated frame rate.
    pub fn new(num: u32, den: u32) -> StoryResult<Self> {
        if den == 0 {
            return Err(StoryError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(StoryError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frame rate as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in milliseconds.
    pub fn frame_duration_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }
}

/// Local transform of a rig part or character instance.
///
/// `pivot` is normalized to the part's local bounding box (`[0,1]²`) and is
/// the origin for rotation and scale, so a limb rotates at its joint rather
/// than its visual center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PartTransform {
    /// Position relative to the parent part.
    pub position: Vec2,
    /// Rotation in degrees (positive is clockwise in screen space).
    pub rotation_deg: f64,
    /// Non-uniform scale; default `(1, 1)`.
    pub scale: Vec2,
    /// Normalized pivot in `[0,1]²`.
    pub pivot: Vec2,
}

impl Default for PartTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation_deg: 0.0,
            scale: Vec2::new(1.0, 1.0),
            pivot: Vec2::new(0.5, 0.5),
        }
    }
}

impl PartTransform {
    /// Validate finiteness and the pivot range invariant.
    pub fn validate(&self) -> StoryResult<()> {
        for (name, v) in [
            ("position.x", self.position.x),
            ("position.y", self.position.y),
            ("rotation_deg", self.rotation_deg),
            ("scale.x", self.scale.x),
            ("scale.y", self.scale.y),
        ] {
            if !v.is_finite() {
                return Err(StoryError::validation(format!(
                    "transform {name} must be finite"
                )));
            }
        }
        for (name, v) in [("pivot.x", self.pivot.x), ("pivot.y", self.pivot.y)] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(StoryError::validation(format!(
                    "transform {name} must be within [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// Resolve to an affine given the part's local bounding box size.
    ///
    /// Canonical order: T(position) * T(pivot_px) * R(rot) * S(scale) * T(-pivot_px)
    pub fn to_affine(self, box_size: Vec2) -> Affine {
        let pivot_px = Vec2::new(self.pivot.x * box_size.x, self.pivot.y * box_size.y);
        Affine::translate(self.position)
            * Affine::translate(pivot_px)
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
            * Affine::translate(-pivot_px)
    }

    /// Component-wise composition of two local transforms.
    ///
    /// Positions add, rotations add, scales multiply; the pivot of `self`
    /// wins (the override carries deltas, not a new pivot).
    pub fn compose(self, delta: PartTransform) -> PartTransform {
        PartTransform {
            position: self.position + delta.position,
            rotation_deg: self.rotation_deg + delta.rotation_deg,
            scale: Vec2::new(self.scale.x * delta.scale.x, self.scale.y * delta.scale.y),
            pivot: self.pivot,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
