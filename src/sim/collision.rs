//! Axis-aligned collision geometry
//!
//! All the arcade games use screen coordinates: x grows right, y grows down,
//! and a body's position is its top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from a top-left corner and a size
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Smallest box covering both `from` and `to`: the area a body sweeps
    /// when it moves between them in one step
    pub fn swept(from: &Aabb, to: &Aabb) -> Self {
        Self {
            min: from.min.min(to.min),
            max: from.max.max(to.max),
        }
    }

    /// Strict overlap: boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.min.y < other.max.y && other.min.y < self.max.y
    }

    /// Inclusive overlap: sharing an edge counts as contact
    pub fn touches(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Strict overlap of the horizontal spans only
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && other.min.x < self.max.x
    }
}

/// Reflect one velocity component so it points away from a wall.
/// `away` is the sign the component must carry after the bounce.
#[inline]
pub fn reflect_away(component: f32, away: f32) -> f32 {
    component.abs() * away.signum()
}
