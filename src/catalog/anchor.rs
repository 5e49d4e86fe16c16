//! Connector anchors
//!
//! An anchor is a directional connector (a doorway) on a placeable type,
//! expressed in the type's local frame. The direction is what alignment is
//! tested against; the offset is where the connector sits, and where a
//! snapped neighbor lands.

use serde::{Serialize, Deserialize};
use crate::math::Vec3;

/// Distance from a room's center to each compass-door connector
pub const DOOR_STANDOFF: f32 = 15.0;

/// A directional connector point in a placeable type's local frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Anchor {
    /// Outward direction of the connector (unit length)
    pub direction: Vec3,
    /// Connector position relative to the type's origin
    #[serde(default)]
    pub offset: Vec3,
}

impl Anchor {
    /// Create an anchor, normalizing the direction
    pub fn new(direction: Vec3, offset: Vec3) -> Self {
        Self {
            direction: direction.normalize(),
            offset,
        }
    }

    /// Anchor whose connector sits on the direction axis at `standoff` units
    pub fn along(direction: Vec3, standoff: f32) -> Self {
        let direction = direction.normalize();
        Self {
            direction,
            offset: direction * standoff,
        }
    }

    /// Direction is finite, non-zero, and close to unit length
    pub fn is_valid(&self) -> bool {
        self.direction.is_finite()
            && self.offset.is_finite()
            && (self.direction.len() - 1.0).abs() < 1e-3
    }
}

/// Door flags for rectangular rooms with openings on the compass walls.
///
/// Kept for room definitions authored against the older fixed-direction
/// scheme. Flags are expanded into explicit anchors when the type loads,
/// so the rest of the engine only ever sees anchor lists.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CompassDoors {
    #[serde(default)]
    pub north: bool,
    #[serde(default)]
    pub east: bool,
    #[serde(default)]
    pub south: bool,
    #[serde(default)]
    pub west: bool,
}

impl CompassDoors {
    /// Expand the door flags into explicit anchors.
    ///
    /// North is +Z, east is +X. Each connector sits `DOOR_STANDOFF` units
    /// from the room center along its wall direction.
    pub fn anchors(&self) -> Vec<Anchor> {
        let mut anchors = Vec::new();
        if self.north {
            anchors.push(Anchor::along(Vec3::new(0.0, 0.0, 1.0), DOOR_STANDOFF));
        }
        if self.east {
            anchors.push(Anchor::along(Vec3::new(1.0, 0.0, 0.0), DOOR_STANDOFF));
        }
        if self.south {
            anchors.push(Anchor::along(Vec3::new(0.0, 0.0, -1.0), DOOR_STANDOFF));
        }
        if self.west {
            anchors.push(Anchor::along(Vec3::new(-1.0, 0.0, 0.0), DOOR_STANDOFF));
        }
        anchors
    }

    /// At least one door flag is set
    pub fn any(&self) -> bool {
        self.north || self.east || self.south || self.west
    }
}
