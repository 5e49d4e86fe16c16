//! Placeable type definitions
//!
//! A placeable type is a catalog entry: stable id, a mesh handle for the
//! presentation layer, and the connector anchors used for snapping. Types
//! are stored one per RON file.

use std::path::Path;
use serde::{Serialize, Deserialize};
use super::anchor::{Anchor, CompassDoors};

/// Maximum length for names and mesh handles in type files
pub const MAX_STRING_LEN: usize = 256;

/// Error type for catalog operations
#[derive(Debug)]
pub enum CatalogError {
    /// File I/O error
    Io(String),
    /// Serialization/deserialization error
    Serialization(String),
    /// Validation error
    Validation(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(msg) => write!(f, "I/O error: {}", msg),
            CatalogError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            CatalogError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e.to_string())
    }
}

impl From<ron::error::SpannedError> for CatalogError {
    fn from(e: ron::error::SpannedError) -> Self {
        CatalogError::Serialization(e.to_string())
    }
}

/// A catalog entry describing one placeable piece
///
/// The id is the persistence key: level files reference placed pieces by it,
/// so it must stay stable across saves and catalog refreshes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceableType {
    /// Stable unique identifier
    pub id: u32,

    /// Human-readable name (also used as the filename)
    pub name: String,

    /// Opaque mesh/visual handle, consumed by the presentation layer
    #[serde(default)]
    pub mesh: String,

    /// Connector anchors in the type's local frame
    #[serde(default)]
    pub anchors: Vec<Anchor>,

    /// Compass-door flags from the older room scheme.
    ///
    /// Expanded into `anchors` when the type loads; empty afterwards.
    #[serde(default)]
    pub doors: Option<CompassDoors>,
}

impl PlaceableType {
    /// Create a type with explicit anchors
    pub fn new(id: u32, name: impl Into<String>, anchors: Vec<Anchor>) -> Self {
        Self {
            id,
            name: name.into(),
            mesh: String::new(),
            anchors,
            doors: None,
        }
    }

    /// Create a room type from compass-door flags
    pub fn room(id: u32, name: impl Into<String>, doors: CompassDoors) -> Self {
        let mut ty = Self {
            id,
            name: name.into(),
            mesh: String::new(),
            anchors: Vec::new(),
            doors: Some(doors),
        };
        ty.resolve_doors();
        ty
    }

    /// Parse a type from RON text, expanding door flags and validating
    pub fn from_ron_str(s: &str) -> Result<Self, CatalogError> {
        let mut ty: PlaceableType = ron::from_str(s)?;
        ty.resolve_doors();
        ty.validate().map_err(CatalogError::Validation)?;
        Ok(ty)
    }

    /// Load a type from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Fold compass-door flags into the anchor list
    fn resolve_doors(&mut self) {
        if let Some(doors) = self.doors.take() {
            self.anchors.extend(doors.anchors());
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err(format!("type {}: empty name", self.id));
        }
        if self.name.len() > MAX_STRING_LEN {
            return Err(format!("type {}: name too long ({} > {})",
                self.id, self.name.len(), MAX_STRING_LEN));
        }
        if self.mesh.len() > MAX_STRING_LEN {
            return Err(format!("type {}: mesh handle too long ({} > {})",
                self.id, self.mesh.len(), MAX_STRING_LEN));
        }
        for (i, anchor) in self.anchors.iter().enumerate() {
            if !anchor.is_valid() {
                return Err(format!("type {}: invalid anchor[{}] direction ({}, {}, {})",
                    self.id, i, anchor.direction.x, anchor.direction.y, anchor.direction.z));
            }
        }
        Ok(())
    }

    /// Types without anchors place freely but never snap
    pub fn has_anchors(&self) -> bool {
        !self.anchors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn test_room_resolves_doors() {
        let doors = CompassDoors { north: true, ..Default::default() };
        let ty = PlaceableType::room(7, "cell", doors);
        assert_eq!(ty.anchors.len(), 1);
        assert!(ty.doors.is_none());
        assert!(ty.has_anchors());
    }

    #[test]
    fn test_from_ron_with_doors() {
        let src = r#"(
            id: 3,
            name: "crossroads",
            mesh: "rooms/crossroads",
            doors: Some((north: true, east: true, south: true, west: true)),
        )"#;
        let ty = PlaceableType::from_ron_str(src).unwrap();
        assert_eq!(ty.id, 3);
        assert_eq!(ty.anchors.len(), 4);
        assert!(ty.doors.is_none());
    }

    #[test]
    fn test_from_ron_explicit_anchors() {
        let src = r#"(
            id: 9,
            name: "corner",
            anchors: [
                (direction: (x: 0.0, y: 0.0, z: 1.0), offset: (x: 0.0, y: 0.0, z: 12.0)),
                (direction: (x: 1.0, y: 0.0, z: 0.0)),
            ],
        )"#;
        let ty = PlaceableType::from_ron_str(src).unwrap();
        assert_eq!(ty.anchors.len(), 2);
        assert_eq!(ty.anchors[1].offset, Vec3::ZERO);
    }

    #[test]
    fn test_from_ron_rejects_bad_anchor() {
        let src = r#"(
            id: 4,
            name: "broken",
            anchors: [(direction: (x: 0.0, y: 0.0, z: 0.0))],
        )"#;
        let err = PlaceableType::from_ron_str(src).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_from_ron_rejects_empty_name() {
        let src = r#"(id: 4, name: "")"#;
        assert!(PlaceableType::from_ron_str(src).is_err());
    }
}
