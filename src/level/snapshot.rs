//! Level snapshot data
//!
//! The persisted form of a scene: three parallel sequences indexed
//! together, so entry i of each describes one placed instance. A version
//! field tops the file so later format changes cannot silently corrupt
//! old saves.

use serde::{Serialize, Deserialize};
use crate::math::{Quat, Vec3};
use crate::scene::SceneRegistry;

/// Current snapshot format version
pub const LEVEL_FORMAT_VERSION: u32 = 1;

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum number of placed instances in a level
    pub const MAX_INSTANCES: usize = 4096;
    /// Maximum coordinate value (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
}

/// Files predating the version field read as the first format version
fn default_version() -> u32 {
    1
}

/// Flat persisted form of all placed instances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Catalog type id per instance
    pub ids: Vec<u32>,
    /// World position per instance
    pub positions: Vec<Vec3>,
    /// World orientation per instance
    pub rotations: Vec<Quat>,
}

impl Default for LevelSnapshot {
    fn default() -> Self {
        Self {
            version: LEVEL_FORMAT_VERSION,
            ids: Vec::new(),
            positions: Vec::new(),
            rotations: Vec::new(),
        }
    }
}

/// Check if a float is valid (not NaN or Inf, within coordinate bounds)
fn is_valid_float(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

impl LevelSnapshot {
    /// Snapshot the current registry contents, in placement order
    pub fn from_registry(registry: &SceneRegistry) -> Self {
        let mut snapshot = Self::default();
        for inst in registry.instances() {
            snapshot.ids.push(inst.type_id);
            snapshot.positions.push(inst.position);
            snapshot.rotations.push(inst.rotation);
        }
        snapshot
    }

    /// Number of instances described
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Validate structure and contents before hydration
    pub fn validate(&self) -> Result<(), String> {
        if self.version > LEVEL_FORMAT_VERSION {
            return Err(format!(
                "unsupported format version {} (newest known is {})",
                self.version, LEVEL_FORMAT_VERSION
            ));
        }
        if self.positions.len() != self.ids.len() || self.rotations.len() != self.ids.len() {
            return Err(format!(
                "sequence length mismatch: {} ids, {} positions, {} rotations",
                self.ids.len(), self.positions.len(), self.rotations.len()
            ));
        }
        if self.len() > limits::MAX_INSTANCES {
            return Err(format!(
                "too many instances ({} > {})", self.len(), limits::MAX_INSTANCES
            ));
        }
        for (i, p) in self.positions.iter().enumerate() {
            if !is_valid_float(p.x) || !is_valid_float(p.y) || !is_valid_float(p.z) {
                return Err(format!(
                    "invalid position[{}] = ({}, {}, {})", i, p.x, p.y, p.z
                ));
            }
        }
        for (i, r) in self.rotations.iter().enumerate() {
            if !r.is_finite() {
                return Err(format!("invalid rotation[{}]", i));
            }
        }
        Ok(())
    }
}
