//! ROOMFORGE: a snap-together level composition engine
//!
//! The placement core behind a room-palette editor:
//! - Catalog of placeable types with directional connector anchors
//! - Preview solver: ground-plane projection with anchor snapping
//! - Scene registry of committed instances, handle-addressed for undo
//! - Level codec: flat RON snapshots keyed by stable type ids
//!
//! The host supplies pointer rays and discrete commands and draws the
//! resulting poses; everything here is synchronous and per-tick cheap.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod catalog;
pub mod level;
pub mod math;
pub mod scene;
pub mod session;
pub mod solver;

pub use catalog::{Anchor, Catalog, CompassDoors, PlaceableType};
pub use level::{load_level, save_level, LevelError, LevelSnapshot, LoadReport};
pub use math::{Quat, Ray, Vec3};
pub use scene::{InstanceHandle, PlacedInstance, SceneRegistry};
pub use session::{Command, EditorSession, SessionError};
pub use solver::{PlacementSolver, Pose};
