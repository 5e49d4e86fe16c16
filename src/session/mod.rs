//! Editor session - owns the catalog, registry, and pending placement
//!
//! The host editor feeds this one object: a pointer ray per tick plus
//! discrete commands decoded from its input layer. Everything the solver
//! needs lives here explicitly; there is no global state.

use std::path::Path;
use crate::catalog::{Catalog, CatalogError};
use crate::level::{self, LevelError, LoadReport};
use crate::math::{Quat, Ray, Vec3};
use crate::scene::{InstanceHandle, PlacedInstance, SceneRegistry};
use crate::solver::{PlacementSolver, Pose};

/// Discrete editor commands decoded by the host input layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Commit the pending piece at the current preview pose
    Place,
    /// Enable/disable the placement preview entirely
    TogglePreview,
    /// Enable/disable anchor snapping
    ToggleSnap,
    /// Rotate the pending piece a quarter turn
    RotateStep,
    /// Nudge the spawn height
    AdjustHeight(f32),
}

/// Error type for session operations
#[derive(Debug)]
pub enum SessionError {
    /// Type id not present in the catalog
    UnknownType(u32),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::UnknownType(id) => write!(f, "unknown placeable type id {}", id),
        }
    }
}

impl std::error::Error for SessionError {}

/// One level-composition session: catalog, scene, and preview state
#[derive(Debug)]
pub struct EditorSession {
    catalog: Catalog,
    registry: SceneRegistry,
    solver: PlacementSolver,
    /// Currently selected type from the palette
    pending: Option<u32>,
    preview_enabled: bool,
    /// Last pose computed for the preview; what `Place` commits
    preview: Pose,
}

impl EditorSession {
    /// Start a session over a catalog.
    ///
    /// The first catalog entry becomes the palette selection, matching an
    /// editor that highlights the first icon on open.
    pub fn new(catalog: Catalog) -> Self {
        let pending = catalog.first_id();
        Self {
            catalog,
            registry: SceneRegistry::new(),
            solver: PlacementSolver::new(),
            pending,
            preview_enabled: true,
            preview: Pose::ORIGIN,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Currently selected type id, if any
    pub fn pending(&self) -> Option<u32> {
        self.pending
    }

    pub fn preview_enabled(&self) -> bool {
        self.preview_enabled
    }

    /// Direct access to the solver state (rotation, height, snap flag)
    pub fn solver(&self) -> &PlacementSolver {
        &self.solver
    }

    /// Select a type from the palette
    pub fn select(&mut self, type_id: u32) -> Result<(), SessionError> {
        if !self.catalog.contains(type_id) {
            return Err(SessionError::UnknownType(type_id));
        }
        self.pending = Some(type_id);
        Ok(())
    }

    /// Rescan the catalog directory and reset the palette selection
    pub fn refresh_catalog(&mut self) -> Result<usize, CatalogError> {
        let count = self.catalog.discover()?;
        self.pending = self.catalog.first_id();
        Ok(count)
    }

    /// Per-tick update: recompute the preview pose for the pointer ray.
    ///
    /// Returns None while the preview is off or nothing is selected. A
    /// selection whose type vanished in a catalog refresh is dropped here.
    pub fn update(&mut self, ray: &Ray) -> Option<Pose> {
        if !self.preview_enabled {
            return None;
        }
        let id = self.pending?;
        let Some(ty) = self.catalog.get(id) else {
            self.pending = None;
            return None;
        };
        self.preview = self.solver.preview(ray, ty, &self.registry, &self.catalog);
        Some(self.preview)
    }

    /// Apply a discrete command.
    ///
    /// Only `Place` can produce a handle. Placing while the preview is off
    /// or with nothing selected is silently ignored, the same way an editor
    /// ignores a spawn click with no ghost on screen.
    pub fn apply(&mut self, command: Command) -> Result<Option<InstanceHandle>, SessionError> {
        match command {
            Command::Place => {
                if !self.preview_enabled {
                    return Ok(None);
                }
                let Some(id) = self.pending else {
                    return Ok(None);
                };
                let pose = self.preview;
                self.place_at(id, pose.position, pose.rotation).map(Some)
            }
            Command::TogglePreview => {
                self.preview_enabled = !self.preview_enabled;
                Ok(None)
            }
            Command::ToggleSnap => {
                self.solver.toggle_snapping();
                Ok(None)
            }
            Command::RotateStep => {
                self.solver.rotate_step();
                Ok(None)
            }
            Command::AdjustHeight(delta) => {
                self.solver.adjust_height(delta);
                Ok(None)
            }
        }
    }

    /// Commit an instance directly.
    ///
    /// The entry point for external undo/redo integration and for level
    /// hydration: one atomic insertion, reversed by removing the handle.
    pub fn place_at(
        &mut self,
        type_id: u32,
        position: Vec3,
        rotation: Quat,
    ) -> Result<InstanceHandle, SessionError> {
        if !self.catalog.contains(type_id) {
            return Err(SessionError::UnknownType(type_id));
        }
        Ok(self.registry.place(PlacedInstance::new(type_id, position, rotation)))
    }

    /// Remove a previously committed instance (the undo path)
    pub fn remove(&mut self, handle: InstanceHandle) -> Option<PlacedInstance> {
        self.registry.remove(handle)
    }

    /// Drop every placed instance (the "new level" flow)
    pub fn clear(&mut self) {
        self.registry.clear();
    }

    /// Snapshot the scene to `<folder_name>/<file_name>.ron` under the
    /// content root
    pub fn save_level(
        &self,
        content_root: &Path,
        folder_name: &str,
        file_name: &str,
    ) -> Result<std::path::PathBuf, LevelError> {
        level::save_level(&self.registry, content_root, folder_name, file_name)
    }

    /// Find and hydrate a saved level, extending the current scene
    pub fn load_level(
        &mut self,
        content_root: &Path,
        file_name: &str,
    ) -> Result<LoadReport, LevelError> {
        level::load_level(content_root, file_name, &self.catalog, &mut self.registry)
    }
}
