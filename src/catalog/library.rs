//! Catalog - discovery and lookup of placeable types
//!
//! Scans a content directory for type definition files and keeps the
//! id -> type mapping the solver and level codec resolve against.

use std::collections::HashMap;
use std::path::PathBuf;
use super::placeable::{CatalogError, PlaceableType};

/// Default directory where placeable type files are stored
pub const CATALOG_DIR: &str = "assets/placeables";

/// The set of placeable types available for a session
///
/// Ids are unique; a file that collides with an already-loaded id is
/// reported and skipped rather than silently replacing the earlier entry.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Loaded types keyed by id
    types: HashMap<u32, PlaceableType>,
    /// Ids in discovery order (sorted by filename), for stable iteration
    ordered_ids: Vec<u32>,
    /// Base directory scanned by `discover`
    base_dir: PathBuf,
}

impl Catalog {
    /// Create an empty catalog rooted at the default content directory
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            ordered_ids: Vec::new(),
            base_dir: PathBuf::from(CATALOG_DIR),
        }
    }

    /// Create a catalog with a custom base directory
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            types: HashMap::new(),
            ordered_ids: Vec::new(),
            base_dir: base_dir.into(),
        }
    }

    /// Discover and load all type files from the base directory.
    ///
    /// Replaces the previous contents, so this doubles as the refresh
    /// operation. Files that fail to parse or collide on id are reported
    /// and skipped. Returns the number of types loaded.
    pub fn discover(&mut self) -> Result<usize, CatalogError> {
        self.types.clear();
        self.ordered_ids.clear();

        if !self.base_dir.exists() {
            std::fs::create_dir_all(&self.base_dir)?;
            return Ok(0);
        }

        let mut entries: Vec<_> = std::fs::read_dir(&self.base_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext.to_ascii_lowercase() == "ron")
                    .unwrap_or(false)
            })
            .collect();

        // Sort by filename for consistent ordering
        entries.sort();

        for path in entries {
            match PlaceableType::load(&path) {
                Ok(ty) => {
                    if let Err(e) = self.insert(ty) {
                        eprintln!("Skipping placeable {:?}: {}", path, e);
                    }
                }
                Err(e) => {
                    eprintln!("Failed to load placeable {:?}: {}", path, e);
                }
            }
        }

        Ok(self.types.len())
    }

    /// Add a type, rejecting duplicate ids
    pub fn insert(&mut self, ty: PlaceableType) -> Result<(), CatalogError> {
        if let Some(existing) = self.types.get(&ty.id) {
            return Err(CatalogError::Validation(format!(
                "duplicate id {} ('{}' already registered)", ty.id, existing.name
            )));
        }
        self.ordered_ids.push(ty.id);
        self.types.insert(ty.id, ty);
        Ok(())
    }

    /// Look up a type by id
    pub fn get(&self, id: u32) -> Option<&PlaceableType> {
        self.types.get(&id)
    }

    /// Whether the catalog knows this id
    pub fn contains(&self, id: u32) -> bool {
        self.types.contains_key(&id)
    }

    /// First type in discovery order, the default palette selection
    pub fn first_id(&self) -> Option<u32> {
        self.ordered_ids.first().copied()
    }

    /// Iterate types in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &PlaceableType> {
        self.ordered_ids.iter().filter_map(|id| self.types.get(id))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
