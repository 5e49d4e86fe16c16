//! Level file reading and writing
//!
//! Levels are saved as pretty-printed RON so they stay inspectable in a
//! text editor. Reading auto-detects brotli compression, since packaging
//! tools may compress level files in place. Save folders and load files
//! are located by name anywhere under the content root, the way an editor
//! resolves logical names against a project tree.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::scene::{PlacedInstance, SceneRegistry};
use super::snapshot::LevelSnapshot;

/// File extension for level snapshots
pub const LEVEL_EXT: &str = "ron";

/// Error type for level persistence
#[derive(Debug)]
pub enum LevelError {
    /// Bad caller input (blank names)
    InvalidArgument(String),
    /// Save folder or level file absent
    NotFound(String),
    /// Snapshot content failed validation
    CorruptData(String),
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl From<ron::Error> for LevelError {
    fn from(e: ron::Error) -> Self {
        LevelError::SerializeError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            LevelError::NotFound(name) => write!(f, "Not found: {}", name),
            LevelError::CorruptData(msg) => write!(f, "Corrupt level data: {}", msg),
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for LevelError {}

/// Outcome of a level load
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Instances hydrated into the registry
    pub loaded: usize,
    /// Type ids skipped because the catalog no longer knows them
    pub skipped: Vec<u32>,
}

/// Recursively collect directories named `name` under `dir`
fn collect_dirs(dir: &Path, name: &str, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if path.file_name().map(|n| n == name).unwrap_or(false) {
                out.push(path.clone());
            }
            collect_dirs(&path, name, out);
        }
    }
}

/// Recursively collect files named `file_name` under `dir`
fn collect_files(dir: &Path, file_name: &str, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, file_name, out);
        } else if path.file_name().map(|n| n == file_name).unwrap_or(false) {
            out.push(path);
        }
    }
}

/// Find a folder by name under the root.
///
/// Candidates are sorted by path so the first match is deterministic;
/// duplicates are reported but not fatal.
fn find_folder(root: &Path, name: &str) -> Option<PathBuf> {
    let mut matches = Vec::new();
    collect_dirs(root, name, &mut matches);
    matches.sort();
    if matches.len() > 1 {
        eprintln!(
            "Multiple folders named '{}' under {:?}, using {:?}",
            name, root, matches[0]
        );
    }
    matches.into_iter().next()
}

/// Find a file by name under the root, first match in path order
fn find_file(root: &Path, file_name: &str) -> Option<PathBuf> {
    let mut matches = Vec::new();
    collect_files(root, file_name, &mut matches);
    matches.sort();
    if matches.len() > 1 {
        eprintln!(
            "Multiple files named '{}' under {:?}, using {:?}",
            file_name, root, matches[0]
        );
    }
    matches.into_iter().next()
}

/// Save the scene to `<folder_name>/<file_name>.ron` under the content root.
///
/// The folder is located by name anywhere under the root and created
/// directly under it when absent. The snapshot is written to a temp file
/// and renamed into place, so a completed save never leaves the target
/// half-written. Returns the path written.
pub fn save_level(
    registry: &SceneRegistry,
    content_root: &Path,
    folder_name: &str,
    file_name: &str,
) -> Result<PathBuf, LevelError> {
    if folder_name.trim().is_empty() {
        return Err(LevelError::InvalidArgument("empty save folder name".into()));
    }
    if file_name.trim().is_empty() {
        return Err(LevelError::InvalidArgument("empty save file name".into()));
    }

    let folder = match find_folder(content_root, folder_name) {
        Some(path) => path,
        None => {
            let path = content_root.join(folder_name);
            fs::create_dir_all(&path)?;
            path
        }
    };

    let snapshot = LevelSnapshot::from_registry(registry);
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());
    let ron_string = ron::ser::to_string_pretty(&snapshot, config)?;

    let target = folder.join(format!("{}.{}", file_name, LEVEL_EXT));
    let tmp = folder.join(format!(".{}.{}.tmp", file_name, LEVEL_EXT));
    fs::write(&tmp, ron_string.as_bytes())?;
    if let Err(e) = fs::rename(&tmp, &target) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    Ok(target)
}

/// Parse snapshot bytes, auto-detecting brotli compression.
///
/// RON text starts with '(' or whitespace; anything else is assumed to be
/// a compressed payload.
pub fn parse_snapshot(bytes: &[u8]) -> Result<LevelSnapshot, LevelError> {
    let is_plain_ron = bytes
        .first()
        .map(|&b| b == b'(' || b == b' ' || b == b'\n' || b == b'\r' || b == b'\t')
        .unwrap_or(false);

    let contents = if is_plain_ron {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| LevelError::CorruptData(format!("invalid UTF-8: {}", e)))?
    } else {
        let mut decompressed = Vec::new();
        brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut decompressed)
            .map_err(|e| LevelError::CorruptData(format!("brotli decompression failed: {}", e)))?;
        String::from_utf8(decompressed)
            .map_err(|e| LevelError::CorruptData(format!("invalid UTF-8 after decompression: {}", e)))?
    };

    let snapshot: LevelSnapshot = ron::from_str(&contents)?;
    snapshot.validate().map_err(LevelError::CorruptData)?;
    Ok(snapshot)
}

/// Replay a snapshot into the registry, resolving ids against the catalog.
///
/// Entries whose type id is gone from the catalog are reported and
/// skipped; the rest hydrate with their stored pose verbatim. Sequences of
/// unequal length truncate to the shortest (validated snapshots never
/// differ).
pub fn hydrate(
    snapshot: &LevelSnapshot,
    catalog: &Catalog,
    registry: &mut SceneRegistry,
) -> LoadReport {
    let mut report = LoadReport::default();
    let entries = snapshot
        .ids
        .iter()
        .zip(&snapshot.positions)
        .zip(&snapshot.rotations);
    for (i, ((&id, &position), &rotation)) in entries.enumerate() {
        if !catalog.contains(id) {
            eprintln!("Skipping instance {}: unknown type id {}", i, id);
            report.skipped.push(id);
            continue;
        }
        registry.place(PlacedInstance::new(id, position, rotation));
        report.loaded += 1;
    }
    report
}

/// Find `<file_name>.ron` under the content root and hydrate it into the
/// registry. Loaded instances extend whatever the scene already holds.
pub fn load_level(
    content_root: &Path,
    file_name: &str,
    catalog: &Catalog,
    registry: &mut SceneRegistry,
) -> Result<LoadReport, LevelError> {
    if file_name.trim().is_empty() {
        return Err(LevelError::InvalidArgument("empty load file name".into()));
    }

    let full_name = format!("{}.{}", file_name, LEVEL_EXT);
    let path = find_file(content_root, &full_name)
        .ok_or_else(|| LevelError::NotFound(full_name.clone()))?;

    let bytes = fs::read(&path)?;
    let snapshot = parse_snapshot(&bytes)?;
    Ok(hydrate(&snapshot, catalog, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CompassDoors, PlaceableType};
    use crate::math::{Quat, Vec3};
    use std::f32::consts::FRAC_PI_2;
    use tempfile::TempDir;

    fn test_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        let doors = CompassDoors { north: true, south: true, ..Default::default() };
        catalog.insert(PlaceableType::room(1, "hall", doors)).unwrap();
        catalog.insert(PlaceableType::new(2, "crate", Vec::new())).unwrap();
        catalog
    }

    fn populated_registry() -> SceneRegistry {
        let mut registry = SceneRegistry::new();
        registry.place(PlacedInstance::new(1, Vec3::new(0.0, 0.0, 0.0), Quat::IDENTITY));
        registry.place(PlacedInstance::new(
            2,
            Vec3::new(30.0, 1.5, -12.0),
            Quat::from_rotation_y(FRAC_PI_2),
        ));
        registry.place(PlacedInstance::new(1, Vec3::new(-7.25, 0.0, 42.0), Quat::IDENTITY));
        registry
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let catalog = test_catalog();
        let registry = populated_registry();

        let path = save_level(&registry, dir.path(), "maps", "dungeon").unwrap();
        assert!(path.ends_with("maps/dungeon.ron"));
        // No temp residue after a completed save
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());

        let mut restored = SceneRegistry::new();
        let report = load_level(dir.path(), "dungeon", &catalog, &mut restored).unwrap();
        assert_eq!(report.loaded, 3);
        assert!(report.skipped.is_empty());

        let saved: Vec<_> = registry.instances().collect();
        let loaded: Vec<_> = restored.instances().collect();
        assert_eq!(saved.len(), loaded.len());
        for (a, b) in saved.iter().zip(loaded.iter()) {
            assert_eq!(a.type_id, b.type_id);
            assert!(a.position.distance(b.position) < 1e-5);
            assert!(a.rotation.approx_eq(b.rotation, 1e-5));
        }
    }

    #[test]
    fn test_empty_scene_roundtrip() {
        let dir = TempDir::new().unwrap();
        let catalog = test_catalog();
        let registry = SceneRegistry::new();

        save_level(&registry, dir.path(), "maps", "blank").unwrap();

        let mut restored = SceneRegistry::new();
        let report = load_level(dir.path(), "blank", &catalog, &mut restored).unwrap();
        assert_eq!(report.loaded, 0);
        assert!(restored.is_empty());
    }

    #[test]
    fn test_load_skips_unknown_ids() {
        let dir = TempDir::new().unwrap();
        let snapshot = LevelSnapshot {
            ids: vec![1, 99, 2],
            positions: vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)],
            rotations: vec![Quat::IDENTITY; 3],
            ..Default::default()
        };
        let text = ron::to_string(&snapshot).unwrap();
        fs::write(dir.path().join("partial.ron"), text).unwrap();

        let catalog = test_catalog();
        let mut registry = SceneRegistry::new();
        let report = load_level(dir.path(), "partial", &catalog, &mut registry).unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, vec![99]);
        let ids: Vec<_> = registry.instances().map(|i| i.type_id).collect();
        assert_eq!(ids, vec![1, 2]);
        // Surviving entries keep their stored poses
        assert!((registry.instances().last().unwrap().position.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let catalog = test_catalog();
        let mut registry = SceneRegistry::new();
        let err = load_level(dir.path(), "nowhere", &catalog, &mut registry).unwrap_err();
        assert!(matches!(err, LevelError::NotFound(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_length_mismatch_is_corrupt() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("bad.ron"),
            "(ids: [1], positions: [], rotations: [])",
        ).unwrap();

        let catalog = test_catalog();
        let mut registry = SceneRegistry::new();
        let err = load_level(dir.path(), "bad", &catalog, &mut registry).unwrap_err();
        assert!(matches!(err, LevelError::CorruptData(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_blank_names_rejected() {
        let dir = TempDir::new().unwrap();
        let registry = SceneRegistry::new();
        let catalog = test_catalog();
        let mut target = SceneRegistry::new();

        assert!(matches!(
            save_level(&registry, dir.path(), "  ", "x"),
            Err(LevelError::InvalidArgument(_))
        ));
        assert!(matches!(
            save_level(&registry, dir.path(), "maps", ""),
            Err(LevelError::InvalidArgument(_))
        ));
        assert!(matches!(
            load_level(dir.path(), "", &catalog, &mut target),
            Err(LevelError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_save_reuses_existing_folder_first_in_path_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/maps")).unwrap();
        fs::create_dir_all(dir.path().join("a/maps")).unwrap();

        let registry = SceneRegistry::new();
        let path = save_level(&registry, dir.path(), "maps", "lvl").unwrap();
        assert!(path.starts_with(dir.path().join("a/maps")));
    }

    #[test]
    fn test_save_creates_folder_under_root() {
        let dir = TempDir::new().unwrap();
        let registry = SceneRegistry::new();
        let path = save_level(&registry, dir.path(), "maps", "lvl").unwrap();
        assert_eq!(path, dir.path().join("maps/lvl.ron"));
        assert!(path.exists());
    }

    #[test]
    fn test_load_finds_nested_file() {
        let dir = TempDir::new().unwrap();
        let catalog = test_catalog();
        let registry = populated_registry();
        save_level(&registry, dir.path(), "deep", "nested").unwrap();
        // Move the save folder further down the tree
        fs::create_dir_all(dir.path().join("content/packs")).unwrap();
        fs::rename(
            dir.path().join("deep"),
            dir.path().join("content/packs/deep"),
        ).unwrap();

        let mut restored = SceneRegistry::new();
        let report = load_level(dir.path(), "nested", &catalog, &mut restored).unwrap();
        assert_eq!(report.loaded, 3);
    }

    #[test]
    fn test_load_compressed_snapshot() {
        let dir = TempDir::new().unwrap();
        let snapshot = LevelSnapshot {
            ids: vec![2],
            positions: vec![Vec3::new(5.0, 0.0, 5.0)],
            rotations: vec![Quat::IDENTITY],
            ..Default::default()
        };
        let text = ron::to_string(&snapshot).unwrap();
        let mut compressed = Vec::new();
        brotli::BrotliCompress(
            &mut Cursor::new(text.as_bytes()),
            &mut compressed,
            &brotli::enc::BrotliEncoderParams::default(),
        ).unwrap();
        fs::write(dir.path().join("packed.ron"), compressed).unwrap();

        let catalog = test_catalog();
        let mut registry = SceneRegistry::new();
        let report = load_level(dir.path(), "packed", &catalog, &mut registry).unwrap();
        assert_eq!(report.loaded, 1);
    }

    #[test]
    fn test_future_version_is_corrupt() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("future.ron"),
            "(version: 99, ids: [], positions: [], rotations: [])",
        ).unwrap();

        let catalog = test_catalog();
        let mut registry = SceneRegistry::new();
        let err = load_level(dir.path(), "future", &catalog, &mut registry).unwrap_err();
        assert!(matches!(err, LevelError::CorruptData(_)));
    }

    #[test]
    fn test_load_extends_existing_scene() {
        let dir = TempDir::new().unwrap();
        let catalog = test_catalog();
        let registry = populated_registry();
        save_level(&registry, dir.path(), "maps", "lvl").unwrap();

        let mut target = SceneRegistry::new();
        target.place(PlacedInstance::new(2, Vec3::UP, Quat::IDENTITY));
        load_level(dir.path(), "lvl", &catalog, &mut target).unwrap();
        assert_eq!(target.len(), 4);
    }
}
