//! Project discovery: root lookup, manifest loading and sheet scanning.
//!
//! # Example
//!
//! ```ignore
//! use tilesmith::discovery::discover;
//!
//! let project = discover(std::env::current_dir()?)?;
//! println!("Building in {}", project.root.display());
//! ```

mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use manifest::{CharacterFamily, ItemFamily, Manifest, UiFamily, WorldFamily};
pub use scanner::{is_sheet, require_sheets, scan_sheets};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "tilesmith.yaml";

/// Files that mark a project root, checked in order at each level.
pub const ROOT_MARKERS: &[&str] = &[MANIFEST_FILENAME, "project.godot"];

/// A located project.
#[derive(Debug)]
pub struct Project {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if no tilesmith.yaml found).
    pub manifest: Manifest,

    /// Whether a tilesmith.yaml manifest was found.
    pub has_manifest: bool,

    /// Whether `root` was found by a marker rather than assumed.
    pub found_root: bool,
}

impl Project {
    /// Resolve a project-relative path; absolute paths pass through.
    pub fn path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

/// Walk up from `start` to the first directory holding a root marker.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| ROOT_MARKERS.iter().any(|marker| dir.join(marker).is_file()))
        .map(Path::to_path_buf)
}

/// Locate the project containing `start` and load its manifest.
///
/// Without a marker anywhere above `start`, `start` itself is the root.
pub fn discover(start: impl AsRef<Path>) -> Result<Project> {
    let start = start.as_ref();
    let (root, found_root) = match find_project_root(start) {
        Some(root) => (root, true),
        None => (start.to_path_buf(), false),
    };
    open(root, found_root)
}

/// Load the project rooted exactly at `root`, without walking up.
pub fn discover_at(root: impl AsRef<Path>) -> Result<Project> {
    open(root.as_ref().to_path_buf(), true)
}

fn open(root: PathBuf, found_root: bool) -> Result<Project> {
    let manifest_path = root.join(MANIFEST_FILENAME);
    let (manifest, has_manifest) = if manifest_path.is_file() {
        (Manifest::load(&manifest_path)?, true)
    } else {
        (Manifest::default(), false)
    };

    Ok(Project {
        root,
        manifest,
        has_manifest,
        found_root,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let project = discover(&nested).unwrap();

        assert!(!project.has_manifest);
        assert_eq!(project.manifest, Manifest::default());
        if !project.found_root {
            assert_eq!(project.root, nested);
        }
    }

    #[test]
    fn test_discover_walks_up_to_godot_project() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("project.godot"), "").unwrap();
        let nested = dir.path().join("src/scenes");
        fs::create_dir_all(&nested).unwrap();

        let project = discover(&nested).unwrap();

        assert!(project.found_root);
        assert!(!project.has_manifest);
        assert_eq!(project.root, dir.path());
    }

    #[test]
    fn test_discover_with_manifest() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("tilesmith.yaml"),
            "output: build\ncell_size: 8\n",
        )
        .unwrap();
        let nested = dir.path().join("art");
        fs::create_dir_all(&nested).unwrap();

        let project = discover(&nested).unwrap();

        assert!(project.has_manifest);
        assert_eq!(project.root, dir.path());
        assert_eq!(project.manifest.output, PathBuf::from("build"));
        assert_eq!(project.manifest.cell_size, 8);
        assert_eq!(project.path(Path::new("build")), dir.path().join("build"));
    }

    #[test]
    fn test_discover_invalid_manifest_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("tilesmith.yaml"), "cell_size: [").unwrap();
        assert!(discover(dir.path()).is_err());
    }

    #[test]
    fn test_discover_at_does_not_walk_up() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("tilesmith.yaml"), "output: up\n").unwrap();
        let nested = dir.path().join("inner");
        fs::create_dir_all(&nested).unwrap();

        let project = discover_at(&nested).unwrap();

        assert_eq!(project.root, nested);
        assert!(!project.has_manifest);
    }
}
