//! Source sheet scanning.
//!
//! Family directories are flat: every `*.png` directly inside is one sheet.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, TileError};

/// Check whether a path looks like a source sheet.
pub fn is_sheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Every sheet directly inside `dir`, in sorted path order.
///
/// A missing directory is a [`TileError::MissingSource`].
pub fn scan_sheets(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(TileError::MissingSource {
            paths: vec![dir.to_path_buf()],
        });
    }

    let mut sheets: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_sheet(p))
        .collect();

    sheets.sort();
    Ok(sheets)
}

/// Resolve `names` inside `dir`, failing with every missing one listed.
pub fn require_sheets(dir: &Path, names: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(TileError::MissingSource {
            paths: vec![dir.to_path_buf()],
        });
    }

    let paths: Vec<PathBuf> = names.iter().map(|name| dir.join(name)).collect();
    let missing: Vec<PathBuf> = paths.iter().filter(|p| !p.is_file()).cloned().collect();
    if !missing.is_empty() {
        return Err(TileError::MissingSource { paths: missing });
    }

    Ok(paths)
}
