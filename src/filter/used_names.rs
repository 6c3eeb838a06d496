//! Used-name discovery from renderer source text.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{Result, TileError};

use super::AllowSet;

/// Matches GDScript StringName literals such as `&"wall-3-nsew"`.
pub const STRING_NAME_PATTERN: &str = r#"&"([^"]+)""#;

/// A source of sprite names some consumer actually references.
pub trait UsedNameProvider {
    /// Human-readable origin, for status output.
    fn describe(&self) -> String;

    /// Whether the underlying source exists at all.
    fn is_available(&self) -> bool;

    fn names(&self) -> Result<AllowSet>;
}

/// Scans a text file for every capture of a pattern.
#[derive(Debug, Clone)]
pub struct SourceScanProvider {
    path: PathBuf,
    pattern: Regex,
}

impl SourceScanProvider {
    /// The first capture group of `pattern` is taken as the name.
    pub fn new(path: impl AsRef<Path>, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| TileError::Config {
            message: format!("Invalid used-name pattern '{}': {}", pattern, e),
            help: Some("The pattern must be a valid regular expression".to_string()),
        })?;
        if pattern.captures_len() < 2 {
            return Err(TileError::Config {
                message: format!("Used-name pattern '{}' has no capture group", pattern),
                help: Some("Wrap the name part in parentheses, e.g. &\"([^\"]+)\"".to_string()),
            });
        }
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            pattern,
        })
    }

    /// Collect names from text already in memory.
    pub fn scan(&self, text: &str) -> AllowSet {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    }
}

impl UsedNameProvider for SourceScanProvider {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn names(&self) -> Result<AllowSet> {
        let text = fs::read_to_string(&self.path).map_err(|e| TileError::Io {
            path: self.path.clone(),
            message: format!("Failed to read renderer source: {}", e),
        })?;
        Ok(self.scan(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const RENDERER: &str = r#"
const WALLS = [&"wall-1-nsew", &"wall-1-ns"]
func floor_for(kind):
    match kind:
        0: return &"floor-2-se"
        _: return &"wall-1-ns"
var label = "not-a-tile"
"#;

    #[test]
    fn test_scan_collects_string_names() {
        let provider = SourceScanProvider::new("unused.gd", STRING_NAME_PATTERN).unwrap();
        let names = provider.scan(RENDERER);
        assert_eq!(
            names.iter().collect::<Vec<_>>(),
            vec!["floor-2-se", "wall-1-ns", "wall-1-nsew"]
        );
        assert!(!names.contains("not-a-tile"));
    }

    #[test]
    fn test_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map_renderer.gd");
        fs::write(&path, RENDERER).unwrap();

        let provider = SourceScanProvider::new(&path, STRING_NAME_PATTERN).unwrap();
        assert!(provider.is_available());
        assert_eq!(provider.names().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_file_unavailable() {
        let dir = tempdir().unwrap();
        let provider =
            SourceScanProvider::new(dir.path().join("nope.gd"), STRING_NAME_PATTERN).unwrap();
        assert!(!provider.is_available());
        assert!(provider.names().is_err());
    }

    #[test]
    fn test_pattern_without_group_rejected() {
        assert!(SourceScanProvider::new("x.gd", "&\"[^\"]+\"").is_err());
        assert!(SourceScanProvider::new("x.gd", "(").is_err());
    }
}
