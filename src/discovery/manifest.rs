//! Project manifest (tilesmith.yaml) parsing.
//!
//! Every field is optional; a missing manifest, an empty one and a partial one
//! all fall back to the DawnLike project layout.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classify::DEFAULT_BLOCK_LIMIT;
use crate::error::{Result, TileError};
use crate::filter::STRING_NAME_PATTERN;
use crate::render::{DEFAULT_MIN_ATLAS_SIZE, DEFAULT_WATERMARK};
use crate::slice::DEFAULT_TRANSPARENCY_THRESHOLD;

/// Project manifest loaded from tilesmith.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Output directory for atlases and descriptors, relative to the root.
    pub output: PathBuf,

    /// Edge length of one source cell in pixels.
    pub cell_size: u32,

    /// Minimum opaque fraction a cell needs to be kept.
    pub transparency_threshold: f64,

    /// Filter characters and items through their data tables.
    pub allow_list: bool,

    /// Autotile blocks extracted per sheet when no used-name set exists.
    pub block_limit: usize,

    /// Extract every autotile block, ignoring `block_limit`.
    pub all_blocks: bool,

    /// Attribution stamped on every atlas; `~` disables it.
    #[serde(default = "default_watermark")]
    pub watermark: Option<String>,

    /// Hex colour of the debug sprite.
    pub debug_colour: String,

    pub characters: CharacterFamily,
    pub items: ItemFamily,
    pub world: WorldFamily,
    pub ui: UiFamily,
}

/// Character sheets, filtered through the monster table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterFamily {
    /// Directory holding the frame sheets.
    pub source: PathBuf,
    /// CSV table naming the sprites in use.
    pub allow_list: PathBuf,
    /// Column of `allow_list` holding sprite names.
    pub column: String,
    pub min_atlas_size: Option<u32>,
}

/// Item sheets, filtered through the item table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFamily {
    pub source: PathBuf,
    pub allow_list: PathBuf,
    pub column: String,
    pub min_atlas_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldFamily {
    pub source: PathBuf,
    /// Renderer source scanned for referenced names.
    pub used_names: PathBuf,
    /// Regex whose first capture group is a used name.
    pub pattern: String,
    pub min_atlas_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiFamily {
    pub source: PathBuf,
    /// Edge length of the square UI canvas.
    pub canvas: u32,
}

fn default_watermark() -> Option<String> {
    Some(DEFAULT_WATERMARK.to_string())
}

impl Default for CharacterFamily {
    fn default() -> Self {
        Self {
            source: PathBuf::from("art/DawnLike/Characters"),
            allow_list: PathBuf::from("assets/data/monsters.csv"),
            column: "appearance".to_string(),
            min_atlas_size: Some(DEFAULT_MIN_ATLAS_SIZE),
        }
    }
}

impl Default for ItemFamily {
    fn default() -> Self {
        Self {
            source: PathBuf::from("art/DawnLike/Items"),
            allow_list: PathBuf::from("assets/data/items.csv"),
            column: "sprite".to_string(),
            min_atlas_size: Some(DEFAULT_MIN_ATLAS_SIZE),
        }
    }
}

impl Default for WorldFamily {
    fn default() -> Self {
        Self {
            source: PathBuf::from("art/DawnLike/Objects"),
            used_names: PathBuf::from("src/map_renderer.gd"),
            pattern: STRING_NAME_PATTERN.to_string(),
            min_atlas_size: None,
        }
    }
}

impl Default for UiFamily {
    fn default() -> Self {
        Self {
            source: PathBuf::from("art/DawnLike/GUI/GUI0.png"),
            canvas: 512,
        }
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            output: PathBuf::from("assets/generated"),
            cell_size: 16,
            transparency_threshold: DEFAULT_TRANSPARENCY_THRESHOLD,
            allow_list: true,
            block_limit: DEFAULT_BLOCK_LIMIT,
            all_blocks: false,
            watermark: default_watermark(),
            debug_colour: "#ffa500".to_string(),
            characters: CharacterFamily::default(),
            items: ItemFamily::default(),
            world: WorldFamily::default(),
            ui: UiFamily::default(),
        }
    }
}

impl Manifest {
    /// Load manifest from a tilesmith.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TileError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| TileError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check tilesmith.yaml syntax".to_string()),
        })
    }

    /// Render as YAML, for `tilesmith init`.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| TileError::Build {
            message: format!("Failed to serialize manifest: {}", e),
            help: None,
        })
    }
}
