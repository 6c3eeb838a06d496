//! Coordinate descriptor written next to each atlas.
//!
//! The renderer reads `{ <sizing>, "sprites": { name: [x, y] } }`, with pixel
//! coordinates measured from the atlas's top-left corner.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, TileError};

/// Sizing fields a family's renderer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    /// `"tileSize"`: square world tiles.
    Tile(u32),
    /// `"spriteSize"`: square item sprites.
    Sprite(u32),
    /// `"tileWidth"` + `"tileHeight"`: double-width character strips.
    TileRect { width: u32, height: u32 },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Descriptor<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    tile_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sprite_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tile_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tile_height: Option<u32>,
    sprites: &'a BTreeMap<String, [u32; 2]>,
}

impl<'a> Descriptor<'a> {
    fn new(sizing: Sizing, sprites: &'a BTreeMap<String, [u32; 2]>) -> Self {
        let mut descriptor = Descriptor {
            tile_size: None,
            sprite_size: None,
            tile_width: None,
            tile_height: None,
            sprites,
        };
        match sizing {
            Sizing::Tile(size) => descriptor.tile_size = Some(size),
            Sizing::Sprite(size) => descriptor.sprite_size = Some(size),
            Sizing::TileRect { width, height } => {
                descriptor.tile_width = Some(width);
                descriptor.tile_height = Some(height);
            }
        }
        descriptor
    }
}

/// Render the descriptor as pretty JSON.
pub fn descriptor_json(sizing: Sizing, coordinates: &BTreeMap<String, [u32; 2]>) -> Result<String> {
    serde_json::to_string_pretty(&Descriptor::new(sizing, coordinates)).map_err(|e| {
        TileError::Build {
            message: format!("Failed to serialize atlas descriptor: {}", e),
            help: None,
        }
    })
}

/// Write the descriptor to `path`, replacing any previous file.
pub fn write_descriptor(
    sizing: Sizing,
    coordinates: &BTreeMap<String, [u32; 2]>,
    path: &Path,
) -> Result<()> {
    let json = descriptor_json(sizing, coordinates)?;
    fs::write(path, json).map_err(|e| TileError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write atlas descriptor: {}", e),
    })
}
