//! PNG reading and writing for sheets, sprites and atlases.

use std::fs;
use std::path::Path;

use image::RgbaImage;

use crate::error::{Result, TileError};

/// Load a PNG (or any format `image` can decode) as RGBA.
pub fn read_png(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| TileError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to load image: {}", e),
    })?;
    Ok(img.to_rgba8())
}

/// Write `image` as PNG, creating parent directories as needed.
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| TileError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create output directory: {}", e),
            })?;
        }
    }

    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| TileError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })
}
