//! Atlas packer.
//!
//! Packs equally sized sprites into a single power-of-two canvas, row-major,
//! in the order given. A solid debug sprite always goes last so renderers
//! have a visible fallback for missing names.

use std::collections::BTreeMap;

use image::{imageops, Rgba, RgbaImage};

use crate::error::{Result, TileError};
use crate::sprite::NamedSprite;

use super::watermark::Watermark;

/// Name of the sprite appended after every packed batch.
pub const DEBUG_SPRITE: &str = "debug";

/// Orange.
pub const DEFAULT_DEBUG_COLOUR: Rgba<u8> = Rgba([255, 165, 0, 255]);

/// Minimum atlas edge used by the character and item atlases.
pub const DEFAULT_MIN_ATLAS_SIZE: u32 = 256;

/// Grid geometry of an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    pub sprites_per_row: u32,
    pub rows: u32,
    pub width: u32,
    pub height: u32,
}

impl AtlasLayout {
    /// Top-left corner of the sprite at `index`.
    pub fn position(&self, index: usize, sprite_w: u32, sprite_h: u32) -> (u32, u32) {
        let per_row = self.sprites_per_row.max(1) as usize;
        let x = (index % per_row) as u32 * sprite_w;
        let y = (index / per_row) as u32 * sprite_h;
        (x, y)
    }
}

/// One sprite drawn onto the atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub name: String,
    pub x: u32,
    pub y: u32,
}

/// A packed atlas image and its coordinate index.
#[derive(Debug, Clone)]
pub struct Atlas {
    pub image: RgbaImage,
    pub layout: AtlasLayout,
    /// Every draw, in packing order (debug sprite last).
    pub placements: Vec<Placement>,
    /// Name to `[x, y]`; a repeated name keeps its last position.
    pub coordinates: BTreeMap<String, [u32; 2]>,
}

/// Packs fixed-size sprites row-major into a power-of-two canvas.
#[derive(Debug, Clone)]
pub struct AtlasPacker {
    pub sprite_width: u32,
    pub sprite_height: u32,
    /// Lower bound for each atlas edge, if any.
    pub min_size: Option<u32>,
    pub debug_colour: Rgba<u8>,
    pub watermark: Option<Watermark>,
}

impl AtlasPacker {
    pub fn new(sprite_width: u32, sprite_height: u32) -> Self {
        Self {
            sprite_width,
            sprite_height,
            min_size: None,
            debug_colour: DEFAULT_DEBUG_COLOUR,
            watermark: None,
        }
    }

    pub fn with_min_size(mut self, min_size: Option<u32>) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_debug_colour(mut self, colour: Rgba<u8>) -> Self {
        self.debug_colour = colour;
        self
    }

    pub fn with_watermark(mut self, watermark: Option<Watermark>) -> Self {
        self.watermark = watermark;
        self
    }

    /// Geometry for `count` sprites, the debug sprite included.
    pub fn layout(&self, count: usize) -> AtlasLayout {
        let count = count.max(1) as u32;
        let sprites_per_row = ceil_sqrt(count);
        let rows = count.div_ceil(sprites_per_row);

        let mut width = next_power_of_two(sprites_per_row * self.sprite_width);
        let mut height = next_power_of_two(rows * self.sprite_height);
        if let Some(min) = self.min_size {
            width = width.max(min);
            height = height.max(min);
        }

        AtlasLayout {
            sprites_per_row,
            rows,
            width,
            height,
        }
    }

    /// Solid sprite appended after the real ones.
    pub fn debug_sprite(&self) -> NamedSprite {
        NamedSprite::new(
            DEBUG_SPRITE,
            RgbaImage::from_pixel(self.sprite_width, self.sprite_height, self.debug_colour),
        )
    }

    /// Pack `sprites` plus the debug sprite.
    ///
    /// Every sprite must match the packer's sprite size.
    pub fn pack(&self, sprites: &[NamedSprite]) -> Result<Atlas> {
        if let Some(bad) = sprites
            .iter()
            .find(|s| s.width() != self.sprite_width || s.height() != self.sprite_height)
        {
            return Err(TileError::Build {
                message: format!(
                    "Sprite '{}' is {}x{}, expected {}x{}",
                    bad.name,
                    bad.width(),
                    bad.height(),
                    self.sprite_width,
                    self.sprite_height
                ),
                help: None,
            });
        }

        let debug = self.debug_sprite();
        let layout = self.layout(sprites.len() + 1);
        let mut image = RgbaImage::new(layout.width, layout.height);
        let mut placements = Vec::with_capacity(sprites.len() + 1);
        let mut coordinates = BTreeMap::new();

        for (index, sprite) in sprites.iter().chain(std::iter::once(&debug)).enumerate() {
            let (x, y) = layout.position(index, self.sprite_width, self.sprite_height);
            imageops::replace(&mut image, &sprite.image, x as i64, y as i64);
            coordinates.insert(sprite.name.clone(), [x, y]);
            placements.push(Placement {
                name: sprite.name.clone(),
                x,
                y,
            });
        }

        if let Some(watermark) = &self.watermark {
            watermark.stamp(&mut image);
        }

        Ok(Atlas {
            image,
            layout,
            placements,
            coordinates,
        })
    }
}

/// Smallest `k` with `k * k >= n`.
fn ceil_sqrt(n: u32) -> u32 {
    let mut k = (n as f64).sqrt() as u32;
    while k * k < n {
        k += 1;
    }
    while k > 1 && (k - 1) * (k - 1) >= n {
        k -= 1;
    }
    k.max(1)
}

/// Find the smallest power of two >= n.
fn next_power_of_two(n: u32) -> u32 {
    if n == 0 {
        return 1;
    }
    n.next_power_of_two()
}
