//! Scratch storage for extracted sprites.
//!
//! Sprites are staged as PNG files in a temporary directory between
//! extraction and packing. Storing a sprite under a key already present
//! overwrites it, so a repeated name keeps the last extracted pixels. The
//! directory is removed when the [`ScratchDir`] is dropped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Result, TileError};
use crate::render::{read_png, write_png};
use crate::sprite::SpriteCandidate;

type Key = (String, Option<u32>);

pub struct ScratchDir {
    dir: TempDir,
    index: BTreeMap<Key, PathBuf>,
}

impl ScratchDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("tilesmith-")
            .tempdir()
            .map_err(|e| TileError::Build {
                message: format!("Failed to create scratch directory: {}", e),
                help: None,
            })?;
        Ok(Self {
            dir,
            index: BTreeMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Stage `sprite`, replacing any earlier sprite with the same name and frame.
    ///
    /// Returns true when an earlier sprite was replaced.
    pub fn store(&mut self, sprite: &SpriteCandidate) -> Result<bool> {
        let key = (sprite.name.clone(), sprite.frame);
        let next = self.index.len();
        let replaced = self.index.contains_key(&key);
        let dir = self.dir.path();
        let path = self
            .index
            .entry(key)
            .or_insert_with(|| dir.join(format!("{:06}.png", next)))
            .clone();
        write_png(&sprite.image, &path)?;
        Ok(replaced)
    }

    /// Read every staged sprite back, ordered by name then frame.
    pub fn load(&self) -> Result<Vec<SpriteCandidate>> {
        self.index
            .iter()
            .map(|((name, frame), path)| {
                let image = read_png(path)?;
                Ok(SpriteCandidate {
                    name: name.clone(),
                    frame: *frame,
                    image,
                })
            })
            .collect()
    }
}
