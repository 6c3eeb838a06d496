//! Named sprite types passed between pipeline stages.

use image::RgbaImage;

/// A kept cell that received a name during extraction.
#[derive(Debug, Clone)]
pub struct SpriteCandidate {
    pub name: String,
    /// Animation frame this cell came from (character sheets only).
    pub frame: Option<u32>,
    pub image: RgbaImage,
}

impl SpriteCandidate {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            frame: None,
            image,
        }
    }

    pub fn with_frame(mut self, frame: u32) -> Self {
        self.frame = Some(frame);
        self
    }
}

/// A named image ready for packing.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSprite {
    pub name: String,
    pub image: RgbaImage,
}

impl NamedSprite {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl From<SpriteCandidate> for NamedSprite {
    fn from(candidate: SpriteCandidate) -> Self {
        Self::new(candidate.name, candidate.image)
    }
}

/// Anything the allow-list filter can match by name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for SpriteCandidate {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for NamedSprite {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}
