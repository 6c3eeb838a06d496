//! Image output: atlas packing, watermarking, PNG I/O and descriptors.

mod atlas;
mod descriptor;
mod png;
mod watermark;

pub use atlas::{
    Atlas, AtlasLayout, AtlasPacker, Placement, DEBUG_SPRITE, DEFAULT_DEBUG_COLOUR,
    DEFAULT_MIN_ATLAS_SIZE,
};
pub use descriptor::{descriptor_json, write_descriptor, Sizing};
pub use png::{read_png, write_png};
pub use watermark::{Watermark, DEFAULT_WATERMARK, WATERMARK_MARGIN};
