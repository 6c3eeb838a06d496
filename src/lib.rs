//! tilesmith - Tileset slicer and sprite atlas packer
//!
//! A library for cutting grid tilesets into named sprites and packing the
//! ones a game uses into power-of-two atlases with JSON coordinate indexes.

pub mod classify;
pub mod cli;
pub mod combine;
pub mod config;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod slice;
pub mod sprite;

pub use classify::{AutotileLayout, BlockSelection, NamingStrategy};
pub use combine::{combine_frames, Combined, FrameAnomaly};
pub use config::{Overrides, PipelineConfig, Settings};
pub use discovery::{discover, find_project_root, Manifest, Project};
pub use error::{Result, TileError};
pub use filter::{filter, AllowSet, UsedNameProvider};
pub use pipeline::{build, Family, FamilyKind, FamilyReport, SheetOutcome};
pub use render::{Atlas, AtlasPacker, Sizing, Watermark};
pub use slice::{GridCells, SlicedCell};
pub use sprite::{NamedSprite, SpriteCandidate};
