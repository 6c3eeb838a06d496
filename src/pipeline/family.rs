//! Family descriptors.
//!
//! A [`Family`] says where a family's sheets live, how each sheet's cells are
//! named, which names survive filtering, and how the atlas is laid out. The
//! four DawnLike families are built from [`Settings`] by [`Family::build`].

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use image::Rgba;

use crate::classify::{parse_frame_stem, AutotileLayout, NamingStrategy, DECOR_ROWS, DEFAULT_HEADER_ROWS};
use crate::config::{PipelineConfig, Settings};
use crate::discovery::{require_sheets, scan_sheets};
use crate::error::Result;
use crate::filter::{AllowListSource, SourceScanProvider};
use crate::render::{Sizing, Watermark};

/// The sprite families a build can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum FamilyKind {
    Characters,
    Items,
    World,
    Ui,
}

impl FamilyKind {
    pub const ALL: [FamilyKind; 4] = [
        FamilyKind::Characters,
        FamilyKind::Items,
        FamilyKind::World,
        FamilyKind::Ui,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FamilyKind::Characters => "characters",
            FamilyKind::Items => "items",
            FamilyKind::World => "world",
            FamilyKind::Ui => "ui",
        }
    }
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a sheet found by directory scan is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemNaming {
    /// `<name><frame>.png`: counter names under `name`, tagged with `frame`.
    Frames,
    /// `<Name>.png`: counter names under the lower-cased stem.
    Counter,
}

impl StemNaming {
    /// `None` when the stem carries a frame number too large to use.
    pub fn strategy(self, sheet: &Path) -> Option<NamingStrategy> {
        let stem = sheet
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self {
            StemNaming::Frames => {
                let (character, frame) = parse_frame_stem(&stem)?;
                Some(NamingStrategy::Frames { character, frame })
            }
            StemNaming::Counter => Some(NamingStrategy::Counter {
                prefix: stem.to_lowercase(),
                rows: None,
            }),
        }
    }
}

/// Where a family's sheets come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetSource {
    /// Every sheet directly inside `dir`.
    Directory { dir: PathBuf, naming: StemNaming },
    /// A fixed list of sheets that must all exist.
    Listed {
        dir: PathBuf,
        sheets: Vec<(String, NamingStrategy)>,
    },
}

/// One sheet and the naming applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub path: PathBuf,
    pub naming: NamingStrategy,
}

/// The sheets a family will process, plus those it found but cannot name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePlan {
    pub sheets: Vec<SheetPlan>,
    pub rejected: Vec<(PathBuf, String)>,
}

impl SheetSource {
    /// Resolve the concrete sheets, in processing order.
    pub fn plan(&self) -> Result<SourcePlan> {
        match self {
            SheetSource::Directory { dir, naming } => {
                let mut plan = SourcePlan::default();
                for path in scan_sheets(dir)? {
                    match naming.strategy(&path) {
                        Some(naming) => plan.sheets.push(SheetPlan { path, naming }),
                        None => plan
                            .rejected
                            .push((path, "frame number in file name is out of range".to_string())),
                    }
                }
                Ok(plan)
            }
            SheetSource::Listed { dir, sheets } => {
                let names: Vec<&str> = sheets.iter().map(|(file, _)| file.as_str()).collect();
                let paths = require_sheets(dir, &names)?;
                Ok(SourcePlan {
                    sheets: paths
                        .into_iter()
                        .zip(sheets)
                        .map(|(path, (_, naming))| SheetPlan {
                            path,
                            naming: naming.clone(),
                        })
                        .collect(),
                    rejected: Vec::new(),
                })
            }
        }
    }
}

/// Which names a family keeps.
#[derive(Debug, Clone)]
pub enum FilterStrategy {
    /// Keep everything.
    None,
    /// Names from a CSV column; the table must exist.
    AllowList(AllowListSource),
    /// Names referenced by renderer source; absent source means no filtering.
    UsedNames(SourceScanProvider),
}

/// Output file stems and descriptor sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasOutput {
    /// `<stem>.png` and `<stem>.json` in the output directory.
    pub stem: &'static str,
    pub sizing: Sizing,
}

/// Everything needed to turn one family's sheets into an atlas.
#[derive(Debug, Clone)]
pub struct Family {
    pub kind: FamilyKind,
    pub config: PipelineConfig,
    pub sources: SheetSource,
    pub filter: FilterStrategy,
    /// Merge frames into double-width strips.
    pub combine_frames: bool,
    pub sprite_width: u32,
    pub sprite_height: u32,
    pub debug_colour: Rgba<u8>,
    pub watermark: Option<Watermark>,
    pub output: AtlasOutput,
}

/// The UI family: one image copied onto a fixed canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct UiJob {
    pub source: PathBuf,
    pub canvas: u32,
    pub watermark: Option<Watermark>,
    pub output: PathBuf,
}

/// A buildable family.
#[derive(Debug, Clone)]
pub enum Job {
    Atlas(Family),
    Ui(UiJob),
}

/// World sheets, in processing order.
pub fn world_sheets() -> Vec<(String, NamingStrategy)> {
    let counter = |prefix: &str| NamingStrategy::Counter {
        prefix: prefix.to_string(),
        rows: None,
    };
    let autotile = |prefix: &str, layout| NamingStrategy::Autotile {
        prefix: prefix.to_string(),
        layout,
        header_rows: DEFAULT_HEADER_ROWS,
    };

    vec![
        ("Ground0.png".to_string(), counter("ground")),
        ("Floor.png".to_string(), autotile("floor", AutotileLayout::Floor)),
        ("Wall.png".to_string(), autotile("wall", AutotileLayout::Wall)),
        (
            "Decor0.png".to_string(),
            NamingStrategy::Counter {
                prefix: "decor".to_string(),
                rows: Some(DECOR_ROWS),
            },
        ),
        ("Tile.png".to_string(), counter("tile")),
        ("Door0.png".to_string(), counter("doors0")),
        ("Door1.png".to_string(), counter("doors1")),
    ]
}

impl Family {
    /// Describe `kind` for the project in `settings`.
    pub fn build(kind: FamilyKind, settings: &Settings) -> Result<Job> {
        let manifest = &settings.manifest;
        let cell = settings.pipeline.cell_size;
        let allow_list = |path: &Path, column: &str| {
            if settings.pipeline.allow_list_enabled {
                FilterStrategy::AllowList(AllowListSource::new(settings.path(path), column))
            } else {
                FilterStrategy::None
            }
        };

        let family = match kind {
            FamilyKind::Characters => {
                let table = &manifest.characters;
                Family {
                    kind,
                    config: settings.pipeline.clone().with_min_size(table.min_atlas_size),
                    sources: SheetSource::Directory {
                        dir: settings.path(&table.source),
                        naming: StemNaming::Frames,
                    },
                    filter: allow_list(&table.allow_list, &table.column),
                    combine_frames: true,
                    sprite_width: cell * 2,
                    sprite_height: cell,
                    debug_colour: settings.debug_colour,
                    watermark: settings.watermark.clone(),
                    output: AtlasOutput {
                        stem: "character_tiles",
                        sizing: Sizing::TileRect {
                            width: cell * 2,
                            height: cell,
                        },
                    },
                }
            }
            FamilyKind::Items => {
                let table = &manifest.items;
                Family {
                    kind,
                    config: settings.pipeline.clone().with_min_size(table.min_atlas_size),
                    sources: SheetSource::Directory {
                        dir: settings.path(&table.source),
                        naming: StemNaming::Counter,
                    },
                    filter: allow_list(&table.allow_list, &table.column),
                    combine_frames: false,
                    sprite_width: cell,
                    sprite_height: cell,
                    debug_colour: settings.debug_colour,
                    watermark: settings.watermark.clone(),
                    output: AtlasOutput {
                        stem: "item_sprites",
                        sizing: Sizing::Sprite(cell),
                    },
                }
            }
            FamilyKind::World => {
                let world = &manifest.world;
                let filter = if settings.pipeline.allow_list_enabled {
                    FilterStrategy::UsedNames(SourceScanProvider::new(
                        settings.path(&world.used_names),
                        &world.pattern,
                    )?)
                } else {
                    FilterStrategy::None
                };
                Family {
                    kind,
                    config: settings.pipeline.clone().with_min_size(world.min_atlas_size),
                    sources: SheetSource::Listed {
                        dir: settings.path(&world.source),
                        sheets: world_sheets(),
                    },
                    filter,
                    combine_frames: false,
                    sprite_width: cell,
                    sprite_height: cell,
                    debug_colour: settings.debug_colour,
                    watermark: settings.watermark.clone(),
                    output: AtlasOutput {
                        stem: "world_tiles",
                        sizing: Sizing::Tile(cell),
                    },
                }
            }
            FamilyKind::Ui => {
                return Ok(Job::Ui(UiJob {
                    source: settings.path(&manifest.ui.source),
                    canvas: manifest.ui.canvas,
                    watermark: settings.watermark.clone(),
                    output: settings.pipeline.output_dir.join("ui.png"),
                }));
            }
        };

        family.config.validate()?;
        Ok(Job::Atlas(family))
    }

    pub fn atlas_path(&self) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.png", self.output.stem))
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.json", self.output.stem))
    }
}
