//! The sheet → sprite → atlas pipeline.
//!
//! A build runs in two phases. [`prepare`] resolves every requested family's
//! sheets and name filter, so missing inputs fail the run before anything is
//! written. [`Prepared::run`] then slices, names, filters, combines and packs
//! one family at a time.

mod family;
mod scratch;
mod ui;

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::classify::BlockSelection;
use crate::combine::{combine_frames, FrameAnomaly};
use crate::config::{PipelineConfig, Settings};
use crate::error::Result;
use crate::filter::{filter_optional, read_allow_list, AllowSet, UsedNameProvider};
use crate::output::{display_path, plural, Printer};
use crate::render::{read_png, write_descriptor, write_png, AtlasPacker};
use crate::slice::{grid_size, GridCells};
use crate::sprite::{NamedSprite, SpriteCandidate};

pub use family::{
    world_sheets, AtlasOutput, Family, FamilyKind, FilterStrategy, Job, SheetPlan, SheetSource,
    SourcePlan, StemNaming, UiJob,
};
pub use scratch::ScratchDir;

/// What happened to one source sheet.
#[derive(Debug)]
pub enum SheetOutcome {
    Extracted(Vec<SpriteCandidate>),
    /// The sheet could not be read; the family continues without it.
    Skipped { path: PathBuf, reason: String },
}

/// Read `plan.path` and name its kept cells.
pub fn extract_sheet(
    plan: &SheetPlan,
    config: &PipelineConfig,
    blocks: &BlockSelection,
) -> SheetOutcome {
    match read_png(&plan.path) {
        Ok(sheet) => SheetOutcome::Extracted(plan.naming.extract(
            &sheet,
            config.cell_size,
            config.transparency_threshold,
            blocks,
        )),
        Err(e) => SheetOutcome::Skipped {
            path: plan.path.clone(),
            reason: e.to_string(),
        },
    }
}

/// Summary of one family's run.
#[derive(Debug, Default)]
pub struct FamilyReport {
    pub sheets: usize,
    pub skipped: Vec<PathBuf>,
    /// Candidates staged after extraction, duplicates collapsed.
    pub extracted: usize,
    /// Sprites packed, debug sprite excluded.
    pub packed: usize,
    pub anomalies: Vec<FrameAnomaly>,
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
}

/// A family whose inputs have been resolved.
#[derive(Debug)]
pub struct PreparedFamily {
    pub family: Family,
    pub sheets: Vec<SheetPlan>,
    /// Sheets found but skipped before slicing, with the reason.
    pub rejected: Vec<(PathBuf, String)>,
    /// `None` keeps every name.
    pub names: Option<AllowSet>,
    pub blocks: BlockSelection,
}

/// A job ready to run.
#[derive(Debug)]
pub enum Prepared {
    Atlas(PreparedFamily),
    Ui(UiJob),
}

impl Prepared {
    pub fn kind(&self) -> FamilyKind {
        match self {
            Prepared::Atlas(prepared) => prepared.family.kind,
            Prepared::Ui(_) => FamilyKind::Ui,
        }
    }

    pub fn run(&self, printer: &Printer, root: &Path) -> Result<FamilyReport> {
        match self {
            Prepared::Atlas(prepared) => prepared.run(printer, root),
            Prepared::Ui(job) => {
                job.run(printer, root)?;
                Ok(FamilyReport {
                    sheets: 1,
                    written: vec![job.output.clone()],
                    ..Default::default()
                })
            }
        }
    }
}

/// Resolve the sheets and filters of every job, failing on the first fatal
/// input problem.
pub fn prepare(kinds: &[FamilyKind], settings: &Settings, printer: &Printer) -> Result<Vec<Prepared>> {
    kinds
        .iter()
        .map(|&kind| match Family::build(kind, settings)? {
            Job::Atlas(family) => {
                PreparedFamily::prepare(family, settings, printer).map(Prepared::Atlas)
            }
            Job::Ui(job) => job.check().map(|_| Prepared::Ui(job)),
        })
        .collect()
}

/// Prepare then run every job in `kinds`, in order.
pub fn build(kinds: &[FamilyKind], settings: &Settings, printer: &Printer) -> Result<Vec<(FamilyKind, FamilyReport)>> {
    let prepared = prepare(kinds, settings, printer)?;
    let mut reports = Vec::with_capacity(prepared.len());
    for job in &prepared {
        printer.info("Building", job.kind().name());
        reports.push((job.kind(), job.run(printer, &settings.root)?));
    }
    Ok(reports)
}

impl PreparedFamily {
    pub fn prepare(family: Family, settings: &Settings, printer: &Printer) -> Result<Self> {
        let SourcePlan { sheets, rejected } = family.sources.plan()?;
        let root = &settings.root;

        let (names, blocks) = match &family.filter {
            FilterStrategy::None => (None, settings.default_blocks()),
            FilterStrategy::AllowList(source) => {
                let names = read_allow_list(source)?;
                printer.status(
                    "Loading",
                    &format!(
                        "{} from {}",
                        plural(names.len(), "name", "names"),
                        display_path(&source.path, root)
                    ),
                );
                (Some(names), settings.default_blocks())
            }
            FilterStrategy::UsedNames(provider) => {
                if provider.is_available() {
                    let names = provider.names()?;
                    printer.status(
                        "Loading",
                        &format!(
                            "{} used by {}",
                            plural(names.len(), "name", "names"),
                            display_path(Path::new(&provider.describe()), root)
                        ),
                    );
                    (Some(names.clone()), BlockSelection::Used(names))
                } else {
                    printer.warning(
                        "Warning",
                        &format!(
                            "{} not found, {} sprites are not filtered",
                            display_path(Path::new(&provider.describe()), root),
                            family.kind
                        ),
                    );
                    (None, settings.default_blocks())
                }
            }
        };

        Ok(Self {
            family,
            sheets,
            rejected,
            names,
            blocks,
        })
    }

    /// Slice every sheet and pack the survivors into the family's atlas.
    pub fn run(&self, printer: &Printer, root: &Path) -> Result<FamilyReport> {
        let family = &self.family;
        let config = &family.config;
        let mut report = FamilyReport {
            sheets: self.sheets.len() + self.rejected.len(),
            ..Default::default()
        };

        for (path, reason) in &self.rejected {
            printer.warning("Skipped", &format!("{}: {}", display_path(path, root), reason));
            report.skipped.push(path.clone());
        }

        if self.sheets.is_empty() {
            if let SheetSource::Directory { dir, .. } = &family.sources {
                printer.warning(
                    "Empty",
                    &format!("no sheets in {}, nothing written", display_path(dir, root)),
                );
            }
            return Ok(report);
        }

        let mut scratch = ScratchDir::new()?;
        printer.verbose("Scratch", &scratch.path().display().to_string());

        for plan in &self.sheets {
            match extract_sheet(plan, config, &self.blocks) {
                SheetOutcome::Extracted(sprites) => {
                    printer.status(
                        "Slicing",
                        &format!(
                            "{} ({} kept)",
                            display_path(&plan.path, root),
                            plural(sprites.len(), "sprite", "sprites")
                        ),
                    );
                    for sprite in &sprites {
                        if scratch.store(sprite)? {
                            printer.verbose("Replaced", &sprite.name);
                        }
                    }
                }
                SheetOutcome::Skipped { path, reason } => {
                    printer.warning("Skipped", &format!("{}: {}", display_path(&path, root), reason));
                    report.skipped.push(path);
                }
            }
        }

        let candidates = scratch.load()?;
        report.extracted = candidates.len();
        let candidates = filter_optional(candidates, self.names.as_ref());

        let sprites: Vec<NamedSprite> = if family.combine_frames {
            let combined = combine_frames(candidates, config.cell_size);
            for anomaly in &combined.anomalies {
                printer.warning(
                    "Warning",
                    &format!(
                        "{} has {} frames (expected 1 or 2), dropped",
                        anomaly.name, anomaly.frames
                    ),
                );
            }
            report.anomalies = combined.anomalies;
            combined.sprites
        } else {
            let mut sprites: Vec<NamedSprite> =
                candidates.into_iter().map(NamedSprite::from).collect();
            sprites.sort_by(|a, b| a.name.cmp(&b.name));
            sprites
        };

        if sprites.is_empty() {
            printer.warning(
                "Empty",
                &format!("no {} sprites left after filtering, nothing written", family.kind),
            );
            return Ok(report);
        }

        for sprite in &sprites {
            printer.verbose("Adding", &sprite.name);
        }

        let packer = AtlasPacker::new(family.sprite_width, family.sprite_height)
            .with_min_size(config.atlas_min_size)
            .with_debug_colour(family.debug_colour)
            .with_watermark(family.watermark.clone());
        let atlas = packer.pack(&sprites)?;
        printer.status(
            "Packing",
            &format!(
                "{} into {}x{} ({} per row)",
                plural(sprites.len() + 1, "sprite", "sprites"),
                atlas.layout.width,
                atlas.layout.height,
                atlas.layout.sprites_per_row
            ),
        );
        report.packed = sprites.len();

        let atlas_path = family.atlas_path();
        write_png(&atlas.image, &atlas_path)?;
        printer.status("Wrote", &display_path(&atlas_path, root));
        report.written.push(atlas_path);

        let descriptor_path = family.descriptor_path();
        write_descriptor(family.output.sizing, &atlas.coordinates, &descriptor_path)?;
        printer.status("Wrote", &display_path(&descriptor_path, root));
        report.written.push(descriptor_path);

        Ok(report)
    }
}

/// Grid size of a sheet and a count of its kept cells.
pub fn sheet_summary(sheet: &RgbaImage, config: &PipelineConfig) -> (u32, u32, usize) {
    let (cols, rows) = grid_size(sheet, config.cell_size);
    let kept = GridCells::new(sheet, config.cell_size, config.transparency_threshold)
        .filter(|cell| cell.keep)
        .count();
    (cols, rows, kept)
}
