//! Build command implementation.
//!
//! Locates the project, merges manifest and flags, then runs the requested
//! families through the pipeline.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Args;

use crate::config::{Overrides, Settings};
use crate::discovery::{discover, discover_at, MANIFEST_FILENAME};
use crate::error::{Result, TileError};
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{self, FamilyKind};

/// Slice tilesets and pack sprite atlases
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Families to build (default: all)
    #[arg(value_enum)]
    pub families: Vec<FamilyKind>,

    /// Project root (default: search upward from the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output directory, relative to the project root
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Minimum opaque fraction for a cell to be kept
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Pack every extracted sprite instead of filtering by name
    #[arg(long)]
    pub no_allow_list: bool,

    /// Extract every autotile block instead of the first few
    #[arg(long)]
    pub all_blocks: bool,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let project = match &args.root {
        Some(root) => discover_at(root)?,
        None => {
            let cwd = std::env::current_dir()?;
            let project = discover(&cwd)?;
            if !project.found_root {
                printer.warning(
                    "Warning",
                    &format!(
                        "no {} or project.godot found, using {} as project root",
                        MANIFEST_FILENAME,
                        cwd.display()
                    ),
                );
            }
            project
        }
    };

    if !project.root.is_dir() {
        return Err(TileError::MissingSource {
            paths: vec![project.root.clone()],
        });
    }

    printer.status("Project", &project.root.display().to_string());
    if project.has_manifest {
        printer.verbose("Manifest", MANIFEST_FILENAME);
    }

    let overrides = Overrides {
        output: args.output,
        threshold: args.threshold,
        no_allow_list: args.no_allow_list,
        all_blocks: args.all_blocks,
    };
    let settings = Settings::resolve(&project, &overrides)?;

    let kinds = if args.families.is_empty() {
        FamilyKind::ALL.to_vec()
    } else {
        unique_families(args.families)
    };

    let reports = pipeline::build(&kinds, &settings, printer)?;

    let written: usize = reports.iter().map(|(_, r)| r.written.len()).sum();
    let skipped: usize = reports.iter().map(|(_, r)| r.skipped.len()).sum();
    let mut summary = format!(
        "{} to {}",
        plural(written, "file", "files"),
        display_path(&settings.pipeline.output_dir, &settings.root)
    );
    if skipped > 0 {
        summary.push_str(&format!(", {} skipped", plural(skipped, "sheet", "sheets")));
    }
    printer.info("Finished", &summary);

    Ok(())
}

/// Drop repeated families, keeping the first mention of each.
fn unique_families(families: Vec<FamilyKind>) -> Vec<FamilyKind> {
    let mut seen = HashSet::new();
    families.into_iter().filter(|kind| seen.insert(*kind)).collect()
}
