//! Init command implementation.
//!
//! Writes a `tilesmith.yaml` holding every default, ready to edit.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::discovery::{scan_sheets, Manifest, MANIFEST_FILENAME};
use crate::error::{Result, TileError};
use crate::output::{display_path, plural, Printer};

/// Initialize a tilesmith project (generates tilesmith.yaml)
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing tilesmith.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    // Check for existing manifest
    if manifest_path.exists() && !args.force {
        return Err(TileError::Build {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let manifest = Manifest::default();

    // Report which default source directories are already in place
    for (family, dir) in [
        ("characters", &manifest.characters.source),
        ("items", &manifest.items.source),
        ("world", &manifest.world.source),
    ] {
        let dir = args.path.join(dir);
        match scan_sheets(&dir) {
            Ok(sheets) => printer.info(
                "Found",
                &format!(
                    "{} for {} in {}",
                    plural(sheets.len(), "sheet", "sheets"),
                    family,
                    display_path(&dir, &args.path)
                ),
            ),
            Err(_) => printer.warning(
                "Missing",
                &format!("{} sources: {}", family, display_path(&dir, &args.path)),
            ),
        }
    }

    let yaml = manifest.to_yaml()?;
    fs::write(&manifest_path, &yaml).map_err(|e| TileError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    printer.status("Created", MANIFEST_FILENAME);

    Ok(())
}
