//! Inspect command implementation.
//!
//! Slices a single sheet and reports what the pipeline would keep, without
//! writing anything.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use crate::classify::{
    extract_blocks, AutotileLayout, BlockExtraction, BlockSelection, DEFAULT_HEADER_ROWS,
};
use crate::config::PipelineConfig;
use crate::error::{Result, TileError};
use crate::output::{plural, Printer};
use crate::pipeline::sheet_summary;
use crate::render::read_png;
use crate::slice::DEFAULT_TRANSPARENCY_THRESHOLD;

/// Slice one sheet and show its grid and the names it would produce
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// PNG sheet to inspect
    #[arg(required = true)]
    pub sheet: PathBuf,

    /// Cell size in pixels
    #[arg(long, default_value = "16")]
    pub cell_size: u32,

    /// Minimum opaque fraction for a cell to be kept
    #[arg(long, default_value_t = DEFAULT_TRANSPARENCY_THRESHOLD)]
    pub threshold: f64,

    /// Classify the sheet as an autotile set and list the names
    #[arg(long, value_enum)]
    pub layout: Option<AutotileLayout>,

    /// Sheet rows above the first autotile block
    #[arg(long, default_value_t = DEFAULT_HEADER_ROWS)]
    pub header_rows: u32,

    /// Name prefix for classified sprites (default: the layout name)
    #[arg(long)]
    pub prefix: Option<String>,
}

pub fn run(args: InspectArgs, printer: &Printer) -> Result<()> {
    let config = PipelineConfig {
        cell_size: args.cell_size,
        transparency_threshold: args.threshold,
        ..Default::default()
    };
    config.validate()?;

    let sheet = read_png(&args.sheet)?;
    let (cols, rows, kept) = sheet_summary(&sheet, &config);

    if sheet.width() % args.cell_size != 0 || sheet.height() % args.cell_size != 0 {
        printer.warning(
            "Warning",
            &format!(
                "{}x{} is not a multiple of {}; partial cells ignored",
                sheet.width(),
                sheet.height(),
                args.cell_size
            ),
        );
    }

    let mut out = io::stdout().lock();
    let total = (cols * rows) as usize;
    write_line(
        &mut out,
        &format!(
            "{}: {}x{} grid, {} kept, {} dropped",
            args.sheet.display(),
            cols,
            rows,
            plural(kept, "cell", "cells"),
            total - kept
        ),
    )?;

    if let Some(layout) = args.layout {
        let prefix = args.prefix.unwrap_or_else(|| layout.name().to_string());
        let sprites = extract_blocks(
            &sheet,
            &BlockExtraction {
                prefix: &prefix,
                layout,
                header_rows: args.header_rows,
                selection: &BlockSelection::All,
                cell_size: config.cell_size,
                threshold: config.transparency_threshold,
            },
        );

        for sprite in &sprites {
            write_line(&mut out, &sprite.name)?;
        }
        printer.info(
            "Classified",
            &format!("{} as {}", plural(sprites.len(), "sprite", "sprites"), layout),
        );
    }

    Ok(())
}

fn write_line(out: &mut impl Write, line: &str) -> Result<()> {
    writeln!(out, "{}", line).map_err(TileError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::write_png;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn args(sheet: PathBuf) -> InspectArgs {
        InspectArgs {
            sheet,
            cell_size: 16,
            threshold: DEFAULT_TRANSPARENCY_THRESHOLD,
            layout: None,
            header_rows: 0,
            prefix: None,
        }
    }

    #[test]
    fn test_inspect_plain_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Tile.png");
        write_png(&RgbaImage::from_pixel(48, 16, Rgba([9, 9, 9, 255])), &path).unwrap();

        run(args(path), &Printer::quiet()).unwrap();
    }

    #[test]
    fn test_inspect_with_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Wall.png");
        write_png(&RgbaImage::from_pixel(112, 48, Rgba([9, 9, 9, 255])), &path).unwrap();

        let mut inspect = args(path);
        inspect.layout = Some(AutotileLayout::Wall);
        run(inspect, &Printer::quiet()).unwrap();
    }

    #[test]
    fn test_inspect_rejects_zero_cell() {
        let dir = tempdir().unwrap();
        let mut inspect = args(dir.path().join("Tile.png"));
        inspect.cell_size = 0;
        assert!(matches!(
            run(inspect, &Printer::quiet()),
            Err(TileError::Config { .. })
        ));
    }

    #[test]
    fn test_inspect_missing_sheet() {
        let dir = tempdir().unwrap();
        assert!(run(args(dir.path().join("nope.png")), &Printer::quiet()).is_err());
    }
}
