//! The UI family: the GUI sheet pasted 1:1 onto a square canvas.

use image::{imageops, RgbaImage};

use crate::error::{Result, TileError};
use crate::output::{display_path, Printer};
use crate::render::{read_png, write_png};

use super::family::UiJob;

impl UiJob {
    /// Fail before any output is written when the source is missing.
    pub fn check(&self) -> Result<()> {
        if !self.source.is_file() {
            return Err(TileError::MissingSource {
                paths: vec![self.source.clone()],
            });
        }
        Ok(())
    }

    /// Compose the canvas without writing it.
    pub fn compose(&self, source: &RgbaImage) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.canvas, self.canvas);
        imageops::replace(&mut canvas, source, 0, 0);
        if let Some(watermark) = &self.watermark {
            watermark.stamp(&mut canvas);
        }
        canvas
    }

    pub fn run(&self, printer: &Printer, root: &std::path::Path) -> Result<()> {
        let source = read_png(&self.source)?;
        if source.width() > self.canvas || source.height() > self.canvas {
            printer.warning(
                "Warning",
                &format!(
                    "{} is {}x{}, clipped to {}x{}",
                    display_path(&self.source, root),
                    source.width(),
                    source.height(),
                    self.canvas,
                    self.canvas
                ),
            );
        }

        let canvas = self.compose(&source);
        write_png(&canvas, &self.output)?;
        printer.status("Wrote", &display_path(&self.output, root));
        Ok(())
    }
}
