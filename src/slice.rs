//! Grid slicing with transparency filtering.
//!
//! A source sheet is cut into uniform square cells. Each cell reports how much
//! of it is covered by non-transparent pixels; cells below the threshold are
//! flagged as not kept and never get a name downstream.

use std::ops::RangeInclusive;

use image::RgbaImage;

/// Default share of non-transparent pixels a cell needs to be kept.
pub const DEFAULT_TRANSPARENCY_THRESHOLD: f64 = 0.1;

/// A single cell cut from a sheet grid.
#[derive(Debug, Clone)]
pub struct SlicedCell {
    pub row: u32,
    pub col: u32,
    pub image: RgbaImage,
    /// Non-transparent pixels / total pixels.
    pub coverage: f64,
    pub keep: bool,
}

/// Fraction of pixels in `img` with non-zero alpha.
pub fn coverage(img: &RgbaImage) -> f64 {
    let total = img.width() as u64 * img.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let opaque = img.pixels().filter(|p| p[3] > 0).count() as u64;
    opaque as f64 / total as f64
}

pub fn is_kept(coverage: f64, threshold: f64) -> bool {
    coverage >= threshold
}

/// Grid dimensions `(cols, rows)` of a sheet, truncating partial cells.
pub fn grid_size(sheet: &RgbaImage, cell_size: u32) -> (u32, u32) {
    if cell_size == 0 {
        return (0, 0);
    }
    (sheet.width() / cell_size, sheet.height() / cell_size)
}

/// Crop the cell at `(row, col)`.
pub fn cell_image(sheet: &RgbaImage, cell_size: u32, row: u32, col: u32) -> RgbaImage {
    image::imageops::crop_imm(sheet, col * cell_size, row * cell_size, cell_size, cell_size)
        .to_image()
}

/// Lazy row-major iterator over the cells of a sheet.
///
/// Rows ascend in the outer loop, columns in the inner loop.
pub struct GridCells<'a> {
    sheet: &'a RgbaImage,
    cell_size: u32,
    threshold: f64,
    cols: u32,
    row: u32,
    col: u32,
    end_row: u32,
}

impl<'a> GridCells<'a> {
    pub fn new(sheet: &'a RgbaImage, cell_size: u32, threshold: f64) -> Self {
        let (cols, rows) = grid_size(sheet, cell_size);
        Self {
            sheet,
            cell_size,
            threshold,
            cols,
            row: 0,
            col: 0,
            end_row: rows,
        }
    }

    /// Restrict iteration to the given sheet rows, clamped to the grid.
    pub fn rows(mut self, range: RangeInclusive<u32>) -> Self {
        let (_, rows) = grid_size(self.sheet, self.cell_size);
        self.row = *range.start();
        self.end_row = range.end().saturating_add(1).min(rows);
        self
    }
}

impl Iterator for GridCells<'_> {
    type Item = SlicedCell;

    fn next(&mut self) -> Option<SlicedCell> {
        if self.cols == 0 || self.row >= self.end_row {
            return None;
        }

        let (row, col) = (self.row, self.col);
        self.col += 1;
        if self.col >= self.cols {
            self.col = 0;
            self.row += 1;
        }

        let image = cell_image(self.sheet, self.cell_size, row, col);
        let coverage = coverage(&image);
        Some(SlicedCell {
            row,
            col,
            keep: is_kept(coverage, self.threshold),
            coverage,
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn test_coverage_counts_any_nonzero_alpha() {
        let mut img = RgbaImage::from_pixel(4, 4, CLEAR);
        img.put_pixel(0, 0, Rgba([10, 10, 10, 1]));
        img.put_pixel(1, 0, RED);
        assert_eq!(coverage(&img), 2.0 / 16.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(is_kept(0.1, 0.1));
        assert!(!is_kept(0.099, 0.1));
    }

    #[test]
    fn test_row_major_order() {
        let img = RgbaImage::from_pixel(4, 4, RED);
        let cells: Vec<_> = GridCells::new(&img, 2, 0.1).map(|c| (c.row, c.col)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_partial_cells_truncated() {
        // 5x3 with 2px cells: one partial column and one partial row dropped
        let img = RgbaImage::from_pixel(5, 3, RED);
        let cells: Vec<_> = GridCells::new(&img, 2, 0.1).collect();
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|c| c.image.dimensions() == (2, 2)));
    }

    #[test]
    fn test_sparse_cell_not_kept() {
        // 16x16 cell with 25 opaque pixels is under 10%
        let mut img = RgbaImage::from_pixel(32, 16, CLEAR);
        for i in 0..25 {
            img.put_pixel(i % 16, i / 16, RED);
        }
        for y in 0..16 {
            for x in 16..32 {
                img.put_pixel(x, y, RED);
            }
        }
        let cells: Vec<_> = GridCells::new(&img, 16, DEFAULT_TRANSPARENCY_THRESHOLD).collect();
        assert!(!cells[0].keep);
        assert!(cells[1].keep);
        assert_eq!(cells[1].coverage, 1.0);
    }

    #[test]
    fn test_row_range_clamped_to_sheet() {
        let img = RgbaImage::from_pixel(2, 12, RED);
        let rows: Vec<_> = GridCells::new(&img, 2, 0.1).rows(4..=15).map(|c| c.row).collect();
        assert_eq!(rows, vec![4, 5]);
    }

    #[test]
    fn test_row_range_past_sheet_is_empty() {
        let img = RgbaImage::from_pixel(2, 4, RED);
        assert_eq!(GridCells::new(&img, 2, 0.1).rows(4..=15).count(), 0);
    }

    #[test]
    fn test_zero_cell_size_yields_nothing() {
        let img = RgbaImage::from_pixel(4, 4, RED);
        assert_eq!(GridCells::new(&img, 0, 0.1).count(), 0);
    }

    #[test]
    fn test_cell_image_crops_expected_region() {
        let mut img = RgbaImage::from_pixel(4, 4, CLEAR);
        img.put_pixel(3, 2, RED);
        let cell = cell_image(&img, 2, 1, 1);
        assert_eq!(*cell.get_pixel(1, 0), RED);
        assert_eq!(*cell.get_pixel(0, 0), CLEAR);
    }
}
