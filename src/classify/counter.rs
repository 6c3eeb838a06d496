//! Running-index naming for sheets without connectivity structure.
//!
//! The counter advances over every scanned cell, kept or not, so a sprite's
//! name only depends on its grid position and stays stable when neighbouring
//! cells are emptied.

use std::ops::RangeInclusive;

use image::RgbaImage;

use crate::slice::GridCells;
use crate::sprite::SpriteCandidate;

/// Rows scanned on a decor sheet.
pub const DECOR_ROWS: RangeInclusive<u32> = 4..=15;

/// `"{prefix}-{counter}"`.
pub fn counter_name(prefix: &str, counter: usize) -> String {
    format!("{}-{}", prefix, counter)
}

/// Name every kept cell in `rows` (all rows when `None`) by running index.
pub fn extract_counted(
    sheet: &RgbaImage,
    prefix: &str,
    rows: Option<RangeInclusive<u32>>,
    cell_size: u32,
    threshold: f64,
) -> Vec<SpriteCandidate> {
    let cells = GridCells::new(sheet, cell_size, threshold);
    let cells = match rows {
        Some(range) => cells.rows(range),
        None => cells,
    };

    cells
        .enumerate()
        .filter(|(_, cell)| cell.keep)
        .map(|(counter, cell)| SpriteCandidate::new(counter_name(prefix, counter), cell.image))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
    const SOLID: Rgba<u8> = Rgba([200, 180, 40, 255]);

    fn fill_cell(sheet: &mut RgbaImage, row: u32, col: u32) {
        for y in row * 16..(row + 1) * 16 {
            for x in col * 16..(col + 1) * 16 {
                sheet.put_pixel(x, y, SOLID);
            }
        }
    }

    #[test]
    fn test_counter_skips_but_counts_empty_cells() {
        let mut sheet = RgbaImage::from_pixel(48, 32, CLEAR);
        fill_cell(&mut sheet, 0, 1);
        fill_cell(&mut sheet, 1, 2);

        let names: Vec<_> = extract_counted(&sheet, "ground", None, 16, 0.1)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["ground-1", "ground-5"]);
    }

    #[test]
    fn test_decor_rows_restart_counter() {
        let mut sheet = RgbaImage::from_pixel(32, 16 * 6, CLEAR);
        fill_cell(&mut sheet, 0, 0);
        fill_cell(&mut sheet, 4, 1);
        fill_cell(&mut sheet, 5, 0);

        let names: Vec<_> = extract_counted(&sheet, "decor", Some(DECOR_ROWS), 16, 0.1)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["decor-1", "decor-2"]);
    }

    #[test]
    fn test_cells_keep_pixels() {
        let mut sheet = RgbaImage::from_pixel(32, 16, CLEAR);
        fill_cell(&mut sheet, 0, 1);
        let sprites = extract_counted(&sheet, "tile", None, 16, 0.1);
        assert_eq!(sprites[0].image.dimensions(), (16, 16));
        assert_eq!(*sprites[0].image.get_pixel(3, 3), SOLID);
    }
}
