//! Autotile block enumeration and extraction.

use image::RgbaImage;

use crate::filter::AllowSet;
use crate::slice::{cell_image, coverage, grid_size, is_kept};
use crate::sprite::SpriteCandidate;

use super::pattern::{AutotileLayout, BLOCK_COLS, BLOCK_ROWS};

/// Sheet rows above the first block row on DawnLike wall and floor sheets.
pub const DEFAULT_HEADER_ROWS: u32 = 3;

/// Blocks extracted when nothing narrows the selection.
pub const DEFAULT_BLOCK_LIMIT: usize = 7;

/// How 7x3 blocks are laid out on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGrid {
    pub header_rows: u32,
    pub blocks_per_row: u32,
    pub total: usize,
}

impl BlockGrid {
    /// Layout for a sheet of `cols` x `rows` cells.
    pub fn new(cols: u32, rows: u32, header_rows: u32) -> Self {
        let available_rows = rows.saturating_sub(header_rows);
        let blocks_per_row = cols / BLOCK_COLS;
        let total = (available_rows / BLOCK_ROWS) as usize * blocks_per_row as usize;
        Self {
            header_rows,
            blocks_per_row,
            total,
        }
    }

    /// Sheet `(row, col)` of the top-left cell of 0-based block `index`.
    pub fn origin(&self, index: usize) -> (u32, u32) {
        let per_row = self.blocks_per_row.max(1) as usize;
        let row = (index / per_row) as u32 * BLOCK_ROWS + self.header_rows;
        let col = (index % per_row) as u32 * BLOCK_COLS;
        (row, col)
    }
}

/// `"{prefix}-{block_index}-{tag}"`, with a 1-based block index.
pub fn block_name(prefix: &str, block_index: usize, tag: &str) -> String {
    format!("{}-{}-{}", prefix, block_index, tag)
}

/// Which blocks of a sheet get extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSelection {
    /// The first `n` blocks.
    First(usize),
    All,
    /// Blocks with at least one tag-derived name in the set.
    Used(AllowSet),
}

impl Default for BlockSelection {
    fn default() -> Self {
        BlockSelection::First(DEFAULT_BLOCK_LIMIT)
    }
}

impl BlockSelection {
    /// 0-based indices of the selected blocks, ascending.
    pub fn select(&self, grid: &BlockGrid, layout: AutotileLayout, prefix: &str) -> Vec<usize> {
        match self {
            BlockSelection::First(n) => (0..grid.total.min(*n)).collect(),
            BlockSelection::All => (0..grid.total).collect(),
            BlockSelection::Used(used) => (0..grid.total)
                .filter(|&idx| {
                    layout
                        .slots()
                        .any(|(_, _, tag)| used.contains(&block_name(prefix, idx + 1, tag)))
                })
                .collect(),
        }
    }
}

/// Options for [`extract_blocks`].
#[derive(Debug, Clone)]
pub struct BlockExtraction<'a> {
    pub prefix: &'a str,
    pub layout: AutotileLayout,
    pub header_rows: u32,
    pub selection: &'a BlockSelection,
    pub cell_size: u32,
    pub threshold: f64,
}

/// Extract the connectivity-tagged cells of every selected block.
///
/// Cells below the transparency threshold and cells on unmapped slots are
/// dropped. Block cells outside the sheet are skipped.
pub fn extract_blocks(sheet: &RgbaImage, opts: &BlockExtraction<'_>) -> Vec<SpriteCandidate> {
    let (cols, rows) = grid_size(sheet, opts.cell_size);
    let grid = BlockGrid::new(cols, rows, opts.header_rows);
    let mut sprites = Vec::new();

    for idx in opts.selection.select(&grid, opts.layout, opts.prefix) {
        let (block_row, block_col) = grid.origin(idx);

        for local_row in 0..BLOCK_ROWS {
            for local_col in 0..BLOCK_COLS {
                let (row, col) = (block_row + local_row, block_col + local_col);
                if row >= rows || col >= cols {
                    continue;
                }

                let Some(tag) = opts.layout.tag(local_col, local_row) else {
                    continue;
                };

                let cell = cell_image(sheet, opts.cell_size, row, col);
                if !is_kept(coverage(&cell), opts.threshold) {
                    continue;
                }

                sprites.push(SpriteCandidate::new(block_name(opts.prefix, idx + 1, tag), cell));
            }
        }
    }

    sprites
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    const SOLID: Rgba<u8> = Rgba([90, 60, 30, 255]);

    fn opaque_sheet(cols: u32, rows: u32) -> RgbaImage {
        RgbaImage::from_pixel(cols * 16, rows * 16, SOLID)
    }

    fn names(sprites: &[SpriteCandidate]) -> Vec<String> {
        sprites.iter().map(|s| s.name.clone()).collect()
    }

    fn extract(sheet: &RgbaImage, layout: AutotileLayout, header_rows: u32, selection: &BlockSelection) -> Vec<SpriteCandidate> {
        extract_blocks(
            sheet,
            &BlockExtraction {
                prefix: layout.name(),
                layout,
                header_rows,
                selection,
                cell_size: 16,
                threshold: 0.1,
            },
        )
    }

    #[test]
    fn test_single_wall_block_yields_thirteen_names() {
        let sheet = opaque_sheet(7, 3);
        let sprites = extract(&sheet, AutotileLayout::Wall, 0, &BlockSelection::default());
        assert_eq!(
            names(&sprites),
            vec![
                "wall-1-se", "wall-1-ew", "wall-1-sw", "wall-1-lone", "wall-1-sew",
                "wall-1-ns", "wall-1-n", "wall-1-nse", "wall-1-nsew", "wall-1-nsw",
                "wall-1-ne", "wall-1-nw", "wall-1-new",
            ]
        );
    }

    #[test]
    fn test_header_rows_skipped() {
        // 3 header rows + one block row of two blocks
        let sheet = opaque_sheet(14, 6);
        let grid = BlockGrid::new(14, 6, DEFAULT_HEADER_ROWS);
        assert_eq!(grid.total, 2);
        assert_eq!(grid.origin(0), (3, 0));
        assert_eq!(grid.origin(1), (3, 7));

        let sprites = extract(&sheet, AutotileLayout::Floor, DEFAULT_HEADER_ROWS, &BlockSelection::All);
        assert_eq!(sprites.len(), 32);
        assert_eq!(sprites[16].name, "floor-2-se");
    }

    #[test]
    fn test_header_only_sheet_has_no_blocks() {
        let grid = BlockGrid::new(7, 3, DEFAULT_HEADER_ROWS);
        assert_eq!(grid.total, 0);
    }

    #[test]
    fn test_block_origin_wraps_rows() {
        let grid = BlockGrid::new(15, 9, 3);
        assert_eq!(grid.blocks_per_row, 2);
        assert_eq!(grid.total, 4);
        assert_eq!(grid.origin(2), (6, 0));
        assert_eq!(grid.origin(3), (6, 7));
    }

    #[test]
    fn test_transparent_cells_never_named() {
        let mut sheet = opaque_sheet(7, 3);
        // Clear the "nsew" slot at (4,1)
        for y in 16..32 {
            for x in 64..80 {
                sheet.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
        let sprites = extract(&sheet, AutotileLayout::Wall, 0, &BlockSelection::All);
        assert_eq!(sprites.len(), 12);
        assert!(!names(&sprites).contains(&"wall-1-nsew".to_string()));
    }

    #[test]
    fn test_first_n_selection() {
        let sheet = opaque_sheet(7, 27);
        let grid = BlockGrid::new(7, 27, 3);
        assert_eq!(grid.total, 8);
        let selected = BlockSelection::default().select(&grid, AutotileLayout::Wall, "wall");
        assert_eq!(selected, (0..7).collect::<Vec<_>>());
        let sprites = extract(&sheet, AutotileLayout::Wall, 3, &BlockSelection::All);
        assert_eq!(sprites.len(), 8 * 13);
    }

    #[test]
    fn test_used_selection_keeps_referenced_blocks() {
        let grid = BlockGrid::new(7, 12, 3);
        let used: AllowSet = ["wall-2-nsew", "floor-1-se", "wall-9-n"].into_iter().collect();
        let selected = BlockSelection::Used(used).select(&grid, AutotileLayout::Wall, "wall");
        assert_eq!(selected, vec![1]);
    }

    #[test]
    fn test_used_selection_ignores_unmapped_names() {
        let grid = BlockGrid::new(7, 6, 3);
        let used: AllowSet = ["wall-1-unknown"].into_iter().collect();
        let selected = BlockSelection::Used(used).select(&grid, AutotileLayout::Wall, "wall");
        assert!(selected.is_empty());
    }
}
