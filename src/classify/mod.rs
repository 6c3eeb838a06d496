//! Cell naming and connectivity classification.
//!
//! Every sheet is named by one [`NamingStrategy`]:
//!
//! - `Autotile` sheets are read as 7x3 blocks and named by connectivity tag.
//! - `Counter` sheets name each kept cell by its running grid index.
//! - `Frames` sheets are counter-named and tagged with an animation frame so
//!   the frame combiner can pair them up later.

mod blocks;
mod counter;
mod pattern;

use std::ops::RangeInclusive;

use image::RgbaImage;

use crate::sprite::SpriteCandidate;

pub use blocks::{
    block_name, extract_blocks, BlockExtraction, BlockGrid, BlockSelection, DEFAULT_BLOCK_LIMIT,
    DEFAULT_HEADER_ROWS,
};
pub use counter::{counter_name, extract_counted, DECOR_ROWS};
pub use pattern::{AutotileLayout, BLOCK_COLS, BLOCK_ROWS, UNKNOWN};

/// How the kept cells of one sheet are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingStrategy {
    Autotile {
        prefix: String,
        layout: AutotileLayout,
        header_rows: u32,
    },
    Counter {
        prefix: String,
        rows: Option<RangeInclusive<u32>>,
    },
    Frames {
        character: String,
        frame: u32,
    },
}

impl NamingStrategy {
    /// Name prefix shared by every sprite this strategy emits.
    pub fn prefix(&self) -> &str {
        match self {
            NamingStrategy::Autotile { prefix, .. } | NamingStrategy::Counter { prefix, .. } => {
                prefix
            }
            NamingStrategy::Frames { character, .. } => character,
        }
    }

    /// Slice `sheet` and name its kept cells.
    ///
    /// `selection` only applies to autotile sheets.
    pub fn extract(
        &self,
        sheet: &RgbaImage,
        cell_size: u32,
        threshold: f64,
        selection: &BlockSelection,
    ) -> Vec<SpriteCandidate> {
        match self {
            NamingStrategy::Autotile {
                prefix,
                layout,
                header_rows,
            } => extract_blocks(
                sheet,
                &BlockExtraction {
                    prefix,
                    layout: *layout,
                    header_rows: *header_rows,
                    selection,
                    cell_size,
                    threshold,
                },
            ),
            NamingStrategy::Counter { prefix, rows } => {
                extract_counted(sheet, prefix, rows.clone(), cell_size, threshold)
            }
            NamingStrategy::Frames { character, frame } => {
                extract_counted(sheet, character, None, cell_size, threshold)
                    .into_iter()
                    .map(|sprite| sprite.with_frame(*frame))
                    .collect()
            }
        }
    }
}

/// Split a character sheet stem like `Player1` into `("player", 1)`.
///
/// Stems without trailing digits are frame 0. `None` when the trailing
/// digits overflow a `u32`.
pub fn parse_frame_stem(stem: &str) -> Option<(String, u32)> {
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    // The name needs at least one character, so an all-digit stem lends it one.
    let split = match digits_start {
        Some(0) if stem.len() > 1 => 1,
        Some(i) if i > 0 => i,
        _ => return Some((stem.to_lowercase(), 0)),
    };
    let frame = stem[split..].parse().ok()?;
    Some((stem[..split].to_lowercase(), frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_parse_frame_stem() {
        assert_eq!(parse_frame_stem("Player0"), Some(("player".to_string(), 0)));
        assert_eq!(parse_frame_stem("Rodent1"), Some(("rodent".to_string(), 1)));
        assert_eq!(parse_frame_stem("Undead12"), Some(("undead".to_string(), 12)));
    }

    #[test]
    fn test_parse_frame_stem_without_digits() {
        assert_eq!(parse_frame_stem("Pest"), Some(("pest".to_string(), 0)));
    }

    #[test]
    fn test_parse_frame_stem_all_digits() {
        assert_eq!(parse_frame_stem("42"), Some(("4".to_string(), 2)));
        assert_eq!(parse_frame_stem("7"), Some(("7".to_string(), 0)));
    }

    #[test]
    fn test_parse_frame_stem_overflow() {
        assert_eq!(parse_frame_stem("Player4294967295"), Some(("player".to_string(), u32::MAX)));
        assert_eq!(parse_frame_stem("Player4294967296"), None);
        assert_eq!(parse_frame_stem("Player00000000000000000001"), Some(("player".to_string(), 1)));
    }

    #[test]
    fn test_frames_strategy_tags_frame() {
        let sheet = RgbaImage::from_pixel(32, 16, Rgba([1, 2, 3, 255]));
        let strategy = NamingStrategy::Frames {
            character: "avian".to_string(),
            frame: 1,
        };
        let sprites = strategy.extract(&sheet, 16, 0.1, &BlockSelection::All);
        let tagged: Vec<_> = sprites.iter().map(|s| (s.name.as_str(), s.frame)).collect();
        assert_eq!(tagged, vec![("avian-0", Some(1)), ("avian-1", Some(1))]);
    }

    #[test]
    fn test_prefix() {
        let strategy = NamingStrategy::Autotile {
            prefix: "wall".to_string(),
            layout: AutotileLayout::Wall,
            header_rows: 3,
        };
        assert_eq!(strategy.prefix(), "wall");
    }
}
