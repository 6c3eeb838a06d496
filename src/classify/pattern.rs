//! Autotile connectivity tables.
//!
//! A wall or floor set is drawn as a 7x3 block of cells. Each filled slot is
//! one connectivity state, tagged with the cardinal directions it joins to
//! (`nsew`, `se`, ...). Slots without a tag hold art that is not part of the
//! connectivity set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Block width in cells.
pub const BLOCK_COLS: u32 = 7;
/// Block height in cells.
pub const BLOCK_ROWS: u32 = 3;

/// Tag returned for slots outside the table.
pub const UNKNOWN: &str = "unknown";

type Table = [[Option<&'static str>; BLOCK_COLS as usize]; BLOCK_ROWS as usize];

#[rustfmt::skip]
const WALL: Table = [
    [Some("se"), Some("ew"), Some("sw"), Some("lone"), Some("sew"), None,         None],
    [Some("ns"), Some("n"),  None,       Some("nse"),  Some("nsew"), Some("nsw"), None],
    [Some("ne"), None,       Some("nw"), None,         Some("new"),  None,        None],
];

#[rustfmt::skip]
const FLOOR: Table = [
    [Some("se"),  Some("sew"),  Some("sw"),  Some("s"),  None,       Some("lone"), None],
    [Some("nse"), Some("nsew"), Some("nsw"), Some("ns"), Some("e"),  Some("ew"),   Some("w")],
    [Some("ne"),  Some("new"),  Some("nw"),  Some("n"),  None,       None,         None],
];

/// Which connectivity table a block follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AutotileLayout {
    Wall,
    Floor,
}

impl AutotileLayout {
    fn table(self) -> &'static Table {
        match self {
            AutotileLayout::Wall => &WALL,
            AutotileLayout::Floor => &FLOOR,
        }
    }

    /// Tag at `(local_col, local_row)`, or `None` for unmapped slots.
    pub fn tag(self, local_col: u32, local_row: u32) -> Option<&'static str> {
        self.table()
            .get(local_row as usize)
            .and_then(|row| row.get(local_col as usize))
            .copied()
            .flatten()
    }

    /// Tag at `(local_col, local_row)`, or [`UNKNOWN`].
    pub fn classify(self, local_col: u32, local_row: u32) -> &'static str {
        self.tag(local_col, local_row).unwrap_or(UNKNOWN)
    }

    /// Every mapped slot as `(local_col, local_row, tag)`, row-major.
    pub fn slots(self) -> impl Iterator<Item = (u32, u32, &'static str)> {
        self.table().iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .filter_map(move |(col, tag)| tag.map(|t| (col as u32, row as u32, t)))
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            AutotileLayout::Wall => "wall",
            AutotileLayout::Floor => "floor",
        }
    }
}

impl fmt::Display for AutotileLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
