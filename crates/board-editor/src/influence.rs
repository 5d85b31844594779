//! Influence values as returned by the remote service.

use std::collections::BTreeSet;

use board_core::Square;

/// What a cell's influence means for the selected view.
///
/// Yellow marks squares controlled by the viewed side, green its defended
/// pieces, red enemy pieces in its line of sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfluenceColor {
    Green,
    Yellow,
    Red,
}

impl InfluenceColor {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "green" => Some(InfluenceColor::Green),
            "yellow" => Some(InfluenceColor::Yellow),
            "red" => Some(InfluenceColor::Red),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            InfluenceColor::Green => "green",
            InfluenceColor::Yellow => "yellow",
            InfluenceColor::Red => "red",
        }
    }
}

/// Computed influence on one square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfluenceCell {
    pub color: InfluenceColor,
    pub quantity: u32,
    /// Squares whose pieces contribute to this cell.
    pub origins: BTreeSet<Square>,
}

impl InfluenceCell {
    pub fn new(color: InfluenceColor, quantity: u32) -> Self {
        Self {
            color,
            quantity,
            origins: BTreeSet::new(),
        }
    }

    pub fn with_origins(mut self, origins: impl IntoIterator<Item = Square>) -> Self {
        self.origins.extend(origins);
        self
    }
}

/// 8x8 influence values, indexed like the board: `cells[rank][file]`.
///
/// A `None` cell means "no computed influence".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InfluenceGrid {
    cells: [[Option<InfluenceCell>; 8]; 8],
}

impl InfluenceGrid {
    /// The all-null grid shown before the first response and after failures.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, square: Square) -> Option<&InfluenceCell> {
        self.cells[square.y() as usize][square.x() as usize].as_ref()
    }

    pub fn set(&mut self, square: Square, cell: Option<InfluenceCell>) {
        self.cells[square.y() as usize][square.x() as usize] = cell;
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }

    /// Non-null cells with the square they belong to, rank-major.
    pub fn cells(&self) -> impl Iterator<Item = (Square, &InfluenceCell)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|cell| (sq, cell)))
    }

    /// Every square whose cell lists `origin` among its origins.
    pub fn influenced_by(&self, origin: Square) -> BTreeSet<Square> {
        self.cells()
            .filter(|(_, cell)| cell.origins.contains(&origin))
            .map(|(sq, _)| sq)
            .collect()
    }
}
