//! Screen geometry: which way up the board is drawn, and hit-testing.
//!
//! Orientation only ever changes where a square is drawn. Logical addressing
//! (`Square`, the influence grid, the service coordinates) is the same either
//! way up.

use board_core::{File, Rank, Square};

/// Side of one square as a percentage of the board edge.
pub const SQUARE_PERCENT: f64 = 12.5;

/// Which side sits at the bottom of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    WhiteAtBottom,
    BlackAtBottom,
}

impl Orientation {
    pub const fn flipped(self) -> Self {
        match self {
            Orientation::WhiteAtBottom => Orientation::BlackAtBottom,
            Orientation::BlackAtBottom => Orientation::WhiteAtBottom,
        }
    }

    /// Accepts `white` / `black` (the side at the bottom).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "white-at-bottom" => Some(Orientation::WhiteAtBottom),
            "black" | "black-at-bottom" => Some(Orientation::BlackAtBottom),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Orientation::WhiteAtBottom => "white",
            Orientation::BlackAtBottom => "black",
        }
    }

    /// Screen slot of `square` as `(row from top, column from left)`.
    ///
    /// Flipping mirrors both axes, matching the board's own visual flip.
    pub const fn slot(self, square: Square) -> (u8, u8) {
        match self {
            Orientation::WhiteAtBottom => (7 - square.y(), square.x()),
            Orientation::BlackAtBottom => (square.y(), 7 - square.x()),
        }
    }

    /// Inverse of [`Orientation::slot`].
    pub fn square_at_slot(self, row: u8, column: u8) -> Option<Square> {
        if row > 7 || column > 7 {
            return None;
        }
        let (file, rank) = match self {
            Orientation::WhiteAtBottom => (column, 7 - row),
            Orientation::BlackAtBottom => (7 - column, row),
        };
        Some(Square::new(File::from_index(file)?, Rank::from_index(rank)?))
    }

    /// Distance of the square's top edge from the board's top edge, in percent.
    pub fn top_percent(self, square: Square) -> f64 {
        f64::from(self.slot(square).0) * SQUARE_PERCENT
    }

    /// Distance of the square's left edge from the board's left edge, in percent.
    pub fn left_percent(self, square: Square) -> f64 {
        f64::from(self.slot(square).1) * SQUARE_PERCENT
    }
}

/// Which side's influence the service is asked to describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Allies,
    Enemies,
}

impl View {
    pub const fn toggled(self) -> Self {
        match self {
            View::Allies => View::Enemies,
            View::Enemies => View::Allies,
        }
    }

    pub const fn service_name(self) -> &'static str {
        match self {
            View::Allies => "allies",
            View::Enemies => "enemies",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "allies" => Some(View::Allies),
            "enemies" => Some(View::Enemies),
            _ => None,
        }
    }
}

/// The on-screen rectangle the board is drawn in, in any pixel unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoardGeometry {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A square board of side `size` at the origin.
    pub const fn square(size: f32) -> Self {
        Self::new(0.0, 0.0, size, size)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && y >= self.top && x < self.left + self.width && y < self.top + self.height
    }

    /// The square under the pointer, or `None` when the pointer is off the board.
    pub fn square_at(&self, orientation: Orientation, x: f32, y: f32) -> Option<Square> {
        if !self.contains(x, y) || self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let column = ((x - self.left) / (self.width / 8.0)).floor();
        let row = ((y - self.top) / (self.height / 8.0)).floor();
        // Rounding at the far edge can still land on 8.
        orientation.square_at_slot(row.min(7.0) as u8, column.min(7.0) as u8)
    }
}
