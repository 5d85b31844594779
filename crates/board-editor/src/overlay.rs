//! Influence overlay: positions the service's grid on screen and tracks
//! which origin squares are highlighted.
//!
//! Rendering is a pure function of grid, orientation and highlight set.
//! The highlight set itself is derived on demand from a [`Highlighter`], so a
//! fresh grid automatically refreshes the highlight of whatever is focused.

use std::collections::BTreeSet;

use board_core::Square;

use crate::{InfluenceCell, InfluenceColor, InfluenceGrid, Orientation};

/// Visible influence marker on one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    pub color: InfluenceColor,
    pub quantity: u32,
}

impl Indicator {
    /// Short text such as `"Y:2"`.
    pub fn label(&self) -> String {
        let initial = self.color.name().chars().next().unwrap_or('?');
        format!("{}:{}", initial.to_ascii_uppercase(), self.quantity)
    }

    /// Shading strength in `0.0..=5.0`.
    pub fn intensity(&self) -> f64 {
        (f64::from(self.quantity) / 2.0).min(5.0)
    }
}

/// One positioned overlay cell.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayCell {
    pub square: Square,
    /// Percent from the top edge of the board.
    pub top: f64,
    /// Percent from the left edge of the board.
    pub left: f64,
    pub indicator: Option<Indicator>,
    /// The cell is an origin of the focused piece or indicator.
    pub highlighted: bool,
}

fn indicator(cell: Option<&InfluenceCell>) -> Option<Indicator> {
    cell.filter(|c| c.quantity > 0).map(|c| Indicator {
        color: c.color,
        quantity: c.quantity,
    })
}

/// All 64 cells in grid order (rank-major, a1 first).
pub fn render(
    grid: &InfluenceGrid,
    orientation: Orientation,
    highlight: Option<&BTreeSet<Square>>,
) -> Vec<OverlayCell> {
    Square::all()
        .map(|square| OverlayCell {
            square,
            top: orientation.top_percent(square),
            left: orientation.left_percent(square),
            indicator: indicator(grid.get(square)),
            highlighted: highlight.is_some_and(|set| set.contains(&square)),
        })
        .collect()
}

/// What the persistent highlight is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// A selected board piece: highlight every cell it influences.
    Piece(Square),
    /// A clicked indicator: highlight the cell's own origins.
    Indicator(Square),
}

/// Hover and click state of the overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlighter {
    focus: Option<Focus>,
    hover: Option<Square>,
}

impl Highlighter {
    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn hovered(&self) -> Option<Square> {
        self.hover
    }

    pub fn focus_piece(&mut self, square: Square) {
        self.focus = Some(Focus::Piece(square));
    }

    /// Pins the origins of the indicator on `square`.
    ///
    /// Clicking the pinned indicator again, or a cell without an indicator,
    /// clears the pin. Returns whether a pin is now active.
    pub fn click_indicator(&mut self, grid: &InfluenceGrid, square: Square) -> bool {
        let has_indicator = indicator(grid.get(square)).is_some();
        if !has_indicator || self.focus == Some(Focus::Indicator(square)) {
            self.focus = None;
            return false;
        }
        self.focus = Some(Focus::Indicator(square));
        true
    }

    /// Transient highlight while the pointer is over an indicator.
    pub fn hover(&mut self, grid: &InfluenceGrid, square: Square) {
        self.hover = indicator(grid.get(square)).map(|_| square);
    }

    pub fn unhover(&mut self) {
        self.hover = None;
    }

    /// Drops the pinned focus, keeping any hover.
    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    pub fn clear(&mut self) {
        self.focus = None;
        self.hover = None;
    }

    /// Current highlight set, hover first, then the pinned focus.
    pub fn highlight(&self, grid: &InfluenceGrid) -> Option<BTreeSet<Square>> {
        if let Some(square) = self.hover {
            return Some(origins_of_cell(grid, square));
        }
        match self.focus? {
            Focus::Piece(square) => Some(grid.influenced_by(square)),
            Focus::Indicator(square) => Some(origins_of_cell(grid, square)),
        }
    }
}

/// Origins listed on the cell at `square`, empty if the cell is null.
pub fn origins_of_cell(grid: &InfluenceGrid, square: Square) -> BTreeSet<Square> {
    grid.get(square)
        .map(|cell| cell.origins.clone())
        .unwrap_or_default()
}
