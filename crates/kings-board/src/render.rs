//! Plain-text view of an editor session.

use std::fmt::Write;

use board_editor::{DragOrigin, Editor, Millis, OverlayCell, Selection};

/// Board, status line, notice and overlay, top row first as drawn on screen.
pub fn render(editor: &Editor, now: Millis) -> String {
    let mut out = String::new();
    let orientation = editor.orientation();

    for row in 0..8u8 {
        for column in 0..8u8 {
            let glyph = orientation
                .square_at_slot(row, column)
                .and_then(|sq| editor.board().piece_at(sq))
                .map_or('·', |p| p.symbol());
            out.push(glyph);
            out.push(' ');
        }
        // Rank label on the right edge.
        if let Some(sq) = orientation.square_at_slot(row, 7) {
            let _ = write!(out, " {}", sq.rank().to_char());
        }
        out.push('\n');
    }
    for column in 0..8u8 {
        if let Some(sq) = orientation.square_at_slot(7, column) {
            out.push(sq.file().to_char());
            out.push(' ');
        }
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "view: {}  bottom: {}  selection: {}{}",
        editor.view().service_name(),
        orientation.name(),
        describe(editor.selection()),
        if editor.tray_reset_active(now) { "  (tray reset)" } else { "" },
    );
    if let Some(notice) = editor.notice(now) {
        let _ = writeln!(out, "! {}", notice.message());
    }

    if editor.is_showing_influence() {
        out.push_str(&overlay(&editor.overlay()));
    } else {
        out.push_str("influence hidden\n");
    }
    out
}

fn describe(selection: Selection) -> String {
    match selection {
        Selection::Idle => "none".to_string(),
        Selection::Tray(piece) => format!("tray {piece}"),
        Selection::Board(sq) => format!("piece on {sq}"),
        Selection::Crosshair(sq) => format!("crosshair on {sq}"),
        Selection::Dragging(DragOrigin::Tray(piece)) => format!("dragging {piece} from tray"),
        Selection::Dragging(DragOrigin::Board { square, piece }) => {
            format!("dragging {piece} from {square}")
        }
    }
}

/// Lays the overlay cells out on an 8x8 grid by their screen position.
/// Highlighted origins are bracketed.
fn overlay(cells: &[OverlayCell]) -> String {
    let mut grid = vec![vec![String::from("  .  "); 8]; 8];
    for cell in cells {
        let row = (cell.top / 12.5).round() as usize;
        let column = (cell.left / 12.5).round() as usize;
        let label = cell
            .indicator
            .as_ref()
            .map_or_else(|| ".".to_string(), |i| i.label());
        let text = if cell.highlighted {
            format!("[{label}]")
        } else {
            label
        };
        if let Some(slot) = grid.get_mut(row).and_then(|r| r.get_mut(column)) {
            *slot = format!("{text:^5}");
        }
    }

    let mut out = String::from("influence:\n");
    for row in grid {
        out.push_str(row.join(" ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::{BoardState, Square};
    use board_editor::{EditorSettings, Input};

    fn editor(placement: &str) -> Editor {
        Editor::new(
            EditorSettings {
                start: BoardState::from_placement(placement).unwrap(),
                ..EditorSettings::default()
            },
            0,
        )
    }

    #[test]
    fn white_at_bottom_draws_rank_eight_first() {
        let text = render(&editor("4k3/8/8/8/8/8/8/4K3"), 0);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "· · · · ♚ · · ·  8");
        assert_eq!(lines[7], "· · · · ♔ · · ·  1");
        assert_eq!(lines[8], "a b c d e f g h ");
        assert!(lines[9].contains("selection: none"));
    }

    #[test]
    fn flipped_board_draws_rank_one_first() {
        let mut ed = editor("4k3/8/8/8/8/8/8/4K3");
        ed.flip(0);
        let text = render(&ed, 0);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "· · · ♔ · · · ·  1");
        assert_eq!(lines[8], "h g f e d c b a ");
        assert!(lines[9].contains("bottom: black"));
    }

    #[test]
    fn shows_selection_and_notice() {
        let mut ed = editor("4k3/8/8/8/8/8/8/4K3");
        ed.handle(Input::BoardDragStart(Square::E1), 0);
        ed.handle(Input::Drop(board_editor::DropTarget::OffBoard), 0);
        ed.handle(Input::SquareClick(Square::E8), 0);
        let text = render(&ed, 10);
        assert!(text.contains("selection: piece on e8"));
        assert!(text.contains("! The king cannot be removed from the board"));
    }

    #[test]
    fn hidden_overlay_is_announced() {
        let mut ed = editor("4k3/8/8/8/8/8/8/4K3");
        ed.toggle_influence();
        assert!(render(&ed, 0).ends_with("influence hidden\n"));
    }
}
