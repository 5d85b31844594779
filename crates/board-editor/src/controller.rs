//! Board interaction state machine.
//!
//! Every input modality (tray clicks, board clicks, drags from the tray,
//! drags from the board, arrow keys) ends up here as an [`Input`], and every
//! board edit the user can make goes through [`Controller::handle`]. The
//! selection is a single [`Selection`] value, so a tray selection, a board
//! selection, a crosshair and a drag can never be active at the same time.

use board_core::{BoardError, BoardState, Piece, Square};

use crate::overlay::Highlighter;
use crate::EditorError;

/// Where a drag started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOrigin {
    Tray(Piece),
    Board { square: Square, piece: Piece },
}

/// Where a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Square(Square),
    OffBoard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// `(files, ranks)` step in board terms, independent of orientation.
    const fn step(self) -> (i8, i8) {
        match self {
            Key::Up => (0, 1),
            Key::Down => (0, -1),
            Key::Left => (-1, 0),
            Key::Right => (1, 0),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "arrowup" => Some(Key::Up),
            "down" | "arrowdown" => Some(Key::Down),
            "left" | "arrowleft" => Some(Key::Left),
            "right" | "arrowright" => Some(Key::Right),
            _ => None,
        }
    }
}

/// The one active selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    /// A tray piece waiting for a click on an empty square.
    Tray(Piece),
    /// A board piece waiting for a destination.
    Board(Square),
    /// An empty square picked for keyboard movement.
    Crosshair(Square),
    Dragging(DragOrigin),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    TrayClick(Piece),
    SquareClick(Square),
    TrayDragStart(Piece),
    BoardDragStart(Square),
    Drop(DropTarget),
    DragCancel,
    Key(Key),
}

/// What handling one input did, beyond the selection change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effect {
    pub board_changed: bool,
    /// A tray piece was placed; the tray should pulse its reset.
    pub tray_placed: bool,
    /// Something the user should be told about.
    pub error: Option<EditorError>,
}

impl Effect {
    fn changed() -> Self {
        Effect {
            board_changed: true,
            ..Effect::default()
        }
    }

    fn placed() -> Self {
        Effect {
            board_changed: true,
            tray_placed: true,
            error: None,
        }
    }

    fn refused(err: BoardError) -> Self {
        Effect {
            error: EditorError::from_board(err),
            ..Effect::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Controller {
    selection: Selection,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.selection, Selection::Dragging(_))
    }

    /// Back to `Idle`, dropping any selection and piece highlight.
    pub fn reset(&mut self, highlighter: &mut Highlighter) {
        if matches!(self.selection, Selection::Board(_)) {
            highlighter.clear_focus();
        }
        self.selection = Selection::Idle;
    }

    /// Drops a board selection without touching anything else. Used when an
    /// indicator click takes over the highlight.
    pub fn release_board_selection(&mut self) {
        if matches!(self.selection, Selection::Board(_)) {
            self.selection = Selection::Idle;
        }
    }

    pub fn handle(
        &mut self,
        input: Input,
        board: &mut BoardState,
        highlighter: &mut Highlighter,
    ) -> Effect {
        if self.is_dragging() && !matches!(input, Input::Drop(_) | Input::DragCancel) {
            return Effect::default();
        }

        match input {
            Input::TrayClick(piece) => self.click_tray(piece, highlighter),
            Input::SquareClick(square) => self.click_square(square, board, highlighter),
            Input::TrayDragStart(piece) => {
                if !piece.kind.is_king() {
                    self.reset(highlighter);
                    self.selection = Selection::Dragging(DragOrigin::Tray(piece));
                }
                Effect::default()
            }
            Input::BoardDragStart(square) => {
                if let Some(piece) = board.piece_at(square) {
                    self.reset(highlighter);
                    self.selection = Selection::Dragging(DragOrigin::Board { square, piece });
                }
                Effect::default()
            }
            Input::Drop(target) => self.drop(target, board, highlighter),
            Input::DragCancel => {
                if self.is_dragging() {
                    self.selection = Selection::Idle;
                }
                Effect::default()
            }
            Input::Key(key) => self.arrow(key, board),
        }
    }

    fn click_tray(&mut self, piece: Piece, highlighter: &mut Highlighter) -> Effect {
        if piece.kind.is_king() {
            return Effect::default();
        }
        let reselect = self.selection == Selection::Tray(piece);
        self.reset(highlighter);
        if !reselect {
            self.selection = Selection::Tray(piece);
        }
        Effect::default()
    }

    fn click_square(
        &mut self,
        square: Square,
        board: &mut BoardState,
        highlighter: &mut Highlighter,
    ) -> Effect {
        match self.selection {
            Selection::Tray(piece) => match board.place(piece, square) {
                Ok(()) => {
                    self.selection = Selection::Idle;
                    Effect::placed()
                }
                Err(err) => Effect::refused(err),
            },
            Selection::Board(selected) if selected == square => {
                self.reset(highlighter);
                Effect::default()
            }
            Selection::Board(selected) => {
                let Some(moving) = board.piece_at(selected) else {
                    self.reset(highlighter);
                    return Effect::default();
                };
                if board.piece_at(square).is_some_and(|p| p.team == moving.team) {
                    self.select_piece(square, highlighter);
                    return Effect::default();
                }
                match board.move_piece(selected, square) {
                    Ok(_) => {
                        self.reset(highlighter);
                        Effect::changed()
                    }
                    Err(err) => Effect::refused(err),
                }
            }
            Selection::Idle | Selection::Crosshair(_) => {
                if board.is_occupied(square) {
                    self.select_piece(square, highlighter);
                } else {
                    self.selection = Selection::Crosshair(square);
                }
                Effect::default()
            }
            Selection::Dragging(_) => Effect::default(),
        }
    }

    fn select_piece(&mut self, square: Square, highlighter: &mut Highlighter) {
        self.selection = Selection::Board(square);
        highlighter.focus_piece(square);
    }

    fn drop(
        &mut self,
        target: DropTarget,
        board: &mut BoardState,
        highlighter: &mut Highlighter,
    ) -> Effect {
        let Selection::Dragging(origin) = self.selection else {
            return Effect::default();
        };
        // Whatever happens below, the drag context ends here.
        self.selection = Selection::Idle;

        match (origin, target) {
            (DragOrigin::Tray(_), DropTarget::OffBoard) => Effect::default(),
            (DragOrigin::Tray(piece), DropTarget::Square(square)) => {
                match board.place(piece, square) {
                    Ok(()) => Effect::placed(),
                    Err(err) => Effect::refused(err),
                }
            }
            (DragOrigin::Board { square: source, .. }, DropTarget::Square(square))
                if source == square =>
            {
                self.select_piece(source, highlighter);
                Effect::default()
            }
            (DragOrigin::Board { square: source, .. }, DropTarget::Square(square)) => {
                match board.move_piece(source, square) {
                    Ok(_) => Effect::changed(),
                    Err(err) => Effect::refused(err),
                }
            }
            (DragOrigin::Board { square: source, .. }, DropTarget::OffBoard) => {
                match board.remove(source) {
                    Ok(_) => Effect::changed(),
                    Err(err) => Effect::refused(err),
                }
            }
        }
    }

    fn arrow(&mut self, key: Key, board: &mut BoardState) -> Effect {
        let Selection::Crosshair(from) = self.selection else {
            return Effect::default();
        };
        let (files, ranks) = key.step();
        let Some(to) = from.offset(files, ranks) else {
            return Effect::default();
        };
        self.selection = Selection::Crosshair(to);

        if !board.is_occupied(to) {
            return Effect::default();
        }
        match board.move_piece(from, to) {
            Ok(_) => Effect::changed(),
            Err(err) => Effect::refused(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{KingAction, Placement};
    use board_core::{PieceKind, Team};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn white(kind: PieceKind) -> Piece {
        Piece::new(kind, Team::White)
    }

    fn black(kind: PieceKind) -> Piece {
        Piece::new(kind, Team::Black)
    }

    struct Rig {
        controller: Controller,
        board: BoardState,
        hl: Highlighter,
    }

    impl Rig {
        fn new(placement: &str) -> Self {
            Rig {
                controller: Controller::new(),
                board: BoardState::from_placement(placement).unwrap(),
                hl: Highlighter::default(),
            }
        }

        fn send(&mut self, input: Input) -> Effect {
            self.controller.handle(input, &mut self.board, &mut self.hl)
        }

        fn click(&mut self, s: &str) -> Effect {
            self.send(Input::SquareClick(sq(s)))
        }
    }

    const KINGS: &str = "4k3/8/8/8/8/8/8/4K3";

    #[test]
    fn tray_click_then_empty_square_places() {
        let mut rig = Rig::new(KINGS);
        rig.send(Input::TrayClick(white(PieceKind::Knight)));
        assert_eq!(rig.controller.selection(), Selection::Tray(white(PieceKind::Knight)));

        let effect = rig.click("d4");
        assert!(effect.board_changed && effect.tray_placed);
        assert_eq!(rig.board.piece_at(sq("d4")), Some(white(PieceKind::Knight)));
        assert_eq!(rig.controller.selection(), Selection::Idle);
    }

    #[test]
    fn tray_click_on_occupied_square_keeps_selection() {
        let mut rig = Rig::new(KINGS);
        rig.send(Input::TrayClick(black(PieceKind::Rook)));
        let effect = rig.click("e1");
        assert_eq!(effect.error, Some(EditorError::OccupiedSquare(sq("e1"))));
        assert!(!effect.board_changed);
        assert_eq!(rig.controller.selection(), Selection::Tray(black(PieceKind::Rook)));
    }

    #[test]
    fn tray_never_selects_kings() {
        let mut rig = Rig::new(KINGS);
        rig.send(Input::TrayClick(white(PieceKind::King)));
        assert_eq!(rig.controller.selection(), Selection::Idle);
        rig.send(Input::TrayDragStart(black(PieceKind::King)));
        assert_eq!(rig.controller.selection(), Selection::Idle);
    }

    #[test]
    fn clicking_selected_tray_piece_again_deselects() {
        let mut rig = Rig::new(KINGS);
        rig.send(Input::TrayClick(white(PieceKind::Queen)));
        rig.send(Input::TrayClick(white(PieceKind::Queen)));
        assert_eq!(rig.controller.selection(), Selection::Idle);
    }

    #[test]
    fn board_click_selects_and_highlights() {
        let mut rig = Rig::new(KINGS);
        rig.click("e1");
        assert_eq!(rig.controller.selection(), Selection::Board(sq("e1")));
        assert_eq!(rig.hl.focus(), Some(crate::overlay::Focus::Piece(sq("e1"))));

        rig.click("e1");
        assert_eq!(rig.controller.selection(), Selection::Idle);
        assert_eq!(rig.hl.focus(), None);
    }

    #[test]
    fn clicking_same_team_piece_switches_selection() {
        let mut rig = Rig::new("4k3/8/8/8/8/8/8/3QK3");
        rig.click("d1");
        let effect = rig.click("e1");
        assert!(!effect.board_changed);
        assert_eq!(rig.controller.selection(), Selection::Board(sq("e1")));
        assert_eq!(rig.hl.focus(), Some(crate::overlay::Focus::Piece(sq("e1"))));
        assert!(rig.board.is_occupied(sq("d1")));
    }

    #[test]
    fn click_move_to_empty_and_capture() {
        let mut rig = Rig::new("4k3/8/8/3p4/8/8/8/3QK3");
        rig.click("d1");
        let effect = rig.click("d5");
        assert!(effect.board_changed);
        assert_eq!(rig.board.piece_at(sq("d5")), Some(white(PieceKind::Queen)));
        assert_eq!(rig.controller.selection(), Selection::Idle);
        assert_eq!(rig.hl.focus(), None);
    }

    #[test]
    fn king_capture_is_refused_with_notice() {
        let mut rig = Rig::new("4k3/8/8/8/8/8/8/r3K3");
        let before = rig.board.snapshot();
        rig.click("a1");
        let effect = rig.click("e1");
        assert_eq!(effect.error, Some(EditorError::KingProtected(KingAction::Capture)));
        assert_eq!(rig.board, before);
        assert_eq!(rig.controller.selection(), Selection::Board(sq("a1")));
        assert_eq!(rig.hl.focus(), Some(crate::overlay::Focus::Piece(sq("a1"))));
    }

    #[test]
    fn drag_from_tray_places_or_rejects_pawn_on_terminal_rank() {
        let mut rig = Rig::new(KINGS);
        rig.send(Input::TrayDragStart(white(PieceKind::Pawn)));
        let effect = rig.send(Input::Drop(DropTarget::Square(sq("c8"))));
        assert_eq!(
            effect.error,
            Some(EditorError::InvalidPlacement(Placement::PawnOnTerminalRank))
        );
        assert!(!rig.board.is_occupied(sq("c8")));
        assert_eq!(rig.controller.selection(), Selection::Idle);

        rig.send(Input::TrayDragStart(white(PieceKind::Pawn)));
        let effect = rig.send(Input::Drop(DropTarget::Square(sq("c7"))));
        assert!(effect.tray_placed);
        assert_eq!(rig.board.piece_at(sq("c7")), Some(white(PieceKind::Pawn)));
    }

    #[test]
    fn drag_from_tray_off_board_does_nothing() {
        let mut rig = Rig::new(KINGS);
        rig.send(Input::TrayDragStart(black(PieceKind::Bishop)));
        let effect = rig.send(Input::Drop(DropTarget::OffBoard));
        assert_eq!(effect, Effect::default());
        assert_eq!(rig.board.piece_count(), 2);
    }

    #[test]
    fn drag_from_board_clears_selection_and_moves() {
        let mut rig = Rig::new("4k3/8/8/8/8/8/8/2B1K3");
        rig.click("e1");
        rig.send(Input::BoardDragStart(sq("c1")));
        assert_eq!(rig.hl.focus(), None);
        assert!(rig.controller.is_dragging());

        let effect = rig.send(Input::Drop(DropTarget::Square(sq("f4"))));
        assert!(effect.board_changed);
        assert_eq!(rig.board.piece_at(sq("f4")), Some(white(PieceKind::Bishop)));
        assert_eq!(rig.controller.selection(), Selection::Idle);
    }

    #[test]
    fn drag_off_board_removes_non_king() {
        let mut rig = Rig::new("4k3/8/8/8/8/8/8/2B1K3");
        rig.send(Input::BoardDragStart(sq("c1")));
        let effect = rig.send(Input::Drop(DropTarget::OffBoard));
        assert!(effect.board_changed);
        assert!(!rig.board.is_occupied(sq("c1")));
    }

    #[test]
    fn drag_king_off_board_snaps_back() {
        let mut rig = Rig::new(KINGS);
        rig.send(Input::BoardDragStart(sq("e8")));
        let effect = rig.send(Input::Drop(DropTarget::OffBoard));
        assert_eq!(effect.error, Some(EditorError::KingProtected(KingAction::Remove)));
        assert!(rig.board.is_occupied(sq("e8")));
        assert_eq!(rig.controller.selection(), Selection::Idle);
    }

    #[test]
    fn drop_on_own_square_selects_piece() {
        let mut rig = Rig::new(KINGS);
        rig.send(Input::BoardDragStart(sq("e1")));
        let effect = rig.send(Input::Drop(DropTarget::Square(sq("e1"))));
        assert_eq!(effect, Effect::default());
        assert_eq!(rig.controller.selection(), Selection::Board(sq("e1")));
    }

    #[test]
    fn inputs_during_drag_are_ignored() {
        let mut rig = Rig::new(KINGS);
        rig.send(Input::BoardDragStart(sq("e1")));
        assert_eq!(rig.click("d4"), Effect::default());
        rig.send(Input::TrayClick(white(PieceKind::Rook)));
        assert!(rig.controller.is_dragging());
        rig.send(Input::DragCancel);
        assert_eq!(rig.controller.selection(), Selection::Idle);
        assert!(rig.board.is_occupied(sq("e1")));
    }

    #[test]
    fn empty_click_sets_crosshair_and_arrows_move_it() {
        let mut rig = Rig::new("4k3/8/8/8/8/8/8/4K3");
        rig.click("e3");
        assert_eq!(rig.controller.selection(), Selection::Crosshair(sq("e3")));
        rig.send(Input::Key(Key::Down));
        assert_eq!(rig.controller.selection(), Selection::Crosshair(sq("e2")));
        rig.send(Input::Key(Key::Left));
        assert_eq!(rig.controller.selection(), Selection::Crosshair(sq("d2")));
    }

    #[test]
    fn arrow_onto_piece_attempts_implicit_move() {
        let mut rig = Rig::new("4k3/8/8/8/8/8/8/4K3");
        rig.board.place(black(PieceKind::Knight), sq("d3")).unwrap();
        rig.board.place(white(PieceKind::Rook), sq("d4")).unwrap();
        rig.click("d2");
        // Empty crosshair square: the implicit move has no source and stays silent.
        let effect = rig.send(Input::Key(Key::Up));
        assert_eq!(effect, Effect::default());
        assert_eq!(rig.controller.selection(), Selection::Crosshair(sq("d3")));
        // Now the crosshair sits on the knight, which takes the rook.
        let effect = rig.send(Input::Key(Key::Up));
        assert!(effect.board_changed);
        assert_eq!(rig.board.piece_at(sq("d4")), Some(black(PieceKind::Knight)));
        assert!(!rig.board.is_occupied(sq("d3")));
    }

    #[test]
    fn arrow_off_board_is_ignored_and_keys_need_crosshair() {
        let mut rig = Rig::new(KINGS);
        rig.click("a3");
        rig.send(Input::Key(Key::Left));
        assert_eq!(rig.controller.selection(), Selection::Crosshair(sq("a3")));

        rig.click("e1");
        rig.send(Input::Key(Key::Up));
        assert_eq!(rig.controller.selection(), Selection::Board(sq("e1")));
    }

    #[test]
    fn arrow_king_capture_raises_notice() {
        let mut rig = Rig::new("4k3/8/8/8/8/8/4q3/4K3");
        rig.click("e3");
        rig.send(Input::Key(Key::Down));
        let effect = rig.send(Input::Key(Key::Down));
        assert_eq!(effect.error, Some(EditorError::KingProtected(KingAction::Capture)));
        assert_eq!(rig.controller.selection(), Selection::Crosshair(sq("e1")));
        assert_eq!(rig.board.king_count(Team::White), 1);
    }
}
