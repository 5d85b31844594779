//! Property tests for the board invariants.

use board_core::{BoardError, BoardState, Piece, PieceKind, Square, Team};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Place(Piece, Square),
    Remove(Square),
    Move(Square, Square),
}

fn square() -> impl Strategy<Value = Square> {
    (0u8..64).prop_map(|i| Square::from_index(i).unwrap())
}

fn piece() -> impl Strategy<Value = Piece> {
    (0usize..6, any::<bool>()).prop_map(|(k, white)| {
        let team = if white { Team::White } else { Team::Black };
        Piece::new(PieceKind::ALL[k], team)
    })
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (piece(), square()).prop_map(|(p, s)| Edit::Place(p, s)),
        square().prop_map(Edit::Remove),
        (square(), square()).prop_map(|(a, b)| Edit::Move(a, b)),
    ]
}

fn apply(board: &mut BoardState, edit: &Edit) -> Result<(), BoardError> {
    match *edit {
        Edit::Place(p, s) => board.place(p, s),
        Edit::Remove(s) => board.remove(s).map(|_| ()),
        Edit::Move(a, b) => board.move_piece(a, b).map(|_| ()),
    }
}

proptest! {
    #[test]
    fn kings_survive_any_edit_sequence(edits in prop::collection::vec(edit(), 0..80)) {
        let mut board = BoardState::starting();
        for edit in &edits {
            let _ = apply(&mut board, edit);
            prop_assert_eq!(board.king_count(Team::White), 1);
            prop_assert_eq!(board.king_count(Team::Black), 1);
        }
    }

    #[test]
    fn failed_edits_change_nothing(edits in prop::collection::vec(edit(), 0..80)) {
        let mut board = BoardState::from_placement("4k3/8/8/8/8/8/8/4K3").unwrap();
        for edit in &edits {
            let before = board.snapshot();
            if apply(&mut board, edit).is_err() {
                prop_assert_eq!(&board, &before);
            }
        }
    }

    #[test]
    fn occupancy_tracks_successful_edits(edits in prop::collection::vec(edit(), 0..80)) {
        let mut board = BoardState::starting();
        let mut expected = board.piece_count();
        for edit in &edits {
            let captured = match *edit {
                Edit::Move(a, b) => board.piece_at(b).is_some() && board.piece_at(a).is_some(),
                _ => false,
            };
            if apply(&mut board, edit).is_ok() {
                match edit {
                    Edit::Place(..) => expected += 1,
                    Edit::Remove(_) => expected -= 1,
                    Edit::Move(..) if captured => expected -= 1,
                    Edit::Move(..) => {}
                }
            }
            prop_assert_eq!(board.piece_count(), expected);
        }
    }

    #[test]
    fn pawns_never_reach_terminal_ranks(edits in prop::collection::vec(edit(), 0..80)) {
        let mut board = BoardState::starting();
        for edit in &edits {
            let _ = apply(&mut board, edit);
            for (sq, p) in board.pieces() {
                prop_assert!(!(p.kind.is_pawn() && sq.rank().is_terminal()), "pawn on {}", sq);
            }
        }
    }
}
