use board_core::{BoardError, Square};
use thiserror::Error;

use crate::wire::ShapeError;

/// Everything the editor can report to the user.
///
/// None of these is fatal: they are shown as a transient notice and the
/// session carries on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("This square is already occupied")]
    OccupiedSquare(Square),

    #[error("{0}")]
    KingProtected(KingAction),

    #[error("{0}")]
    InvalidPlacement(Placement),

    #[error("The influence service returned an invalid board: {0}")]
    InvalidApiShape(String),

    #[error("The influence service could not be reached: {0}")]
    NetworkFailure(String),
}

/// What was attempted against a king.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KingAction {
    Capture,
    Remove,
}

impl std::fmt::Display for KingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KingAction::Capture => f.write_str("The king cannot be captured"),
            KingAction::Remove => f.write_str("The king cannot be removed from the board"),
        }
    }
}

/// Why a piece may not go where it was put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    PawnOnTerminalRank,
    ExtraKing,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::PawnOnTerminalRank => {
                f.write_str("Pawns cannot be placed on the first or last rank")
            }
            Placement::ExtraKing => f.write_str("Each side already has its king"),
        }
    }
}

impl EditorError {
    /// Board refusals worth telling the user about.
    ///
    /// Moving onto a friendly piece or from an empty square is simply a
    /// gesture that did nothing, so those stay silent.
    pub fn from_board(err: BoardError) -> Option<Self> {
        match err {
            BoardError::Occupied(sq) => Some(EditorError::OccupiedSquare(sq)),
            BoardError::KingCaptureBlocked(_) => {
                Some(EditorError::KingProtected(KingAction::Capture))
            }
            BoardError::KingProtected(_) => Some(EditorError::KingProtected(KingAction::Remove)),
            BoardError::PawnOnTerminalRank(_) => {
                Some(EditorError::InvalidPlacement(Placement::PawnOnTerminalRank))
            }
            BoardError::ExtraKing(_) => Some(EditorError::InvalidPlacement(Placement::ExtraKing)),
            BoardError::Empty(_)
            | BoardError::InvalidSource(_)
            | BoardError::SameTeamBlocked(_) => None,
        }
    }
}

impl From<ShapeError> for EditorError {
    fn from(err: ShapeError) -> Self {
        EditorError::InvalidApiShape(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages() {
        assert_eq!(
            EditorError::KingProtected(KingAction::Capture).to_string(),
            "The king cannot be captured"
        );
        assert_eq!(
            EditorError::InvalidPlacement(Placement::PawnOnTerminalRank).to_string(),
            "Pawns cannot be placed on the first or last rank"
        );
        assert_eq!(
            EditorError::OccupiedSquare(Square::E4).to_string(),
            "This square is already occupied"
        );
    }

    #[test]
    fn silent_board_refusals() {
        assert_eq!(EditorError::from_board(BoardError::SameTeamBlocked(Square::E4)), None);
        assert_eq!(EditorError::from_board(BoardError::InvalidSource(Square::E4)), None);
        assert_eq!(
            EditorError::from_board(BoardError::KingCaptureBlocked(Square::E1)),
            Some(EditorError::KingProtected(KingAction::Capture))
        );
    }
}
