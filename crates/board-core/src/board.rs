//! The editable board.
//!
//! [`BoardState`] is the single source of truth for piece placement. Every
//! edit is computed on a copy and only swapped in once it has passed all
//! checks, so a failed edit never leaves a half-applied board behind and a
//! snapshot taken at any time is always consistent.

use thiserror::Error;

use crate::placement::{self, Grid, PlacementError};
use crate::{Piece, PieceKind, Square, Team, STARTING_PLACEMENT};

/// Why a board edit was refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("square {0} is already occupied")]
    Occupied(Square),

    #[error("square {0} is empty")]
    Empty(Square),

    #[error("no piece to move on {0}")]
    InvalidSource(Square),

    #[error("{0} holds a piece of the same team")]
    SameTeamBlocked(Square),

    #[error("the king on {0} cannot be captured")]
    KingCaptureBlocked(Square),

    #[error("the king on {0} cannot be removed")]
    KingProtected(Square),

    #[error("a second king cannot be placed on {0}")]
    ExtraKing(Square),

    #[error("pawns cannot stand on {0}")]
    PawnOnTerminalRank(Square),
}

/// An 8x8 free-placement board with exactly one king per team.
#[derive(Clone, PartialEq, Eq)]
pub struct BoardState {
    squares: Grid,
}

impl BoardState {
    /// The standard starting layout.
    pub fn starting() -> Self {
        Self::from_placement(STARTING_PLACEMENT).expect("STARTING_PLACEMENT is valid")
    }

    /// Builds a board from placement notation, enforcing the board invariants.
    pub fn from_placement(text: &str) -> Result<Self, PlacementError> {
        let squares = placement::parse(text)?;
        let board = BoardState { squares };

        for team in Team::BOTH {
            let count = board.king_count(team);
            if count != 1 {
                return Err(PlacementError::KingCount { team, count });
            }
        }
        if let Some((square, _)) = board
            .pieces()
            .find(|(sq, p)| p.kind.is_pawn() && sq.rank().is_terminal())
        {
            return Err(PlacementError::PawnOnTerminalRank(square));
        }

        Ok(board)
    }

    pub fn to_placement(&self) -> String {
        placement::write(&self.squares)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index() as usize]
    }

    #[inline]
    pub fn is_occupied(&self, square: Square) -> bool {
        self.piece_at(square).is_some()
    }

    /// Occupied squares in rank-major order (a1, b1, ..., h8).
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().count()
    }

    pub fn king_count(&self, team: Team) -> usize {
        self.pieces()
            .filter(|(_, p)| p.team == team && p.kind.is_king())
            .count()
    }

    pub fn king_square(&self, team: Team) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.team == team && p.kind.is_king())
            .map(|(sq, _)| sq)
    }

    /// Copy of the current state.
    #[inline]
    pub fn snapshot(&self) -> BoardState {
        self.clone()
    }

    /// Replaces the whole state.
    #[inline]
    pub fn restore(&mut self, snapshot: BoardState) {
        *self = snapshot;
    }

    /// The board with `piece` added on `square`.
    pub fn with_placed(&self, piece: Piece, square: Square) -> Result<BoardState, BoardError> {
        if piece.kind.is_king() {
            return Err(BoardError::ExtraKing(square));
        }
        check_pawn_rank(piece, square)?;
        if self.is_occupied(square) {
            return Err(BoardError::Occupied(square));
        }

        let mut next = self.clone();
        next.squares[square.index() as usize] = Some(piece);
        Ok(next)
    }

    /// The board with the occupant of `square` taken off.
    pub fn with_removed(&self, square: Square) -> Result<(BoardState, Piece), BoardError> {
        let piece = self.piece_at(square).ok_or(BoardError::Empty(square))?;
        if piece.kind.is_king() {
            return Err(BoardError::KingProtected(square));
        }

        let mut next = self.clone();
        next.squares[square.index() as usize] = None;
        Ok((next, piece))
    }

    /// The board with the piece on `source` moved to `target`, capturing
    /// any enemy non-king piece there.
    pub fn with_moved(
        &self,
        source: Square,
        target: Square,
    ) -> Result<(BoardState, Option<Piece>), BoardError> {
        let piece = self
            .piece_at(source)
            .ok_or(BoardError::InvalidSource(source))?;
        let captured = self.piece_at(target);
        if let Some(occupant) = captured {
            if occupant.team == piece.team {
                return Err(BoardError::SameTeamBlocked(target));
            }
            if occupant.kind == PieceKind::King {
                return Err(BoardError::KingCaptureBlocked(target));
            }
        }
        check_pawn_rank(piece, target)?;

        let mut next = self.clone();
        next.squares[source.index() as usize] = None;
        next.squares[target.index() as usize] = Some(piece);
        Ok((next, captured))
    }

    pub fn place(&mut self, piece: Piece, square: Square) -> Result<(), BoardError> {
        let next = self.with_placed(piece, square)?;
        self.restore(next);
        Ok(())
    }

    /// Removes and returns the occupant of `square`.
    pub fn remove(&mut self, square: Square) -> Result<Piece, BoardError> {
        let (next, piece) = self.with_removed(square)?;
        self.restore(next);
        Ok(piece)
    }

    /// Moves a piece, returning whatever it captured.
    pub fn move_piece(
        &mut self,
        source: Square,
        target: Square,
    ) -> Result<Option<Piece>, BoardError> {
        let (next, captured) = self.with_moved(source, target)?;
        self.restore(next);
        Ok(captured)
    }
}

fn check_pawn_rank(piece: Piece, square: Square) -> Result<(), BoardError> {
    if piece.kind.is_pawn() && square.rank().is_terminal() {
        Err(BoardError::PawnOnTerminalRank(square))
    } else {
        Ok(())
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::starting()
    }
}

impl std::fmt::Debug for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoardState({})", self.to_placement())
    }
}
