//! Core types for the King's Board editor.
//!
//! This crate owns piece placement and nothing else:
//! - [`Square`], [`File`] and [`Rank`] for board addressing
//! - [`PieceKind`], [`Team`] and [`Piece`] for occupants
//! - [`BoardState`] with the place / remove / move primitives
//! - piece-placement notation for starting layouts and snapshots
//!
//! Chess rules (check, castling, en passant) are deliberately absent: the
//! board is a free-placement canvas whose only invariants are single
//! occupancy, one king per team and no pawns on the terminal ranks.

mod board;
mod piece;
mod placement;
mod square;
mod team;

pub use board::{BoardError, BoardState};
pub use piece::{Piece, PieceKind};
pub use placement::{PlacementError, STARTING_PLACEMENT};
pub use square::{File, Rank, Square};
pub use team::Team;
