//! Piece-placement notation (the first field of a FEN record).
//!
//! Only placement is meaningful for a free-placement board; side to move,
//! castling and clocks belong to a rules engine. A full FEN record is
//! accepted and everything after the first field is ignored.

use thiserror::Error;

use crate::{File, Piece, Rank, Square};

/// The standard starting layout.
pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Errors that can occur when reading a placement string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("empty placement")]
    Empty,

    #[error("expected 8 ranks, got {0}")]
    RankCount(usize),

    #[error("invalid character '{found}' in rank {rank}")]
    InvalidChar { found: char, rank: u8 },

    #[error("rank {rank} has {squares} squares, expected 8")]
    RankLength { rank: u8, squares: u32 },

    #[error("{team} must have exactly one king, found {count}")]
    KingCount { team: crate::Team, count: usize },

    #[error("pawn on terminal rank at {0}")]
    PawnOnTerminalRank(Square),
}

pub(crate) type Grid = [Option<Piece>; 64];

/// Reads the placement field into a rank-major grid.
///
/// Only the notation is checked here; board invariants are enforced by
/// [`crate::BoardState::from_placement`].
pub(crate) fn parse(placement: &str) -> Result<Grid, PlacementError> {
    let field = placement
        .split_whitespace()
        .next()
        .ok_or(PlacementError::Empty)?;

    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(PlacementError::RankCount(rows.len()));
    }

    let mut grid: Grid = [None; 64];
    // Rows are listed from rank 8 down to rank 1.
    for (row, text) in rows.iter().enumerate() {
        let rank = Rank::ALL[7 - row];
        let rank_number = rank.index() + 1;
        let mut file: u32 = 0;
        for c in text.chars() {
            if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += run;
                continue;
            }
            let piece = Piece::from_char(c).ok_or(PlacementError::InvalidChar {
                found: c,
                rank: rank_number,
            })?;
            if let Some(f) = u8::try_from(file).ok().and_then(File::from_index) {
                grid[Square::new(f, rank).index() as usize] = Some(piece);
            }
            file += 1;
        }
        if file != 8 {
            return Err(PlacementError::RankLength {
                rank: rank_number,
                squares: file,
            });
        }
    }

    Ok(grid)
}

/// Writes a rank-major grid back to placement notation.
pub(crate) fn write(grid: &Grid) -> String {
    let mut out = String::with_capacity(72);
    for rank in Rank::ALL.iter().rev() {
        let mut empty = 0;
        for file in File::ALL {
            match grid[Square::new(file, *rank).index() as usize] {
                Some(piece) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(piece.to_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
        if *rank != Rank::R1 {
            out.push('/');
        }
    }
    out
}
