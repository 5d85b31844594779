//! JSON schema of the influence service.
//!
//! Request: `{ "data": { "view": "allies", "pieces": [{ "x": 3, "y": 3,
//! "type": "knight", "team": "allies" }] } }`
//!
//! Response: `{ "data": { "board": [[null | { "color": "green", "quantity": 2,
//! "origins": [{ "x": 3, "y": 3 }] }; 8]; 8] } }`
//!
//! `x` is the file index (0 = a) and `y` the rank index (0 = rank 1). A
//! piece's team always follows its colour: white is `allies`, black is
//! `enemies`, whichever view is requested.

use std::collections::BTreeSet;

use board_core::{BoardState, File, PieceKind, Rank, Square, Team};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{InfluenceCell, InfluenceColor, InfluenceGrid, View};

/// Why a response body could not be turned into an [`InfluenceGrid`].
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected 8 rows, got {0}")]
    RowCount(usize),

    #[error("row {row} has {len} cells, expected 8")]
    RowLength { row: usize, len: usize },

    #[error("unknown influence colour '{0}'")]
    UnknownColor(String),

    #[error("origin ({x}, {y}) is off the board")]
    OriginOutOfRange { x: u8, y: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireSide {
    Allies,
    Enemies,
}

impl From<View> for WireSide {
    fn from(view: View) -> Self {
        match view {
            View::Allies => WireSide::Allies,
            View::Enemies => WireSide::Enemies,
        }
    }
}

impl From<Team> for WireSide {
    fn from(team: Team) -> Self {
        match team {
            Team::White => WireSide::Allies,
            Team::Black => WireSide::Enemies,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl From<PieceKind> for WireKind {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Pawn => WireKind::Pawn,
            PieceKind::Knight => WireKind::Knight,
            PieceKind::Bishop => WireKind::Bishop,
            PieceKind::Rook => WireKind::Rook,
            PieceKind::Queen => WireKind::Queen,
            PieceKind::King => WireKind::King,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePiece {
    pub x: u8,
    pub y: u8,
    #[serde(rename = "type")]
    pub kind: WireKind,
    pub team: WireSide,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestData {
    pub view: WireSide,
    pub pieces: Vec<WirePiece>,
}

/// Body of `POST /retrieve_colors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluenceRequest {
    pub data: RequestData,
}

impl InfluenceRequest {
    /// Serializes every piece on the board, both teams, for `view`.
    ///
    /// Pieces are listed file by file (a to h), each file from rank 8 down.
    pub fn new(board: &BoardState, view: View) -> Self {
        let pieces = File::ALL
            .iter()
            .flat_map(|&file| Rank::ALL.iter().rev().map(move |&rank| Square::new(file, rank)))
            .filter_map(|sq| {
                board.piece_at(sq).map(|piece| WirePiece {
                    x: sq.x(),
                    y: sq.y(),
                    kind: piece.kind.into(),
                    team: piece.team.into(),
                })
            })
            .collect();

        InfluenceRequest {
            data: RequestData {
                view: view.into(),
                pieces,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCoord {
    pub x: u8,
    pub y: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCell {
    pub color: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origins: Option<Vec<WireCoord>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    pub board: Vec<Vec<Option<WireCell>>>,
}

/// Body returned by the influence service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluenceResponse {
    pub data: ResponseData,
}

impl InfluenceResponse {
    pub fn from_json(body: &str) -> Result<Self, ShapeError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ShapeError> {
        Ok(serde_json::from_value(value)?)
    }

    /// The wire form of a grid; used by test doubles of the service.
    pub fn from_grid(grid: &InfluenceGrid) -> Self {
        let board = Rank::ALL
            .iter()
            .map(|&rank| {
                File::ALL
                    .iter()
                    .map(|&file| {
                        grid.get(Square::new(file, rank)).map(|cell| WireCell {
                            color: cell.color.name().to_string(),
                            quantity: cell.quantity,
                            origins: Some(
                                cell.origins
                                    .iter()
                                    .map(|o| WireCoord { x: o.x(), y: o.y() })
                                    .collect(),
                            ),
                        })
                    })
                    .collect()
            })
            .collect();
        InfluenceResponse {
            data: ResponseData { board },
        }
    }

    /// Validates the shape and converts to a grid.
    ///
    /// Anything other than exactly 8 rows of exactly 8 cells, an unknown
    /// colour or an off-board origin rejects the whole response.
    pub fn into_grid(self) -> Result<InfluenceGrid, ShapeError> {
        let rows = self.data.board;
        if rows.len() != 8 {
            return Err(ShapeError::RowCount(rows.len()));
        }

        let mut grid = InfluenceGrid::empty();
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != 8 {
                return Err(ShapeError::RowLength { row: y, len: row.len() });
            }
            for (x, cell) in row.into_iter().enumerate() {
                let Some(cell) = cell else { continue };
                let square = Square::new(File::ALL[x], Rank::ALL[y]);
                grid.set(square, Some(convert_cell(cell)?));
            }
        }
        Ok(grid)
    }
}

fn convert_cell(cell: WireCell) -> Result<InfluenceCell, ShapeError> {
    let color = InfluenceColor::parse(&cell.color).ok_or(ShapeError::UnknownColor(cell.color))?;
    let origins = cell
        .origins
        .unwrap_or_default()
        .into_iter()
        .map(|o| {
            Square::from_coords(o.x, o.y).ok_or(ShapeError::OriginOutOfRange { x: o.x, y: o.y })
        })
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(InfluenceCell {
        color,
        quantity: cell.quantity,
        origins,
    })
}
