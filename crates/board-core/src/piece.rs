//! Piece kinds and their string forms at the edges of the system.
//!
//! Inside the editor a piece is always a [`PieceKind`]; strings only exist
//! at the tray (`"Knight"`), the influence service (`"knight"`) and the
//! placement notation (`'N'` / `'n'`).

use crate::Team;

/// The six kinds of chess piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn is_king(self) -> bool {
        matches!(self, PieceKind::King)
    }

    #[inline]
    pub const fn is_pawn(self) -> bool {
        matches!(self, PieceKind::Pawn)
    }

    /// Label shown on (and reported by) the tray.
    pub const fn tray_label(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }

    /// Parses a tray label, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tray_label().eq_ignore_ascii_case(s))
    }

    const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tray_label())
    }
}

/// A piece standing on (or about to be put on) the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub team: Team,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, team: Team) -> Self {
        Piece { kind, team }
    }

    /// Placement-notation character: upper case for white.
    pub const fn to_char(self) -> char {
        let c = self.kind.letter();
        match self.team {
            Team::White => c.to_ascii_uppercase(),
            Team::Black => c,
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        let team = if c.is_ascii_uppercase() {
            Team::White
        } else {
            Team::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(Piece { kind, team })
    }

    /// Figurine used by text front ends.
    pub const fn symbol(self) -> char {
        match (self.team, self.kind) {
            (Team::White, PieceKind::Pawn) => '♙',
            (Team::White, PieceKind::Knight) => '♘',
            (Team::White, PieceKind::Bishop) => '♗',
            (Team::White, PieceKind::Rook) => '♖',
            (Team::White, PieceKind::Queen) => '♕',
            (Team::White, PieceKind::King) => '♔',
            (Team::Black, PieceKind::Pawn) => '♟',
            (Team::Black, PieceKind::Knight) => '♞',
            (Team::Black, PieceKind::Bishop) => '♝',
            (Team::Black, PieceKind::Rook) => '♜',
            (Team::Black, PieceKind::Queen) => '♛',
            (Team::Black, PieceKind::King) => '♚',
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.team, self.kind)
    }
}
