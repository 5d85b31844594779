//! Board addressing.
//!
//! A square is addressed both by algebraic notation (`a1`..`h8`) and by a
//! zero-based `(file, rank)` pair, where rank 0 is the board's rank "1".
//! The pair form is the one the influence service speaks as `(x, y)`.

use std::fmt;

/// A file (column) on the board, from A to H.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// All files, a to h.
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    /// Creates a file from its index (0 = a).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Creates a file from a letter, case-insensitive.
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        let lower = c.to_ascii_lowercase();
        if lower >= 'a' && lower <= 'h' {
            Self::from_index(lower as u8 - b'a')
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }

    /// The file mirrored through the board centre (a <-> h).
    #[inline]
    pub const fn mirrored(self) -> Self {
        Self::ALL[(7 - self as u8) as usize]
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A rank (row) on the board, from 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    /// All ranks, 1 to 8.
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    /// Creates a rank from its index (0 = rank 1).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Creates a rank from a digit ('1'-'8').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        if c >= '1' && c <= '8' {
            Self::from_index(c as u8 - b'1')
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }

    /// Rank 1 and rank 8, where pawns may never stand.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Rank::R1 | Rank::R8)
    }

    /// The rank mirrored through the board centre (1 <-> 8).
    #[inline]
    pub const fn mirrored(self) -> Self {
        Self::ALL[(7 - self as u8) as usize]
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A square on the board.
///
/// Internally a rank-major index: a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ...,
/// h8 = 63. This is the same order the influence grid uses (`grid[rank][file]`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(rank.index() * 8 + file.index())
    }

    /// Creates a square from service coordinates, `x` = file and `y` = rank.
    #[inline]
    pub const fn from_coords(x: u8, y: u8) -> Option<Self> {
        if x < 8 && y < 8 {
            Some(Square(y * 8 + x))
        } else {
            None
        }
    }

    /// Creates a square from its rank-major index (0-63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Parses algebraic notation such as `"e4"`.
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        match (
            File::from_char(bytes[0] as char),
            Rank::from_char(bytes[1] as char),
        ) {
            (Some(file), Some(rank)) => Some(Square::new(file, rank)),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 % 8) as usize]
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 / 8) as usize]
    }

    /// Service `x` coordinate (file index).
    #[inline]
    pub const fn x(self) -> u8 {
        self.0 % 8
    }

    /// Service `y` coordinate (rank index).
    #[inline]
    pub const fn y(self) -> u8 {
        self.0 / 8
    }

    /// The square `files` columns and `ranks` rows away, if still on the board.
    pub const fn offset(self, files: i8, ranks: i8) -> Option<Self> {
        let x = self.x() as i8 + files;
        let y = self.y() as i8 + ranks;
        if x < 0 || y < 0 {
            return None;
        }
        Self::from_coords(x as u8, y as u8)
    }

    /// Point reflection through the board centre (a1 <-> h8).
    #[inline]
    pub const fn mirrored(self) -> Self {
        Square(63 - self.0)
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    /// Every square, rank-major from a1 to h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }

    pub const A1: Square = Square::new(File::A, Rank::R1);
    pub const C1: Square = Square::new(File::C, Rank::R1);
    pub const D4: Square = Square::new(File::D, Rank::R4);
    pub const E1: Square = Square::new(File::E, Rank::R1);
    pub const E4: Square = Square::new(File::E, Rank::R4);
    pub const E8: Square = Square::new(File::E, Rank::R8);
    pub const H8: Square = Square::new(File::H, Rank::R8);
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
