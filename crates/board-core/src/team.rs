//! The two sides that can own a piece.

/// Piece colour.
///
/// The influence service never sees colours: white pieces are always its
/// `allies` and black pieces its `enemies`, whatever view is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Team {
    White = 0,
    Black = 1,
}

impl Team {
    pub const BOTH: [Team; 2] = [Team::White, Team::Black];

    /// Single-letter tray code (`w` / `b`).
    pub const fn tray_code(self) -> char {
        match self {
            Team::White => 'w',
            Team::Black => 'b',
        }
    }

    /// Parses a tray code or a colour word.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Some(Team::White),
            "b" | "black" => Some(Team::Black),
            _ => None,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::White => write!(f, "White"),
            Team::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tray_codes_and_words() {
        assert_eq!(Team::parse("w"), Some(Team::White));
        assert_eq!(Team::parse("Black"), Some(Team::Black));
        assert_eq!(Team::parse("allies"), None);
    }
}
