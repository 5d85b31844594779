//! Session command parsing.

use board_core::{Piece, PieceKind, Square, Team};
use board_editor::{DropTarget, Key};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  tray <white|black> <kind>              select a tray piece (click again to deselect)
  click <sq>                             click a square
  drag-tray <white|black> <kind> <sq|off> drag a tray piece onto the board
  drag <sq> <sq|off>                     drag a board piece
  key <up|down|left|right>               move the crosshair
  hover <sq> | unhover                   preview an indicator's origins
  indicator <sq>                         pin or unpin an indicator's origins
  flip | view | toggle                   orientation, allies/enemies, show/hide overlay
  reset | show | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tray(Piece),
    Click(Square),
    DragTray(Piece, DropTarget),
    Drag(Square, DropTarget),
    Key(Key),
    Hover(Square),
    Unhover,
    Indicator(Square),
    Flip,
    View,
    Toggle,
    Reset,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    Usage {
        command: &'static str,
        expected: &'static str,
    },

    #[error("'{0}' is not a square")]
    Square(String),

    #[error("'{0}' is not a team, use white or black")]
    Team(String),

    #[error("'{0}' is not a piece kind")]
    Kind(String),

    #[error("'{0}' is not an arrow key")]
    Key(String),
}

fn square(word: &str) -> Result<Square, CommandError> {
    Square::from_algebraic(word).ok_or_else(|| CommandError::Square(word.to_string()))
}

fn target(word: &str) -> Result<DropTarget, CommandError> {
    if word.eq_ignore_ascii_case("off") {
        return Ok(DropTarget::OffBoard);
    }
    square(word).map(DropTarget::Square)
}

fn piece(team: &str, kind: &str) -> Result<Piece, CommandError> {
    let team = Team::parse(team).ok_or_else(|| CommandError::Team(team.to_string()))?;
    let kind = PieceKind::parse(kind).ok_or_else(|| CommandError::Kind(kind.to_string()))?;
    Ok(Piece::new(kind, team))
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Ok(None);
    };

    let usage = |command, expected| CommandError::Usage { command, expected };

    let command = match (name.to_ascii_lowercase().as_str(), args) {
        ("tray", [team, kind]) => Command::Tray(piece(team, kind)?),
        ("tray", _) => return Err(usage("tray", "<white|black> <kind>")),
        ("click", [sq]) => Command::Click(square(sq)?),
        ("click", _) => return Err(usage("click", "<sq>")),
        ("drag-tray", [team, kind, to]) => Command::DragTray(piece(team, kind)?, target(to)?),
        ("drag-tray", _) => return Err(usage("drag-tray", "<white|black> <kind> <sq|off>")),
        ("drag", [from, to]) => Command::Drag(square(from)?, target(to)?),
        ("drag", _) => return Err(usage("drag", "<sq> <sq|off>")),
        ("key", [key]) => {
            Command::Key(Key::parse(key).ok_or_else(|| CommandError::Key(key.to_string()))?)
        }
        ("key", _) => return Err(usage("key", "<up|down|left|right>")),
        ("hover", [sq]) => Command::Hover(square(sq)?),
        ("hover", _) => return Err(usage("hover", "<sq>")),
        ("indicator", [sq]) => Command::Indicator(square(sq)?),
        ("indicator", _) => return Err(usage("indicator", "<sq>")),
        ("unhover", []) => Command::Unhover,
        ("flip", []) => Command::Flip,
        ("view", []) => Command::View,
        ("toggle", []) => Command::Toggle,
        ("reset", []) => Command::Reset,
        ("show", []) => Command::Show,
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        _ => return Err(CommandError::Unknown(line.trim().to_string())),
    };
    Ok(Some(command))
}
