//! Session configuration.
//!
//! Settings come from `kings-board.toml` in the working directory when it
//! exists; every key is optional and falls back to its default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use board_core::{BoardState, PlacementError, STARTING_PLACEMENT};
use board_editor::{EditorSettings, Millis, Orientation, View};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or interpreting configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Unknown orientation '{0}', expected 'white' or 'black'")]
    Orientation(String),

    #[error("Unknown view '{0}', expected 'allies' or 'enemies'")]
    View(String),

    #[error("Invalid start position: {0}")]
    StartPosition(#[from] PlacementError),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the influence service.
    pub api_base_url: String,
    pub debounce_ms: Millis,
    pub notice_ms: Millis,
    pub tray_pulse_ms: Millis,
    pub request_timeout_ms: Millis,
    /// Which side is drawn at the bottom: `white` or `black`.
    pub orientation: String,
    /// `allies` or `enemies`.
    pub view: String,
    /// Piece placement the board starts from and resets to.
    pub start_position: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            debounce_ms: board_editor::DEFAULT_DEBOUNCE_MS,
            notice_ms: board_editor::DEFAULT_NOTICE_MS,
            tray_pulse_ms: board_editor::DEFAULT_PULSE_MS,
            request_timeout_ms: 10_000,
            orientation: "white".to_string(),
            view: "allies".to_string(),
            start_position: STARTING_PLACEMENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads `kings-board.toml` from the working directory, or defaults if
    /// there is none.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Like [`load`](Self::load) for an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from("kings-board.toml")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validates the string-typed fields and builds the editor's settings.
    pub fn editor_settings(&self) -> Result<EditorSettings, ConfigError> {
        let orientation = Orientation::parse(&self.orientation)
            .ok_or_else(|| ConfigError::Orientation(self.orientation.clone()))?;
        let view = View::parse(&self.view).ok_or_else(|| ConfigError::View(self.view.clone()))?;
        let start = BoardState::from_placement(&self.start_position)?;

        Ok(EditorSettings {
            debounce_ms: self.debounce_ms,
            notice_ms: self.notice_ms,
            tray_pulse_ms: self.tray_pulse_ms,
            orientation,
            view,
            start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_parse_partial_config() {
        let config: ClientConfig = toml::from_str(
            r#"
api_base_url = "http://influence.local:9000"
debounce_ms = 250
orientation = "black"
start_position = "4k3/8/8/8/8/8/8/4K3"
"#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "http://influence.local:9000");
        assert_eq!(config.notice_ms, 3_000);

        let settings = config.editor_settings().unwrap();
        assert_eq!(settings.debounce_ms, 250);
        assert_eq!(settings.orientation, Orientation::BlackAtBottom);
        assert_eq!(settings.view, View::Allies);
        assert_eq!(settings.start.piece_count(), 2);
    }

    #[test]
    fn test_invalid_fields_are_reported() {
        let config = ClientConfig {
            view: "both".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(config.editor_settings(), Err(ConfigError::View(v)) if v == "both"));

        let config = ClientConfig {
            start_position: "8/8/8/8/8/8/8/8".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            config.editor_settings(),
            Err(ConfigError::StartPosition(PlacementError::KingCount { .. }))
        ));
    }

    #[test]
    fn test_load_from_missing_path_returns_default() {
        let config = ClientConfig::load_from(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_config_path_returns_expected_path() {
        assert_eq!(ClientConfig::config_path(), PathBuf::from("kings-board.toml"));
    }
}
