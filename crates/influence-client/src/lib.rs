//! Async side of King's Board.
//!
//! `board-editor` decides *when* the influence overlay needs refreshing and
//! which replies still count. This crate does the rest: it talks HTTP to the
//! influence service, keeps a tokio-driven clock for the editor's timers and
//! loads the session configuration.

mod config;
mod http;
mod service;
mod session;

pub use config::{ClientConfig, ConfigError};
pub use http::HttpInfluenceService;
pub use service::{InfluenceService, TransportError};
pub use session::{Session, SessionEvent};
