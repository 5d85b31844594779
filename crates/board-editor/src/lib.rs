//! The interactive half of King's Board.
//!
//! Everything here is single-threaded and clock-agnostic: callers feed in
//! input events together with the current time in milliseconds, and pull out
//! overlay cells, notices and influence requests. The async transport lives
//! in `influence-client`; the browser binding in `editor-wasm`.
//!
//! - [`Controller`] turns clicks, drags and arrow keys into board edits
//! - [`overlay`] maps an [`InfluenceGrid`] onto screen cells under an
//!   [`Orientation`] and resolves origin highlights
//! - [`InfluenceSync`] debounces board changes into sequenced requests and
//!   drops stale responses
//! - [`Editor`] owns all of the above and is what front ends talk to

mod controller;
mod editor;
mod error;
mod influence;
mod notice;
pub mod overlay;
mod orientation;
mod sync;
pub mod wire;

pub use controller::{Controller, DragOrigin, DropTarget, Effect, Input, Key, Selection};
pub use editor::{Editor, EditorSettings};
pub use error::{EditorError, KingAction, Placement};
pub use influence::{InfluenceCell, InfluenceColor, InfluenceGrid};
pub use notice::{Notice, Notices, Pulse, DEFAULT_NOTICE_MS, DEFAULT_PULSE_MS};
pub use orientation::{BoardGeometry, Orientation, View};
pub use overlay::{Focus, Highlighter, Indicator, OverlayCell};
pub use sync::{InfluenceSync, PendingRequest, SyncOutcome, DEFAULT_DEBOUNCE_MS};

/// Milliseconds on whatever monotonic clock the front end uses.
pub type Millis = u64;
