//! WebAssembly bindings for the King's Board editor.
//!
//! The browser shell owns the clock and the network. It passes
//! `performance.now()` into every call, performs the requests handed out by
//! `nextRequest` with `fetch`, and feeds the body (or the failure) back in.
//!
//! # Usage
//!
//! ```javascript
//! import init, { KingsBoard } from 'editor-wasm';
//!
//! await init();
//!
//! const board = new KingsBoard(performance.now());
//! board.clickTray("w", "Knight", performance.now());
//! board.clickSquare("d4", performance.now());
//!
//! const request = board.nextRequest(performance.now());
//! if (request) {
//!   const res = await fetch(`${api}/retrieve_colors`, { method: "POST", body: request.body });
//!   board.applyResponse(request.seq, await res.text(), performance.now());
//! }
//! const cells = board.overlay();
//! ```

use board_core::{BoardState, Piece, PieceKind, Square, Team};
use board_editor::{
    BoardGeometry, DragOrigin, DropTarget, Editor, EditorError, EditorSettings, Input, Key,
    Millis, OverlayCell, Selection, SyncOutcome,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn millis(now: f64) -> Millis {
    if now.is_finite() && now > 0.0 {
        now as Millis
    } else {
        0
    }
}

fn tray_piece(team: &str, kind: &str) -> Option<Piece> {
    Some(Piece::new(PieceKind::parse(kind)?, Team::parse(team)?))
}

fn outcome_name(outcome: &SyncOutcome) -> &'static str {
    match outcome {
        SyncOutcome::Applied => "applied",
        SyncOutcome::Cleared(_) => "cleared",
        SyncOutcome::Stale => "stale",
        SyncOutcome::Closed => "closed",
    }
}

/// One overlay cell as handed to JavaScript.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct CellView {
    square: String,
    top: f64,
    left: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    intensity: Option<f64>,
    highlighted: bool,
}

impl From<OverlayCell> for CellView {
    fn from(cell: OverlayCell) -> Self {
        let indicator = cell.indicator.as_ref();
        CellView {
            square: cell.square.to_algebraic(),
            top: cell.top,
            left: cell.left,
            color: indicator.map(|i| i.color.name()),
            quantity: indicator.map(|i| i.quantity),
            label: indicator.map(|i| i.label()),
            intensity: indicator.map(|i| i.intensity()),
            highlighted: cell.highlighted,
        }
    }
}

/// A request the shell should POST to the influence service.
#[wasm_bindgen]
pub struct OutgoingRequest {
    seq: u64,
    body: String,
}

#[wasm_bindgen]
impl OutgoingRequest {
    /// Sequence number to pass back with the reply.
    #[wasm_bindgen(getter)]
    pub fn seq(&self) -> f64 {
        self.seq as f64
    }

    /// JSON request body.
    #[wasm_bindgen(getter)]
    pub fn body(&self) -> String {
        self.body.clone()
    }
}

/// An editing session that can be driven from JavaScript.
#[wasm_bindgen]
pub struct KingsBoard {
    editor: Editor,
}

#[wasm_bindgen]
impl KingsBoard {
    /// Creates a session on the standard starting layout.
    #[wasm_bindgen(constructor)]
    pub fn new(now: f64) -> Self {
        KingsBoard {
            editor: Editor::new(EditorSettings::default(), millis(now)),
        }
    }

    /// Creates a session from a piece placement such as
    /// `"4k3/8/8/8/8/8/8/4K3"`.
    ///
    /// Returns an error if the placement is invalid.
    #[wasm_bindgen(js_name = fromPlacement)]
    pub fn from_placement(placement: &str, now: f64) -> Result<KingsBoard, JsError> {
        let start =
            BoardState::from_placement(placement).map_err(|e| JsError::new(&e.to_string()))?;
        let settings = EditorSettings {
            start,
            ..EditorSettings::default()
        };
        Ok(KingsBoard {
            editor: Editor::new(settings, millis(now)),
        })
    }

    /// Returns the board as a piece placement string.
    pub fn placement(&self) -> String {
        self.editor.board().to_placement()
    }

    /// Returns the piece on `square` as a placement letter ("N", "k", ...),
    /// or null if the square is empty.
    #[wasm_bindgen(js_name = pieceAt)]
    pub fn piece_at(&self, square: &str) -> Option<String> {
        let sq = Square::from_algebraic(square)?;
        self.editor.board().piece_at(sq).map(|p| p.to_char().to_string())
    }

    /// Describes the current selection: "idle", "tray:wN", "board:e4",
    /// "crosshair:e3" or "dragging:e4" / "dragging:tray".
    pub fn selection(&self) -> String {
        match self.editor.selection() {
            Selection::Idle => "idle".to_string(),
            Selection::Tray(piece) => format!(
                "tray:{}{}",
                piece.team.tray_code(),
                piece.to_char().to_ascii_uppercase()
            ),
            Selection::Board(sq) => format!("board:{sq}"),
            Selection::Crosshair(sq) => format!("crosshair:{sq}"),
            Selection::Dragging(DragOrigin::Tray(_)) => "dragging:tray".to_string(),
            Selection::Dragging(DragOrigin::Board { square, .. }) => format!("dragging:{square}"),
        }
    }

    /// Clicks a tray piece. `team` is "w"/"b", `kind` a tray label such as
    /// "Knight". Returns false if either is not recognised.
    #[wasm_bindgen(js_name = clickTray)]
    pub fn click_tray(&mut self, team: &str, kind: &str, now: f64) -> bool {
        self.send_piece(team, kind, Input::TrayClick, now)
    }

    #[wasm_bindgen(js_name = clickSquare)]
    pub fn click_square(&mut self, square: &str, now: f64) -> bool {
        self.send_square(square, Input::SquareClick, now)
    }

    #[wasm_bindgen(js_name = dragFromTray)]
    pub fn drag_from_tray(&mut self, team: &str, kind: &str, now: f64) -> bool {
        self.send_piece(team, kind, Input::TrayDragStart, now)
    }

    #[wasm_bindgen(js_name = dragFromBoard)]
    pub fn drag_from_board(&mut self, square: &str, now: f64) -> bool {
        self.send_square(square, Input::BoardDragStart, now)
    }

    /// Drops the dragged piece at a pointer position. The rectangle is the
    /// board's bounding box in the same coordinate space.
    #[wasm_bindgen(js_name = dropAt)]
    #[allow(clippy::too_many_arguments)]
    pub fn drop_at(
        &mut self,
        x: f32,
        y: f32,
        board_left: f32,
        board_top: f32,
        board_width: f32,
        board_height: f32,
        now: f64,
    ) {
        let geometry = BoardGeometry::new(board_left, board_top, board_width, board_height);
        self.editor.drop_at(&geometry, x, y, millis(now));
    }

    /// Drops the dragged piece on `square`, or off the board for "off".
    #[wasm_bindgen(js_name = dropOn)]
    pub fn drop_on(&mut self, square: &str, now: f64) -> bool {
        let target = if square.eq_ignore_ascii_case("off") {
            DropTarget::OffBoard
        } else {
            match Square::from_algebraic(square) {
                Some(sq) => DropTarget::Square(sq),
                None => return false,
            }
        };
        self.editor.handle(Input::Drop(target), millis(now));
        true
    }

    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&mut self, now: f64) {
        self.editor.handle(Input::DragCancel, millis(now));
    }

    /// Arrow key by DOM key name ("ArrowUp") or plain direction ("up").
    #[wasm_bindgen(js_name = arrowKey)]
    pub fn arrow_key(&mut self, key: &str, now: f64) -> bool {
        match Key::parse(key) {
            Some(key) => {
                self.editor.handle(Input::Key(key), millis(now));
                true
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = hoverIndicator)]
    pub fn hover_indicator(&mut self, square: &str) {
        if let Some(sq) = Square::from_algebraic(square) {
            self.editor.hover_indicator(sq);
        }
    }

    #[wasm_bindgen(js_name = unhoverIndicator)]
    pub fn unhover_indicator(&mut self) {
        self.editor.unhover_indicator();
    }

    /// Pins or unpins an indicator's origins. Returns whether a pin is active.
    #[wasm_bindgen(js_name = clickIndicator)]
    pub fn click_indicator(&mut self, square: &str) -> bool {
        Square::from_algebraic(square).is_some_and(|sq| self.editor.click_indicator(sq))
    }

    pub fn flip(&mut self, now: f64) {
        self.editor.flip(millis(now));
    }

    #[wasm_bindgen(js_name = toggleView)]
    pub fn toggle_view(&mut self, now: f64) {
        self.editor.toggle_view(millis(now));
    }

    #[wasm_bindgen(js_name = toggleInfluence)]
    pub fn toggle_influence(&mut self) {
        self.editor.toggle_influence();
    }

    /// Resets the board to the starting layout.
    pub fn reset(&mut self, now: f64) {
        self.editor.reset(millis(now));
    }

    /// Returns "white" or "black", whichever is drawn at the bottom.
    pub fn orientation(&self) -> String {
        self.editor.orientation().name().to_string()
    }

    /// Returns "allies" or "enemies".
    pub fn view(&self) -> String {
        self.editor.view().service_name().to_string()
    }

    /// Returns the overlay cells as an array of plain objects, empty while
    /// the overlay is hidden.
    pub fn overlay(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.cells()).map_err(|e| JsError::new(&e.to_string()))
    }

    /// The message to show, or null.
    pub fn notice(&self, now: f64) -> Option<String> {
        self.editor.notice(millis(now)).map(|n| n.message())
    }

    #[wasm_bindgen(js_name = trayResetActive)]
    pub fn tray_reset_active(&self, now: f64) -> bool {
        self.editor.tray_reset_active(millis(now))
    }

    /// When to call `tick` / `nextRequest` again, or null if nothing is
    /// scheduled.
    #[wasm_bindgen(js_name = nextDeadline)]
    pub fn next_deadline(&self) -> Option<f64> {
        self.editor.next_deadline().map(|at| at as f64)
    }

    /// Expires notices and pulses. Returns true if the view changed.
    pub fn tick(&mut self, now: f64) -> bool {
        self.editor.tick(millis(now))
    }

    /// Hands out the debounced influence request once it is due.
    #[wasm_bindgen(js_name = nextRequest)]
    pub fn next_request(&mut self, now: f64) -> Option<OutgoingRequest> {
        let request = self.editor.poll_sync(millis(now))?;
        let body = serde_json::to_string(&request.body).ok()?;
        Some(OutgoingRequest {
            seq: request.seq,
            body,
        })
    }

    /// Feeds back the body of the reply to request `seq`.
    ///
    /// Returns "applied", "cleared", "stale" or "closed".
    #[wasm_bindgen(js_name = applyResponse)]
    pub fn apply_response(&mut self, seq: f64, body: &str, now: f64) -> String {
        let outcome = self.editor.resolve_sync_json(seq as u64, body, millis(now));
        outcome_name(&outcome).to_string()
    }

    /// Reports that request `seq` failed in transport.
    #[wasm_bindgen(js_name = failRequest)]
    pub fn fail_request(&mut self, seq: f64, message: &str, now: f64) -> String {
        let err = EditorError::NetworkFailure(message.to_string());
        let outcome = self.editor.resolve_sync(seq as u64, Err(err), millis(now));
        outcome_name(&outcome).to_string()
    }

    /// Stops syncing; later replies are ignored.
    pub fn dispose(&mut self) {
        self.editor.shutdown();
    }
}

impl KingsBoard {
    fn cells(&self) -> Vec<CellView> {
        self.editor.overlay().into_iter().map(CellView::from).collect()
    }

    fn send_piece(&mut self, team: &str, kind: &str, input: fn(Piece) -> Input, now: f64) -> bool {
        match tray_piece(team, kind) {
            Some(piece) => {
                self.editor.handle(input(piece), millis(now));
                true
            }
            None => false,
        }
    }

    fn send_square(&mut self, square: &str, input: fn(Square) -> Input, now: f64) -> bool {
        match Square::from_algebraic(square) {
            Some(sq) => {
                self.editor.handle(input(sq), millis(now));
                true
            }
            None => false,
        }
    }
}

/// Initialization function called when WASM module loads.
#[wasm_bindgen(start)]
pub fn init() {}
