//! The editor session: board, selection, overlay and sync in one place.

use board_core::{BoardState, Square};
use tracing::debug;

use crate::notice::{DEFAULT_NOTICE_MS, DEFAULT_PULSE_MS};
use crate::overlay::{self, Highlighter, OverlayCell};
use crate::wire::InfluenceResponse;
use crate::{
    BoardGeometry, Controller, DropTarget, Effect, EditorError, InfluenceGrid, InfluenceSync,
    Input, Millis, Notice, Notices, Orientation, PendingRequest, Pulse, Selection, SyncOutcome,
    View, DEFAULT_DEBOUNCE_MS,
};

/// Start-up knobs of an [`Editor`].
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub debounce_ms: Millis,
    pub notice_ms: Millis,
    pub tray_pulse_ms: Millis,
    pub orientation: Orientation,
    pub view: View,
    /// Layout used at start-up and restored by [`Editor::reset`].
    pub start: BoardState,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            notice_ms: DEFAULT_NOTICE_MS,
            tray_pulse_ms: DEFAULT_PULSE_MS,
            orientation: Orientation::default(),
            view: View::default(),
            start: BoardState::starting(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Editor {
    board: BoardState,
    start: BoardState,
    controller: Controller,
    highlighter: Highlighter,
    sync: InfluenceSync,
    orientation: Orientation,
    view: View,
    show_influence: bool,
    notices: Notices,
    tray_pulse: Pulse,
}

impl Editor {
    /// A fresh session. The first influence request is due one debounce
    /// period after `now`.
    pub fn new(settings: EditorSettings, now: Millis) -> Self {
        let mut sync = InfluenceSync::new(settings.debounce_ms);
        sync.mark_dirty(now);
        Self {
            board: settings.start.clone(),
            start: settings.start,
            controller: Controller::new(),
            highlighter: Highlighter::default(),
            sync,
            orientation: settings.orientation,
            view: settings.view,
            show_influence: true,
            notices: Notices::new(settings.notice_ms),
            tray_pulse: Pulse::new(settings.tray_pulse_ms),
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn selection(&self) -> Selection {
        self.controller.selection()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn grid(&self) -> &InfluenceGrid {
        self.sync.grid()
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn is_showing_influence(&self) -> bool {
        self.show_influence
    }

    /// Feeds one input through the interaction state machine.
    pub fn handle(&mut self, input: Input, now: Millis) -> Effect {
        let effect = self
            .controller
            .handle(input, &mut self.board, &mut self.highlighter);
        if effect.board_changed {
            self.sync.mark_dirty(now);
        }
        if effect.tray_placed {
            self.tray_pulse.fire(now);
        }
        if let Some(err) = &effect.error {
            self.notices.show(err.clone(), now);
        }
        effect
    }

    /// Ends the current drag at pointer position `(x, y)`.
    ///
    /// A position that is not a finite number cancels the drag instead of
    /// counting as a drop outside the board.
    pub fn drop_at(&mut self, geometry: &BoardGeometry, x: f32, y: f32, now: Millis) -> Effect {
        if !x.is_finite() || !y.is_finite() {
            return self.handle(Input::DragCancel, now);
        }
        let target = geometry
            .square_at(self.orientation, x, y)
            .map_or(DropTarget::OffBoard, DropTarget::Square);
        self.handle(Input::Drop(target), now)
    }

    pub fn hover_indicator(&mut self, square: Square) {
        let grid = self.sync.grid();
        self.highlighter.hover(grid, square);
    }

    pub fn unhover_indicator(&mut self) {
        self.highlighter.unhover();
    }

    /// Pins or unpins the origin highlight of the indicator on `square`.
    ///
    /// A click where no indicator is drawn, or while the overlay is hidden,
    /// does nothing. Pinning takes the highlight away from any selected board
    /// piece, so that selection ends.
    pub fn click_indicator(&mut self, square: Square) -> bool {
        if !self.show_influence || self.controller.is_dragging() {
            return false;
        }
        let grid = self.sync.grid();
        if grid.get(square).map_or(true, |cell| cell.quantity == 0) {
            return false;
        }
        self.controller.release_board_selection();
        self.highlighter.click_indicator(grid, square)
    }

    pub fn flip(&mut self, now: Millis) {
        self.orientation = self.orientation.flipped();
        self.sync.mark_dirty(now);
    }

    pub fn toggle_view(&mut self, now: Millis) {
        self.view = self.view.toggled();
        self.sync.mark_dirty(now);
    }

    /// Shows or hides the overlay. Syncing carries on either way.
    pub fn toggle_influence(&mut self) {
        self.show_influence = !self.show_influence;
    }

    /// Back to the start layout with nothing selected.
    pub fn reset(&mut self, now: Millis) {
        self.board.restore(self.start.clone());
        self.controller.reset(&mut self.highlighter);
        self.highlighter.clear();
        self.sync.mark_dirty(now);
        debug!(placement = %self.board.to_placement(), "board reset");
    }

    /// Overlay cells to draw; empty while the overlay is hidden.
    pub fn overlay(&self) -> Vec<OverlayCell> {
        if !self.show_influence {
            return Vec::new();
        }
        let grid = self.sync.grid();
        let highlight = self.highlighter.highlight(grid);
        overlay::render(grid, self.orientation, highlight.as_ref())
    }

    pub fn notice(&self, now: Millis) -> Option<&Notice> {
        self.notices.active(now)
    }

    pub fn tray_reset_active(&self, now: Millis) -> bool {
        self.tray_pulse.is_active(now)
    }

    /// Hands out the debounced influence request once it is due.
    pub fn poll_sync(&mut self, now: Millis) -> Option<PendingRequest> {
        self.sync.poll(now, &self.board, self.view)
    }

    /// Applies the reply to request `seq`. A failed refresh empties the
    /// overlay and raises a notice.
    pub fn resolve_sync(
        &mut self,
        seq: u64,
        reply: Result<InfluenceResponse, EditorError>,
        now: Millis,
    ) -> SyncOutcome {
        let outcome = self.sync.resolve(seq, reply);
        self.after_resolve(&outcome, now);
        outcome
    }

    pub fn resolve_sync_json(&mut self, seq: u64, body: &str, now: Millis) -> SyncOutcome {
        let outcome = self.sync.resolve_json(seq, body);
        self.after_resolve(&outcome, now);
        outcome
    }

    fn after_resolve(&mut self, outcome: &SyncOutcome, now: Millis) {
        if let SyncOutcome::Cleared(err) = outcome {
            self.notices.show(err.clone(), now);
        }
        // A hover over a cell that no longer has an indicator is meaningless.
        if let Some(square) = self.highlighter.hovered() {
            let grid = self.sync.grid();
            self.highlighter.hover(grid, square);
        }
    }

    /// Expires timers whose deadline has passed. Returns true if anything
    /// visible changed.
    pub fn tick(&mut self, now: Millis) -> bool {
        let notice = self.notices.expire(now);
        let pulse = self.tray_pulse.expire(now);
        notice || pulse
    }

    /// The earliest moment [`tick`](Self::tick) or
    /// [`poll_sync`](Self::poll_sync) has work to do.
    pub fn next_deadline(&self) -> Option<Millis> {
        [
            self.sync.next_deadline(),
            self.notices.next_deadline(),
            self.tray_pulse.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Ends the session: no further requests, later replies ignored.
    pub fn shutdown(&mut self) {
        self.sync.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KingAction;
    use crate::{InfluenceCell, InfluenceColor};
    use board_core::{Piece, PieceKind, Team};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn editor(placement: &str) -> Editor {
        let settings = EditorSettings {
            start: BoardState::from_placement(placement).unwrap(),
            ..EditorSettings::default()
        };
        Editor::new(settings, 0)
    }

    #[test]
    fn starts_from_standard_layout_and_requests_influence() {
        let mut ed = Editor::new(EditorSettings::default(), 0);
        assert_eq!(ed.board().piece_count(), 32);
        assert_eq!(ed.next_deadline(), Some(100));
        assert!(ed.poll_sync(99).is_none());
        let req = ed.poll_sync(100).unwrap();
        assert_eq!(req.body.data.pieces.len(), 32);
    }

    #[test]
    fn tray_placement_pulses_and_schedules_sync() {
        let mut ed = editor("4k3/8/8/8/8/8/8/4K3");
        ed.poll_sync(100);
        let knight = Piece::new(PieceKind::Knight, Team::White);
        ed.handle(Input::TrayClick(knight), 500);
        ed.handle(Input::SquareClick(sq("d4")), 520);

        assert!(ed.tray_reset_active(560));
        assert!(!ed.tray_reset_active(620));
        assert_eq!(ed.next_deadline(), Some(620));
        assert!(ed.tick(620));
        assert!(ed.poll_sync(620).is_some());
    }

    #[test]
    fn refused_edit_raises_notice_that_expires() {
        let mut ed = editor("4k3/8/8/8/8/8/8/4K3");
        ed.handle(Input::BoardDragStart(sq("e1")), 1_000);
        ed.handle(Input::Drop(DropTarget::OffBoard), 1_050);

        let notice = ed.notice(1_100).unwrap();
        assert_eq!(notice.error, EditorError::KingProtected(KingAction::Remove));
        assert!(ed.notice(4_050).is_none());
        assert!(ed.tick(4_050));
    }

    #[test]
    fn drop_at_uses_orientation() {
        let mut ed = editor("4k3/8/8/8/8/8/8/2B1K3");
        let geometry = BoardGeometry::square(800.0);
        ed.flip(0);
        ed.handle(Input::BoardDragStart(sq("c1")), 10);
        // Top-left slot is h1 with black at the bottom.
        ed.drop_at(&geometry, 50.0, 50.0, 20);
        assert_eq!(
            ed.board().piece_at(sq("h1")),
            Some(Piece::new(PieceKind::Bishop, Team::White))
        );

        ed.handle(Input::BoardDragStart(sq("h1")), 30);
        ed.drop_at(&geometry, 900.0, 50.0, 40);
        assert!(!ed.board().is_occupied(sq("h1")));
    }

    #[test]
    fn non_finite_drop_position_cancels_the_drag() {
        let mut ed = editor("4k3/8/8/8/8/8/8/2B1K3");
        let geometry = BoardGeometry::square(400.0);
        let bishop = Some(Piece::new(PieceKind::Bishop, Team::White));
        ed.poll_sync(100);

        ed.handle(Input::BoardDragStart(sq("c1")), 200);
        let effect = ed.drop_at(&geometry, f32::NAN, 10.0, 210);
        assert!(!effect.board_changed);
        assert_eq!(ed.board().piece_at(sq("c1")), bishop);
        assert_eq!(ed.selection(), Selection::Idle);

        ed.handle(Input::BoardDragStart(sq("c1")), 300);
        ed.drop_at(&geometry, 10.0, f32::INFINITY, 310);
        ed.handle(Input::BoardDragStart(sq("c1")), 400);
        ed.drop_at(&geometry, f32::NEG_INFINITY, f32::NAN, 410);
        assert_eq!(ed.board().piece_at(sq("c1")), bishop);
        assert_eq!(ed.next_deadline(), None);
    }

    #[test]
    fn view_and_orientation_changes_schedule_sync() {
        let mut ed = editor("4k3/8/8/8/8/8/8/4K3");
        ed.poll_sync(100);
        assert_eq!(ed.next_deadline(), None);

        ed.toggle_view(200);
        let req = ed.poll_sync(300).unwrap();
        assert_eq!(req.body.data.view, crate::wire::WireSide::Enemies);

        ed.flip(400);
        assert!(ed.poll_sync(500).is_some());
        assert_eq!(ed.orientation(), Orientation::BlackAtBottom);
    }

    #[test]
    fn hidden_overlay_renders_nothing_but_keeps_syncing() {
        let mut ed = editor("4k3/8/8/8/8/8/8/4K3");
        assert_eq!(ed.overlay().len(), 64);
        ed.toggle_influence();
        assert!(ed.overlay().is_empty());
        assert!(ed.poll_sync(100).is_some());
    }

    #[test]
    fn indicator_click_ends_board_selection() {
        let mut ed = editor("4k3/8/8/8/3N4/8/8/4K3");
        let req = ed.poll_sync(100).unwrap();
        let mut grid = InfluenceGrid::empty();
        grid.set(
            sq("c6"),
            Some(InfluenceCell::new(InfluenceColor::Green, 1).with_origins([sq("d4")])),
        );
        let outcome = ed.resolve_sync(req.seq, Ok(InfluenceResponse::from_grid(&grid)), 150);
        assert_eq!(outcome, SyncOutcome::Applied);

        ed.handle(Input::SquareClick(sq("e1")), 200);
        assert_eq!(ed.selection(), Selection::Board(sq("e1")));

        assert!(!ed.click_indicator(sq("h8")));
        assert_eq!(ed.selection(), Selection::Board(sq("e1")));

        assert!(ed.click_indicator(sq("c6")));
        assert_eq!(ed.selection(), Selection::Idle);
        let highlighted: Vec<_> = ed
            .overlay()
            .into_iter()
            .filter(|c| c.highlighted)
            .map(|c| c.square)
            .collect();
        assert_eq!(highlighted, vec![sq("d4")]);
    }

    #[test]
    fn hidden_overlay_ignores_indicator_clicks() {
        let mut ed = editor("4k3/8/8/8/3N4/8/8/4K3");
        let req = ed.poll_sync(100).unwrap();
        let mut grid = InfluenceGrid::empty();
        grid.set(
            sq("c6"),
            Some(InfluenceCell::new(InfluenceColor::Green, 1).with_origins([sq("d4")])),
        );
        ed.resolve_sync(req.seq, Ok(InfluenceResponse::from_grid(&grid)), 150);

        ed.handle(Input::SquareClick(sq("e1")), 200);
        ed.toggle_influence();
        assert!(!ed.click_indicator(sq("c6")));
        assert_eq!(ed.selection(), Selection::Board(sq("e1")));

        ed.toggle_influence();
        // Nothing was pinned, so d4 is not lit by the c6 indicator.
        assert!(ed.overlay().iter().all(|c| !c.highlighted));
    }

    #[test]
    fn failed_refresh_clears_overlay_and_notifies() {
        let mut ed = editor("4k3/8/8/8/8/8/8/4K3");
        let req = ed.poll_sync(100).unwrap();
        let outcome = ed.resolve_sync_json(req.seq, "{\"data\":{\"board\":[]}}", 150);
        assert!(matches!(outcome, SyncOutcome::Cleared(EditorError::InvalidApiShape(_))));
        assert!(ed.grid().is_empty());
        assert!(ed.notice(200).is_some());
        assert!(ed.overlay().iter().all(|c| c.indicator.is_none()));
    }

    #[test]
    fn reset_restores_start_layout() {
        let mut ed = editor("4k3/8/8/8/8/8/8/4K3");
        ed.handle(Input::TrayClick(Piece::new(PieceKind::Queen, Team::Black)), 0);
        ed.handle(Input::SquareClick(sq("a5")), 10);
        ed.handle(Input::SquareClick(sq("e1")), 20);
        ed.reset(30);
        assert_eq!(ed.board().to_placement(), "4k3/8/8/8/8/8/8/4K3");
        assert_eq!(ed.selection(), Selection::Idle);
        assert_eq!(ed.highlighter().focus(), None);
    }

    #[test]
    fn shutdown_stops_requests() {
        let mut ed = editor("4k3/8/8/8/8/8/8/4K3");
        ed.shutdown();
        assert!(ed.poll_sync(1_000).is_none());
    }
}
