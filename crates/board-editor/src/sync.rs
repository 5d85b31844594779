//! Debounced, sequenced influence refresh.
//!
//! [`InfluenceSync`] does no I/O and reads no clock. The owner reports
//! changes with [`InfluenceSync::mark_dirty`], asks for work with
//! [`InfluenceSync::poll`] once the debounce deadline has passed, performs the
//! request however it likes, and hands the reply back to
//! [`InfluenceSync::resolve`] together with the sequence number it was issued
//! under. Only the reply to the latest issued request is ever applied.

use board_core::BoardState;
use tracing::{debug, warn};

use crate::wire::{InfluenceRequest, InfluenceResponse};
use crate::{EditorError, InfluenceGrid, Millis, View};

/// Quiet period between the last change and the request it triggers.
pub const DEFAULT_DEBOUNCE_MS: Millis = 100;

/// A request ready to go out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub seq: u64,
    pub body: InfluenceRequest,
}

/// What [`InfluenceSync::resolve`] did with a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The grid now shows the reply.
    Applied,
    /// The reply was a failure; the grid is now all-null.
    Cleared(EditorError),
    /// The reply is not for the latest issued request, or that request was
    /// already answered; the reply was dropped.
    Stale,
    /// The sync was shut down; the reply was dropped.
    Closed,
}

#[derive(Debug, Clone)]
pub struct InfluenceSync {
    grid: InfluenceGrid,
    debounce: Millis,
    due_at: Option<Millis>,
    latest_issued: u64,
    latest_resolved: u64,
    closed: bool,
}

impl InfluenceSync {
    pub fn new(debounce: Millis) -> Self {
        Self {
            grid: InfluenceGrid::empty(),
            debounce,
            due_at: None,
            latest_issued: 0,
            latest_resolved: 0,
            closed: false,
        }
    }

    pub fn grid(&self) -> &InfluenceGrid {
        &self.grid
    }

    /// Something the request depends on changed. Restarts the debounce.
    pub fn mark_dirty(&mut self, now: Millis) {
        if self.closed {
            return;
        }
        self.due_at = Some(now.saturating_add(self.debounce));
    }

    /// When [`poll`](Self::poll) will next have something to hand out.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.due_at
    }

    pub fn is_due(&self, now: Millis) -> bool {
        self.due_at.is_some_and(|due| now >= due)
    }

    /// True while the latest issued request has no reply yet.
    pub fn in_flight(&self) -> bool {
        self.latest_resolved < self.latest_issued
    }

    pub fn latest_issued(&self) -> u64 {
        self.latest_issued
    }

    /// Issues the debounced request if its deadline has passed.
    ///
    /// The body is built from `board` and `view` as they are at `now`, not as
    /// they were when the change was reported.
    pub fn poll(
        &mut self,
        now: Millis,
        board: &BoardState,
        view: View,
    ) -> Option<PendingRequest> {
        if self.closed || !self.is_due(now) {
            return None;
        }
        self.due_at = None;
        self.latest_issued += 1;

        let body = InfluenceRequest::new(board, view);
        debug!(
            seq = self.latest_issued,
            pieces = body.data.pieces.len(),
            "issuing influence request"
        );
        Some(PendingRequest {
            seq: self.latest_issued,
            body,
        })
    }

    /// Applies the reply to request `seq` if it is the latest issued request
    /// and has not been answered yet.
    pub fn resolve(
        &mut self,
        seq: u64,
        reply: Result<InfluenceResponse, EditorError>,
    ) -> SyncOutcome {
        if self.closed {
            return SyncOutcome::Closed;
        }
        if seq == 0 || seq != self.latest_issued || self.latest_resolved >= seq {
            debug!(
                seq,
                latest = self.latest_issued,
                resolved = self.latest_resolved,
                "discarding stale influence response"
            );
            return SyncOutcome::Stale;
        }
        self.latest_resolved = seq;

        match reply.and_then(|response| response.into_grid().map_err(EditorError::from)) {
            Ok(grid) => {
                self.grid = grid;
                SyncOutcome::Applied
            }
            Err(err) => {
                warn!(seq, error = %err, "influence refresh failed, clearing overlay");
                self.grid = InfluenceGrid::empty();
                SyncOutcome::Cleared(err)
            }
        }
    }

    /// Like [`resolve`](Self::resolve) for a raw response body.
    pub fn resolve_json(&mut self, seq: u64, body: &str) -> SyncOutcome {
        let reply = InfluenceResponse::from_json(body).map_err(EditorError::from);
        self.resolve(seq, reply)
    }

    /// Stops issuing requests and ignores every later reply.
    pub fn shutdown(&mut self) {
        self.closed = true;
        self.due_at = None;
    }

}

impl Default for InfluenceSync {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
