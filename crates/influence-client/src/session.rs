//! Drives an [`Editor`] on the tokio clock.
//!
//! The editor never sleeps or performs I/O itself. [`Session::step`] waits
//! for whichever comes first, the editor's next deadline or a reply from the
//! service, and feeds it back in. Requests run as tasks in a [`JoinSet`], so
//! dropping the session aborts everything still in flight.

use std::time::Duration;

use board_editor::wire::InfluenceResponse;
use board_editor::{Editor, EditorError, Effect, Input, Millis, SyncOutcome};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::InfluenceService;

type Reply = (u64, Result<InfluenceResponse, EditorError>);

/// What one [`Session::step`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A timer fired; notices or pulses may have changed.
    Tick,
    /// An influence request went out.
    Issued(u64),
    /// A reply came back and was handled.
    Resolved(u64, SyncOutcome),
}

pub struct Session<S> {
    editor: Editor,
    service: S,
    in_flight: JoinSet<Reply>,
    epoch: Instant,
}

impl<S: InfluenceService> Session<S> {
    /// Wraps an editor created at time zero of this session's clock.
    pub fn new(editor: Editor, service: S) -> Self {
        Self {
            editor,
            service,
            in_flight: JoinSet::new(),
            epoch: Instant::now(),
        }
    }

    /// Milliseconds since the session started.
    pub fn now(&self) -> Millis {
        self.epoch.elapsed().as_millis() as Millis
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn handle(&mut self, input: Input) -> Effect {
        let now = self.now();
        self.editor.handle(input, now)
    }

    /// True while a timer is armed or a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.editor.next_deadline().is_some() || !self.in_flight.is_empty()
    }

    /// Waits for the next timer or reply and applies it. Returns `None` at
    /// once when there is nothing to wait for.
    pub async fn step(&mut self) -> Option<SessionEvent> {
        let deadline = self.editor.next_deadline();
        if deadline.is_none() && self.in_flight.is_empty() {
            return None;
        }

        let sleep_for = deadline.map(|at| Duration::from_millis(at.saturating_sub(self.now())));

        tokio::select! {
            Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                match joined {
                    Ok((seq, reply)) => {
                        let now = self.now();
                        let outcome = self.editor.resolve_sync(seq, reply, now);
                        Some(SessionEvent::Resolved(seq, outcome))
                    }
                    Err(err) => {
                        warn!(error = %err, "influence request task ended abnormally");
                        Some(SessionEvent::Tick)
                    }
                }
            }
            _ = sleep_or_park(sleep_for) => Some(self.on_deadline()),
        }
    }

    /// Steps until no timer is armed and no request is outstanding.
    pub async fn run_until_idle(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.step().await {
            events.push(event);
        }
        events
    }

    /// Stops syncing and aborts outstanding requests.
    pub fn shutdown(&mut self) {
        self.editor.shutdown();
        self.in_flight.abort_all();
    }

    fn on_deadline(&mut self) -> SessionEvent {
        let now = self.now();
        if let Some(request) = self.editor.poll_sync(now) {
            let seq = request.seq;
            let service = self.service.clone();
            self.in_flight.spawn(async move {
                let reply = service.fetch(request.body).await.map_err(EditorError::from);
                (seq, reply)
            });
            debug!(seq, in_flight = self.in_flight.len(), "influence request dispatched");
            return SessionEvent::Issued(seq);
        }
        self.editor.tick(now);
        SessionEvent::Tick
    }
}

async fn sleep_or_park(duration: Option<Duration>) {
    match duration {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}
