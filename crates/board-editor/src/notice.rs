//! Transient UI timers: the auto-dismissing error message and the short
//! "tray selection reset" pulse.
//!
//! Both are single-shot. Firing again before expiry supersedes the previous
//! occurrence and restarts its timer.

use crate::{EditorError, Millis};

/// How long an error message stays up.
pub const DEFAULT_NOTICE_MS: Millis = 3_000;

/// Length of the tray reset pulse.
pub const DEFAULT_PULSE_MS: Millis = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub error: EditorError,
    pub expires_at: Millis,
}

impl Notice {
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// At most one visible message at a time.
#[derive(Debug, Clone)]
pub struct Notices {
    current: Option<Notice>,
    ttl: Millis,
}

impl Notices {
    pub fn new(ttl: Millis) -> Self {
        Self { current: None, ttl }
    }

    /// Shows `error`, replacing whatever was up.
    pub fn show(&mut self, error: EditorError, now: Millis) {
        self.current = Some(Notice {
            error,
            expires_at: now.saturating_add(self.ttl),
        });
    }

    /// The message still visible at `now`.
    pub fn active(&self, now: Millis) -> Option<&Notice> {
        self.current.as_ref().filter(|n| now < n.expires_at)
    }

    /// Drops an expired message. Returns true if something was dismissed.
    pub fn expire(&mut self, now: Millis) -> bool {
        match &self.current {
            Some(n) if now >= n.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.current.as_ref().map(|n| n.expires_at)
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_MS)
    }
}

/// A short-lived on/off signal.
#[derive(Debug, Clone)]
pub struct Pulse {
    until: Option<Millis>,
    length: Millis,
}

impl Pulse {
    pub fn new(length: Millis) -> Self {
        Self { until: None, length }
    }

    pub fn fire(&mut self, now: Millis) {
        self.until = Some(now.saturating_add(self.length));
    }

    pub fn is_active(&self, now: Millis) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    pub fn expire(&mut self, now: Millis) -> bool {
        if self.until.is_some_and(|until| now >= until) {
            self.until = None;
            true
        } else {
            false
        }
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.until
    }
}

impl Default for Pulse {
    fn default() -> Self {
        Self::new(DEFAULT_PULSE_MS)
    }
}
