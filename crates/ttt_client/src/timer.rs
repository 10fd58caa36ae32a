//! Elapsed game time at one-second resolution.

use std::time::Instant;

/// Tracks how long the current game has been running.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameTimer {
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl GameTimer {
    /// Creates a timer that has not started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) counting from `now`.
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.stopped_at = None;
    }

    /// Freezes the count at `now`. Stopping twice keeps the first stop.
    pub fn stop(&mut self, now: Instant) {
        if self.started_at.is_some() && self.stopped_at.is_none() {
            self.stopped_at = Some(now);
        }
    }

    /// True between `start` and `stop`.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.stopped_at.is_none()
    }

    /// Whole seconds elapsed as of `now`.
    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        match self.started_at {
            None => 0,
            Some(start) => self
                .stopped_at
                .unwrap_or(now)
                .saturating_duration_since(start)
                .as_secs(),
        }
    }

    /// Display text, `Time: 12s`.
    pub fn label(&self, now: Instant) -> String {
        format!("Time: {}s", self.elapsed_secs(now))
    }
}
