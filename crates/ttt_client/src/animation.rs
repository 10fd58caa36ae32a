//! Timed marker placement.
//!
//! An animation is a pure function of elapsed time: whoever schedules
//! frames calls [`Animator::poll`] with the current instant, and the mark
//! is committed to the board once progress reaches 1.

use crate::render::PartialMark;
use std::time::{Duration, Instant};
use ttt_core::{Board, Mark};
use tracing::{debug, instrument, warn};

/// Fraction of `duration` covered by `elapsed`, clamped to `[0, 1]`.
///
/// A zero duration is always complete.
pub fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_nanos() as f64 / duration.as_nanos() as f64;
    ratio.clamp(0.0, 1.0) as f32
}

/// A mark being drawn into one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkAnimation {
    index: usize,
    mark: Mark,
    started_at: Instant,
    duration: Duration,
}

impl MarkAnimation {
    /// Cell being drawn.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Mark being drawn.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Progress at `now`.
    pub fn progress_at(&self, now: Instant) -> f32 {
        progress(now.saturating_duration_since(self.started_at), self.duration)
    }

    /// Snapshot for the renderer.
    pub fn partial_at(&self, now: Instant) -> PartialMark {
        PartialMark {
            index: self.index,
            mark: self.mark,
            progress: self.progress_at(now),
        }
    }
}

/// Runs at most one [`MarkAnimation`] at a time.
#[derive(Debug, Clone)]
pub struct Animator {
    duration: Duration,
    current: Option<MarkAnimation>,
}

impl Animator {
    /// Creates an idle animator whose animations last `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    /// True while an animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.current.is_some()
    }

    /// The animation in flight.
    pub fn current(&self) -> Option<&MarkAnimation> {
        self.current.as_ref()
    }

    /// Starts drawing `mark` at `index`.
    ///
    /// Returns `false` and does nothing if another animation is in flight.
    #[instrument(skip(self))]
    pub fn start(&mut self, index: usize, mark: Mark, now: Instant) -> bool {
        if let Some(busy) = &self.current {
            debug!(busy_index = busy.index, "Animation in flight, request dropped");
            return false;
        }
        self.current = Some(MarkAnimation {
            index,
            mark,
            started_at: now,
            duration: self.duration,
        });
        true
    }

    /// Advances to `now`, committing the mark when the animation completes.
    ///
    /// Returns the committed index on the poll that finishes the animation.
    pub fn poll(&mut self, now: Instant, board: &mut Board) -> Option<usize> {
        let animation = self.current?;
        if animation.progress_at(now) < 1.0 {
            return None;
        }
        self.current = None;
        match board.place_mark(animation.index, animation.mark) {
            Ok(()) => {
                debug!(index = animation.index, mark = %animation.mark, "Animation committed");
                Some(animation.index)
            }
            Err(e) => {
                warn!(error = %e, "Animated mark could not be committed");
                None
            }
        }
    }

    /// Drops any animation in flight without committing it.
    pub fn cancel(&mut self) {
        self.current = None;
    }
}
