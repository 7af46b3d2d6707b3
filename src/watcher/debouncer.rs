//! Debouncing of page events.
//!
//! The first event of a burst arms a single timer. Later events are recorded
//! but never push the deadline back, so a steady stream of changes still
//! regenerates once per window.

use std::time::{Duration, Instant};

use super::handler::PageEvent;

/// A debounced burst of events, ready to regenerate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// The event that armed the timer; it drives the regeneration.
    pub trigger: PageEvent,
    /// Every event recorded in the window, trigger included.
    pub events: Vec<PageEvent>,
}

#[derive(Debug)]
enum State {
    Idle,
    Pending {
        deadline: Instant,
        events: Vec<PageEvent>,
    },
}

/// First-event-authoritative debouncer.
///
/// Time is passed in explicitly so callers (and tests) control the clock.
#[derive(Debug)]
pub struct Debouncer {
    state: State,
    window: Duration,
}

impl Debouncer {
    /// Create a new debouncer with the given window in milliseconds.
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            state: State::Idle,
            window: Duration::from_millis(debounce_ms),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record an event observed at `now`.
    ///
    /// Returns `true` if this event armed the timer.
    pub fn record(&mut self, event: PageEvent, now: Instant) -> bool {
        if let State::Pending { events, .. } = &mut self.state {
            events.push(event);
            return false;
        }

        self.state = State::Pending {
            deadline: now + self.window,
            events: vec![event],
        };
        true
    }

    /// When the armed timer expires, if any.
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            State::Idle => None,
            State::Pending { deadline, .. } => Some(*deadline),
        }
    }

    /// Take the batch if its window has elapsed at `now`, returning to idle.
    pub fn take_ready(&mut self, now: Instant) -> Option<Batch> {
        match self.deadline() {
            Some(deadline) if now >= deadline => {}
            _ => return None,
        }

        match std::mem::replace(&mut self.state, State::Idle) {
            State::Pending { events, .. } => {
                let trigger = events.first().cloned()?;
                Some(Batch { trigger, events })
            }
            State::Idle => None,
        }
    }

    /// Drop any pending batch without firing it.
    pub fn clear(&mut self) {
        self.state = State::Idle;
    }

    /// Check if a batch is pending.
    pub fn has_pending(&self) -> bool {
        matches!(self.state, State::Pending { .. })
    }

    /// Number of events recorded in the pending batch.
    pub fn pending_count(&self) -> usize {
        match &self.state {
            State::Idle => 0,
            State::Pending { events, .. } => events.len(),
        }
    }
}
