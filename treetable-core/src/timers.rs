//! Deferred work for the tree view.
//!
//! Every delay in the engine (filter debounce, collapse settle, drag-expand,
//! landed highlight) is an entry in a [`TimerQueue`]. The queue never reads the
//! clock: the host passes `now` in and pops whatever has become due, which
//! keeps the single-threaded, cooperative model explicit and testable.

use std::time::{Duration, Instant};

/// Handle to a scheduled entry, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// Work deferred by the tree view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Re-run the filter pass with the current filter values
    FilterRecompute,
    /// Finish the collapse of `key` after its close animation
    CollapseSettle {
        /// Node being collapsed
        key: String,
    },
    /// Toggle expansion of a collapsed node hovered as a drop target
    DragExpand {
        /// Hovered node
        key: String,
    },
    /// Clear the landed highlight if it is still showing
    DropHighlightClear,
}

#[derive(Debug)]
struct Entry<E> {
    token: TimerToken,
    deadline: Instant,
    event: E,
}

/// Ordered collection of pending timers
#[derive(Debug)]
pub struct TimerQueue<E = TimerEvent> {
    entries: Vec<Entry<E>>,
    next_token: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_token: 0,
        }
    }
}

impl<E> TimerQueue<E> {
    /// Creates an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `event` to fire at `now + delay`
    pub fn schedule(&mut self, now: Instant, delay: Duration, event: E) -> TimerToken {
        self.schedule_at(now + delay, event)
    }

    /// Schedules `event` to fire at `deadline`
    pub fn schedule_at(&mut self, deadline: Instant, event: E) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        // Keep entries sorted by deadline, FIFO among equal deadlines
        let position = self.entries.partition_point(|e| e.deadline <= deadline);
        self.entries.insert(
            position,
            Entry {
                token,
                deadline,
                event,
            },
        );
        token
    }

    /// Cancels a pending entry, returning true if it had not fired yet
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        before != self.entries.len()
    }

    /// Returns true if `token` is still pending
    #[must_use]
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    /// Earliest pending deadline
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first().map(|e| e.deadline)
    }

    /// Removes and returns the earliest entry whose deadline is at or before `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerToken, E)> {
        if self.entries.first()?.deadline > now {
            return None;
        }
        let entry = self.entries.remove(0);
        Some((entry.token, entry.event))
    }

    /// Number of pending entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
