//! Keyword debouncing.
//!
//! The core cannot own a clock, so the debouncer hands out a [`DebounceTicket`]
//! for every input change. The runtime keeps exactly one timer alive for the
//! latest ticket and reports it back when the quiet period has elapsed. Only the
//! ticket that is still pending is honoured; every earlier one is stale.

use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceTicket {
    pub generation: u64,
    pub delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<(u64, String)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    /// Replaces any pending value and returns the ticket the runtime must arm.
    pub fn schedule(&mut self, value: impl Into<String>) -> DebounceTicket {
        self.generation += 1;
        self.pending = Some((self.generation, value.into()));
        DebounceTicket {
            generation: self.generation,
            delay: self.delay,
        }
    }

    /// Releases the pending value if `ticket` is the one currently armed.
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<String> {
        match &self.pending {
            Some((generation, _)) if *generation == ticket.generation => {
                self.pending.take().map(|(_, value)| value)
            }
            _ => None,
        }
    }

    /// Drops the pending value without emitting it. Returns whether one existed.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
