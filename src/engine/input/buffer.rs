// Signal buffering between input events and the next simulation tick

use super::action::ActionSignal;
use std::collections::VecDeque;

/// Maximum number of buffered signals to store
const MAX_BUFFER_SIZE: usize = 16;

/// Signals received since the last tick, applied in arrival order
///
/// Input events arrive between ticks; the buffer holds them until the
/// frame driver drains it at the start of the next tick.
#[derive(Debug)]
pub struct SignalBuffer {
    buffer: VecDeque<ActionSignal>,
}

impl SignalBuffer {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(MAX_BUFFER_SIZE),
        }
    }

    /// Add a signal to the buffer
    ///
    /// Duplicates are dropped. A pending opposite signal (move start vs.
    /// move stop) is replaced, so the latest intent wins.
    pub fn push(&mut self, signal: ActionSignal) {
        if let Some(opposite) = signal.opposite() {
            self.buffer.retain(|s| *s != opposite);
        }
        if self.buffer.contains(&signal) {
            return;
        }
        self.buffer.push_back(signal);

        if self.buffer.len() > MAX_BUFFER_SIZE {
            self.buffer.pop_front();
        }
    }

    /// Check if a signal is pending
    pub fn has(&self, signal: ActionSignal) -> bool {
        self.buffer.contains(&signal)
    }

    /// Take every pending signal, oldest first
    pub fn drain(&mut self) -> Vec<ActionSignal> {
        self.buffer.drain(..).collect()
    }

    /// Drop all pending signals
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for SignalBuffer {
    fn default() -> Self {
        Self::new()
    }
}
