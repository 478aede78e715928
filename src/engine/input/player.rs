// Per-player logical input state

use super::action::{Action, ActionSignal, InputEdge};
use super::buffer::SignalBuffer;
use std::collections::HashSet;

/// Tracks which logical actions are held and buffers the resulting signals
///
/// The input layer (keyboard, touch, mouse) calls `press`/`release`; the
/// frame driver drains the signals once per tick.
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently held
    pressed: HashSet<Action>,

    /// Signals waiting for the next tick
    buffer: SignalBuffer,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Register an action press. Key repeats of a held action are ignored.
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.push_edge(action, InputEdge::Pressed);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.push_edge(action, InputEdge::Released);
        }
    }

    fn push_edge(&mut self, action: Action, edge: InputEdge) {
        if let Some(signal) = ActionSignal::from_edge(action, edge) {
            self.buffer.push(signal);
        }
    }

    /// Queue the press signal again for every held action that lasts until
    /// released, so a consumer that dropped the original can catch up
    pub fn resend_held(&mut self) {
        let held: Vec<Action> = self
            .pressed
            .iter()
            .copied()
            .filter(|&action| ActionSignal::from_edge(action, InputEdge::Released).is_some())
            .collect();
        for action in held {
            self.push_edge(action, InputEdge::Pressed);
        }
    }

    /// Take the signals accumulated since the last tick
    pub fn drain_signals(&mut self) -> Vec<ActionSignal> {
        self.buffer.drain()
    }

    /// Number of signals waiting for the next tick
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Forget held actions and pending signals
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.buffer.clear();
    }
}
