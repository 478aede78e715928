// Input handling system
//
// The simulation only understands logical actions. Whatever reads
// keyboards, touch screens or mice translates physical events into
// `press`/`release` calls on a `PlayerInput`.
//
// ## Architecture
//
// - `action`: logical actions, press/release edges and the signals they map to
// - `buffer`: signal buffering between input events and the next tick
// - `player`: held-action tracking for the local player
//
// ## Usage Example
//
// ```rust
// let mut input = PlayerInput::new();
//
// // From the platform input callback
// input.press(Action::Move);
// input.press(Action::Attack);
//
// // At the start of the next tick
// for signal in input.drain_signals() {
//     character.apply_signal(signal, &mut bus);
// }
// ```

pub mod action;
pub mod buffer;
pub mod player;

// Re-export commonly used types
pub use action::{Action, ActionSignal, InputEdge};
pub use buffer::SignalBuffer;
pub use player::PlayerInput;
