// Event bus
//
// Synchronous publish/subscribe hub used by every simulation component to
// announce what happened during a tick. Rendering, audio and UI layers
// subscribe to the same bus.
//
// ## Architecture
//
// - `bus`: subscription bookkeeping and dispatch
// - `history`: bounded diagnostic ring buffer of published events
//
// ## Usage Example
//
// ```rust
// let mut bus: EventBus<GameEvent> = EventBus::new(64);
//
// let id = bus.subscribe(EventKind::GameOver, |event, _outbox| {
//     log::info!("game over at tick {}", event.timestamp);
//     Ok(())
// });
//
// bus.publish(GameEvent::GameOver { checkpoint: 500.0 });
// bus.unsubscribe(id);
// ```

mod bus;
mod history;

pub use bus::{EventBus, Outbox, SubscriptionId};
pub use history::EventHistory;

use std::fmt::Debug;

/// A payload type that can travel on the bus
///
/// Every payload maps to exactly one kind, and carries a dotted name
/// (`domain.event`) used for logging and the advisory taxonomy check.
pub trait BusEvent: Clone {
    type Kind: Copy + Eq + Debug;

    fn kind(&self) -> Self::Kind;

    fn name(&self) -> &str;
}

/// A published event: immutable once emitted
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub payload: E,
    /// Tick at which the event was published
    pub timestamp: u64,
}

impl<E: BusEvent> Event<E> {
    pub fn new(payload: E, timestamp: u64) -> Self {
        Self { payload, timestamp }
    }

    pub fn kind(&self) -> E::Kind {
        self.payload.kind()
    }

    pub fn name(&self) -> &str {
        self.payload.name()
    }
}
