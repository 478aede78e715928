// Publish/subscribe dispatch

use super::history::EventHistory;
use super::{BusEvent, Event};
use log::{debug, error, warn};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};

/// Token returned by `subscribe`, used to unsubscribe later
pub type SubscriptionId = u64;

/// Upper bound on follow-up events triggered by a single `publish`
const MAX_CASCADE: usize = 256;

type Handler<E> = Box<dyn FnMut(&Event<E>, &mut Outbox<E>) -> anyhow::Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic<K> {
    Kind(K),
    All,
}

impl<K: PartialEq> Topic<K> {
    fn matches(&self, kind: &K) -> bool {
        match self {
            Topic::Kind(k) => k == kind,
            Topic::All => true,
        }
    }
}

struct Subscriber<E: BusEvent> {
    id: SubscriptionId,
    topic: Topic<E::Kind>,
    once: bool,
    handler: Handler<E>,
}

/// Follow-up events queued by a handler
///
/// Queued events are delivered after the current dispatch has finished,
/// never recursively. An event of the same kind as the one being handled
/// is rejected, so a handler cannot re-trigger itself.
pub struct Outbox<E: BusEvent> {
    handling: E::Kind,
    pending: Vec<E>,
}

impl<E: BusEvent> Outbox<E> {
    fn new(handling: E::Kind) -> Self {
        Self {
            handling,
            pending: Vec::new(),
        }
    }

    /// Queue a follow-up event. Returns false if it was rejected.
    pub fn publish(&mut self, payload: E) -> bool {
        if payload.kind() == self.handling {
            warn!(
                "Rejected re-entrant '{}' published from its own handler",
                payload.name()
            );
            return false;
        }
        self.pending.push(payload);
        true
    }

    /// Kind of the event currently being dispatched
    pub fn handling(&self) -> E::Kind {
        self.handling
    }
}

/// Synchronous, single-threaded event bus
///
/// Delivery happens inside `publish`, in subscriber registration order.
/// A failing or panicking handler is logged and skipped; the remaining
/// handlers still run.
pub struct EventBus<E: BusEvent> {
    subscribers: Vec<Subscriber<E>>,
    next_id: SubscriptionId,
    history: EventHistory<E>,
    namespaces: Vec<String>,
    clock: u64,
}

impl<E: BusEvent> EventBus<E> {
    /// Create a bus recording up to `history_len` events (0 disables history)
    pub fn new(history_len: usize) -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
            history: EventHistory::new(history_len),
            namespaces: Vec::new(),
            clock: 0,
        }
    }

    /// Create a bus that knows the given event namespaces (e.g. `"game."`)
    pub fn with_namespaces(history_len: usize, namespaces: &[&str]) -> Self {
        let mut bus = Self::new(history_len);
        for namespace in namespaces {
            bus.register_namespace(namespace);
        }
        bus
    }

    /// Add a namespace to the advisory taxonomy
    pub fn register_namespace(&mut self, namespace: &str) {
        if !self.namespaces.iter().any(|n| n == namespace) {
            self.namespaces.push(namespace.to_string());
        }
    }

    /// Set the timestamp stamped on subsequently published events
    pub fn set_clock(&mut self, tick: u64) {
        self.clock = tick;
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Subscribe to one event kind
    pub fn subscribe<F>(&mut self, kind: E::Kind, handler: F) -> SubscriptionId
    where
        F: FnMut(&Event<E>, &mut Outbox<E>) -> anyhow::Result<()> + 'static,
    {
        self.add_subscriber(Topic::Kind(kind), false, Box::new(handler))
    }

    /// Subscribe to every event kind
    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Event<E>, &mut Outbox<E>) -> anyhow::Result<()> + 'static,
    {
        self.add_subscriber(Topic::All, false, Box::new(handler))
    }

    /// Subscribe for a single delivery; the subscription is removed afterwards
    pub fn once<F>(&mut self, kind: E::Kind, handler: F) -> SubscriptionId
    where
        F: FnMut(&Event<E>, &mut Outbox<E>) -> anyhow::Result<()> + 'static,
    {
        self.add_subscriber(Topic::Kind(kind), true, Box::new(handler))
    }

    fn add_subscriber(&mut self, topic: Topic<E::Kind>, once: bool, handler: Handler<E>) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            topic,
            once,
            handler,
        });
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Remove every subscription to `kind`, or every subscription at all
    ///
    /// Wildcard subscriptions are only removed when `kind` is `None`.
    pub fn unsubscribe_all(&mut self, kind: Option<E::Kind>) {
        match kind {
            Some(kind) => self
                .subscribers
                .retain(|s| s.topic != Topic::Kind(kind)),
            None => self.subscribers.clear(),
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Publish an event and deliver it synchronously
    ///
    /// Returns the total number of handler invocations, including those
    /// for follow-up events queued through the `Outbox`.
    pub fn publish(&mut self, payload: E) -> usize {
        let mut pending = VecDeque::from([payload]);
        let mut published = 0;
        let mut delivered = 0;

        while let Some(payload) = pending.pop_front() {
            if published == MAX_CASCADE {
                warn!(
                    "Event cascade exceeded {} events, dropping {} pending",
                    MAX_CASCADE,
                    pending.len() + 1
                );
                break;
            }
            published += 1;

            let event = Event::new(payload, self.clock);
            self.check_taxonomy(&event);
            self.history.record(&event);

            let mut outbox = Outbox::new(event.kind());
            delivered += self.dispatch(&event, &mut outbox);
            pending.extend(outbox.pending);
        }

        delivered
    }

    fn dispatch(&mut self, event: &Event<E>, outbox: &mut Outbox<E>) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        let mut spent = Vec::new();

        for subscriber in self.subscribers.iter_mut() {
            if !subscriber.topic.matches(&kind) {
                continue;
            }
            delivered += 1;

            let handler = &mut subscriber.handler;
            let result = panic::catch_unwind(AssertUnwindSafe(|| handler(event, &mut *outbox)));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(
                    "Handler {} failed on '{}': {:#}",
                    subscriber.id,
                    event.name(),
                    err
                ),
                Err(_) => error!(
                    "Handler {} panicked on '{}'",
                    subscriber.id,
                    event.name()
                ),
            }

            if subscriber.once {
                spent.push(subscriber.id);
            }
        }

        if !spent.is_empty() {
            self.subscribers.retain(|s| !spent.contains(&s.id));
        }

        delivered
    }

    fn check_taxonomy(&self, event: &Event<E>) {
        if self.namespaces.is_empty() {
            return;
        }
        let name = event.name();
        if !self.namespaces.iter().any(|ns| name.starts_with(ns.as_str())) {
            warn!("Event '{}' is outside the registered taxonomy", name);
        } else {
            debug!("event {} @{}", name, event.timestamp);
        }
    }

    pub fn history(&self) -> &EventHistory<E> {
        &self.history
    }
}
