// Bounded event history for diagnostics

use super::{BusEvent, Event};
use serde::Serialize;
use std::collections::VecDeque;

/// Ring buffer of the most recent events
///
/// A `max_len` of zero disables recording entirely.
#[derive(Debug)]
pub struct EventHistory<E> {
    records: VecDeque<Event<E>>,
    max_len: usize,
}

#[derive(Serialize)]
struct HistoryRecord<'a, E> {
    #[serde(rename = "type")]
    name: &'a str,
    payload: &'a E,
    timestamp: u64,
}

impl<E: BusEvent> EventHistory<E> {
    pub fn new(max_len: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(max_len.min(1024)),
            max_len,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_len > 0
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Change the capacity, dropping the oldest records if needed
    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len;
        while self.records.len() > self.max_len {
            self.records.pop_front();
        }
    }

    pub(super) fn record(&mut self, event: &Event<E>) {
        if !self.is_enabled() {
            return;
        }
        if self.records.len() == self.max_len {
            self.records.pop_front();
        }
        self.records.push_back(event.clone());
    }

    /// Recorded events, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Event<E>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Export as a JSON array of `{type, payload, timestamp}` objects
    pub fn to_json(&self) -> serde_json::Result<String>
    where
        E: Serialize,
    {
        let records: Vec<HistoryRecord<'_, E>> = self
            .records
            .iter()
            .map(|event| HistoryRecord {
                name: event.name(),
                payload: &event.payload,
                timestamp: event.timestamp,
            })
            .collect();
        serde_json::to_string(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Ping(u32);

    impl BusEvent for Ping {
        type Kind = ();

        fn kind(&self) -> Self::Kind {}

        fn name(&self) -> &str {
            "test.ping"
        }
    }

    #[test]
    fn test_disabled_history_records_nothing() {
        let mut history = EventHistory::new(0);
        history.record(&Event::new(Ping(1), 0));
        assert!(!history.is_enabled());
        assert!(history.is_empty());
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut history = EventHistory::new(3);
        for i in 0..5 {
            history.record(&Event::new(Ping(i), u64::from(i)));
        }
        let kept: Vec<u32> = history.iter().map(|e| e.payload.0).collect();
        assert_eq!(kept, vec![2, 3, 4]);
    }

    #[test]
    fn test_shrinking_capacity() {
        let mut history = EventHistory::new(4);
        for i in 0..4 {
            history.record(&Event::new(Ping(i), 0));
        }
        history.set_max_len(2);
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().next().map(|e| e.payload.0), Some(2));
    }

    #[test]
    fn test_json_export() {
        let mut history = EventHistory::new(4);
        history.record(&Event::new(Ping(7), 12));
        let json = history.to_json().unwrap();
        assert_eq!(json, r#"[{"type":"test.ping","payload":7,"timestamp":12}]"#);
    }
}
