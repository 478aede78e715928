// Tick-based deferred updates

/// A deferred update waiting for its tick
#[derive(Debug, Clone, PartialEq)]
struct Scheduled<T> {
    due: u64,
    seq: u64,
    payload: T,
}

/// Queue of deferred updates counted in ticks
///
/// Nothing here involves wall-clock time: `advance` is called once per tick
/// and returns whatever became due. `flush` discards everything pending so
/// that a stopped or restarted world never receives stale callbacks.
#[derive(Debug)]
pub struct TimerQueue<T> {
    scheduled: Vec<Scheduled<T>>,
    now: u64,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            scheduled: Vec::new(),
            now: 0,
            next_seq: 0,
        }
    }

    /// Schedule `payload` to fire after `delay` ticks (0 fires on the next advance)
    pub fn schedule(&mut self, delay: u32, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.scheduled.push(Scheduled {
            due: self.now + u64::from(delay.max(1)),
            seq,
            payload,
        });
    }

    /// Move time forward one tick and collect due payloads in schedule order
    pub fn advance(&mut self) -> Vec<T> {
        self.now += 1;
        let now = self.now;

        let mut due = Vec::new();
        let mut index = 0;
        while index < self.scheduled.len() {
            if self.scheduled[index].due <= now {
                due.push(self.scheduled.swap_remove(index));
            } else {
                index += 1;
            }
        }
        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.payload).collect()
    }

    /// Discard every pending update, returning how many were dropped
    pub fn flush(&mut self) -> usize {
        let dropped = self.scheduled.len();
        self.scheduled.clear();
        dropped
    }

    pub fn pending(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
