/// Virtual-clock timer registry: one repeating interval plus keyed one-shot timeouts.
///
/// Nothing here sleeps. The owner advances the clock and drains due timers one at a
/// time with [`TimerRegistry::pop_due`], so every callback runs to completion before
/// the next one is looked at.
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired<K> {
    /// The repeating interval came due
    Interval,
    /// A keyed timeout came due; it has already been removed from the registry
    Timeout(K),
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    period_ms: u64,
    due_ms: u64,
    seq: u64,
}

#[derive(Debug, Clone, Copy)]
struct Timeout {
    due_ms: u64,
    seq: u64,
}

#[derive(Debug)]
pub struct TimerRegistry<K> {
    now_ms: u64,
    next_seq: u64,
    interval: Option<Interval>,
    timeouts: HashMap<K, Timeout>,
}

impl<K: Copy + Eq + Hash> TimerRegistry<K> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            interval: None,
            timeouts: HashMap::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// (Re)starts the interval. The first firing is one full period from now;
    /// whatever phase the old interval had is discarded.
    pub fn start_interval(&mut self, period_ms: u64) {
        let period_ms = period_ms.max(1);
        let seq = self.bump_seq();
        self.interval = Some(Interval {
            period_ms,
            due_ms: self.now_ms + period_ms,
            seq,
        });
    }

    pub fn stop_interval(&mut self) {
        self.interval = None;
    }

    pub fn interval_period(&self) -> Option<u64> {
        self.interval.map(|i| i.period_ms)
    }

    /// Schedules a one-shot timeout for `key`. An existing timeout for the same key is replaced.
    pub fn schedule(&mut self, key: K, delay_ms: u64) {
        let seq = self.bump_seq();
        self.timeouts.insert(
            key,
            Timeout {
                due_ms: self.now_ms + delay_ms,
                seq,
            },
        );
    }

    pub fn cancel(&mut self, key: K) -> bool {
        self.timeouts.remove(&key).is_some()
    }

    /// Cancels every outstanding timeout and returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.timeouts.len();
        self.timeouts.clear();
        n
    }

    #[cfg(test)]
    pub fn is_scheduled(&self, key: K) -> bool {
        self.timeouts.contains_key(&key)
    }

    pub fn pending(&self) -> usize {
        self.timeouts.len()
    }

    /// Removes and returns the earliest timer due at or before `until`, moving the
    /// clock to its deadline. Ties go to whichever was registered first.
    /// Returns `None` once nothing else is due; call [`Self::settle`] afterwards.
    pub fn pop_due(&mut self, until: u64) -> Option<Fired<K>> {
        let earliest_timeout = self
            .timeouts
            .iter()
            .filter(|(_, t)| t.due_ms <= until)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(k, t)| (*k, *t));

        let interval_due = self.interval.filter(|i| i.due_ms <= until);

        let take_interval = match (interval_due, earliest_timeout) {
            (None, None) => return None,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(i), Some((_, t))) => (i.due_ms, i.seq) < (t.due_ms, t.seq),
        };

        if take_interval {
            let mut interval = interval_due?;
            self.now_ms = self.now_ms.max(interval.due_ms);
            interval.due_ms += interval.period_ms;
            interval.seq = self.bump_seq();
            self.interval = Some(interval);
            Some(Fired::Interval)
        } else {
            let (key, timeout) = earliest_timeout?;
            self.timeouts.remove(&key);
            self.now_ms = self.now_ms.max(timeout.due_ms);
            Some(Fired::Timeout(key))
        }
    }

    /// Moves the clock forward to `until` once all due timers have been drained.
    pub fn settle(&mut self, until: u64) {
        self.now_ms = self.now_ms.max(until);
    }
}

impl<K: Copy + Eq + Hash> Default for TimerRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
