//! Single-shot timer queue
//!
//! Deterministic replacement for ambient `setTimeout` handles. Time only moves
//! when the owner calls [`TimerQueue::pop_due`] with the current clock, so the
//! browser frame loop and unit tests drive it the same way.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

/// Proof of a scheduled timer. Required to cancel it.
///
/// Neither `Clone` nor `Copy`: a slot storing `Option<TimerToken>` owns at most
/// one live timer.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Sequence number of the timer (monotonic per queue)
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Entry<K> {
    due_ms: f64,
    seq: u64,
    key: K,
}

impl<K> PartialEq for Entry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<K> Eq for Entry<K> {}

impl<K> PartialOrd for Entry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Entry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest deadline first, ties broken by scheduling order
        self.due_ms
            .total_cmp(&other.due_ms)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-heap of pending single-shot timers keyed by `K`
#[derive(Debug)]
pub struct TimerQueue<K> {
    heap: BinaryHeap<Reverse<Entry<K>>>,
    /// Sequence numbers of timers that are scheduled and not yet fired/cancelled
    live: HashSet<u64>,
    next_seq: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashSet::new(),
            next_seq: 0,
        }
    }

    /// Schedule `key` to fire once the clock reaches `due_ms`
    pub fn schedule(&mut self, key: K, due_ms: f64) -> TimerToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { due_ms, seq, key }));
        self.live.insert(seq);
        TimerToken(seq)
    }

    /// Cancel a pending timer. Returns false if it already fired.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let cancelled = self.live.remove(&token.0);
        self.compact();
        cancelled
    }

    /// Pop the earliest timer due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<K> {
        while let Some(Reverse(top)) = self.heap.peek() {
            if !self.live.contains(&top.seq) {
                // Cancelled, discard lazily
                self.heap.pop();
                continue;
            }
            if top.due_ms > now_ms {
                return None;
            }
            let Reverse(entry) = self.heap.pop()?;
            self.live.remove(&entry.seq);
            return Some(entry.key);
        }
        None
    }

    /// Deadline of the earliest live timer
    pub fn next_due(&self) -> Option<f64> {
        self.heap
            .iter()
            .filter(|Reverse(e)| self.live.contains(&e.seq))
            .map(|Reverse(e)| e.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Number of timers still waiting to fire
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drop cancelled entries once they dominate the heap
    fn compact(&mut self) {
        if self.heap.len() > 64 && self.heap.len() > self.live.len() * 2 {
            let live = &self.live;
            self.heap.retain(|Reverse(e)| live.contains(&e.seq));
        }
    }
}
