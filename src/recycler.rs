//! Element recycler
//!
//! Capped reuse pool for visual elements. Spawning hands out a [`Handle`],
//! and a per-handle recycle timer returns it to the pool once its display time
//! is over. Allocation happens only while the pool is empty and the live count
//! is below capacity; past that point the oldest in-use element is repurposed.
//!
//! Every handle is in exactly one of two places:
//! - the pool (free, LIFO so the most recently hidden element is reused first)
//! - the in-use set (shown, ordered by acquisition)

use std::collections::{BTreeMap, HashMap};

use crate::timer::{TimerQueue, TimerToken};

/// Opaque reference to a recycled element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32);

impl Handle {
    pub fn id(self) -> u32 {
        self.0
    }
}

/// A reusable visual resource
pub trait Element {
    /// Clear transient display properties back to their invisible defaults
    fn reset(&mut self);

    /// Free the underlying resource for good
    fn release(self);
}

/// What happened to a reclaimed handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reclaim {
    /// Returned to the pool for reuse
    Pooled,
    /// Pool was full, resource released
    Released,
}

/// Lifetime counters, mostly for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecyclerStats {
    /// Fresh elements created by the factory
    pub allocated: u64,
    /// Acquires served from the pool
    pub reused: u64,
    /// Acquires that had to repurpose a live element
    pub fallbacks: u64,
    /// Handles taken back out of the in-use set
    pub reclaimed: u64,
    /// Elements destroyed because the pool was full
    pub released: u64,
}

struct Slot<E> {
    element: E,
    /// Pending recycle timer (at most one)
    timer: Option<TimerToken>,
    /// Key into `in_use` while shown, `None` while pooled
    acquired_seq: Option<u64>,
}

/// Fixed-capacity pool of reusable elements with deferred release
pub struct Recycler<E: Element> {
    capacity: usize,
    factory: Box<dyn FnMut() -> E>,
    slots: HashMap<Handle, Slot<E>>,
    pool: Vec<Handle>,
    /// In-use handles keyed by acquisition sequence (oldest first)
    in_use: BTreeMap<u64, Handle>,
    timers: TimerQueue<Handle>,
    next_handle: u32,
    next_seq: u64,
    stats: RecyclerStats,
}

impl<E: Element> Recycler<E> {
    /// Create a recycler holding at most `capacity` elements (minimum 1)
    pub fn new(capacity: usize, factory: impl FnMut() -> E + 'static) -> Self {
        Self {
            capacity: capacity.max(1),
            factory: Box::new(factory),
            slots: HashMap::new(),
            pool: Vec::new(),
            in_use: BTreeMap::new(),
            timers: TimerQueue::new(),
            next_handle: 0,
            next_seq: 0,
            stats: RecyclerStats::default(),
        }
    }

    /// Hand out an element for display. Never fails.
    pub fn acquire(&mut self) -> Handle {
        let handle = if let Some(handle) = self.pool.pop() {
            self.stats.reused += 1;
            handle
        } else if self.len() < self.capacity {
            self.allocate()
        } else {
            match self.in_use.pop_first() {
                Some((_, handle)) => {
                    // Repurpose the oldest live element; its shape is cut short
                    if let Some(slot) = self.slots.get_mut(&handle) {
                        slot.acquired_seq = None;
                        if let Some(token) = slot.timer.take() {
                            self.timers.cancel(token);
                        }
                    }
                    self.stats.fallbacks += 1;
                    log::debug!(
                        "Pool exhausted ({} live), repurposing element {}",
                        self.len(),
                        handle.0
                    );
                    handle
                }
                // Unreachable with capacity >= 1, but acquire must not fail
                None => self.allocate(),
            }
        };

        self.mark_in_use(handle);
        handle
    }

    /// Schedule `handle` to be reclaimed `delay_ms` after `now_ms`.
    ///
    /// Replaces (and cancels) any recycle already pending for the handle.
    pub fn schedule_recycle(&mut self, handle: Handle, delay_ms: f64, now_ms: f64) {
        let Some(slot) = self.slots.get_mut(&handle) else {
            log::debug!("schedule_recycle on unknown element {}", handle.0);
            return;
        };
        if slot.acquired_seq.is_none() {
            log::debug!("schedule_recycle on pooled element {}", handle.0);
            return;
        }

        let token = self.timers.schedule(handle, now_ms + delay_ms);
        if let Some(previous) = slot.timer.replace(token) {
            self.timers.cancel(previous);
        }
    }

    /// Fire every recycle timer due at `now_ms`. Returns how many handles were
    /// reclaimed.
    pub fn advance(&mut self, now_ms: f64) -> usize {
        let mut reclaimed = 0;
        while let Some(handle) = self.timers.pop_due(now_ms) {
            if self.reclaim(handle).is_some() {
                reclaimed += 1;
            }
        }
        reclaimed
    }

    /// Take `handle` out of use, reset it, and pool or release it.
    ///
    /// Returns `None` if the handle is unknown or already pooled.
    pub fn reclaim(&mut self, handle: Handle) -> Option<Reclaim> {
        let slot = self.slots.get_mut(&handle)?;
        let seq = slot.acquired_seq.take()?;
        self.in_use.remove(&seq);
        if let Some(token) = slot.timer.take() {
            // No-op when called from `advance`, the timer already fired
            self.timers.cancel(token);
        }
        slot.element.reset();
        self.stats.reclaimed += 1;

        // `len()` no longer counts this handle
        if self.pool.len() < self.capacity && self.len() < self.capacity {
            self.pool.push(handle);
            Some(Reclaim::Pooled)
        } else {
            let slot = self.slots.remove(&handle)?;
            slot.element.release();
            self.stats.released += 1;
            log::debug!("Pool full, released element {}", handle.0);
            Some(Reclaim::Released)
        }
    }

    /// Change the capacity (minimum 1). Pooled elements over the new limit are
    /// released right away; in-use ones drain as their timers fire.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.len() > self.capacity {
            let Some(handle) = self.pool.pop() else { break };
            if let Some(slot) = self.slots.remove(&handle) {
                slot.element.release();
                self.stats.released += 1;
            }
        }
        log::info!(
            "Recycler capacity set to {} ({} live)",
            self.capacity,
            self.len()
        );
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total elements alive (pooled + in use)
    pub fn len(&self) -> usize {
        self.pool.len() + self.in_use.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn in_use_len(&self) -> usize {
        self.in_use.len()
    }

    pub fn is_pooled(&self, handle: Handle) -> bool {
        self.slots
            .get(&handle)
            .is_some_and(|s| s.acquired_seq.is_none())
    }

    pub fn is_in_use(&self, handle: Handle) -> bool {
        self.slots
            .get(&handle)
            .is_some_and(|s| s.acquired_seq.is_some())
    }

    /// Whether `handle` has a recycle timer waiting
    pub fn has_pending_recycle(&self, handle: Handle) -> bool {
        self.slots.get(&handle).is_some_and(|s| s.timer.is_some())
    }

    /// Number of recycle timers waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Deadline of the next recycle timer
    pub fn next_recycle_at(&self) -> Option<f64> {
        self.timers.next_due()
    }

    pub fn element(&self, handle: Handle) -> Option<&E> {
        self.slots.get(&handle).map(|s| &s.element)
    }

    pub fn element_mut(&mut self, handle: Handle) -> Option<&mut E> {
        self.slots.get_mut(&handle).map(|s| &mut s.element)
    }

    /// In-use handles, oldest acquisition first
    pub fn in_use(&self) -> impl Iterator<Item = Handle> + '_ {
        self.in_use.values().copied()
    }

    pub fn stats(&self) -> RecyclerStats {
        self.stats
    }

    fn allocate(&mut self) -> Handle {
        let handle = Handle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        let element = (self.factory)();
        self.slots.insert(
            handle,
            Slot {
                element,
                timer: None,
                acquired_seq: None,
            },
        );
        self.stats.allocated += 1;
        handle
    }

    fn mark_in_use(&mut self, handle: Handle) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(slot) = self.slots.get_mut(&handle) {
            slot.acquired_seq = Some(seq);
            self.in_use.insert(seq, handle);
        }
    }
}

impl<E: Element> Drop for Recycler<E> {
    fn drop(&mut self) {
        for (_, slot) in self.slots.drain() {
            slot.element.release();
        }
    }
}
