//! Per-key FIFO queues of pre-validated locations.
//!
//! Each queue is an unbounded crossbeam channel owned by its [`CacheEntry`],
//! so producers and consumers never block each other. The key → entry map is
//! a `DashMap`, giving atomic lazy insertion under concurrent first access.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use dashmap::DashMap;
use wayfarer_world::{Location, WorldId};

/// Identifies a cache queue: one world and one range pair.
///
/// Ranges compare by value, with `-0.0` and `0.0` treated as equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    world: WorldId,
    min_range_bits: u64,
    max_range_bits: u64,
}

impl CacheKey {
    pub fn new(world: WorldId, min_range: f64, max_range: f64) -> Self {
        Self {
            world,
            min_range_bits: normalized_bits(min_range),
            max_range_bits: normalized_bits(max_range),
        }
    }

    pub fn world(&self) -> &WorldId {
        &self.world
    }

    pub fn min_range(&self) -> f64 {
        f64::from_bits(self.min_range_bits)
    }

    pub fn max_range(&self) -> f64 {
        f64::from_bits(self.max_range_bits)
    }
}

fn normalized_bits(v: f64) -> u64 {
    // -0.0 + 0.0 == +0.0
    (v + 0.0).to_bits()
}

/// Unbounded FIFO of validated locations.
pub struct CacheEntry {
    sender: Sender<Location>,
    receiver: Receiver<Location>,
}

impl CacheEntry {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Append a location.
    pub fn push(&self, location: Location) {
        // Cannot fail: the entry owns the receiver.
        let _ = self.sender.send(location);
    }

    /// Remove the oldest location, if any.
    pub fn pop(&self) -> Option<Location> {
        self.receiver.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Discard every queued location, returning how many were dropped.
    pub fn drain(&self) -> usize {
        self.receiver.try_iter().count()
    }
}

impl Default for CacheEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// Map from [`CacheKey`] to its [`CacheEntry`].
#[derive(Default)]
pub struct LocationCache {
    entries: DashMap<CacheKey, Arc<CacheEntry>>,
}

impl LocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for `key`, created on first access.
    pub fn queue_for(&self, key: &CacheKey) -> Arc<CacheEntry> {
        Arc::clone(self.entries.entry(key.clone()).or_default().value())
    }

    /// Dequeue a location without creating an entry.
    pub fn take(&self, key: &CacheKey) -> Option<Location> {
        let entry = self.entries.get(key).map(|e| Arc::clone(e.value()))?;
        entry.pop()
    }

    /// Enqueue a location that has already been validated.
    pub fn put(&self, key: &CacheKey, location: Location) {
        self.queue_for(key).push(location);
    }

    /// Queue depth for `key` (0 if the entry does not exist).
    pub fn depth(&self, key: &CacheKey) -> usize {
        self.entries.get(key).map_or(0, |e| e.len())
    }

    /// Number of keys with an entry.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Empty every entry and forget all keys.
    ///
    /// Entries still held by in-flight refill tasks are detached, so their
    /// results never reach the cleared cache.
    pub fn clear(&self) -> usize {
        let dropped: usize = self.entries.iter().map(|e| e.value().drain()).sum();
        self.entries.clear();
        tracing::debug!(dropped, "location cache cleared");
        dropped
    }
}
