use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Per-identifier in-process counters.
///
/// The map structure is sharded behind reader/writer locks (`DashMap`), the
/// values are plain atomics. Reads and increments of known identifiers only
/// take a shard read lock; creating a new identifier takes the shard write
/// lock and re-checks under it, so two concurrent first increments for the
/// same identifier always land on one counter.
#[derive(Debug, Default)]
pub struct FallbackCounter {
    map: DashMap<String, AtomicU64>,
}

impl FallbackCounter {
    pub fn new() -> Self {
        Self { map: DashMap::new() }
    }

    /// Add one to `id`'s counter, creating it at zero first if unseen.
    /// Returns the post-increment value.
    pub fn increment(&self, id: &str) -> u64 {
        if let Some(c) = self.map.get(id) {
            return c.fetch_add(1, Ordering::AcqRel) + 1;
        }

        let c = self
            .map
            .entry(id.to_string())
            .or_insert_with(|| AtomicU64::new(0));
        c.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Current value for `id`, zero if it was never incremented.
    pub fn read(&self, id: &str) -> u64 {
        self.map
            .get(id)
            .map(|c| c.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    /// Number of identifiers that have been incremented at least once.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
