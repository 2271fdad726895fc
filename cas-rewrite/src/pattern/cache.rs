//! A bounded least-recently-used cache of pattern expansions.

use std::{collections::HashMap, num::NonZeroUsize, sync::Arc};
use super::Instance;

/// Counters describing how the cache has been used since it was created or last cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups that found an entry.
    pub hits: usize,

    /// Number of lookups that found nothing.
    pub misses: usize,

    /// Number of entries removed to make room for newer ones.
    pub evictions: usize,
}

/// A cached expansion, stamped with the time it was last used.
#[derive(Debug)]
struct Entry {
    last_used: u64,
    instances: Arc<[Instance]>,
}

/// Maps a canonical pattern serialization to the instances the pattern expands to.
///
/// Every insertion and lookup hit advances a logical clock and stamps the entry with it, so the
/// least recently used entry is the one with the smallest stamp. Hits cost one hash lookup; only
/// eviction scans the entries.
#[derive(Debug)]
pub struct ExpansionCache {
    entries: HashMap<String, Entry>,
    clock: u64,
    capacity: NonZeroUsize,
    stats: CacheStats,
}

impl ExpansionCache {
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: HashMap::new(),
            clock: 0,
            capacity,
            stats: CacheStats::default(),
        }
    }

    /// Advances the clock, returning the new time.
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Removes least recently used entries until at most `capacity` remain.
    fn evict_to(&mut self, capacity: usize) {
        while self.entries.len() > capacity {
            let Some(oldest) = self.entries.iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            self.entries.remove(&oldest);
            self.stats.evictions += 1;
            log::trace!("evicted expansion `{}`", oldest);
        }
    }

    /// Looks up the expansion for the given key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &str) -> Option<Arc<[Instance]>> {
        let now = self.tick();
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = now;
                self.stats.hits += 1;
                log::trace!("expansion cache hit ({} instances)", entry.instances.len());
                Some(Arc::clone(&entry.instances))
            },
            None => {
                self.stats.misses += 1;
                log::trace!("expansion cache miss");
                None
            },
        }
    }

    /// Stores the expansion for the given key, evicting the least recently used entry if the
    /// cache is full.
    pub fn insert(&mut self, key: String, instances: Arc<[Instance]>) {
        if !self.entries.contains_key(&key) {
            self.evict_to(self.capacity.get() - 1);
        }
        let last_used = self.tick();
        self.entries.insert(key, Entry { last_used, instances });
    }

    /// Changes the capacity of the cache, evicting entries immediately if it shrinks.
    pub fn set_capacity(&mut self, capacity: NonZeroUsize) {
        self.capacity = capacity;
        self.evict_to(capacity.get());
    }

    /// Removes every entry and resets the statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.clock = 0;
        self.stats = CacheStats::default();
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the usage statistics of the cache.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
