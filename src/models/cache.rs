use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub data: Value,
    pub timestamp: Instant,
    last_used: u64,
}

impl CacheEntry {
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.timestamp.elapsed() < ttl
    }
}

/// In-memory response cache with a freshness window and a hard capacity.
///
/// Stale entries are never served. When the map is full the least recently
/// used entry is evicted to make room.
#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    clock: u64,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached value if it is still inside the window.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.clock += 1;
        let tick = self.clock;
        let ttl = self.ttl;
        match self.entries.get_mut(key) {
            Some(entry) if entry.is_fresh(ttl) => {
                entry.last_used = tick;
                Some(entry.data.clone())
            }
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, data: Value) {
        let key = key.into();
        self.clock += 1;

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.sweep_expired();
            if self.entries.len() >= self.capacity {
                self.evict_least_recently_used();
            }
        }

        self.entries.insert(
            key.clone(),
            CacheEntry {
                key,
                data,
                timestamp: Instant::now(),
                last_used: self.clock,
            },
        );
    }

    /// Drops every entry whose window has elapsed. Returns how many were removed.
    pub fn sweep_expired(&mut self) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(ttl));
        before - self.entries.len()
    }

    /// Empties the cache and returns how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    fn evict_least_recently_used(&mut self) {
        let oldest = self
            .entries
            .values()
            .min_by_key(|entry| entry.last_used)
            .map(|entry| entry.key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
