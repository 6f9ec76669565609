use std::{collections::HashMap, ops::Deref, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use shared::domain::{DateKey, Event};

pub const DEFAULT_CACHE_TTL_SECONDS: i64 = 60 * 60;

/// Immutable, cheaply cloned view of one fetch result. Two snapshots are the
/// same snapshot only if they share the allocation.
#[derive(Debug, Clone)]
pub struct EventSnapshot(Arc<[Event]>);

impl EventSnapshot {
    pub fn new(events: Vec<Event>) -> Self {
        Self(events.into())
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn ptr_eq(&self, other: &EventSnapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for EventSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for EventSnapshot {
    type Target = [Event];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub events: EventSnapshot,
    pub fetched_at: DateTime<Utc>,
}

pub struct EventCache {
    ttl: Duration,
    entries: HashMap<DateKey, CacheEntry>,
}

impl EventCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// An entry is fresh while strictly younger than the TTL.
    pub fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.fetched_at) < self.ttl
    }

    /// Returns the entry for `key` only when it is still fresh at `now`.
    pub fn get(&self, key: DateKey, now: DateTime<Utc>) -> Option<EventSnapshot> {
        self.entries
            .get(&key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.events.clone())
    }

    /// Replaces whatever was stored for `key`.
    pub fn put(&mut self, key: DateKey, events: EventSnapshot, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            CacheEntry {
                events,
                fetched_at: now,
            },
        );
    }

    pub fn entry(&self, key: DateKey) -> Option<&CacheEntry> {
        self.entries.get(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EventCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_CACHE_TTL_SECONDS))
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
