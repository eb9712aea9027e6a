//! In-process revocation store.
//!
//! Markers live in a concurrent map keyed by store key, each with the unix
//! time at which it lapses. Lapsed markers are invisible to `exists` at once;
//! [`MemoryStore::cleanup_expired`] reclaims their memory.

use super::RevocationStore;
use crate::{
    clock::{Clock, SystemClock},
    error::StoreError,
};
use dashmap::DashMap;
use std::hash::BuildHasherDefault;
use std::sync::Arc;
use twox_hash::XxHash64;

/// Expiring marker set held in memory.
///
/// Suited to single-process deployments and tests; revocations do not
/// survive a restart.
pub struct MemoryStore {
    markers: DashMap<String, i64, BuildHasherDefault<XxHash64>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Store driven by the wall clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Store driven by `clock`
    pub fn with_clock(clock: impl Clock) -> Self {
        Self {
            markers: DashMap::with_hasher(BuildHasherDefault::default()),
            clock: Arc::new(clock),
        }
    }

    /// Remove lapsed markers.
    pub fn cleanup_expired(&self) {
        let now = self.clock.now();
        self.markers.retain(|_, lapses_at| *lapses_at > now);
    }

    /// Number of stored markers, including lapsed ones not yet cleaned up
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// True when no markers are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Unix time at which the marker under `key` lapses
    #[must_use]
    pub fn lapses_at(&self, key: &str) -> Option<i64> {
        self.markers.get(key).map(|entry| *entry)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RevocationStore for MemoryStore {
    fn set(&self, key: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        let lapses_at = self.clock.now().saturating_add(ttl);
        self.markers.insert(key.to_string(), lapses_at);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let now = self.clock.now();
        Ok(self
            .markers
            .get(key)
            .is_some_and(|lapses_at| *lapses_at > now))
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("markers", &self.markers.len())
            .finish_non_exhaustive()
    }
}
