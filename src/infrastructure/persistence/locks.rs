//! # Scope Locks
//!
//! Keyed serialization for read-validate-write sequences.
//!
//! Lifecycle operations take an instrument-scoped or listing-scoped lock for
//! the duration of their check-then-write. When both are needed the instrument
//! scope is always taken first. Reads never lock.
//!
//! [`KeyedLocks`] keeps one `tokio::sync::Mutex` per key and prunes idle
//! entries once the table grows past a threshold.

use crate::domain::value_objects::{InstrumentId, ListingId};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Default number of lock entries kept before idle ones are pruned.
pub const DEFAULT_PRUNE_THRESHOLD: usize = 1024;

/// Held lock for one scope. The scope is released on drop.
#[must_use = "the scope is released as soon as the guard is dropped"]
pub struct ScopeGuard {
    _inner: Box<dyn Any + Send + Sync>,
}

impl ScopeGuard {
    /// Wraps any guard object whose drop releases the scope.
    pub fn new(inner: impl Any + Send + Sync) -> Self {
        Self {
            _inner: Box::new(inner),
        }
    }
}

impl fmt::Debug for ScopeGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard").finish_non_exhaustive()
    }
}

/// Port for scoped serialization of writes.
#[async_trait]
pub trait ScopeLocks: Send + Sync + fmt::Debug {
    /// Waits for exclusive access to the instrument scope.
    async fn instrument(&self, id: InstrumentId) -> ScopeGuard;

    /// Waits for exclusive access to the listing scope.
    async fn listing(&self, id: ListingId) -> ScopeGuard;
}

#[derive(Debug)]
struct LockTable<K> {
    entries: Mutex<HashMap<K, Arc<Mutex<()>>>>,
    prune_threshold: usize,
}

impl<K> LockTable<K>
where
    K: Eq + Hash + Copy + Send + Sync + 'static,
{
    fn new(prune_threshold: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            prune_threshold,
        }
    }

    async fn acquire(&self, key: K) -> ScopeGuard {
        let slot = {
            let mut entries = self.entries.lock().await;
            if entries.len() >= self.prune_threshold {
                // A count of one means no holder and no waiter.
                entries.retain(|_, slot| Arc::strong_count(slot) > 1);
            }
            Arc::clone(entries.entry(key).or_default())
        };
        ScopeGuard::new(slot.lock_owned().await)
    }

    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// In-process [`ScopeLocks`] backed by per-key tokio mutexes.
#[derive(Debug)]
pub struct KeyedLocks {
    instruments: LockTable<InstrumentId>,
    listings: LockTable<ListingId>,
}

impl KeyedLocks {
    /// Creates lock tables with the default prune threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prune_threshold(DEFAULT_PRUNE_THRESHOLD)
    }

    /// Creates lock tables that prune idle entries past `threshold` keys.
    #[must_use]
    pub fn with_prune_threshold(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            instruments: LockTable::new(threshold),
            listings: LockTable::new(threshold),
        }
    }

    /// Returns the number of tracked keys across both scopes.
    pub async fn tracked_keys(&self) -> usize {
        self.instruments.len().await + self.listings.len().await
    }
}

impl Default for KeyedLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScopeLocks for KeyedLocks {
    async fn instrument(&self, id: InstrumentId) -> ScopeGuard {
        self.instruments.acquire(id).await
    }

    async fn listing(&self, id: ListingId) -> ScopeGuard {
        self.listings.acquire(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn same_key_is_exclusive() {
        let locks = KeyedLocks::new();
        let id = InstrumentId::new_v4();

        let guard = locks.instrument(id).await;
        let blocked = timeout(Duration::from_millis(20), locks.instrument(id)).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired = timeout(Duration::from_millis(100), locks.instrument(id)).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _first = locks.listing(ListingId::new_v4()).await;
        let second = timeout(Duration::from_millis(100), locks.listing(ListingId::new_v4())).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn scopes_are_independent() {
        let locks = KeyedLocks::new();
        let uuid = uuid::Uuid::new_v4();
        let _instrument = locks.instrument(InstrumentId::new(uuid)).await;
        let listing = timeout(Duration::from_millis(100), locks.listing(ListingId::new(uuid))).await;
        assert!(listing.is_ok());
    }

    #[tokio::test]
    async fn idle_entries_are_pruned() {
        let locks = KeyedLocks::with_prune_threshold(4);
        for _ in 0..10 {
            let _guard = locks.instrument(InstrumentId::new_v4()).await;
        }
        assert!(locks.tracked_keys().await <= 4);
    }
}
