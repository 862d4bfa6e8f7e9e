//! # In-Memory Listing Repository
//!
//! In-memory implementation of [`ListingRepository`].
//!
//! Besides the version check, `save` refuses a second open listing for the
//! same instrument, mirroring a partial unique index in a relational store.

use crate::domain::entities::{Listing, ListingFilter};
use crate::domain::value_objects::{InstrumentId, ListingId};
use crate::infrastructure::persistence::traits::{
    ListingRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`ListingRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryListingRepository {
    storage: Arc<RwLock<HashMap<ListingId, Listing>>>,
}

impl InMemoryListingRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored listings, tombstoned included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn collect(&self, predicate: impl Fn(&Listing) -> bool + Send) -> Vec<Listing> {
        let storage = self.storage.read().await;
        let mut listings: Vec<Listing> = storage
            .values()
            .filter(|l| !l.is_deleted() && predicate(l))
            .cloned()
            .collect();
        listings.sort_by_key(Listing::created_at);
        listings
    }
}

impl Default for InMemoryListingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn save(&self, listing: &Listing) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;

        if let Some(existing) = storage.get(&listing.id())
            && existing.version() >= listing.version()
        {
            return Err(RepositoryError::version_conflict(
                "Listing",
                listing.id(),
                listing.version(),
                existing.version(),
            ));
        }

        if listing.is_open() && !listing.is_deleted() {
            let conflicting = storage.values().find(|other| {
                other.id() != listing.id()
                    && other.instrument_id() == listing.instrument_id()
                    && other.is_open()
                    && !other.is_deleted()
            });
            if let Some(other) = conflicting {
                return Err(RepositoryError::constraint(
                    "Listing",
                    listing.id(),
                    format!(
                        "instrument {} already has open listing {}",
                        listing.instrument_id(),
                        other.id()
                    ),
                ));
            }
        }

        storage.insert(listing.id(), listing.clone());
        Ok(())
    }

    async fn get(&self, id: &ListingId) -> RepositoryResult<Option<Listing>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).filter(|l| !l.is_deleted()).cloned())
    }

    async fn get_including_deleted(&self, id: &ListingId) -> RepositoryResult<Option<Listing>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_open_by_instrument(
        &self,
        instrument_id: &InstrumentId,
    ) -> RepositoryResult<Option<Listing>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .find(|l| !l.is_deleted() && l.is_open() && l.instrument_id() == *instrument_id)
            .cloned())
    }

    async fn find_by_instrument(
        &self,
        instrument_id: &InstrumentId,
    ) -> RepositoryResult<Vec<Listing>> {
        let instrument_id = *instrument_id;
        Ok(self
            .collect(move |l| l.instrument_id() == instrument_id)
            .await)
    }

    async fn find(&self, filter: &ListingFilter) -> RepositoryResult<Vec<Listing>> {
        Ok(self.collect(|l| filter.matches(l)).await)
    }
}
