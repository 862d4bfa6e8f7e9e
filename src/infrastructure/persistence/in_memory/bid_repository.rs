//! # In-Memory Bid Repository
//!
//! In-memory implementation of [`BidRepository`].

use crate::domain::entities::{Bid, BidFilter};
use crate::domain::value_objects::{BidId, ListingId};
use crate::infrastructure::persistence::traits::{
    BidRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`BidRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryBidRepository {
    storage: Arc<RwLock<HashMap<BidId, Bid>>>,
}

impl InMemoryBidRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored bids, tombstoned included.
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

    async fn collect(&self, predicate: impl Fn(&Bid) -> bool + Send) -> Vec<Bid> {
        let storage = self.storage.read().await;
        let mut bids: Vec<Bid> = storage
            .values()
            .filter(|b| !b.is_deleted() && predicate(b))
            .cloned()
            .collect();
        bids.sort_by_key(Bid::created_at);
        bids
    }
}

impl Default for InMemoryBidRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn check_version(storage: &HashMap<BidId, Bid>, bid: &Bid) -> RepositoryResult<()> {
    if let Some(existing) = storage.get(&bid.id())
        && existing.version() >= bid.version()
    {
        return Err(RepositoryError::version_conflict(
            "Bid",
            bid.id(),
            bid.version(),
            existing.version(),
        ));
    }
    Ok(())
}

#[async_trait]
impl BidRepository for InMemoryBidRepository {
    async fn save(&self, bid: &Bid) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        check_version(&storage, bid)?;
        storage.insert(bid.id(), bid.clone());
        Ok(())
    }

    async fn save_all(&self, bids: &[Bid]) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        for bid in bids {
            check_version(&storage, bid)?;
        }
        for bid in bids {
            storage.insert(bid.id(), bid.clone());
        }
        Ok(())
    }

    async fn get(&self, id: &BidId) -> RepositoryResult<Option<Bid>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).filter(|b| !b.is_deleted()).cloned())
    }

    async fn get_including_deleted(&self, id: &BidId) -> RepositoryResult<Option<Bid>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_by_listing(&self, listing_id: &ListingId) -> RepositoryResult<Vec<Bid>> {
        let listing_id = *listing_id;
        Ok(self.collect(move |b| b.listing_id() == listing_id).await)
    }

    async fn find(&self, filter: &BidFilter) -> RepositoryResult<Vec<Bid>> {
        Ok(self.collect(|b| filter.matches(b)).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{
        Actor, Amount, BidStatus, CompanyId, Currency, Timestamp, UserId, UserRole,
    };
    use rust_decimal_macros::dec;

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    fn bid_on(listing_id: ListingId, offset: i64) -> Bid {
        let buyer = Actor::new(UserId::new_v4(), CompanyId::new_v4(), UserRole::Buyer);
        Bid::place(
            listing_id,
            &buyer,
            Amount::new(dec!(500)).unwrap(),
            Currency::new("USD").unwrap(),
            None,
            now().add_secs(offset),
        )
    }

    #[tokio::test]
    async fn find_by_listing_is_ordered_oldest_first() {
        let repo = InMemoryBidRepository::new();
        let listing_id = ListingId::new_v4();
        let later = bid_on(listing_id, 10);
        let earlier = bid_on(listing_id, 0);
        repo.save(&later).await.unwrap();
        repo.save(&earlier).await.unwrap();
        repo.save(&bid_on(ListingId::new_v4(), 5)).await.unwrap();

        let bids = repo.find_by_listing(&listing_id).await.unwrap();
        assert_eq!(
            bids.iter().map(Bid::id).collect::<Vec<_>>(),
            vec![earlier.id(), later.id()]
        );
    }

    #[tokio::test]
    async fn save_all_is_all_or_nothing() {
        let repo = InMemoryBidRepository::new();
        let listing_id = ListingId::new_v4();
        let first = bid_on(listing_id, 0);
        let second = bid_on(listing_id, 1);
        repo.save_all(&[first.clone(), second.clone()]).await.unwrap();

        let mut selected = first.clone();
        selected.select(now()).unwrap();
        // `second` is stale: same version as stored.
        let err = repo.save_all(&[selected, second.clone()]).await.unwrap_err();
        assert!(err.is_version_conflict());

        let stored = repo.get(&first.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), BidStatus::Pending);
    }

    #[tokio::test]
    async fn filter_by_status_excludes_tombstoned() {
        let repo = InMemoryBidRepository::new();
        let listing_id = ListingId::new_v4();
        let mut gone = bid_on(listing_id, 0);
        repo.save(&gone).await.unwrap();
        gone.tombstone(now());
        repo.save(&gone).await.unwrap();
        repo.save(&bid_on(listing_id, 1)).await.unwrap();

        let filter = BidFilter {
            status: Some(BidStatus::Pending),
            ..BidFilter::default()
        };
        assert_eq!(repo.find(&filter).await.unwrap().len(), 1);
        assert_eq!(repo.find_by_listing(&listing_id).await.unwrap().len(), 1);
        assert!(repo.get(&gone.id()).await.unwrap().is_none());
        assert!(repo.get_including_deleted(&gone.id()).await.unwrap().is_some());
        assert_eq!(repo.len(), 2);
    }
}
