//! # In-Memory Ask Repository
//!
//! In-memory implementation of [`AskRepository`].

use crate::domain::entities::{Ask, AskFilter};
use crate::domain::value_objects::{AskId, ListingId};
use crate::infrastructure::persistence::traits::{
    AskRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`AskRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryAskRepository {
    storage: Arc<RwLock<HashMap<AskId, Ask>>>,
}

impl InMemoryAskRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored asks, tombstoned included.
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

    async fn collect(&self, predicate: impl Fn(&Ask) -> bool + Send) -> Vec<Ask> {
        let storage = self.storage.read().await;
        let mut asks: Vec<Ask> = storage
            .values()
            .filter(|a| !a.is_deleted() && predicate(a))
            .cloned()
            .collect();
        asks.sort_by_key(Ask::created_at);
        asks
    }
}

impl Default for InMemoryAskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AskRepository for InMemoryAskRepository {
    async fn save(&self, ask: &Ask) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;

        if let Some(existing) = storage.get(&ask.id())
            && existing.version() >= ask.version()
        {
            return Err(RepositoryError::version_conflict(
                "Ask",
                ask.id(),
                ask.version(),
                existing.version(),
            ));
        }

        storage.insert(ask.id(), ask.clone());
        Ok(())
    }

    async fn get(&self, id: &AskId) -> RepositoryResult<Option<Ask>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).filter(|a| !a.is_deleted()).cloned())
    }

    async fn get_including_deleted(&self, id: &AskId) -> RepositoryResult<Option<Ask>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_by_listing(&self, listing_id: &ListingId) -> RepositoryResult<Vec<Ask>> {
        let listing_id = *listing_id;
        Ok(self.collect(move |a| a.listing_id() == listing_id).await)
    }

    async fn find(&self, filter: &AskFilter) -> RepositoryResult<Vec<Ask>> {
        Ok(self.collect(|a| filter.matches(a)).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::AskTerms;
    use crate::domain::value_objects::{
        Actor, Amount, CompanyId, Currency, ExecutionMode, Timestamp, UserId, UserRole,
    };
    use rust_decimal_macros::dec;

    fn ask_on(listing_id: ListingId, mode: ExecutionMode) -> Ask {
        let seller = Actor::new(UserId::new_v4(), CompanyId::new_v4(), UserRole::Seller);
        Ask::place(
            listing_id,
            &seller,
            AskTerms {
                amount: Amount::new(dec!(900)).unwrap(),
                currency: Currency::new("EUR").unwrap(),
                valid_until: None,
                execution_mode: mode,
                binding: false,
            },
            Timestamp::from_unix_secs(1_700_000_000).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_get_and_find_by_listing() {
        let repo = InMemoryAskRepository::new();
        let listing_id = ListingId::new_v4();
        let ask = ask_on(listing_id, ExecutionMode::Manual);
        repo.save(&ask).await.unwrap();

        assert_eq!(repo.get(&ask.id()).await.unwrap(), Some(ask.clone()));
        assert_eq!(repo.find_by_listing(&listing_id).await.unwrap(), vec![ask]);
        assert!(repo.get(&AskId::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn filter_by_execution_mode() {
        let repo = InMemoryAskRepository::new();
        let listing_id = ListingId::new_v4();
        repo.save(&ask_on(listing_id, ExecutionMode::Auto)).await.unwrap();
        repo.save(&ask_on(listing_id, ExecutionMode::Manual)).await.unwrap();

        let filter = AskFilter {
            execution_mode: Some(ExecutionMode::Auto),
            ..AskFilter::default()
        };
        let found = repo.find(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].execution_mode(), ExecutionMode::Auto);
    }

    #[tokio::test]
    async fn tombstoned_asks_are_hidden_from_reads() {
        let repo = InMemoryAskRepository::new();
        let listing_id = ListingId::new_v4();
        let mut gone = ask_on(listing_id, ExecutionMode::Manual);
        repo.save(&gone).await.unwrap();
        gone.tombstone(Timestamp::from_unix_secs(1_700_000_100).unwrap());
        repo.save(&gone).await.unwrap();
        let kept = ask_on(listing_id, ExecutionMode::Manual);
        repo.save(&kept).await.unwrap();

        assert!(repo.get(&gone.id()).await.unwrap().is_none());
        assert!(
            repo.get_including_deleted(&gone.id())
                .await
                .unwrap()
                .unwrap()
                .is_deleted()
        );
        assert_eq!(repo.find_by_listing(&listing_id).await.unwrap(), vec![kept]);
        assert_eq!(repo.find(&AskFilter::default()).await.unwrap().len(), 1);
        assert_eq!(repo.len(), 2);
    }
}
