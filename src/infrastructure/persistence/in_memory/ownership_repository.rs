//! # In-Memory Ownership Repository
//!
//! In-memory implementation of [`OwnershipRepository`].
//!
//! Rows are kept per instrument in insertion order. Every write happens under
//! one storage write lock, so readers never observe an instrument with zero
//! or two active rows in the middle of a transfer.

use crate::domain::entities::InstrumentOwnership;
use crate::domain::value_objects::{CompanyId, InstrumentId};
use crate::infrastructure::persistence::traits::{
    OwnershipRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const ENTITY: &str = "InstrumentOwnership";

/// In-memory implementation of [`OwnershipRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryOwnershipRepository {
    storage: Arc<RwLock<HashMap<InstrumentId, Vec<InstrumentOwnership>>>>,
}

impl InMemoryOwnershipRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the total number of rows across all instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Returns true if the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryOwnershipRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OwnershipRepository for InMemoryOwnershipRepository {
    async fn insert(&self, row: &InstrumentOwnership) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        let rows = storage.entry(row.instrument_id()).or_default();

        if rows.iter().any(|r| r.id() == row.id()) {
            return Err(RepositoryError::constraint(ENTITY, row.id(), "duplicate row id"));
        }
        if row.is_active()
            && let Some(active) = rows.iter().find(|r| r.is_active())
        {
            return Err(RepositoryError::constraint(
                ENTITY,
                row.id(),
                format!(
                    "instrument {} already has active row {}",
                    row.instrument_id(),
                    active.id()
                ),
            ));
        }

        rows.push(row.clone());
        Ok(())
    }

    async fn transfer(
        &self,
        closing: &InstrumentOwnership,
        opened: &InstrumentOwnership,
    ) -> RepositoryResult<()> {
        if closing.is_active() || !opened.is_active() {
            return Err(RepositoryError::constraint(
                ENTITY,
                opened.id(),
                "transfer must close one row and open another",
            ));
        }
        if closing.instrument_id() != opened.instrument_id() {
            return Err(RepositoryError::constraint(
                ENTITY,
                opened.id(),
                "transfer rows belong to different instruments",
            ));
        }

        let mut storage = self.storage.write().await;
        let rows = storage
            .get_mut(&closing.instrument_id())
            .ok_or_else(|| RepositoryError::not_found(ENTITY, closing.id()))?;
        let index = rows
            .iter()
            .position(|r| r.id() == closing.id())
            .ok_or_else(|| RepositoryError::not_found(ENTITY, closing.id()))?;

        if !rows[index].is_active() {
            return Err(RepositoryError::constraint(
                ENTITY,
                closing.id(),
                "row was already relinquished",
            ));
        }
        if rows.iter().any(|r| r.id() == opened.id()) {
            return Err(RepositoryError::constraint(ENTITY, opened.id(), "duplicate row id"));
        }

        rows[index] = closing.clone();
        rows.push(opened.clone());
        Ok(())
    }

    async fn find_active(
        &self,
        instrument_id: &InstrumentId,
    ) -> RepositoryResult<Option<InstrumentOwnership>> {
        let storage = self.storage.read().await;
        Ok(storage
            .get(instrument_id)
            .and_then(|rows| rows.iter().find(|r| r.is_active()))
            .cloned())
    }

    async fn history(
        &self,
        instrument_id: &InstrumentId,
    ) -> RepositoryResult<Vec<InstrumentOwnership>> {
        let storage = self.storage.read().await;
        let mut rows = storage.get(instrument_id).cloned().unwrap_or_default();
        // Stable sort keeps insertion order for equal timestamps.
        rows.sort_by_key(InstrumentOwnership::acquired_at);
        Ok(rows)
    }

    async fn find_active_by_owner(
        &self,
        owner_id: &CompanyId,
    ) -> RepositoryResult<Vec<InstrumentOwnership>> {
        let storage = self.storage.read().await;
        let mut rows: Vec<InstrumentOwnership> = storage
            .values()
            .flatten()
            .filter(|r| r.is_active() && r.owner_id() == *owner_id)
            .cloned()
            .collect();
        rows.sort_by_key(InstrumentOwnership::acquired_at);
        Ok(rows)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{AcquisitionReason, Timestamp};

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000 + secs).unwrap()
    }

    #[tokio::test]
    async fn insert_refuses_second_active_row() {
        let repo = InMemoryOwnershipRepository::new();
        let instrument_id = InstrumentId::new_v4();
        repo.insert(&InstrumentOwnership::issue(instrument_id, CompanyId::new_v4(), at(0)))
            .await
            .unwrap();

        let err = repo
            .insert(&InstrumentOwnership::issue(instrument_id, CompanyId::new_v4(), at(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint { .. }));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn transfer_swaps_active_row() {
        let repo = InMemoryOwnershipRepository::new();
        let instrument_id = InstrumentId::new_v4();
        let seller = CompanyId::new_v4();
        let buyer = CompanyId::new_v4();
        let issued = InstrumentOwnership::issue(instrument_id, seller, at(0));
        repo.insert(&issued).await.unwrap();

        let mut closing = issued.clone();
        closing.relinquish(at(5)).unwrap();
        let opened =
            InstrumentOwnership::acquire(instrument_id, buyer, at(5), AcquisitionReason::Trade);
        repo.transfer(&closing, &opened).await.unwrap();

        let active = repo.find_active(&instrument_id).await.unwrap().unwrap();
        assert_eq!(active.owner_id(), buyer);

        let history = repo.history(&instrument_id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].relinquished_at(), Some(at(5)));
        assert_eq!(history[1].acquired_at(), at(5));

        assert!(repo.find_active_by_owner(&seller).await.unwrap().is_empty());
        assert_eq!(repo.find_active_by_owner(&buyer).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn transfer_from_stale_row_fails() {
        let repo = InMemoryOwnershipRepository::new();
        let instrument_id = InstrumentId::new_v4();
        let issued = InstrumentOwnership::issue(instrument_id, CompanyId::new_v4(), at(0));
        repo.insert(&issued).await.unwrap();

        let mut closing = issued.clone();
        closing.relinquish(at(1)).unwrap();
        let first = InstrumentOwnership::acquire(
            instrument_id,
            CompanyId::new_v4(),
            at(1),
            AcquisitionReason::Trade,
        );
        repo.transfer(&closing, &first).await.unwrap();

        let second = InstrumentOwnership::acquire(
            instrument_id,
            CompanyId::new_v4(),
            at(2),
            AcquisitionReason::Trade,
        );
        let err = repo.transfer(&closing, &second).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint { .. }));

        let history = repo.history(&instrument_id).await.unwrap();
        assert_eq!(history.iter().filter(|r| r.is_active()).count(), 1);
    }

    #[tokio::test]
    async fn history_of_unknown_instrument_is_empty() {
        let repo = InMemoryOwnershipRepository::new();
        assert!(repo.history(&InstrumentId::new_v4()).await.unwrap().is_empty());
    }
}
