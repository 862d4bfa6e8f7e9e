//! # In-Memory Instrument Repository
//!
//! In-memory implementation of [`InstrumentRepository`].

use crate::domain::entities::{Instrument, InstrumentFilter};
use crate::domain::value_objects::{CompanyId, InstrumentId};
use crate::infrastructure::persistence::traits::{
    InstrumentRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`InstrumentRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryInstrumentRepository {
    storage: Arc<RwLock<HashMap<InstrumentId, Instrument>>>,
}

impl InMemoryInstrumentRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored instruments, tombstoned included.
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

    async fn collect(&self, predicate: impl Fn(&Instrument) -> bool + Send) -> Vec<Instrument> {
        let storage = self.storage.read().await;
        let mut instruments: Vec<Instrument> = storage
            .values()
            .filter(|i| !i.is_deleted() && predicate(i))
            .cloned()
            .collect();
        instruments.sort_by_key(Instrument::created_at);
        instruments
    }
}

impl Default for InMemoryInstrumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InstrumentRepository for InMemoryInstrumentRepository {
    async fn save(&self, instrument: &Instrument) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;

        if let Some(existing) = storage.get(&instrument.id())
            && existing.version() >= instrument.version()
        {
            return Err(RepositoryError::version_conflict(
                "Instrument",
                instrument.id(),
                instrument.version(),
                existing.version(),
            ));
        }

        storage.insert(instrument.id(), instrument.clone());
        Ok(())
    }

    async fn get(&self, id: &InstrumentId) -> RepositoryResult<Option<Instrument>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).filter(|i| !i.is_deleted()).cloned())
    }

    async fn get_including_deleted(&self, id: &InstrumentId) -> RepositoryResult<Option<Instrument>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_by_issuer(&self, issuer_id: &CompanyId) -> RepositoryResult<Vec<Instrument>> {
        let issuer_id = *issuer_id;
        Ok(self.collect(move |i| i.issuer_id() == issuer_id).await)
    }

    async fn find(&self, filter: &InstrumentFilter) -> RepositoryResult<Vec<Instrument>> {
        Ok(self.collect(|i| filter.matches(i)).await)
    }
}
