//! # Repository Traits
//!
//! Port definitions for aggregate persistence.
//!
//! Every mutable aggregate is saved with optimistic versioning: a `save`
//! whose version is not greater than the stored one fails with
//! [`RepositoryError::VersionConflict`]. Reads exclude tombstoned rows unless
//! the method says otherwise.
//!
//! Multi-row changes that must be observed atomically are single calls:
//! [`OwnershipRepository::transfer`] and [`BidRepository::save_all`].

use crate::domain::entities::{
    Ask, AskFilter, Bid, BidFilter, Instrument, InstrumentFilter, InstrumentOwnership, Listing,
    ListingFilter,
};
use crate::domain::value_objects::{AskId, BidId, CompanyId, InstrumentId, ListingId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Entity required by a write does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity type name.
        entity: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Optimistic locking conflict.
    #[error("version conflict for {entity} {id}: saving version {attempted}, stored version {stored}")]
    VersionConflict {
        /// Entity type name.
        entity: &'static str,
        /// Entity identifier.
        id: String,
        /// Version carried by the rejected write.
        attempted: u64,
        /// Version currently stored.
        stored: u64,
    },

    /// A storage constraint would be violated.
    #[error("constraint violated for {entity} {id}: {reason}")]
    Constraint {
        /// Entity type name.
        entity: &'static str,
        /// Entity identifier.
        id: String,
        /// Violated rule.
        reason: String,
    },
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a version conflict error.
    #[must_use]
    pub fn version_conflict(
        entity: &'static str,
        id: impl fmt::Display,
        attempted: u64,
        stored: u64,
    ) -> Self {
        Self::VersionConflict {
            entity,
            id: id.to_string(),
            attempted,
            stored,
        }
    }

    /// Creates a constraint violation error.
    #[must_use]
    pub fn constraint(entity: &'static str, id: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::Constraint {
            entity,
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true for optimistic locking conflicts.
    #[inline]
    #[must_use]
    pub const fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence port for instruments.
#[async_trait]
pub trait InstrumentRepository: Send + Sync + fmt::Debug {
    /// Inserts or updates an instrument.
    async fn save(&self, instrument: &Instrument) -> RepositoryResult<()>;

    /// Gets a live instrument.
    async fn get(&self, id: &InstrumentId) -> RepositoryResult<Option<Instrument>>;

    /// Gets an instrument even if it was tombstoned.
    async fn get_including_deleted(&self, id: &InstrumentId) -> RepositoryResult<Option<Instrument>>;

    /// Finds the live instruments of an issuer, oldest first.
    async fn find_by_issuer(&self, issuer_id: &CompanyId) -> RepositoryResult<Vec<Instrument>>;

    /// Finds live instruments matching `filter`, oldest first.
    async fn find(&self, filter: &InstrumentFilter) -> RepositoryResult<Vec<Instrument>>;
}

/// Persistence port for listings.
#[async_trait]
pub trait ListingRepository: Send + Sync + fmt::Debug {
    /// Inserts or updates a listing.
    async fn save(&self, listing: &Listing) -> RepositoryResult<()>;

    /// Gets a live listing.
    async fn get(&self, id: &ListingId) -> RepositoryResult<Option<Listing>>;

    /// Gets a listing even if it was tombstoned.
    async fn get_including_deleted(&self, id: &ListingId) -> RepositoryResult<Option<Listing>>;

    /// Finds the live open listing of an instrument.
    async fn find_open_by_instrument(
        &self,
        instrument_id: &InstrumentId,
    ) -> RepositoryResult<Option<Listing>>;

    /// Finds all live listings of an instrument, oldest first.
    async fn find_by_instrument(&self, instrument_id: &InstrumentId)
    -> RepositoryResult<Vec<Listing>>;

    /// Finds live listings matching `filter`, oldest first.
    async fn find(&self, filter: &ListingFilter) -> RepositoryResult<Vec<Listing>>;
}

/// Persistence port for bids.
#[async_trait]
pub trait BidRepository: Send + Sync + fmt::Debug {
    /// Inserts or updates a bid.
    async fn save(&self, bid: &Bid) -> RepositoryResult<()>;

    /// Saves several bids atomically; either all are written or none.
    async fn save_all(&self, bids: &[Bid]) -> RepositoryResult<()>;

    /// Gets a live bid.
    async fn get(&self, id: &BidId) -> RepositoryResult<Option<Bid>>;

    /// Gets a bid even if it was tombstoned.
    async fn get_including_deleted(&self, id: &BidId) -> RepositoryResult<Option<Bid>>;

    /// Finds the live bids of a listing, oldest first.
    async fn find_by_listing(&self, listing_id: &ListingId) -> RepositoryResult<Vec<Bid>>;

    /// Finds live bids matching `filter`, oldest first.
    async fn find(&self, filter: &BidFilter) -> RepositoryResult<Vec<Bid>>;
}

/// Persistence port for asks.
#[async_trait]
pub trait AskRepository: Send + Sync + fmt::Debug {
    /// Inserts or updates an ask.
    async fn save(&self, ask: &Ask) -> RepositoryResult<()>;

    /// Gets a live ask.
    async fn get(&self, id: &AskId) -> RepositoryResult<Option<Ask>>;

    /// Gets an ask even if it was tombstoned.
    async fn get_including_deleted(&self, id: &AskId) -> RepositoryResult<Option<Ask>>;

    /// Finds the live asks of a listing, oldest first.
    async fn find_by_listing(&self, listing_id: &ListingId) -> RepositoryResult<Vec<Ask>>;

    /// Finds live asks matching `filter`, oldest first.
    async fn find(&self, filter: &AskFilter) -> RepositoryResult<Vec<Ask>>;
}

/// Persistence port for the append-only ownership ledger.
///
/// Implementations must never hold two active rows for one instrument.
#[async_trait]
pub trait OwnershipRepository: Send + Sync + fmt::Debug {
    /// Appends a new row.
    ///
    /// Fails with [`RepositoryError::Constraint`] if the row is active and the
    /// instrument already has an active row.
    async fn insert(&self, row: &InstrumentOwnership) -> RepositoryResult<()>;

    /// Replaces the active row `closing` with its relinquished version and
    /// appends `opened`, as one atomic write.
    async fn transfer(
        &self,
        closing: &InstrumentOwnership,
        opened: &InstrumentOwnership,
    ) -> RepositoryResult<()>;

    /// Finds the active row of an instrument.
    async fn find_active(
        &self,
        instrument_id: &InstrumentId,
    ) -> RepositoryResult<Option<InstrumentOwnership>>;

    /// Returns every row of an instrument ordered by `acquired_at`, with
    /// insertion order breaking ties.
    async fn history(&self, instrument_id: &InstrumentId) -> RepositoryResult<Vec<InstrumentOwnership>>;

    /// Finds the active rows held by a company.
    async fn find_active_by_owner(&self, owner_id: &CompanyId)
    -> RepositoryResult<Vec<InstrumentOwnership>>;
}
