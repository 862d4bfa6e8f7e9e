//! # Listing Aggregate
//!
//! A listing offers one instrument for trading on behalf of the company that
//! currently owns it. Bids and asks attach to a listing and are only accepted
//! while it is open.

use crate::domain::value_objects::{
    Actor, CompanyId, InstrumentId, ListingId, ListingStatus, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// A listing of an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    id: ListingId,
    instrument_id: InstrumentId,
    seller_company_id: CompanyId,
    creator_user_id: UserId,
    status: ListingStatus,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
    deleted_at: Option<Timestamp>,
}

impl Listing {
    /// Opens a listing for `instrument_id` on behalf of the actor's company.
    ///
    /// Ownership and uniqueness checks belong to the caller.
    #[must_use]
    pub fn open(instrument_id: InstrumentId, seller: &Actor, now: Timestamp) -> Self {
        Self {
            id: ListingId::new_v4(),
            instrument_id,
            seller_company_id: seller.company_id,
            creator_user_id: seller.user_id,
            status: ListingStatus::Open,
            version: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Returns the listing ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ListingId {
        self.id
    }

    /// Returns the listed instrument.
    #[inline]
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    /// Returns the selling company.
    #[inline]
    #[must_use]
    pub fn seller_company_id(&self) -> CompanyId {
        self.seller_company_id
    }

    /// Returns the user who opened the listing.
    #[inline]
    #[must_use]
    pub fn creator_user_id(&self) -> UserId {
        self.creator_user_id
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> ListingStatus {
        self.status
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the listing was opened.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the listing was last changed.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns the tombstone timestamp, if soft-deleted.
    #[inline]
    #[must_use]
    pub fn deleted_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    /// Returns true if bids and asks may be placed.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Returns true if the listing has been soft-deleted.
    #[inline]
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Sets the status. Callers authorize the move first.
    pub(crate) fn set_status(&mut self, target: ListingStatus, now: Timestamp) {
        self.status = target;
        self.touch(now);
    }

    /// Soft-deletes the listing.
    pub fn tombstone(&mut self, now: Timestamp) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(now);
            self.touch(now);
        }
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
        self.version = self.version.saturating_add(1);
    }
}
