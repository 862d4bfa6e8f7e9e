//! # Bid Entity
//!
//! An offer by a buying company to acquire the instrument behind a listing.
//!
//! Bids start `PENDING`. The seller resolves them by selecting one, which sets
//! every other pending bid of the listing aside, or by rejecting them one at a
//! time. Once a bid leaves `PENDING` its terms never change again.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    Actor, Amount, BidId, BidStatus, CompanyId, Currency, ListingId, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// A bid on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    id: BidId,
    listing_id: ListingId,
    bidder_company_id: CompanyId,
    bidder_user_id: UserId,
    amount: Amount,
    currency: Currency,
    valid_until: Option<Timestamp>,
    status: BidStatus,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
    deleted_at: Option<Timestamp>,
}

impl Bid {
    /// Places a pending bid on behalf of the actor's company.
    #[must_use]
    pub fn place(
        listing_id: ListingId,
        bidder: &Actor,
        amount: Amount,
        currency: Currency,
        valid_until: Option<Timestamp>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: BidId::new_v4(),
            listing_id,
            bidder_company_id: bidder.company_id,
            bidder_user_id: bidder.user_id,
            amount,
            currency,
            valid_until,
            status: BidStatus::Pending,
            version: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    // ========== Accessors ==========

    /// Returns the bid ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> BidId {
        self.id
    }

    /// Returns the listing the bid was placed on.
    #[inline]
    #[must_use]
    pub fn listing_id(&self) -> ListingId {
        self.listing_id
    }

    /// Returns the bidding company.
    #[inline]
    #[must_use]
    pub fn bidder_company_id(&self) -> CompanyId {
        self.bidder_company_id
    }

    /// Returns the user who placed the bid.
    #[inline]
    #[must_use]
    pub fn bidder_user_id(&self) -> UserId {
        self.bidder_user_id
    }

    /// Returns the offered amount.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the currency of the amount.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Returns the validity deadline, if any.
    #[inline]
    #[must_use]
    pub fn valid_until(&self) -> Option<Timestamp> {
        self.valid_until
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> BidStatus {
        self.status
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the bid was placed.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the bid was last changed.
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

    /// Returns true if the bid has been soft-deleted.
    #[inline]
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true while the seller can still act on the bid.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == BidStatus::Pending
    }

    // ========== Mutations ==========

    /// Marks the bid as the selected one.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotPending`] unless the bid is pending.
    pub fn select(&mut self, now: Timestamp) -> DomainResult<()> {
        self.resolve(BidStatus::Selected, now)
    }

    /// Sets the bid aside as not selected.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotPending`] unless the bid is pending.
    pub fn set_aside(&mut self, now: Timestamp) -> DomainResult<()> {
        self.resolve(BidStatus::NotSelected, now)
    }

    /// Sets the status. Callers authorize the move first.
    pub(crate) fn set_status(&mut self, target: BidStatus, now: Timestamp) {
        self.status = target;
        self.touch(now);
    }

    /// Soft-deletes the bid.
    pub fn tombstone(&mut self, now: Timestamp) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(now);
            self.touch(now);
        }
    }

    fn resolve(&mut self, target: BidStatus, now: Timestamp) -> DomainResult<()> {
        if !self.is_pending() {
            return Err(DomainError::NotPending {
                bid_id: self.id,
                status: self.status,
            });
        }
        self.set_status(target, now);
        Ok(())
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
        self.version = self.version.saturating_add(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::UserRole;
    use rust_decimal_macros::dec;

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    fn pending_bid(valid_until: Option<Timestamp>) -> Bid {
        let buyer = Actor::new(UserId::new_v4(), CompanyId::new_v4(), UserRole::Buyer);
        Bid::place(
            ListingId::new_v4(),
            &buyer,
            Amount::new(dec!(10000)).unwrap(),
            Currency::new("USD").unwrap(),
            valid_until,
            now(),
        )
    }

    #[test]
    fn placed_bid_is_pending() {
        let bid = pending_bid(None);
        assert!(bid.is_pending());
        assert_eq!(bid.version(), 1);
        assert_eq!(bid.amount().get(), dec!(10000));
    }

    #[test]
    fn select_then_set_aside_fails() {
        let mut bid = pending_bid(None);
        bid.select(now()).unwrap();
        assert_eq!(bid.status(), BidStatus::Selected);

        let err = bid.set_aside(now()).unwrap_err();
        assert_eq!(
            err,
            DomainError::NotPending {
                bid_id: bid.id(),
                status: BidStatus::Selected
            }
        );
        assert_eq!(bid.version(), 2);
    }

    #[test]
    fn tombstone_is_recorded_once() {
        let mut bid = pending_bid(Some(now().add_secs(60)));
        assert!(!bid.is_deleted());

        bid.tombstone(now().add_secs(5));
        bid.tombstone(now().add_secs(10));
        assert!(bid.is_deleted());
        assert_eq!(bid.deleted_at(), Some(now().add_secs(5)));
        assert_eq!(bid.version(), 2);
        assert_eq!(bid.valid_until(), Some(now().add_secs(60)));
    }
}
