//! # Bid Lifecycle
//!
//! Placing bids, moving them between statuses, and resolving them.
//!
//! Every write holds the listing scope. Accepting a bid selects it and sets
//! every other pending bid of the listing aside in one repository write, so a
//! listing never has two selected bids.

use crate::application::clock::Clock;
use crate::application::dto::{BidAcceptance, PlaceBidRequest};
use crate::application::error::ApplicationResult;
use crate::application::ports::{EventPublisher, dispatch};
use crate::application::use_cases::open_listing;
use crate::domain::entities::{Bid, BidFilter};
use crate::domain::errors::DomainError;
use crate::domain::events::{MarketEvent, MarketEventBody};
use crate::domain::services::{Standing, TransitionPolicy};
use crate::domain::value_objects::{Actor, Amount, BidId, BidStatus, EntityKind, ListingId};
use crate::infrastructure::persistence::{BidRepository, ListingRepository, ScopeLocks};
use std::sync::Arc;
use tracing::{debug, info};

/// Places, transitions, accepts and rejects bids.
#[derive(Debug, Clone)]
pub struct BidLifecycle {
    listings: Arc<dyn ListingRepository>,
    bids: Arc<dyn BidRepository>,
    locks: Arc<dyn ScopeLocks>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventPublisher>,
}

impl BidLifecycle {
    /// Creates the lifecycle over the given collaborators.
    #[must_use]
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        bids: Arc<dyn BidRepository>,
        locks: Arc<dyn ScopeLocks>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            listings,
            bids,
            locks,
            clock,
            events,
        }
    }

    /// Places a pending bid for the actor's company.
    ///
    /// A company may hold several bids on the same listing.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if the listing does not exist
    /// - [`DomainError::ListingNotOpen`] if the listing is not open
    /// - [`DomainError::SelfBid`] if the actor's company is the seller
    /// - [`DomainError::InvalidAmount`] if the amount is not positive
    /// - repository errors
    pub async fn place(&self, actor: &Actor, request: PlaceBidRequest) -> ApplicationResult<Bid> {
        debug!(%actor, %request, "placing bid");

        let listing_id = request.listing_id;
        let guard = self.locks.listing(listing_id).await;
        let listing = open_listing(self.listings.as_ref(), listing_id).await?;
        if actor.acts_for(listing.seller_company_id()) {
            return Err(DomainError::SelfBid {
                listing_id,
                company_id: actor.company_id,
            }
            .into());
        }
        let amount = Amount::new(request.amount)?;

        let now = self.clock.now();
        let bid = Bid::place(
            listing_id,
            actor,
            amount,
            request.currency,
            request.valid_until,
            now,
        );
        self.bids.save(&bid).await?;
        drop(guard);

        info!(bid_id = %bid.id(), %listing_id, amount = %bid.amount(), currency = %bid.currency(), "bid placed");
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::BidPlaced {
                    bid_id: bid.id(),
                    listing_id,
                    bidder_company_id: bid.bidder_company_id(),
                },
                now,
            )],
        );
        Ok(bid)
    }

    /// Moves a bid to `target` on behalf of the bidder or an administrator.
    ///
    /// Requesting the current status succeeds without writing.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if the bid or its listing does not exist
    /// - [`DomainError::ListingNotOpen`] if the listing is not open
    /// - [`DomainError::Forbidden`] if the actor may not make the move
    /// - repository errors
    pub async fn transition(
        &self,
        bid_id: BidId,
        target: BidStatus,
        actor: &Actor,
    ) -> ApplicationResult<Bid> {
        debug!(%bid_id, %target, %actor, "transitioning bid");

        let bid = self.require(bid_id).await?;
        if bid.status() == target {
            return Ok(bid);
        }

        let listing_id = bid.listing_id();
        let guard = self.locks.listing(listing_id).await;
        let mut bid = self.require(bid_id).await?;
        let from = bid.status();
        if from == target {
            return Ok(bid);
        }
        open_listing(self.listings.as_ref(), listing_id).await?;

        let standing = Standing::resolve(actor, bid.bidder_company_id());
        TransitionPolicy::authorize(from, target, standing, bid_id)?;

        let now = self.clock.now();
        bid.set_status(target, now);
        self.bids.save(&bid).await?;
        drop(guard);

        info!(%bid_id, %listing_id, %from, to = %target, %standing, "bid status changed");
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::BidStatusChanged {
                    bid_id,
                    listing_id,
                    from,
                    to: target,
                },
                now,
            )],
        );
        Ok(bid)
    }

    /// Selects a bid on behalf of the seller.
    ///
    /// Every other pending bid of the listing becomes `NOT_SELECTED` in the
    /// same write. Asks on the listing are left as they are.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if the bid or its listing does not exist
    /// - [`DomainError::NotPending`] if the bid is no longer pending
    /// - [`DomainError::ListingNotOpen`] if the listing is not open
    /// - [`DomainError::Forbidden`] unless the actor's company is the seller
    /// - repository errors
    pub async fn accept(&self, bid_id: BidId, actor: &Actor) -> ApplicationResult<BidAcceptance> {
        debug!(%bid_id, %actor, "accepting bid");

        let listing_id = self.require(bid_id).await?.listing_id();
        let guard = self.locks.listing(listing_id).await;
        let mut selected = self.resolvable(bid_id, actor).await?;

        let now = self.clock.now();
        selected.select(now)?;
        let mut set_aside = Vec::new();
        for mut other in self.bids.find_by_listing(&listing_id).await? {
            if other.id() != bid_id && other.is_pending() {
                other.set_aside(now)?;
                set_aside.push(other);
            }
        }

        let mut batch = Vec::with_capacity(set_aside.len() + 1);
        batch.push(selected.clone());
        batch.extend(set_aside.iter().cloned());
        self.bids.save_all(&batch).await?;
        drop(guard);

        info!(%bid_id, %listing_id, set_aside = set_aside.len(), "bid selected");
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::BidSelected {
                    bid_id,
                    listing_id,
                    set_aside: set_aside.iter().map(Bid::id).collect(),
                },
                now,
            )],
        );
        Ok(BidAcceptance { selected, set_aside })
    }

    /// Sets a single bid aside on behalf of the seller.
    ///
    /// # Errors
    ///
    /// Same as [`accept`](Self::accept).
    pub async fn reject(&self, bid_id: BidId, actor: &Actor) -> ApplicationResult<Bid> {
        debug!(%bid_id, %actor, "rejecting bid");

        let listing_id = self.require(bid_id).await?.listing_id();
        let guard = self.locks.listing(listing_id).await;
        let mut bid = self.resolvable(bid_id, actor).await?;

        let now = self.clock.now();
        let from = bid.status();
        bid.set_aside(now)?;
        self.bids.save(&bid).await?;
        drop(guard);

        info!(%bid_id, %listing_id, "bid not selected");
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::BidStatusChanged {
                    bid_id,
                    listing_id,
                    from,
                    to: bid.status(),
                },
                now,
            )],
        );
        Ok(bid)
    }

    /// Returns a bid by ID.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn get(&self, bid_id: BidId) -> ApplicationResult<Option<Bid>> {
        Ok(self.bids.get(&bid_id).await?)
    }

    /// Returns the bids of a listing, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn bids_for(&self, listing_id: ListingId) -> ApplicationResult<Vec<Bid>> {
        Ok(self.bids.find_by_listing(&listing_id).await?)
    }

    /// Returns the bids matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn search(&self, filter: &BidFilter) -> ApplicationResult<Vec<Bid>> {
        Ok(self.bids.find(filter).await?)
    }

    async fn require(&self, bid_id: BidId) -> ApplicationResult<Bid> {
        self.bids
            .get(&bid_id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Bid, bid_id).into())
    }

    /// Shared checks of accept and reject, run under the listing scope.
    async fn resolvable(&self, bid_id: BidId, actor: &Actor) -> ApplicationResult<Bid> {
        let bid = self.require(bid_id).await?;
        if !bid.is_pending() {
            return Err(DomainError::NotPending {
                bid_id,
                status: bid.status(),
            }
            .into());
        }
        let listing = open_listing(self.listings.as_ref(), bid.listing_id()).await?;
        if !actor.acts_for(listing.seller_company_id()) {
            return Err(DomainError::forbidden(
                EntityKind::Bid,
                bid_id,
                format!("only the seller of listing {} may resolve its bids", listing.id()),
            )
            .into());
        }
        Ok(bid)
    }
}
