//! # Listing Lifecycle
//!
//! Opening listings and moving them between statuses.
//!
//! Only the active owner of an instrument may open a listing for it, and an
//! instrument never has more than one `OPEN` listing. Writes hold the
//! instrument scope, and transitions additionally the listing scope, always
//! in that order.

use crate::application::clock::Clock;
use crate::application::error::ApplicationResult;
use crate::application::ports::{EventPublisher, dispatch};
use crate::application::use_cases::ownership_ledger::OwnershipLedger;
use crate::domain::entities::{Listing, ListingFilter};
use crate::domain::errors::DomainError;
use crate::domain::events::{MarketEvent, MarketEventBody};
use crate::domain::services::{Standing, TransitionPolicy};
use crate::domain::value_objects::{Actor, EntityKind, InstrumentId, ListingId, ListingStatus};
use crate::infrastructure::persistence::{InstrumentRepository, ListingRepository, ScopeLocks};
use std::sync::Arc;
use tracing::{debug, info};

/// Creates and transitions listings.
#[derive(Debug, Clone)]
pub struct ListingLifecycle {
    instruments: Arc<dyn InstrumentRepository>,
    listings: Arc<dyn ListingRepository>,
    ledger: Arc<OwnershipLedger>,
    locks: Arc<dyn ScopeLocks>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventPublisher>,
}

impl ListingLifecycle {
    /// Creates the lifecycle over the given collaborators.
    #[must_use]
    pub fn new(
        instruments: Arc<dyn InstrumentRepository>,
        listings: Arc<dyn ListingRepository>,
        ledger: Arc<OwnershipLedger>,
        locks: Arc<dyn ScopeLocks>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            instruments,
            listings,
            ledger,
            locks,
            clock,
            events,
        }
    }

    /// Opens a listing for an instrument owned by the actor's company.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if the instrument does not exist
    /// - [`DomainError::NoActiveOwner`] if nobody owns the instrument
    /// - [`DomainError::NotOwner`] if the actor's company is not the owner
    /// - [`DomainError::AlreadyOpen`] if the instrument already has an open listing
    /// - repository errors
    pub async fn create(&self, instrument_id: InstrumentId, actor: &Actor) -> ApplicationResult<Listing> {
        debug!(%instrument_id, %actor, "creating listing");

        if self.instruments.get(&instrument_id).await?.is_none() {
            return Err(DomainError::not_found(EntityKind::Instrument, instrument_id).into());
        }

        let guard = self.locks.instrument(instrument_id).await;
        let owner = self
            .ledger
            .current_owner(instrument_id)
            .await?
            .ok_or(DomainError::NoActiveOwner { instrument_id })?;
        if !actor.acts_for(owner.owner_id()) {
            return Err(DomainError::NotOwner {
                instrument_id,
                company_id: actor.company_id,
            }
            .into());
        }
        if let Some(open) = self.listings.find_open_by_instrument(&instrument_id).await? {
            return Err(DomainError::AlreadyOpen {
                instrument_id,
                listing_id: open.id(),
            }
            .into());
        }

        let now = self.clock.now();
        let listing = Listing::open(instrument_id, actor, now);
        self.listings.save(&listing).await?;
        drop(guard);

        info!(listing_id = %listing.id(), %instrument_id, "listing opened");
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::ListingOpened {
                    listing_id: listing.id(),
                    instrument_id,
                    seller_company_id: listing.seller_company_id(),
                },
                now,
            )],
        );
        Ok(listing)
    }

    /// Moves a listing to `target`.
    ///
    /// Requesting the current status succeeds without writing.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if the listing does not exist
    /// - [`DomainError::Forbidden`] if the actor may not make the move
    /// - [`DomainError::AlreadyOpen`] when reopening while another listing is open
    /// - repository errors
    pub async fn transition(
        &self,
        listing_id: ListingId,
        target: ListingStatus,
        actor: &Actor,
    ) -> ApplicationResult<Listing> {
        debug!(%listing_id, %target, %actor, "transitioning listing");

        let listing = self.require(listing_id).await?;
        if listing.status() == target {
            return Ok(listing);
        }

        let instrument_guard = self.locks.instrument(listing.instrument_id()).await;
        let listing_guard = self.locks.listing(listing_id).await;

        let mut listing = self.require(listing_id).await?;
        let from = listing.status();
        if from == target {
            return Ok(listing);
        }

        let standing = Standing::resolve(actor, listing.seller_company_id());
        TransitionPolicy::authorize(from, target, standing, listing_id)?;

        if target == ListingStatus::Open
            && let Some(open) = self
                .listings
                .find_open_by_instrument(&listing.instrument_id())
                .await?
        {
            return Err(DomainError::AlreadyOpen {
                instrument_id: listing.instrument_id(),
                listing_id: open.id(),
            }
            .into());
        }

        let now = self.clock.now();
        listing.set_status(target, now);
        self.listings.save(&listing).await?;
        drop(listing_guard);
        drop(instrument_guard);

        info!(%listing_id, %from, to = %target, %standing, "listing status changed");
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::ListingStatusChanged {
                    listing_id,
                    from,
                    to: target,
                },
                now,
            )],
        );
        Ok(listing)
    }

    /// Returns a listing by ID.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn get(&self, listing_id: ListingId) -> ApplicationResult<Option<Listing>> {
        Ok(self.listings.get(&listing_id).await?)
    }

    /// Returns the open listing of an instrument, if any.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn open_listing_for(&self, instrument_id: InstrumentId) -> ApplicationResult<Option<Listing>> {
        Ok(self.listings.find_open_by_instrument(&instrument_id).await?)
    }

    /// Returns every listing of an instrument, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn listings_for(&self, instrument_id: InstrumentId) -> ApplicationResult<Vec<Listing>> {
        Ok(self.listings.find_by_instrument(&instrument_id).await?)
    }

    /// Returns the listings matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn search(&self, filter: &ListingFilter) -> ApplicationResult<Vec<Listing>> {
        Ok(self.listings.find(filter).await?)
    }

    async fn require(&self, listing_id: ListingId) -> ApplicationResult<Listing> {
        self.listings
            .get(&listing_id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Listing, listing_id).into())
    }
}
