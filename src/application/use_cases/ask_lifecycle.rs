//! # Ask Lifecycle
//!
//! Placing, transitioning and revising the seller's asks.
//!
//! Only the seller's company may ask on its own listing. Every write holds the
//! listing scope. `execution_mode` and `binding` are stored as given and do not
//! influence any rule here.

use crate::application::clock::Clock;
use crate::application::dto::PlaceAskRequest;
use crate::application::error::ApplicationResult;
use crate::application::ports::{EventPublisher, dispatch};
use crate::application::use_cases::open_listing;
use crate::domain::entities::{Ask, AskFilter, AskTerms, AskUpdate};
use crate::domain::errors::DomainError;
use crate::domain::events::{MarketEvent, MarketEventBody};
use crate::domain::services::{Standing, TransitionPolicy};
use crate::domain::value_objects::{Actor, Amount, AskId, AskStatus, EntityKind, ListingId};
use crate::infrastructure::persistence::{AskRepository, ListingRepository, ScopeLocks};
use std::sync::Arc;
use tracing::{debug, info};

/// Places, transitions and revises asks.
#[derive(Debug, Clone)]
pub struct AskLifecycle {
    listings: Arc<dyn ListingRepository>,
    asks: Arc<dyn AskRepository>,
    locks: Arc<dyn ScopeLocks>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventPublisher>,
}

impl AskLifecycle {
    /// Creates the lifecycle over the given collaborators.
    #[must_use]
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        asks: Arc<dyn AskRepository>,
        locks: Arc<dyn ScopeLocks>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            listings,
            asks,
            locks,
            clock,
            events,
        }
    }

    /// Places an active ask on behalf of the seller.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if the listing does not exist
    /// - [`DomainError::ListingNotOpen`] if the listing is not open
    /// - [`DomainError::Forbidden`] unless the actor's company is the seller
    /// - [`DomainError::InvalidAmount`] if the amount is not positive
    /// - [`DomainError::InvalidValidity`] if `valid_until` is not in the future
    /// - repository errors
    pub async fn place(&self, actor: &Actor, request: PlaceAskRequest) -> ApplicationResult<Ask> {
        debug!(%actor, %request, "placing ask");

        let listing_id = request.listing_id;
        let guard = self.locks.listing(listing_id).await;
        let listing = open_listing(self.listings.as_ref(), listing_id).await?;
        if !actor.acts_for(listing.seller_company_id()) {
            return Err(DomainError::forbidden(
                EntityKind::Listing,
                listing_id,
                "only the seller may ask on a listing",
            )
            .into());
        }

        let now = self.clock.now();
        let terms = AskTerms {
            amount: Amount::new(request.amount)?,
            currency: request.currency,
            valid_until: request.valid_until,
            execution_mode: request.execution_mode,
            binding: request.binding,
        };
        let ask = Ask::place(listing_id, actor, terms, now)?;
        self.asks.save(&ask).await?;
        drop(guard);

        info!(ask_id = %ask.id(), %listing_id, amount = %ask.amount(), currency = %ask.currency(), "ask placed");
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::AskPlaced {
                    ask_id: ask.id(),
                    listing_id,
                },
                now,
            )],
        );
        Ok(ask)
    }

    /// Moves an ask to `target` on behalf of the asker or an administrator.
    ///
    /// Requesting the current status succeeds without writing.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if the ask or its listing does not exist
    /// - [`DomainError::ListingNotOpen`] if the listing is not open
    /// - [`DomainError::Forbidden`] if the actor may not make the move
    /// - repository errors
    pub async fn transition(
        &self,
        ask_id: AskId,
        target: AskStatus,
        actor: &Actor,
    ) -> ApplicationResult<Ask> {
        debug!(%ask_id, %target, %actor, "transitioning ask");

        let ask = self.require(ask_id).await?;
        if ask.status() == target {
            return Ok(ask);
        }

        let listing_id = ask.listing_id();
        let guard = self.locks.listing(listing_id).await;
        let mut ask = self.require(ask_id).await?;
        let from = ask.status();
        if from == target {
            return Ok(ask);
        }
        open_listing(self.listings.as_ref(), listing_id).await?;

        let standing = Standing::resolve(actor, ask.asker_company_id());
        TransitionPolicy::authorize(from, target, standing, ask_id)?;

        let now = self.clock.now();
        ask.set_status(target, now);
        self.asks.save(&ask).await?;
        drop(guard);

        info!(%ask_id, %listing_id, %from, to = %target, %standing, "ask status changed");
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::AskStatusChanged {
                    ask_id,
                    listing_id,
                    from,
                    to: target,
                },
                now,
            )],
        );
        Ok(ask)
    }

    /// Revises the amount, currency or validity of an active ask.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if the ask or its listing does not exist
    /// - [`DomainError::NotActive`] if the ask is not active
    /// - [`DomainError::ListingNotOpen`] if the listing is not open
    /// - [`DomainError::Forbidden`] unless the actor's company is the asker
    /// - [`DomainError::InvalidAmount`] or [`DomainError::InvalidValidity`] for bad values
    /// - repository errors
    pub async fn update(
        &self,
        ask_id: AskId,
        actor: &Actor,
        update: AskUpdate,
    ) -> ApplicationResult<Ask> {
        debug!(%ask_id, %actor, "revising ask");

        let listing_id = self.require(ask_id).await?.listing_id();
        let guard = self.locks.listing(listing_id).await;
        let mut ask = self.require(ask_id).await?;
        if !ask.is_active() {
            return Err(DomainError::NotActive {
                ask_id,
                status: ask.status(),
            }
            .into());
        }
        open_listing(self.listings.as_ref(), listing_id).await?;
        if !actor.acts_for(ask.asker_company_id()) {
            return Err(DomainError::forbidden(
                EntityKind::Ask,
                ask_id,
                "only the asker may revise an ask",
            )
            .into());
        }

        let now = self.clock.now();
        ask.apply_update(update, now)?;
        self.asks.save(&ask).await?;
        drop(guard);

        info!(%ask_id, %listing_id, amount = %ask.amount(), currency = %ask.currency(), "ask revised");
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::AskRevised { ask_id, listing_id },
                now,
            )],
        );
        Ok(ask)
    }

    /// Returns an ask by ID.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn get(&self, ask_id: AskId) -> ApplicationResult<Option<Ask>> {
        Ok(self.asks.get(&ask_id).await?)
    }

    /// Returns the asks of a listing, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn asks_for(&self, listing_id: ListingId) -> ApplicationResult<Vec<Ask>> {
        Ok(self.asks.find_by_listing(&listing_id).await?)
    }

    /// Returns the asks matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn search(&self, filter: &AskFilter) -> ApplicationResult<Vec<Ask>> {
        Ok(self.asks.find(filter).await?)
    }

    async fn require(&self, ask_id: AskId) -> ApplicationResult<Ask> {
        self.asks
            .get(&ask_id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Ask, ask_id).into())
    }
}
