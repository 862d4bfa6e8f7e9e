//! # Marketplace
//!
//! Wiring facade over the lifecycles.
//!
//! One [`Marketplace`] owns one instance of every lifecycle, all sharing the
//! same repositories, scope locks, clock and event publisher. It also runs
//! the one cross-lifecycle side effect: an instrument entering `ACTIVE`
//! records its issuer as first owner.
//!
//! # Examples
//!
//! ```
//! use instrument_market::application::clock::SystemClock;
//! use instrument_market::application::use_cases::Marketplace;
//! use instrument_market::infrastructure::NoopPublisher;
//! use std::sync::Arc;
//!
//! let market = Marketplace::in_memory(Arc::new(SystemClock), Arc::new(NoopPublisher));
//! let _bids = market.bids();
//! ```

use crate::application::clock::Clock;
use crate::application::dto::InstrumentTransition;
use crate::application::error::ApplicationResult;
use crate::application::ports::EventPublisher;
use crate::application::use_cases::{
    AskLifecycle, BidLifecycle, InstrumentLifecycle, ListingLifecycle, OwnershipLedger,
};
use crate::domain::value_objects::{Actor, InstrumentId, InstrumentStatus};
use crate::infrastructure::persistence::in_memory::{
    InMemoryAskRepository, InMemoryBidRepository, InMemoryInstrumentRepository,
    InMemoryListingRepository, InMemoryOwnershipRepository,
};
use crate::infrastructure::persistence::{
    AskRepository, BidRepository, InstrumentRepository, KeyedLocks, ListingRepository,
    OwnershipRepository, ScopeLocks,
};
use std::sync::Arc;
use tracing::info;

/// The repositories a marketplace runs on.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Instrument store.
    pub instruments: Arc<dyn InstrumentRepository>,
    /// Listing store.
    pub listings: Arc<dyn ListingRepository>,
    /// Bid store.
    pub bids: Arc<dyn BidRepository>,
    /// Ask store.
    pub asks: Arc<dyn AskRepository>,
    /// Ownership ledger store.
    pub ownerships: Arc<dyn OwnershipRepository>,
}

impl Repositories {
    /// Creates empty in-memory repositories.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            instruments: Arc::new(InMemoryInstrumentRepository::new()),
            listings: Arc::new(InMemoryListingRepository::new()),
            bids: Arc::new(InMemoryBidRepository::new()),
            asks: Arc::new(InMemoryAskRepository::new()),
            ownerships: Arc::new(InMemoryOwnershipRepository::new()),
        }
    }
}

/// All lifecycles wired over shared collaborators.
#[derive(Debug, Clone)]
pub struct Marketplace {
    instruments: InstrumentLifecycle,
    listings: ListingLifecycle,
    bids: BidLifecycle,
    asks: AskLifecycle,
    ledger: Arc<OwnershipLedger>,
}

impl Marketplace {
    /// Wires every lifecycle over the given collaborators.
    #[must_use]
    pub fn new(
        repositories: Repositories,
        locks: Arc<dyn ScopeLocks>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        let ledger = Arc::new(OwnershipLedger::new(
            Arc::clone(&repositories.ownerships),
            Arc::clone(&locks),
            Arc::clone(&clock),
            Arc::clone(&events),
        ));
        let instruments = InstrumentLifecycle::new(
            Arc::clone(&repositories.instruments),
            Arc::clone(&locks),
            Arc::clone(&clock),
            Arc::clone(&events),
        );
        let listings = ListingLifecycle::new(
            Arc::clone(&repositories.instruments),
            Arc::clone(&repositories.listings),
            Arc::clone(&ledger),
            Arc::clone(&locks),
            Arc::clone(&clock),
            Arc::clone(&events),
        );
        let bids = BidLifecycle::new(
            Arc::clone(&repositories.listings),
            Arc::clone(&repositories.bids),
            Arc::clone(&locks),
            Arc::clone(&clock),
            Arc::clone(&events),
        );
        let asks = AskLifecycle::new(
            repositories.listings,
            repositories.asks,
            locks,
            clock,
            events,
        );

        Self {
            instruments,
            listings,
            bids,
            asks,
            ledger,
        }
    }

    /// Wires a marketplace over empty in-memory repositories and default locks.
    #[must_use]
    pub fn in_memory(clock: Arc<dyn Clock>, events: Arc<dyn EventPublisher>) -> Self {
        Self::new(
            Repositories::in_memory(),
            Arc::new(KeyedLocks::new()),
            clock,
            events,
        )
    }

    /// Returns the instrument lifecycle.
    #[inline]
    #[must_use]
    pub fn instruments(&self) -> &InstrumentLifecycle {
        &self.instruments
    }

    /// Returns the listing lifecycle.
    #[inline]
    #[must_use]
    pub fn listings(&self) -> &ListingLifecycle {
        &self.listings
    }

    /// Returns the bid lifecycle.
    #[inline]
    #[must_use]
    pub fn bids(&self) -> &BidLifecycle {
        &self.bids
    }

    /// Returns the ask lifecycle.
    #[inline]
    #[must_use]
    pub fn asks(&self) -> &AskLifecycle {
        &self.asks
    }

    /// Returns the ownership ledger.
    #[inline]
    #[must_use]
    pub fn ledger(&self) -> &OwnershipLedger {
        &self.ledger
    }

    /// Transitions an instrument and, when it enters `ACTIVE`, records the
    /// issuer as its first owner.
    ///
    /// The status change is committed before issuance is recorded. If the
    /// ledger refuses the issuance, the error is returned and the instrument
    /// stays `ACTIVE`.
    ///
    /// # Errors
    ///
    /// Errors of [`InstrumentLifecycle::transition`] and
    /// [`OwnershipLedger::record_issuance`].
    pub async fn transition_instrument(
        &self,
        instrument_id: InstrumentId,
        target: InstrumentStatus,
        actor: &Actor,
    ) -> ApplicationResult<InstrumentTransition> {
        let transition = self.instruments.transition(instrument_id, target, actor).await?;
        if transition.activated() {
            let issuer_id = transition.instrument.issuer_id();
            self.ledger.record_issuance(instrument_id, issuer_id).await?;
            info!(%instrument_id, %issuer_id, "issuer recorded as first owner");
        }
        Ok(transition)
    }
}
