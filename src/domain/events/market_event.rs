//! # Market Events
//!
//! Notifications emitted after a lifecycle change has been committed.
//!
//! Events describe what happened; they are never used to rebuild state.
//! Downstream consumers (notification delivery, the settlement bridge) receive
//! them through the event publisher port.

use crate::domain::value_objects::{
    AcquisitionReason, AskId, AskStatus, BidId, BidStatus, CompanyId, EventId, InstrumentId,
    InstrumentStatus, ListingId, ListingStatus, MaturityStatus, OwnershipId, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEventBody {
    /// An issuer drafted a new instrument.
    InstrumentCreated {
        /// The instrument.
        instrument_id: InstrumentId,
        /// The issuing company.
        issuer_id: CompanyId,
    },
    /// An instrument changed approval status.
    InstrumentStatusChanged {
        /// The instrument.
        instrument_id: InstrumentId,
        /// Previous status.
        from: InstrumentStatus,
        /// New status.
        to: InstrumentStatus,
        /// Maturity status after the change.
        maturity_status: MaturityStatus,
    },
    /// The first ownership row of an instrument was recorded.
    OwnershipIssued {
        /// The instrument.
        instrument_id: InstrumentId,
        /// The ledger row.
        ownership_id: OwnershipId,
        /// The first owner.
        owner_id: CompanyId,
    },
    /// Ownership moved between companies.
    OwnershipTransferred {
        /// The instrument.
        instrument_id: InstrumentId,
        /// The new ledger row.
        ownership_id: OwnershipId,
        /// Previous owner.
        from_owner_id: CompanyId,
        /// New owner.
        to_owner_id: CompanyId,
        /// Reason recorded on the new row.
        reason: AcquisitionReason,
    },
    /// A listing was opened.
    ListingOpened {
        /// The listing.
        listing_id: ListingId,
        /// The listed instrument.
        instrument_id: InstrumentId,
        /// The seller.
        seller_company_id: CompanyId,
    },
    /// A listing changed status.
    ListingStatusChanged {
        /// The listing.
        listing_id: ListingId,
        /// Previous status.
        from: ListingStatus,
        /// New status.
        to: ListingStatus,
    },
    /// A bid was placed.
    BidPlaced {
        /// The bid.
        bid_id: BidId,
        /// The listing.
        listing_id: ListingId,
        /// The bidder.
        bidder_company_id: CompanyId,
    },
    /// A bid changed status outside of selection.
    BidStatusChanged {
        /// The bid.
        bid_id: BidId,
        /// The listing.
        listing_id: ListingId,
        /// Previous status.
        from: BidStatus,
        /// New status.
        to: BidStatus,
    },
    /// The seller selected a bid, setting the other pending bids aside.
    BidSelected {
        /// The selected bid.
        bid_id: BidId,
        /// The listing.
        listing_id: ListingId,
        /// Bids moved to `NOT_SELECTED` in the same write.
        set_aside: Vec<BidId>,
    },
    /// An ask was placed.
    AskPlaced {
        /// The ask.
        ask_id: AskId,
        /// The listing.
        listing_id: ListingId,
    },
    /// An ask changed status.
    AskStatusChanged {
        /// The ask.
        ask_id: AskId,
        /// The listing.
        listing_id: ListingId,
        /// Previous status.
        from: AskStatus,
        /// New status.
        to: AskStatus,
    },
    /// An ask's price or validity was revised.
    AskRevised {
        /// The ask.
        ask_id: AskId,
        /// The listing.
        listing_id: ListingId,
    },
}

impl MarketEventBody {
    /// Returns the event name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InstrumentCreated { .. } => "instrument_created",
            Self::InstrumentStatusChanged { .. } => "instrument_status_changed",
            Self::OwnershipIssued { .. } => "ownership_issued",
            Self::OwnershipTransferred { .. } => "ownership_transferred",
            Self::ListingOpened { .. } => "listing_opened",
            Self::ListingStatusChanged { .. } => "listing_status_changed",
            Self::BidPlaced { .. } => "bid_placed",
            Self::BidStatusChanged { .. } => "bid_status_changed",
            Self::BidSelected { .. } => "bid_selected",
            Self::AskPlaced { .. } => "ask_placed",
            Self::AskStatusChanged { .. } => "ask_status_changed",
            Self::AskRevised { .. } => "ask_revised",
        }
    }
}

/// A committed market change with identity and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEvent {
    id: EventId,
    occurred_at: Timestamp,
    #[serde(flatten)]
    body: MarketEventBody,
}

impl MarketEvent {
    /// Creates an event that occurred at `occurred_at`.
    #[must_use]
    pub fn new(body: MarketEventBody, occurred_at: Timestamp) -> Self {
        Self {
            id: EventId::new_v4(),
            occurred_at,
            body,
        }
    }

    /// Returns the event ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Returns when the change was committed.
    #[inline]
    #[must_use]
    pub fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    /// Returns what happened.
    #[inline]
    #[must_use]
    pub fn body(&self) -> &MarketEventBody {
        &self.body
    }

    /// Returns the event name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.body.name()
    }
}

impl fmt::Display for MarketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.name(), self.id, self.occurred_at)
    }
}
