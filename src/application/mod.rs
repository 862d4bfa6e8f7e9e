//! # Application Layer
//!
//! Lifecycle orchestration over the domain.
//!
//! This layer combines the transition tables, the ownership ledger and the
//! repositories into transactional operations, and publishes what changed.
//!
//! ## Use Cases
//!
//! - [`InstrumentLifecycle`]: drafting, editing and approving instruments
//! - [`OwnershipLedger`]: issuance, transfer and ownership history
//! - [`ListingLifecycle`]: opening and transitioning listings
//! - [`BidLifecycle`]: placing, transitioning, accepting and rejecting bids
//! - [`AskLifecycle`]: placing, transitioning and revising asks
//! - [`Marketplace`]: all of the above over shared collaborators
//!
//! ## Ports
//!
//! - [`Clock`]: time source
//! - [`EventPublisher`]: fire-and-forget event sink

pub mod clock;
pub mod dto;
pub mod error;
pub mod ports;
pub mod use_cases;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dto::{BidAcceptance, InstrumentTransition, PlaceAskRequest, PlaceBidRequest};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{EventPublisher, PublishError};
pub use use_cases::{
    AskLifecycle, BidLifecycle, InstrumentLifecycle, ListingLifecycle, Marketplace,
    OwnershipLedger, Repositories,
};
