//! # Domain Events
//!
//! Events emitted after committed lifecycle changes.
//!
//! ## Instrument Events
//!
//! - `InstrumentCreated`, `InstrumentStatusChanged`
//!
//! ## Ledger Events
//!
//! - `OwnershipIssued`, `OwnershipTransferred`
//!
//! ## Market Events
//!
//! - `ListingOpened`, `ListingStatusChanged`
//! - `BidPlaced`, `BidStatusChanged`, `BidSelected`
//! - `AskPlaced`, `AskStatusChanged`, `AskRevised`

pub mod market_event;

pub use market_event::{MarketEvent, MarketEventBody};
