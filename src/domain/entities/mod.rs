//! # Domain Entities
//!
//! Aggregate roots and entities representing core business concepts.
//!
//! ## Aggregates
//!
//! - [`Instrument`]: debt instrument with approval and maturity statuses
//! - [`Listing`]: an instrument offered for trade
//! - [`Bid`] and [`Ask`]: offers attached to a listing
//!
//! ## Ledger
//!
//! - [`InstrumentOwnership`]: append-only ownership history row
//!
//! Every mutable entity carries a `version` for optimistic locking and an
//! optional `deleted_at` tombstone.

pub mod ask;
pub mod bid;
pub mod filters;
pub mod instrument;
pub mod listing;
pub mod ownership;


pub use ask::{Ask, AskTerms, AskUpdate};
pub use bid::Bid;
pub use filters::{AskFilter, BidFilter, InstrumentFilter, ListingFilter};
pub use instrument::{DraftUpdate, Instrument, InstrumentTerms};
pub use listing::Listing;
pub use ownership::InstrumentOwnership;
