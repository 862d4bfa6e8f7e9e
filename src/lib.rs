//! # Instrument Market
//!
//! Decision engine of a debt-instrument marketplace: companies issue
//! instruments, list them, and trade them through bids and asks while an
//! append-only ledger tracks who owns what.
//!
//! ## Architecture
//!
//! This crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): entities, value objects, transition tables, events and errors
//! - **Application Layer** (`application`): lifecycles, the marketplace facade and ports
//! - **Infrastructure Layer** (`infrastructure`): in-memory repositories, scope locks and publishers
//! - **Configuration** (`config`): file and environment configuration
//!
//! ## Example
//!
//! ```rust,ignore
//! use instrument_market::application::{Marketplace, PlaceBidRequest, SystemClock};
//! use instrument_market::infrastructure::NoopPublisher;
//!
//! let market = Marketplace::in_memory(Arc::new(SystemClock), Arc::new(NoopPublisher));
//! let bid = market
//!     .bids()
//!     .place(&buyer, PlaceBidRequest::new(listing_id, dec!(10000), usd))
//!     .await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
