//! # Domain Layer
//!
//! Core business logic following Domain-Driven Design principles.
//!
//! This layer contains:
//! - **Entities**: Instrument, Listing, Bid, Ask and the ownership ledger row
//! - **Value Objects**: identifiers, money, timestamps, statuses, actors
//! - **Events**: notifications of committed changes
//! - **Errors**: domain error taxonomy with numeric codes
//! - **Services**: the role-dependent transition policy

pub mod entities;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;
