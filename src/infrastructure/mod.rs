//! # Infrastructure Layer
//!
//! Implementations of the ports the lifecycles depend on.
//!
//! ## Persistence
//!
//! - Repository traits and in-memory repositories
//! - Keyed instrument and listing scope locks
//!
//! ## Notifications
//!
//! Channel-backed and no-op event publishers.

pub mod notifications;
pub mod persistence;

pub use notifications::{ChannelPublisher, NoopPublisher};
