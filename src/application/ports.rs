//! # Ports
//!
//! Outbound interfaces the lifecycles depend on besides persistence.

use crate::domain::events::MarketEvent;
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// Error returned when an event could not be handed off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The outbound buffer is full.
    #[error("event channel is full")]
    Full,

    /// The consumer has gone away.
    #[error("event channel is closed")]
    Closed,
}

/// Fire-and-forget sink for committed market events.
///
/// `publish` must not block. Delivery failures are reported to the caller,
/// which logs them; state is never rolled back because of them.
pub trait EventPublisher: Send + Sync + fmt::Debug {
    /// Hands `event` off for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if the event could not be queued.
    fn publish(&self, event: MarketEvent) -> Result<(), PublishError>;
}

/// Publishes every event in order, logging failures at WARN.
pub(crate) fn dispatch(publisher: &dyn EventPublisher, events: Vec<MarketEvent>) {
    for event in events {
        let id = event.id();
        let name = event.name();
        if let Err(e) = publisher.publish(event) {
            warn!(event_id = %id, event = name, error = %e, "failed to publish market event");
        }
    }
}
