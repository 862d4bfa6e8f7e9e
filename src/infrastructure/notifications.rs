//! # Event Publishers
//!
//! [`EventPublisher`] implementations.
//!
//! [`ChannelPublisher`] queues events on a bounded tokio channel with
//! `try_send`, so publishing never waits on a slow consumer. A full buffer
//! drops the event and reports [`PublishError::Full`].

use crate::application::ports::{EventPublisher, PublishError};
use crate::domain::events::MarketEvent;
use tokio::sync::mpsc;

/// Publisher backed by a bounded tokio mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: mpsc::Sender<MarketEvent>,
}

impl ChannelPublisher {
    /// Creates a publisher and the receiving end of its channel.
    ///
    /// A zero `capacity` is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<MarketEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl EventPublisher for ChannelPublisher {
    fn publish(&self, event: MarketEvent) -> Result<(), PublishError> {
        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => PublishError::Full,
            mpsc::error::TrySendError::Closed(_) => PublishError::Closed,
        })
    }
}

/// Publisher that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _event: MarketEvent) -> Result<(), PublishError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::events::MarketEventBody;
    use crate::domain::value_objects::{AskId, ListingId, Timestamp};

    fn event() -> MarketEvent {
        MarketEvent::new(
            MarketEventBody::AskRevised {
                ask_id: AskId::new_v4(),
                listing_id: ListingId::new_v4(),
            },
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn channel_delivers_in_order() {
        let (publisher, mut receiver) = ChannelPublisher::new(4);
        let first = event();
        let second = event();
        publisher.publish(first.clone()).unwrap();
        publisher.publish(second.clone()).unwrap();

        assert_eq!(receiver.recv().await.unwrap(), first);
        assert_eq!(receiver.recv().await.unwrap(), second);
    }

    #[test]
    fn full_channel_reports_full() {
        let (publisher, _receiver) = ChannelPublisher::new(1);
        publisher.publish(event()).unwrap();
        assert_eq!(publisher.publish(event()), Err(PublishError::Full));
    }

    #[test]
    fn dropped_receiver_reports_closed() {
        let (publisher, receiver) = ChannelPublisher::new(1);
        drop(receiver);
        assert_eq!(publisher.publish(event()), Err(PublishError::Closed));
    }

    #[test]
    fn noop_accepts_everything() {
        assert!(NoopPublisher.publish(event()).is_ok());
    }
}
