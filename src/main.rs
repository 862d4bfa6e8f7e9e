//! # Instrument Market
//!
//! Main entry point for the instrument market engine.
//!
//! Loads configuration, initializes logging, wires the in-memory marketplace
//! and drains its events to the log until Ctrl-C.

use anyhow::Context;
use instrument_market::application::{EventPublisher, Marketplace, Repositories, SystemClock};
use instrument_market::config::{AppConfig, LogConfig, LogFormat};
use instrument_market::domain::events::MarketEvent;
use instrument_market::infrastructure::persistence::KeyedLocks;
use instrument_market::infrastructure::{ChannelPublisher, NoopPublisher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    config.validate().context("validating configuration")?;
    init_tracing(&config.log)?;

    info!(
        service = %config.service_name,
        environment = %config.environment,
        "Starting instrument market v{}",
        env!("CARGO_PKG_VERSION")
    );

    let (events, drain) = if config.events.enabled {
        let (publisher, receiver) = ChannelPublisher::new(config.events.channel_capacity);
        let events: Arc<dyn EventPublisher> = Arc::new(publisher);
        (events, Some(tokio::spawn(drain_events(receiver))))
    } else {
        warn!("event publishing disabled");
        let events: Arc<dyn EventPublisher> = Arc::new(NoopPublisher);
        (events, None)
    };

    let market = Marketplace::new(
        Repositories::in_memory(),
        Arc::new(KeyedLocks::with_prune_threshold(config.locks.prune_threshold)),
        Arc::new(SystemClock),
        events,
    );
    info!("marketplace ready");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down instrument market");

    // Dropping the marketplace closes the channel and ends the drain task.
    drop(market);
    if let Some(drain) = drain {
        drain.await.context("event drain task")?;
    }
    Ok(())
}

fn init_tracing(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&log.level)
        .with_context(|| format!("invalid log filter '{}'", log.level))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
    Ok(())
}

async fn drain_events(mut receiver: mpsc::Receiver<MarketEvent>) {
    while let Some(event) = receiver.recv().await {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(event = event.name(), %payload, "market event"),
            Err(e) => warn!(event = event.name(), error = %e, "failed to encode market event"),
        }
    }
}
