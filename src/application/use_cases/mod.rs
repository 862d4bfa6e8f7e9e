//! # Use Cases
//!
//! The lifecycles of the marketplace.
//!
//! Each lifecycle runs read, validate and write as one unit under a keyed
//! scope lock, publishes its events after the locks are released, and returns
//! rejections to the caller without logging them.

pub mod ask_lifecycle;
pub mod bid_lifecycle;
pub mod instrument_lifecycle;
pub mod listing_lifecycle;
pub mod marketplace;
pub mod ownership_ledger;


pub use ask_lifecycle::AskLifecycle;
pub use bid_lifecycle::BidLifecycle;
pub use instrument_lifecycle::InstrumentLifecycle;
pub use listing_lifecycle::ListingLifecycle;
pub use marketplace::{Marketplace, Repositories};
pub use ownership_ledger::OwnershipLedger;

use crate::application::error::ApplicationResult;
use crate::domain::entities::Listing;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{EntityKind, ListingId};
use crate::infrastructure::persistence::ListingRepository;

/// Loads a listing that bids and asks may act on.
///
/// # Errors
///
/// - [`DomainError::NotFound`] if the listing does not exist
/// - [`DomainError::ListingNotOpen`] if the listing is not open
/// - repository errors
pub(crate) async fn open_listing(
    listings: &dyn ListingRepository,
    listing_id: ListingId,
) -> ApplicationResult<Listing> {
    let listing = listings
        .get(&listing_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Listing, listing_id))?;
    if !listing.is_open() {
        return Err(DomainError::ListingNotOpen {
            listing_id,
            status: listing.status(),
        }
        .into());
    }
    Ok(listing)
}
