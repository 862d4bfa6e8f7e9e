//! # Listing Status
//!
//! Lifecycle of a listing. Bids and asks may only be placed or changed while
//! their listing is [`ListingStatus::Open`], and an instrument has at most one
//! open listing at a time.

use serde::{Deserialize, Serialize};

/// Listing lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    /// Accepting bids and asks.
    #[default]
    Open,
    /// Taken off the market by the seller.
    Withdrawn,
    /// Halted by an administrator.
    Suspended,
    /// Closed by an administrator.
    Closed,
}

string_enum!(ListingStatus, "listing status", {
    Open => "OPEN",
    Withdrawn => "WITHDRAWN",
    Suspended => "SUSPENDED",
    Closed => "CLOSED",
});

impl ListingStatus {
    /// Returns true if the listing accepts bid and ask activity.
    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}
