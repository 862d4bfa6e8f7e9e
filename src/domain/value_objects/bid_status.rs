//! # Bid Status
//!
//! Lifecycle of a bid.
//!
//! ```text
//! PENDING → SELECTED        (seller accepts)
//!    │    → NOT_SELECTED    (seller rejects, or another bid is accepted)
//!    │    → WITHDRAWN       (bidder)
//!    └──  → SUSPENDED       (admin)
//! ```
//!
//! Every status other than `PENDING` is terminal for the bidder and seller.

use serde::{Deserialize, Serialize};

/// Bid lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BidStatus {
    /// Awaiting the seller's decision.
    #[default]
    Pending,
    /// Withdrawn by the bidder.
    Withdrawn,
    /// Suspended by an administrator.
    Suspended,
    /// Accepted by the seller.
    Selected,
    /// Rejected by the seller or set aside by another acceptance.
    NotSelected,
}

string_enum!(BidStatus, "bid status", {
    Pending => "PENDING",
    Withdrawn => "WITHDRAWN",
    Suspended => "SUSPENDED",
    Selected => "SELECTED",
    NotSelected => "NOT_SELECTED",
});

impl BidStatus {
    /// Returns true for every status other than `PENDING`.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}
