//! # Ask Status
//!
//! Lifecycle of an ask. Unlike bids, a suspended ask may be reactivated by an
//! administrator.

use serde::{Deserialize, Serialize};

/// Ask lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AskStatus {
    /// Live; the only status in which price and validity may change.
    #[default]
    Active,
    /// Withdrawn by the seller.
    Withdrawn,
    /// Suspended by an administrator.
    Suspended,
}

string_enum!(AskStatus, "ask status", {
    Active => "ACTIVE",
    Withdrawn => "WITHDRAWN",
    Suspended => "SUSPENDED",
});

impl AskStatus {
    /// Returns true if the ask is live.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn is_active() {
        assert!(AskStatus::Active.is_active());
        assert!(!AskStatus::Suspended.is_active());
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&AskStatus::Withdrawn).unwrap();
        assert_eq!(json, "\"WITHDRAWN\"");
        assert_eq!(serde_json::from_str::<AskStatus>(&json).unwrap(), AskStatus::Withdrawn);
    }
}
