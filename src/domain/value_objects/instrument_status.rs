//! # Instrument Statuses
//!
//! The three independent status axes of a debt instrument.
//!
//! - [`InstrumentStatus`]: approval lifecycle, driven by issuer and admin
//! - [`MaturityStatus`]: repayment state, driven by an external clock except
//!   for the activation side effect
//! - [`TradingStatus`]: market visibility, carried as opaque data
//!
//! # Approval Lifecycle
//!
//! ```text
//! DRAFT → PENDING_APPROVAL → ACTIVE → MATURED
//!                ↓
//!            REJECTED
//! ```

use serde::{Deserialize, Serialize};

/// Approval lifecycle of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentStatus {
    /// Being prepared by the issuer; the only editable status.
    #[default]
    Draft,
    /// Submitted and awaiting administrator review.
    PendingApproval,
    /// Approved and issued.
    Active,
    /// Declined by an administrator.
    Rejected,
    /// Reached maturity.
    Matured,
    /// Halted by the platform.
    Suspended,
}

string_enum!(InstrumentStatus, "instrument status", {
    Draft => "DRAFT",
    PendingApproval => "PENDING_APPROVAL",
    Active => "ACTIVE",
    Rejected => "REJECTED",
    Matured => "MATURED",
    Suspended => "SUSPENDED",
});

impl InstrumentStatus {
    /// Returns true while the issuer may still edit the instrument terms.
    #[inline]
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }
}

/// Repayment state of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaturityStatus {
    /// Maturity not yet relevant.
    #[default]
    NotDue,
    /// Payment obligation is live.
    Due,
    /// Past maturity, within the grace period.
    InGrace,
    /// Partially repaid.
    PartiallyPaid,
    /// Fully repaid.
    Paid,
    /// Past grace without full payment.
    Late,
    /// Declared in default.
    Defaulted,
    /// Repayment is contested.
    Disputed,
}

string_enum!(MaturityStatus, "maturity status", {
    NotDue => "NOT_DUE",
    Due => "DUE",
    InGrace => "IN_GRACE",
    PartiallyPaid => "PARTIALLY_PAID",
    Paid => "PAID",
    Late => "LATE",
    Defaulted => "DEFAULTED",
    Disputed => "DISPUTED",
});

/// Market visibility of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradingStatus {
    /// Not yet on the market.
    #[default]
    Draft,
    /// Issued but not offered.
    OffMarket,
    /// Offered through a listing.
    Listed,
    /// Listing temporarily paused.
    Paused,
    /// A bid has been selected.
    UnderOffer,
}

string_enum!(TradingStatus, "trading status", {
    Draft => "DRAFT",
    OffMarket => "OFF_MARKET",
    Listed => "LISTED",
    Paused => "PAUSED",
    UnderOffer => "UNDER_OFFER",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn only_draft_is_editable() {
        for status in InstrumentStatus::ALL {
            assert_eq!(status.is_editable(), *status == InstrumentStatus::Draft);
        }
    }

    #[test]
    fn wire_names_round_trip() {
        for status in MaturityStatus::ALL {
            let parsed: MaturityStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, *status);
        }
        assert_eq!(
            serde_json::to_string(&InstrumentStatus::PendingApproval).unwrap(),
            "\"PENDING_APPROVAL\""
        );
    }

    #[test]
    fn defaults() {
        assert_eq!(InstrumentStatus::default(), InstrumentStatus::Draft);
        assert_eq!(MaturityStatus::default(), MaturityStatus::NotDue);
        assert_eq!(TradingStatus::default(), TradingStatus::Draft);
    }
}
