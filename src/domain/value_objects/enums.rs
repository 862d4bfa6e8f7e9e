//! # Domain Enums
//!
//! Small closed vocabularies shared across the domain.
//!
//! - [`EntityKind`]: which aggregate an error or event refers to
//! - [`UserRole`]: role carried by an authenticated actor
//! - [`AcquisitionReason`]: why an ownership row was created
//! - [`ExecutionMode`]: how an ask is meant to be executed
//!
//! All enums render and parse as their upper-case wire names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string does not name any variant of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    /// Creates a parse error for `value` against the enum named `kind`.
    #[must_use]
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }

    /// Returns the name of the enum that failed to parse.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }
}

/// Aggregate kinds of the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Debt instrument.
    Instrument,
    /// Listing offering an instrument for trade.
    Listing,
    /// Bid placed on a listing.
    Bid,
    /// Ask placed on a listing by its seller.
    Ask,
    /// Ownership ledger row.
    Ownership,
}

string_enum!(EntityKind, "entity kind", {
    Instrument => "instrument",
    Listing => "listing",
    Bid => "bid",
    Ask => "ask",
    Ownership => "ownership",
});

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Platform administrator.
    Admin,
    /// Buyer company user.
    #[default]
    Buyer,
    /// Seller company user.
    Seller,
    /// Issuer company user.
    Issuer,
}

string_enum!(UserRole, "user role", {
    Admin => "ADMIN",
    Buyer => "BUYER",
    Seller => "SELLER",
    Issuer => "ISSUER",
});

impl UserRole {
    /// Returns true for the platform administrator role.
    #[inline]
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Reason an ownership row was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcquisitionReason {
    /// First owner, recorded when the instrument is activated.
    Issuance,
    /// Acquired through a settled trade.
    #[default]
    Trade,
    /// Acquired through an assignment outside the market.
    Assignment,
}

string_enum!(AcquisitionReason, "acquisition reason", {
    Issuance => "ISSUANCE",
    Trade => "TRADE",
    Assignment => "ASSIGNMENT",
});

/// Execution mode of an ask. Stored, never interpreted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionMode {
    /// Execute automatically against a matching bid.
    Auto,
    /// Seller executes by hand.
    #[default]
    Manual,
}

string_enum!(ExecutionMode, "execution mode", {
    Auto => "AUTO",
    Manual => "MANUAL",
});
