//! # Market DTOs
//!
//! Requests and responses for bid, ask and instrument operations.
//!
//! Requests carry raw decimals; amounts are validated by the lifecycle so an
//! invalid amount surfaces as [`DomainError::InvalidAmount`] in the same error
//! order as every other rule.
//!
//! [`DomainError::InvalidAmount`]: crate::domain::errors::DomainError::InvalidAmount

use crate::domain::entities::{Bid, Instrument};
use crate::domain::value_objects::{
    Currency, ExecutionMode, InstrumentStatus, ListingId, MaturityStatus, Timestamp,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request to place a bid on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceBidRequest {
    /// The listing to bid on.
    pub listing_id: ListingId,
    /// Offered amount.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// Optional expiry of the offer.
    #[serde(default)]
    pub valid_until: Option<Timestamp>,
}

impl PlaceBidRequest {
    /// Creates a bid request without expiry.
    #[must_use]
    pub fn new(listing_id: ListingId, amount: Decimal, currency: Currency) -> Self {
        Self {
            listing_id,
            amount,
            currency,
            valid_until: None,
        }
    }

    /// Sets the expiry.
    #[must_use]
    pub fn valid_until(mut self, valid_until: Timestamp) -> Self {
        self.valid_until = Some(valid_until);
        self
    }
}

impl fmt::Display for PlaceBidRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PlaceBidRequest {{ listing: {}, {} {} }}",
            self.listing_id, self.amount, self.currency
        )
    }
}

/// Request to place an ask on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceAskRequest {
    /// The listing to ask on.
    pub listing_id: ListingId,
    /// Asking amount.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// Optional expiry of the ask.
    #[serde(default)]
    pub valid_until: Option<Timestamp>,
    /// Settlement preference, stored as given.
    #[serde(default)]
    pub execution_mode: ExecutionMode,
    /// Whether the seller commits to the price, stored as given.
    #[serde(default)]
    pub binding: bool,
}

impl PlaceAskRequest {
    /// Creates a manual, non-binding ask request without expiry.
    #[must_use]
    pub fn new(listing_id: ListingId, amount: Decimal, currency: Currency) -> Self {
        Self {
            listing_id,
            amount,
            currency,
            valid_until: None,
            execution_mode: ExecutionMode::default(),
            binding: false,
        }
    }

    /// Sets the expiry.
    #[must_use]
    pub fn valid_until(mut self, valid_until: Timestamp) -> Self {
        self.valid_until = Some(valid_until);
        self
    }

    /// Sets the execution mode.
    #[must_use]
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    /// Sets the binding flag.
    #[must_use]
    pub fn binding(mut self, binding: bool) -> Self {
        self.binding = binding;
        self
    }
}

impl fmt::Display for PlaceAskRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PlaceAskRequest {{ listing: {}, {} {} {} }}",
            self.listing_id, self.amount, self.currency, self.execution_mode
        )
    }
}

/// Outcome of accepting a bid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidAcceptance {
    /// The bid now `SELECTED`.
    pub selected: Bid,
    /// The other bids of the listing moved to `NOT_SELECTED`.
    pub set_aside: Vec<Bid>,
}

/// Outcome of an instrument status change.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentTransition {
    /// The instrument after the change.
    pub instrument: Instrument,
    /// Status before the change.
    pub previous_status: InstrumentStatus,
}

impl InstrumentTransition {
    /// Returns true if the instrument just entered `ACTIVE`.
    #[must_use]
    pub fn activated(&self) -> bool {
        self.previous_status != InstrumentStatus::Active
            && self.instrument.instrument_status() == InstrumentStatus::Active
    }

    /// Returns the maturity status after the change.
    #[must_use]
    pub fn maturity_status(&self) -> MaturityStatus {
        self.instrument.maturity_status()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ask_request_defaults_when_fields_are_omitted() {
        let listing_id = ListingId::new_v4();
        let json = format!(r#"{{"listing_id":"{listing_id}","amount":"950","currency":"usd"}}"#);
        let request: PlaceAskRequest = serde_json::from_str(&json).unwrap();

        assert_eq!(request.execution_mode, ExecutionMode::Manual);
        assert!(!request.binding);
        assert!(request.valid_until.is_none());
        assert_eq!(request.currency.as_str(), "USD");
        assert_eq!(request.amount, dec!(950));
    }

    #[test]
    fn builders_set_optional_fields() {
        let until = Timestamp::from_unix_secs(1_800_000_000).unwrap();
        let request = PlaceAskRequest::new(ListingId::new_v4(), dec!(1), Currency::new("EUR").unwrap())
            .valid_until(until)
            .execution_mode(ExecutionMode::Auto)
            .binding(true);
        assert_eq!(request.valid_until, Some(until));
        assert_eq!(request.execution_mode, ExecutionMode::Auto);
        assert!(request.binding);
    }
}
