//! # Query Filters
//!
//! Conjunctive filters for instrument, listing, bid and ask searches. Unset
//! fields match everything; empty id lists match every id. Ranges are
//! inclusive on both ends.

use super::ask::Ask;
use super::bid::Bid;
use super::instrument::Instrument;
use super::listing::Listing;
use crate::domain::value_objects::{
    AskStatus, BidStatus, CompanyId, Currency, ExecutionMode, InstrumentId, InstrumentStatus,
    ListingId, ListingStatus, MaturityStatus, Timestamp, UserId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Filter over instruments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentFilter {
    /// Only instruments in this approval status.
    pub instrument_status: Option<InstrumentStatus>,
    /// Only instruments in this maturity status.
    pub maturity_status: Option<MaturityStatus>,
    /// Only instruments in this currency.
    pub currency: Option<Currency>,
    /// Inclusive lower bound on the face value.
    pub min_face_value: Option<Decimal>,
    /// Inclusive upper bound on the face value.
    pub max_face_value: Option<Decimal>,
    /// Inclusive lower bound on the maturity payment.
    pub min_maturity_payment: Option<Decimal>,
    /// Inclusive upper bound on the maturity payment.
    pub max_maturity_payment: Option<Decimal>,
    /// Only instruments maturing on or after this date.
    pub maturity_date_after: Option<NaiveDate>,
    /// Only instruments maturing on or before this date.
    pub maturity_date_before: Option<NaiveDate>,
    /// Only instruments drafted at or after this instant.
    pub created_at_after: Option<Timestamp>,
    /// Only instruments drafted at or before this instant.
    pub created_at_before: Option<Timestamp>,
    /// Only instruments issued by these companies.
    pub issuer_ids: Vec<CompanyId>,
    /// Only instruments drafted by these users.
    pub created_by: Vec<UserId>,
}

impl InstrumentFilter {
    /// Returns true if `instrument` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, instrument: &Instrument) -> bool {
        self.instrument_status
            .is_none_or(|status| instrument.instrument_status() == status)
            && self
                .maturity_status
                .is_none_or(|status| instrument.maturity_status() == status)
            && self
                .currency
                .as_ref()
                .is_none_or(|currency| instrument.currency() == currency)
            && in_range(
                instrument.face_value().get(),
                self.min_face_value,
                self.max_face_value,
            )
            && in_range(
                instrument.maturity_payment().get(),
                self.min_maturity_payment,
                self.max_maturity_payment,
            )
            && in_range(
                instrument.maturity_date(),
                self.maturity_date_after,
                self.maturity_date_before,
            )
            && in_range(
                instrument.created_at(),
                self.created_at_after,
                self.created_at_before,
            )
            && id_matches(&self.issuer_ids, instrument.issuer_id())
            && id_matches(&self.created_by, instrument.created_by())
    }
}

/// Filter over listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFilter {
    /// Only listings in this status.
    pub status: Option<ListingStatus>,
    /// Only listings of this instrument.
    pub instrument_id: Option<InstrumentId>,
    /// Only listings by these sellers.
    pub seller_company_ids: Vec<CompanyId>,
    /// Only listings opened by these users.
    pub creator_user_ids: Vec<UserId>,
}

impl ListingFilter {
    /// Returns true if `listing` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        self.status.is_none_or(|status| listing.status() == status)
            && self
                .instrument_id
                .is_none_or(|id| listing.instrument_id() == id)
            && id_matches(&self.seller_company_ids, listing.seller_company_id())
            && id_matches(&self.creator_user_ids, listing.creator_user_id())
    }
}

/// Filter over bids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidFilter {
    /// Only bids on this listing.
    pub listing_id: Option<ListingId>,
    /// Only bids in this status.
    pub status: Option<BidStatus>,
    /// Only bids by these companies.
    pub bidder_company_ids: Vec<CompanyId>,
    /// Only bids placed by these users.
    pub bidder_user_ids: Vec<UserId>,
    /// Only bids in this currency.
    pub currency: Option<Currency>,
    /// Inclusive lower bound on the amount.
    pub min_amount: Option<Decimal>,
    /// Inclusive upper bound on the amount.
    pub max_amount: Option<Decimal>,
}

impl BidFilter {
    /// Returns true if `bid` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, bid: &Bid) -> bool {
        self.listing_id.is_none_or(|id| bid.listing_id() == id)
            && self.status.is_none_or(|status| bid.status() == status)
            && id_matches(&self.bidder_company_ids, bid.bidder_company_id())
            && id_matches(&self.bidder_user_ids, bid.bidder_user_id())
            && self
                .currency
                .as_ref()
                .is_none_or(|currency| bid.currency() == currency)
            && in_range(bid.amount().get(), self.min_amount, self.max_amount)
    }
}

/// Filter over asks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskFilter {
    /// Only asks on this listing.
    pub listing_id: Option<ListingId>,
    /// Only asks in this status.
    pub status: Option<AskStatus>,
    /// Only asks by these companies.
    pub asker_company_ids: Vec<CompanyId>,
    /// Only asks placed by these users.
    pub asker_user_ids: Vec<UserId>,
    /// Only asks in this currency.
    pub currency: Option<Currency>,
    /// Only asks with this execution mode.
    pub execution_mode: Option<ExecutionMode>,
    /// Only binding (`true`) or non-binding (`false`) asks.
    pub binding: Option<bool>,
    /// Inclusive lower bound on the amount.
    pub min_amount: Option<Decimal>,
    /// Inclusive upper bound on the amount.
    pub max_amount: Option<Decimal>,
}

impl AskFilter {
    /// Returns true if `ask` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, ask: &Ask) -> bool {
        self.listing_id.is_none_or(|id| ask.listing_id() == id)
            && self.status.is_none_or(|status| ask.status() == status)
            && id_matches(&self.asker_company_ids, ask.asker_company_id())
            && id_matches(&self.asker_user_ids, ask.asker_user_id())
            && self
                .currency
                .as_ref()
                .is_none_or(|currency| ask.currency() == currency)
            && self
                .execution_mode
                .is_none_or(|mode| ask.execution_mode() == mode)
            && self.binding.is_none_or(|binding| ask.is_binding() == binding)
            && in_range(ask.amount().get(), self.min_amount, self.max_amount)
    }
}

fn id_matches<T: PartialEq>(allowed: &[T], id: T) -> bool {
    allowed.is_empty() || allowed.contains(&id)
}

fn in_range<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}
