//! # Domain Errors
//!
//! Typed domain error definitions.
//!
//! This module provides the [`DomainError`] enum for representing
//! marketplace rule violations with numeric error codes. Every variant carries
//! the identifier of the entity it refers to, so callers can map errors to
//! transport responses without string matching.
//!
//! # Error Code Ranges
//!
//! - **1000-1999**: Validation errors
//! - **2000-2999**: State errors
//! - **3000-3999**: Authority errors
//! - **4000-4999**: Existence and ownership errors
//!
//! # Examples
//!
//! ```
//! use instrument_market::domain::errors::DomainError;
//!
//! let error = DomainError::InvalidAmount("amount must be positive".to_string());
//! assert_eq!(error.code(), 1001);
//! ```

use crate::domain::value_objects::{
    AcquisitionReason, AskId, AskStatus, BidId, BidStatus, CompanyId, EntityKind, InstrumentId,
    InstrumentStatus, ListingId, ListingStatus, Timestamp,
};
use thiserror::Error;
use uuid::Uuid;

/// Domain-level error with numeric error codes.
///
/// | Range | Category |
/// |-------|----------|
/// | 1000-1999 | Validation errors |
/// | 2000-2999 | State errors |
/// | 3000-3999 | Authority errors |
/// | 4000-4999 | Existence and ownership errors |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[must_use]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (1000-1999)
    // ========================================================================
    /// Amount is zero or negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Currency is not a three-letter code.
    #[error("invalid currency: {0:?}")]
    InvalidCurrency(String),

    /// Validity deadline is not in the future.
    #[error("invalid validity: valid_until {valid_until} is not after {now}")]
    InvalidValidity {
        /// Requested deadline.
        valid_until: Timestamp,
        /// Instant of the check.
        now: Timestamp,
    },

    /// Date field is out of range.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Reason not usable for an ownership transfer.
    #[error("invalid transfer reason: {0}")]
    InvalidTransferReason(AcquisitionReason),

    // ========================================================================
    // State Errors (2000-2999)
    // ========================================================================
    /// Listing does not accept activity in its current status.
    #[error("listing {listing_id} is not open (status {status})")]
    ListingNotOpen {
        /// The listing.
        listing_id: ListingId,
        /// Its current status.
        status: ListingStatus,
    },

    /// Bid is no longer pending.
    #[error("bid {bid_id} is not pending (status {status})")]
    NotPending {
        /// The bid.
        bid_id: BidId,
        /// Its current status.
        status: BidStatus,
    },

    /// Ask is not active.
    #[error("ask {ask_id} is not active (status {status})")]
    NotActive {
        /// The ask.
        ask_id: AskId,
        /// Its current status.
        status: AskStatus,
    },

    /// Instrument terms can no longer be edited.
    #[error("instrument {instrument_id} is not editable (status {status})")]
    NotEditable {
        /// The instrument.
        instrument_id: InstrumentId,
        /// Its current status.
        status: InstrumentStatus,
    },

    // ========================================================================
    // Authority Errors (3000-3999)
    // ========================================================================
    /// The actor may not perform this operation on the entity.
    #[error("forbidden on {entity} {id}: {reason}")]
    Forbidden {
        /// Kind of the target entity.
        entity: EntityKind,
        /// Identifier of the target entity.
        id: Uuid,
        /// Human-readable explanation.
        reason: String,
    },

    /// A company attempted to bid on its own listing.
    #[error("company {company_id} cannot bid on its own listing {listing_id}")]
    SelfBid {
        /// The listing.
        listing_id: ListingId,
        /// The seller company.
        company_id: CompanyId,
    },

    // ========================================================================
    // Existence and Ownership Errors (4000-4999)
    // ========================================================================
    /// Entity does not exist or is tombstoned.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of the missing entity.
        entity: EntityKind,
        /// Identifier that was looked up.
        id: Uuid,
    },

    /// Instrument already has an open listing.
    #[error("instrument {instrument_id} already has open listing {listing_id}")]
    AlreadyOpen {
        /// The instrument.
        instrument_id: InstrumentId,
        /// The listing that is already open.
        listing_id: ListingId,
    },

    /// Company already holds the active ownership row.
    #[error("company {owner_id} already owns instrument {instrument_id}")]
    AlreadyOwned {
        /// The instrument.
        instrument_id: InstrumentId,
        /// The active owner.
        owner_id: CompanyId,
    },

    /// Instrument has no active ownership row.
    #[error("instrument {instrument_id} has no active owner")]
    NoActiveOwner {
        /// The instrument.
        instrument_id: InstrumentId,
    },

    /// Company is not the active owner.
    #[error("company {company_id} is not the active owner of instrument {instrument_id}")]
    NotOwner {
        /// The instrument.
        instrument_id: InstrumentId,
        /// The company that claimed ownership.
        company_id: CompanyId,
    },
}

impl DomainError {
    /// Creates a [`DomainError::NotFound`].
    pub fn not_found(entity: EntityKind, id: impl Into<Uuid>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a [`DomainError::Forbidden`].
    pub fn forbidden(entity: EntityKind, id: impl Into<Uuid>, reason: impl Into<String>) -> Self {
        Self::Forbidden {
            entity,
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Returns the numeric error code.
    ///
    /// # Examples
    ///
    /// ```
    /// use instrument_market::domain::errors::DomainError;
    /// use instrument_market::domain::value_objects::{EntityKind, ListingId};
    ///
    /// let error = DomainError::not_found(EntityKind::Listing, ListingId::new_v4());
    /// assert_eq!(error.code(), 4001);
    /// ```
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            // Validation errors (1000-1999)
            Self::InvalidAmount(_) => 1001,
            Self::InvalidCurrency(_) => 1002,
            Self::InvalidValidity { .. } => 1003,
            Self::InvalidDate(_) => 1004,
            Self::InvalidTransferReason(_) => 1005,

            // State errors (2000-2999)
            Self::ListingNotOpen { .. } => 2001,
            Self::NotPending { .. } => 2002,
            Self::NotActive { .. } => 2003,
            Self::NotEditable { .. } => 2004,

            // Authority errors (3000-3999)
            Self::Forbidden { .. } => 3001,
            Self::SelfBid { .. } => 3002,

            // Existence and ownership errors (4000-4999)
            Self::NotFound { .. } => 4001,
            Self::AlreadyOpen { .. } => 4002,
            Self::AlreadyOwned { .. } => 4003,
            Self::NoActiveOwner { .. } => 4004,
            Self::NotOwner { .. } => 4005,
        }
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "validation",
            2000..=2999 => "state",
            3000..=3999 => "authority",
            4000..=4999 => "existence",
            _ => "unknown",
        }
    }

    /// Returns true if this is a validation error.
    #[inline]
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self.code(), 1000..=1999)
    }

    /// Returns true if the actor lacked authority.
    #[inline]
    #[must_use]
    pub const fn is_authority_error(&self) -> bool {
        matches!(self.code(), 3000..=3999)
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
