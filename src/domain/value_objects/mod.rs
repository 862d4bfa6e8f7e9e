//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`InstrumentId`], [`ListingId`], [`BidId`], [`AskId`], [`OwnershipId`]
//! - [`CompanyId`], [`UserId`]: identities owned by the identity collaborator
//! - [`EventId`]: market event identifier
//!
//! ## Money and Time
//!
//! - [`Amount`]: strictly positive decimal amount
//! - [`Currency`]: three-letter currency code
//! - [`Timestamp`]: UTC instant
//!
//! ## Statuses
//!
//! - [`InstrumentStatus`], [`MaturityStatus`], [`TradingStatus`]
//! - [`ListingStatus`], [`BidStatus`], [`AskStatus`]
//!
//! ## Principals
//!
//! - [`Actor`] and [`UserRole`]

/// Implements `ALL`, `as_str`, `Display` and `FromStr` for a fieldless enum.
macro_rules! string_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the canonical wire name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::domain::value_objects::enums::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| $crate::domain::value_objects::enums::ParseEnumError::new($kind, s))
            }
        }
    };
}

pub mod actor;
pub mod ask_status;
pub mod bid_status;
pub mod enums;
pub mod ids;
pub mod instrument_status;
pub mod listing_status;
pub mod money;
pub mod timestamp;


pub use actor::Actor;
pub use ask_status::AskStatus;
pub use bid_status::BidStatus;
pub use enums::{AcquisitionReason, EntityKind, ExecutionMode, ParseEnumError, UserRole};
pub use ids::{AskId, BidId, CompanyId, EventId, InstrumentId, ListingId, OwnershipId, UserId};
pub use instrument_status::{InstrumentStatus, MaturityStatus, TradingStatus};
pub use listing_status::ListingStatus;
pub use money::{Amount, Currency};
pub use timestamp::Timestamp;
