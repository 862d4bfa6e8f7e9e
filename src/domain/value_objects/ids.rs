//! # Identity Value Objects
//!
//! Type-safe identity wrappers for domain identifiers.
//!
//! Every identifier is a UUID newtype so that an [`InstrumentId`] can never be
//! passed where a [`ListingId`] is expected. Company and user identifiers come
//! from the identity collaborator and are treated as opaque.
//!
//! # Examples
//!
//! ```
//! use instrument_market::domain::value_objects::ids::ListingId;
//!
//! let listing_id = ListingId::new_v4();
//! println!("Listing: {}", listing_id);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates an identifier from an existing UUID.
            #[inline]
            #[must_use]
            pub const fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generates a new random identifier using UUID v4.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the inner UUID value.
            #[inline]
            #[must_use]
            pub const fn get(self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl From<Uuid> for $name {
            #[inline]
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Debt instrument identifier.
    InstrumentId
);

uuid_id!(
    /// Listing identifier. A listing offers one instrument for trading.
    ListingId
);

uuid_id!(
    /// Bid identifier.
    BidId
);

uuid_id!(
    /// Ask identifier.
    AskId
);

uuid_id!(
    /// Ownership ledger row identifier.
    OwnershipId
);

uuid_id!(
    /// Company identifier. Companies issue, own, list and bid on instruments.
    CompanyId
);

uuid_id!(
    /// User identifier. Users act on behalf of exactly one company.
    UserId
);

uuid_id!(
    /// Market event identifier.
    EventId
);
