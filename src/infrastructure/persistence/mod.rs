//! # Persistence Layer
//!
//! Repository ports, their in-memory implementations, and the keyed locks
//! that serialize writes per instrument and per listing.

pub mod in_memory;
pub mod locks;
pub mod traits;

pub use locks::{KeyedLocks, ScopeGuard, ScopeLocks};
pub use traits::{
    AskRepository, BidRepository, InstrumentRepository, ListingRepository, OwnershipRepository,
    RepositoryError, RepositoryResult,
};
