//! # In-Memory Repositories
//!
//! Thread-safe `HashMap`-backed repositories. They back the default
//! marketplace wiring and the test suites.

pub mod ask_repository;
pub mod bid_repository;
pub mod instrument_repository;
pub mod listing_repository;
pub mod ownership_repository;

pub use ask_repository::InMemoryAskRepository;
pub use bid_repository::InMemoryBidRepository;
pub use instrument_repository::InMemoryInstrumentRepository;
pub use listing_repository::InMemoryListingRepository;
pub use ownership_repository::InMemoryOwnershipRepository;
