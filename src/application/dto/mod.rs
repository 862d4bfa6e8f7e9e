//! # Data Transfer Objects
//!
//! Inputs and outputs of the lifecycle operations that do not map one-to-one
//! onto a domain entity.

pub mod market_dto;

pub use market_dto::{
    BidAcceptance, InstrumentTransition, PlaceAskRequest, PlaceBidRequest,
};
