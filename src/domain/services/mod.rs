//! # Domain Services
//!
//! Stateless business rules that span more than one entity.
//!
//! - [`TransitionPolicy`]: role-dependent status transition tables

pub mod transition_policy;

pub use transition_policy::{Standing, Transitionable, TransitionPolicy, Verdict};
