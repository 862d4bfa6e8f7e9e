//! # Transition Policy
//!
//! Role-dependent status transition tables for instruments, listings, bids
//! and asks.
//!
//! The policy answers one question: given the current status of an entity and
//! the standing of the actor relative to it, which statuses may the actor move
//! the entity to? It is a pure function. An empty answer means "not allowed";
//! callers turn that into [`DomainError::Forbidden`](crate::domain::errors::DomainError::Forbidden).
//!
//! # Standing
//!
//! ```text
//! actor company == owning company  → Owner
//! otherwise, actor role == ADMIN   → Admin
//! otherwise                        → Outsider (never allowed)
//! ```
//!
//! # Examples
//!
//! ```
//! use instrument_market::domain::services::{Standing, TransitionPolicy, Verdict};
//! use instrument_market::domain::value_objects::ListingStatus;
//!
//! let targets = TransitionPolicy::allowed_targets(ListingStatus::Open, Standing::Owner);
//! assert_eq!(targets, vec![ListingStatus::Withdrawn]);
//!
//! assert_eq!(
//!     TransitionPolicy::evaluate(ListingStatus::Open, ListingStatus::Closed, Standing::Owner),
//!     Verdict::Denied
//! );
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    Actor, AskStatus, BidStatus, CompanyId, EntityKind, InstrumentStatus, ListingStatus,
};
use std::fmt;
use uuid::Uuid;

/// Position of an actor relative to the entity being transitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Standing {
    /// The actor's company owns the entity (seller, bidder, asker or issuer).
    Owner,
    /// The actor is an administrator from another company.
    Admin,
    /// Neither owner nor administrator.
    Outsider,
}

impl Standing {
    /// Every standing.
    pub const ALL: &'static [Self] = &[Self::Owner, Self::Admin, Self::Outsider];

    /// Resolves the standing of `actor` towards an entity owned by `owner`.
    ///
    /// Ownership wins over the administrator role.
    #[must_use]
    pub fn resolve(actor: &Actor, owner: CompanyId) -> Self {
        if actor.acts_for(owner) {
            Self::Owner
        } else if actor.is_admin() {
            Self::Admin
        } else {
            Self::Outsider
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Outsider => "outsider",
        };
        f.write_str(name)
    }
}

/// A status type governed by a transition table.
pub trait Transitionable: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Entity kind the status belongs to.
    const KIND: EntityKind;

    /// Every status of the entity.
    const STATUSES: &'static [Self];

    /// Table lookup for a non-outsider standing.
    ///
    /// Implementations never include `self` in the result.
    fn table(self, standing: Standing) -> Vec<Self>;
}

/// Outcome of evaluating a requested transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Target equals the current status; succeed without writing.
    Unchanged,
    /// Transition is allowed.
    Permitted,
    /// Transition is not allowed for this standing.
    Denied,
}

/// Stateless access to the transition tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionPolicy;

impl TransitionPolicy {
    /// Returns the statuses `standing` may move an entity in `current` to.
    ///
    /// Always empty for [`Standing::Outsider`]. Never contains `current`.
    #[must_use]
    pub fn allowed_targets<S: Transitionable>(current: S, standing: Standing) -> Vec<S> {
        match standing {
            Standing::Outsider => Vec::new(),
            Standing::Owner | Standing::Admin => current.table(standing),
        }
    }

    /// Returns true if moving from `current` to `target` is allowed.
    ///
    /// Same-status requests are always allowed.
    #[must_use]
    pub fn permits<S: Transitionable>(current: S, target: S, standing: Standing) -> bool {
        !matches!(Self::evaluate(current, target, standing), Verdict::Denied)
    }

    /// Classifies a requested transition.
    #[must_use]
    pub fn evaluate<S: Transitionable>(current: S, target: S, standing: Standing) -> Verdict {
        if current == target {
            Verdict::Unchanged
        } else if Self::allowed_targets(current, standing).contains(&target) {
            Verdict::Permitted
        } else {
            Verdict::Denied
        }
    }

    /// Like [`evaluate`](Self::evaluate), but a denial becomes an error.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Forbidden`] naming the entity `id` when the
    /// transition is denied.
    pub fn authorize<S: Transitionable>(
        current: S,
        target: S,
        standing: Standing,
        id: impl Into<Uuid>,
    ) -> DomainResult<Verdict> {
        match Self::evaluate(current, target, standing) {
            Verdict::Denied => Err(DomainError::forbidden(
                S::KIND,
                id,
                format!("{standing} may not move {} from {current} to {target}", S::KIND),
            )),
            verdict => Ok(verdict),
        }
    }
}

fn all_except<S: Transitionable>(current: S, excluded: &[S]) -> Vec<S> {
    S::STATUSES
        .iter()
        .copied()
        .filter(|status| *status != current && !excluded.contains(status))
        .collect()
}

impl Transitionable for ListingStatus {
    const KIND: EntityKind = EntityKind::Listing;
    const STATUSES: &'static [Self] = Self::ALL;

    fn table(self, standing: Standing) -> Vec<Self> {
        match (self, standing) {
            (Self::Open, Standing::Owner) => vec![Self::Withdrawn],
            (Self::Open, Standing::Admin) => all_except(self, &[Self::Withdrawn]),
            (Self::Withdrawn, Standing::Admin) => all_except(self, &[Self::Open]),
            (Self::Suspended | Self::Closed, Standing::Admin) => all_except(self, &[]),
            _ => Vec::new(),
        }
    }
}

impl Transitionable for BidStatus {
    const KIND: EntityKind = EntityKind::Bid;
    const STATUSES: &'static [Self] = Self::ALL;

    fn table(self, standing: Standing) -> Vec<Self> {
        match (self, standing) {
            (Self::Pending, Standing::Owner) => vec![Self::Withdrawn],
            (Self::Pending | Self::Withdrawn, Standing::Admin) => vec![Self::Suspended],
            _ => Vec::new(),
        }
    }
}

impl Transitionable for AskStatus {
    const KIND: EntityKind = EntityKind::Ask;
    const STATUSES: &'static [Self] = Self::ALL;

    fn table(self, standing: Standing) -> Vec<Self> {
        match (self, standing) {
            (Self::Active, Standing::Owner) => vec![Self::Withdrawn],
            (Self::Active | Self::Withdrawn, Standing::Admin) => vec![Self::Suspended],
            (Self::Suspended, Standing::Admin) => vec![Self::Active],
            _ => Vec::new(),
        }
    }
}

impl Transitionable for InstrumentStatus {
    const KIND: EntityKind = EntityKind::Instrument;
    const STATUSES: &'static [Self] = Self::ALL;

    fn table(self, standing: Standing) -> Vec<Self> {
        match (self, standing) {
            (Self::Draft, Standing::Owner | Standing::Admin) => vec![Self::PendingApproval],
            (Self::PendingApproval, Standing::Admin) => vec![Self::Rejected, Self::Active],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{UserId, UserRole};

    /// Checks every (status, standing) pair against an explicit expectation
    /// table. Pairs missing from `expected` must yield no targets.
    fn assert_table<S: Transitionable>(expected: &[(S, Standing, Vec<S>)]) {
        for &current in S::STATUSES {
            for &standing in Standing::ALL {
                let mut want: Vec<S> = expected
                    .iter()
                    .find(|(status, who, _)| *status == current && *who == standing)
                    .map(|(_, _, targets)| targets.clone())
                    .unwrap_or_default();
                let mut got = TransitionPolicy::allowed_targets(current, standing);
                let key = |s: &S| s.to_string();
                want.sort_by_key(key);
                got.sort_by_key(key);
                assert_eq!(
                    got, want,
                    "{} {current} as {standing}",
                    S::KIND
                );
            }
        }
    }

    mod tables {
        use super::*;

        #[test]
        fn listing_table_is_exact() {
            use ListingStatus::*;
            assert_table(&[
                (Open, Standing::Owner, vec![Withdrawn]),
                (Open, Standing::Admin, vec![Suspended, Closed]),
                (Withdrawn, Standing::Admin, vec![Suspended, Closed]),
                (Suspended, Standing::Admin, vec![Open, Withdrawn, Closed]),
                (Closed, Standing::Admin, vec![Open, Withdrawn, Suspended]),
            ]);
        }

        #[test]
        fn bid_table_is_exact() {
            use BidStatus::*;
            assert_table(&[
                (Pending, Standing::Owner, vec![Withdrawn]),
                (Pending, Standing::Admin, vec![Suspended]),
                (Withdrawn, Standing::Admin, vec![Suspended]),
            ]);
        }

        #[test]
        fn ask_table_is_exact() {
            use AskStatus::*;
            assert_table(&[
                (Active, Standing::Owner, vec![Withdrawn]),
                (Active, Standing::Admin, vec![Suspended]),
                (Withdrawn, Standing::Admin, vec![Suspended]),
                (Suspended, Standing::Admin, vec![Active]),
            ]);
        }

        #[test]
        fn instrument_table_is_exact() {
            use InstrumentStatus::*;
            assert_table(&[
                (Draft, Standing::Owner, vec![PendingApproval]),
                (Draft, Standing::Admin, vec![PendingApproval]),
                (PendingApproval, Standing::Admin, vec![Rejected, Active]),
            ]);
        }
    }

    mod evaluation {
        use super::*;

        #[test]
        fn same_status_is_unchanged_for_everyone() {
            for &standing in Standing::ALL {
                for &status in BidStatus::ALL {
                    assert_eq!(
                        TransitionPolicy::evaluate(status, status, standing),
                        Verdict::Unchanged
                    );
                    assert!(TransitionPolicy::permits(status, status, standing));
                }
                for &status in InstrumentStatus::ALL {
                    assert!(TransitionPolicy::permits(status, status, standing));
                }
            }
        }

        #[test]
        fn outsider_is_always_denied() {
            for &current in ListingStatus::ALL {
                for &target in ListingStatus::ALL {
                    if current != target {
                        assert_eq!(
                            TransitionPolicy::evaluate(current, target, Standing::Outsider),
                            Verdict::Denied
                        );
                    }
                }
            }
        }

        #[test]
        fn issuer_cannot_approve_own_instrument() {
            assert_eq!(
                TransitionPolicy::evaluate(
                    InstrumentStatus::PendingApproval,
                    InstrumentStatus::Active,
                    Standing::Owner
                ),
                Verdict::Denied
            );
        }

        #[test]
        fn authorize_reports_forbidden_with_entity() {
            let id = crate::domain::value_objects::BidId::new_v4();
            let err = TransitionPolicy::authorize(
                BidStatus::Selected,
                BidStatus::Pending,
                Standing::Admin,
                id,
            )
            .unwrap_err();
            assert!(matches!(
                err,
                DomainError::Forbidden { entity: EntityKind::Bid, id: got, .. } if got == id.get()
            ));
        }

        #[test]
        fn admin_cannot_reopen_withdrawn_listing() {
            assert!(!TransitionPolicy::permits(
                ListingStatus::Withdrawn,
                ListingStatus::Open,
                Standing::Admin
            ));
        }
    }

    mod standing {
        use super::*;

        #[test]
        fn owner_takes_precedence_over_admin() {
            let company = CompanyId::new_v4();
            let admin = Actor::new(UserId::new_v4(), company, UserRole::Admin);
            assert_eq!(Standing::resolve(&admin, company), Standing::Owner);
        }

        #[test]
        fn foreign_admin_is_admin() {
            let admin = Actor::new(UserId::new_v4(), CompanyId::new_v4(), UserRole::Admin);
            assert_eq!(Standing::resolve(&admin, CompanyId::new_v4()), Standing::Admin);
        }

        #[test]
        fn foreign_non_admin_is_outsider() {
            for role in [UserRole::Buyer, UserRole::Seller, UserRole::Issuer] {
                let actor = Actor::new(UserId::new_v4(), CompanyId::new_v4(), role);
                assert_eq!(
                    Standing::resolve(&actor, CompanyId::new_v4()),
                    Standing::Outsider
                );
            }
        }
    }
}
