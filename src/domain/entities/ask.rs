//! # Ask Entity
//!
//! The seller's asking price on its own listing.
//!
//! Only the listing's seller may place asks. While an ask is `ACTIVE` its
//! amount, currency and validity deadline can be revised. Execution mode and
//! the binding flag are stored for downstream settlement and never interpreted
//! here.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    Actor, Amount, AskId, AskStatus, CompanyId, Currency, ExecutionMode, ListingId, Timestamp,
    UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Validated terms of a new ask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskTerms {
    /// Asking amount.
    pub amount: Amount,
    /// Currency of the amount.
    pub currency: Currency,
    /// Optional validity deadline.
    pub valid_until: Option<Timestamp>,
    /// Execution mode.
    pub execution_mode: ExecutionMode,
    /// Whether the ask is binding.
    pub binding: bool,
}

/// Partial revision of an active ask. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskUpdate {
    /// New amount; must be positive.
    pub amount: Option<Decimal>,
    /// New currency.
    pub currency: Option<Currency>,
    /// New validity deadline; must be in the future.
    pub valid_until: Option<Timestamp>,
}

/// An ask on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ask {
    id: AskId,
    listing_id: ListingId,
    asker_company_id: CompanyId,
    asker_user_id: UserId,
    amount: Amount,
    currency: Currency,
    valid_until: Option<Timestamp>,
    execution_mode: ExecutionMode,
    binding: bool,
    status: AskStatus,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
    deleted_at: Option<Timestamp>,
}

impl Ask {
    /// Places an active ask on behalf of the actor's company.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValidity`] if `valid_until` is not after `now`.
    pub fn place(
        listing_id: ListingId,
        asker: &Actor,
        terms: AskTerms,
        now: Timestamp,
    ) -> DomainResult<Self> {
        if let Some(valid_until) = terms.valid_until {
            ensure_valid_until(valid_until, now)?;
        }
        Ok(Self {
            id: AskId::new_v4(),
            listing_id,
            asker_company_id: asker.company_id,
            asker_user_id: asker.user_id,
            amount: terms.amount,
            currency: terms.currency,
            valid_until: terms.valid_until,
            execution_mode: terms.execution_mode,
            binding: terms.binding,
            status: AskStatus::Active,
            version: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    // ========== Accessors ==========

    /// Returns the ask ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> AskId {
        self.id
    }

    /// Returns the listing the ask belongs to.
    #[inline]
    #[must_use]
    pub fn listing_id(&self) -> ListingId {
        self.listing_id
    }

    /// Returns the asking company (the listing's seller).
    #[inline]
    #[must_use]
    pub fn asker_company_id(&self) -> CompanyId {
        self.asker_company_id
    }

    /// Returns the user who placed the ask.
    #[inline]
    #[must_use]
    pub fn asker_user_id(&self) -> UserId {
        self.asker_user_id
    }

    /// Returns the asking amount.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the currency of the amount.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Returns the validity deadline, if any.
    #[inline]
    #[must_use]
    pub fn valid_until(&self) -> Option<Timestamp> {
        self.valid_until
    }

    /// Returns the execution mode.
    #[inline]
    #[must_use]
    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution_mode
    }

    /// Returns true if the ask is binding.
    #[inline]
    #[must_use]
    pub fn is_binding(&self) -> bool {
        self.binding
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> AskStatus {
        self.status
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the ask was placed.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the ask was last changed.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns the tombstone timestamp, if soft-deleted.
    #[inline]
    #[must_use]
    pub fn deleted_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    /// Returns true if the ask has been soft-deleted.
    #[inline]
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true if the ask is live.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    // ========== Mutations ==========

    /// Revises amount, currency and validity.
    ///
    /// All fields are validated before any is written.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotActive`] unless the ask is active
    /// - [`DomainError::InvalidAmount`] for a non-positive amount
    /// - [`DomainError::InvalidValidity`] for a deadline not after `now`
    pub fn apply_update(&mut self, update: AskUpdate, now: Timestamp) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::NotActive {
                ask_id: self.id,
                status: self.status,
            });
        }

        let amount = update.amount.map(Amount::new).transpose()?;
        if let Some(valid_until) = update.valid_until {
            ensure_valid_until(valid_until, now)?;
        }

        if let Some(amount) = amount {
            self.amount = amount;
        }
        if let Some(currency) = update.currency {
            self.currency = currency;
        }
        if let Some(valid_until) = update.valid_until {
            self.valid_until = Some(valid_until);
        }
        self.touch(now);
        Ok(())
    }

    /// Sets the status. Callers authorize the move first.
    pub(crate) fn set_status(&mut self, target: AskStatus, now: Timestamp) {
        self.status = target;
        self.touch(now);
    }

    /// Soft-deletes the ask.
    pub fn tombstone(&mut self, now: Timestamp) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(now);
            self.touch(now);
        }
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
        self.version = self.version.saturating_add(1);
    }
}

fn ensure_valid_until(valid_until: Timestamp, now: Timestamp) -> DomainResult<()> {
    if valid_until <= now {
        return Err(DomainError::InvalidValidity { valid_until, now });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::UserRole;
    use rust_decimal_macros::dec;

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    fn terms(valid_until: Option<Timestamp>) -> AskTerms {
        AskTerms {
            amount: Amount::new(dec!(12000)).unwrap(),
            currency: Currency::new("USD").unwrap(),
            valid_until,
            execution_mode: ExecutionMode::default(),
            binding: false,
        }
    }

    fn seller() -> Actor {
        Actor::new(UserId::new_v4(), CompanyId::new_v4(), UserRole::Seller)
    }

    mod placement {
        use super::*;

        #[test]
        fn defaults_to_manual_non_binding() {
            let ask = Ask::place(ListingId::new_v4(), &seller(), terms(None), now()).unwrap();
            assert!(ask.is_active());
            assert_eq!(ask.execution_mode(), ExecutionMode::Manual);
            assert!(!ask.is_binding());
        }

        #[test]
        fn rejects_deadline_in_the_past() {
            let result = Ask::place(
                ListingId::new_v4(),
                &seller(),
                terms(Some(now().add_secs(-1))),
                now(),
            );
            assert!(matches!(result, Err(DomainError::InvalidValidity { .. })));
        }

        #[test]
        fn rejects_deadline_equal_to_now() {
            let result = Ask::place(ListingId::new_v4(), &seller(), terms(Some(now())), now());
            assert!(matches!(result, Err(DomainError::InvalidValidity { .. })));
        }
    }

    mod updates {
        use super::*;

        #[test]
        fn revises_amount_and_deadline() {
            let mut ask = Ask::place(ListingId::new_v4(), &seller(), terms(None), now()).unwrap();
            let deadline = now().add_secs(3600);
            ask.apply_update(
                AskUpdate {
                    amount: Some(dec!(11500)),
                    currency: None,
                    valid_until: Some(deadline),
                },
                now(),
            )
            .unwrap();

            assert_eq!(ask.amount().get(), dec!(11500));
            assert_eq!(ask.valid_until(), Some(deadline));
            assert_eq!(ask.currency().as_str(), "USD");
            assert_eq!(ask.version(), 2);
        }

        #[test]
        fn suspended_ask_is_not_editable() {
            let mut ask = Ask::place(ListingId::new_v4(), &seller(), terms(None), now()).unwrap();
            ask.set_status(AskStatus::Suspended, now());
            let result = ask.apply_update(AskUpdate::default(), now());
            assert!(matches!(
                result,
                Err(DomainError::NotActive {
                    status: AskStatus::Suspended,
                    ..
                })
            ));
        }

        #[test]
        fn zero_amount_is_rejected_without_side_effects() {
            let mut ask = Ask::place(ListingId::new_v4(), &seller(), terms(None), now()).unwrap();
            let before = ask.clone();
            let result = ask.apply_update(
                AskUpdate {
                    amount: Some(Decimal::ZERO),
                    ..AskUpdate::default()
                },
                now(),
            );
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
            assert_eq!(ask, before);
        }
    }
}
