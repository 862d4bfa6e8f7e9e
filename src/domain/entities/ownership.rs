//! # Instrument Ownership
//!
//! One row of the append-only ownership ledger.
//!
//! A row records that a company held an instrument from `acquired_at` until
//! `relinquished_at`. A row without `relinquished_at` is the active owner.
//! Rows are never edited except to set `relinquished_at`, exactly once.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    AcquisitionReason, CompanyId, InstrumentId, OwnershipId, Timestamp,
};
use serde::{Deserialize, Serialize};

/// A ledger row recording one holding period of an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentOwnership {
    id: OwnershipId,
    instrument_id: InstrumentId,
    owner_id: CompanyId,
    acquired_at: Timestamp,
    relinquished_at: Option<Timestamp>,
    acquisition_reason: AcquisitionReason,
}

impl InstrumentOwnership {
    /// Records the first owner of a newly issued instrument.
    #[must_use]
    pub fn issue(instrument_id: InstrumentId, owner_id: CompanyId, at: Timestamp) -> Self {
        Self::acquire(instrument_id, owner_id, at, AcquisitionReason::Issuance)
    }

    /// Records an acquisition for the given reason.
    #[must_use]
    pub fn acquire(
        instrument_id: InstrumentId,
        owner_id: CompanyId,
        at: Timestamp,
        reason: AcquisitionReason,
    ) -> Self {
        Self {
            id: OwnershipId::new_v4(),
            instrument_id,
            owner_id,
            acquired_at: at,
            relinquished_at: None,
            acquisition_reason: reason,
        }
    }

    /// Returns the row ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> OwnershipId {
        self.id
    }

    /// Returns the instrument.
    #[inline]
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    /// Returns the owning company.
    #[inline]
    #[must_use]
    pub fn owner_id(&self) -> CompanyId {
        self.owner_id
    }

    /// Returns when the holding period started.
    #[inline]
    #[must_use]
    pub fn acquired_at(&self) -> Timestamp {
        self.acquired_at
    }

    /// Returns when the holding period ended, if it has.
    #[inline]
    #[must_use]
    pub fn relinquished_at(&self) -> Option<Timestamp> {
        self.relinquished_at
    }

    /// Returns why the instrument was acquired.
    #[inline]
    #[must_use]
    pub fn acquisition_reason(&self) -> AcquisitionReason {
        self.acquisition_reason
    }

    /// Returns true for the current owner's row.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.relinquished_at.is_none()
    }

    /// Ends the holding period at `at`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotOwner`] if the row was already relinquished.
    pub fn relinquish(&mut self, at: Timestamp) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::NotOwner {
                instrument_id: self.instrument_id,
                company_id: self.owner_id,
            });
        }
        self.relinquished_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000 + secs).unwrap()
    }

    #[test]
    fn issuance_row_is_active() {
        let row = InstrumentOwnership::issue(InstrumentId::new_v4(), CompanyId::new_v4(), at(0));
        assert!(row.is_active());
        assert_eq!(row.acquisition_reason(), AcquisitionReason::Issuance);
        assert_eq!(row.acquired_at(), at(0));
    }

    #[test]
    fn relinquish_sets_end_once() {
        let mut row = InstrumentOwnership::acquire(
            InstrumentId::new_v4(),
            CompanyId::new_v4(),
            at(0),
            AcquisitionReason::Trade,
        );
        row.relinquish(at(10)).unwrap();
        assert_eq!(row.relinquished_at(), Some(at(10)));

        let err = row.relinquish(at(20)).unwrap_err();
        assert!(matches!(err, DomainError::NotOwner { .. }));
        assert_eq!(row.relinquished_at(), Some(at(10)));
    }
}
