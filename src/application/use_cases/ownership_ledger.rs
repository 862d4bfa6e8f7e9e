//! # Ownership Ledger
//!
//! Append-only ownership history per instrument.
//!
//! At most one row per instrument is active at any time. Issuance records the
//! first owner; a transfer relinquishes the active row and opens the next one
//! at the same instant in a single repository write. Mutations hold the
//! instrument scope lock.

use crate::application::clock::Clock;
use crate::application::error::ApplicationResult;
use crate::application::ports::{EventPublisher, dispatch};
use crate::domain::entities::InstrumentOwnership;
use crate::domain::errors::DomainError;
use crate::domain::events::{MarketEvent, MarketEventBody};
use crate::domain::value_objects::{AcquisitionReason, CompanyId, InstrumentId};
use crate::infrastructure::persistence::{OwnershipRepository, ScopeLocks};
use std::sync::Arc;
use tracing::{debug, info};

/// Records and answers who owns an instrument.
#[derive(Debug, Clone)]
pub struct OwnershipLedger {
    ownerships: Arc<dyn OwnershipRepository>,
    locks: Arc<dyn ScopeLocks>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventPublisher>,
}

impl OwnershipLedger {
    /// Creates a ledger over the given collaborators.
    #[must_use]
    pub fn new(
        ownerships: Arc<dyn OwnershipRepository>,
        locks: Arc<dyn ScopeLocks>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            ownerships,
            locks,
            clock,
            events,
        }
    }

    /// Records the first owner of an instrument.
    ///
    /// # Errors
    ///
    /// - [`DomainError::AlreadyOwned`] if the instrument already has an active owner
    /// - repository errors
    pub async fn record_issuance(
        &self,
        instrument_id: InstrumentId,
        owner_id: CompanyId,
    ) -> ApplicationResult<InstrumentOwnership> {
        debug!(%instrument_id, %owner_id, "recording issuance");

        let guard = self.locks.instrument(instrument_id).await;
        if let Some(active) = self.ownerships.find_active(&instrument_id).await? {
            return Err(DomainError::AlreadyOwned {
                instrument_id,
                owner_id: active.owner_id(),
            }
            .into());
        }

        let now = self.clock.now();
        let row = InstrumentOwnership::issue(instrument_id, owner_id, now);
        self.ownerships.insert(&row).await?;
        drop(guard);

        info!(%instrument_id, %owner_id, ownership_id = %row.id(), "ownership issued");
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::OwnershipIssued {
                    instrument_id,
                    ownership_id: row.id(),
                    owner_id,
                },
                now,
            )],
        );
        Ok(row)
    }

    /// Moves ownership from `from_owner_id` to `to_owner_id`.
    ///
    /// Returns the newly opened row. Not idempotent: repeating a completed
    /// transfer fails with [`DomainError::NotOwner`].
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidTransferReason`] for [`AcquisitionReason::Issuance`]
    /// - [`DomainError::NotOwner`] if `from_owner_id` does not hold the active row
    /// - [`DomainError::AlreadyOwned`] if `to_owner_id` already holds it
    /// - repository errors
    pub async fn transfer(
        &self,
        instrument_id: InstrumentId,
        from_owner_id: CompanyId,
        to_owner_id: CompanyId,
        reason: AcquisitionReason,
    ) -> ApplicationResult<InstrumentOwnership> {
        debug!(%instrument_id, from = %from_owner_id, to = %to_owner_id, %reason, "transferring ownership");

        if reason == AcquisitionReason::Issuance {
            return Err(DomainError::InvalidTransferReason(reason).into());
        }

        let guard = self.locks.instrument(instrument_id).await;
        let active = match self.ownerships.find_active(&instrument_id).await? {
            Some(row) if row.owner_id() == from_owner_id => row,
            _ => {
                return Err(DomainError::NotOwner {
                    instrument_id,
                    company_id: from_owner_id,
                }
                .into());
            }
        };
        if to_owner_id == active.owner_id() {
            return Err(DomainError::AlreadyOwned {
                instrument_id,
                owner_id: to_owner_id,
            }
            .into());
        }

        let now = self.clock.now();
        let mut closing = active;
        closing.relinquish(now)?;
        let opened = InstrumentOwnership::acquire(instrument_id, to_owner_id, now, reason);
        self.ownerships.transfer(&closing, &opened).await?;
        drop(guard);

        info!(
            %instrument_id,
            from = %from_owner_id,
            to = %to_owner_id,
            ownership_id = %opened.id(),
            "ownership transferred"
        );
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::OwnershipTransferred {
                    instrument_id,
                    ownership_id: opened.id(),
                    from_owner_id,
                    to_owner_id,
                    reason,
                },
                now,
            )],
        );
        Ok(opened)
    }

    /// Returns the active ownership row, if any.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn current_owner(
        &self,
        instrument_id: InstrumentId,
    ) -> ApplicationResult<Option<InstrumentOwnership>> {
        Ok(self.ownerships.find_active(&instrument_id).await?)
    }

    /// Returns every row of the instrument, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn history(
        &self,
        instrument_id: InstrumentId,
    ) -> ApplicationResult<Vec<InstrumentOwnership>> {
        Ok(self.ownerships.history(&instrument_id).await?)
    }

    /// Returns the active rows held by a company.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn holdings(&self, owner_id: CompanyId) -> ApplicationResult<Vec<InstrumentOwnership>> {
        Ok(self.ownerships.find_active_by_owner(&owner_id).await?)
    }
}
