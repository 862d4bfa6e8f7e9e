//! # Instrument Lifecycle
//!
//! Drafting instruments, editing drafts, and moving them through approval.
//!
//! Entering `ACTIVE` sets the maturity status to `DUE` in the same write.
//! Recording the issuer as first owner is left to the caller, see
//! [`Marketplace::transition_instrument`].
//!
//! [`Marketplace::transition_instrument`]: crate::application::use_cases::Marketplace::transition_instrument

use crate::application::clock::Clock;
use crate::application::dto::InstrumentTransition;
use crate::application::error::ApplicationResult;
use crate::application::ports::{EventPublisher, dispatch};
use crate::domain::entities::{DraftUpdate, Instrument, InstrumentFilter, InstrumentTerms};
use crate::domain::errors::DomainError;
use crate::domain::events::{MarketEvent, MarketEventBody};
use crate::domain::services::{Standing, TransitionPolicy};
use crate::domain::value_objects::{Actor, CompanyId, EntityKind, InstrumentId, InstrumentStatus};
use crate::infrastructure::persistence::{InstrumentRepository, ScopeLocks};
use std::sync::Arc;
use tracing::{debug, info};

/// Drafts, edits and transitions instruments.
#[derive(Debug, Clone)]
pub struct InstrumentLifecycle {
    instruments: Arc<dyn InstrumentRepository>,
    locks: Arc<dyn ScopeLocks>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventPublisher>,
}

impl InstrumentLifecycle {
    /// Creates the lifecycle over the given collaborators.
    #[must_use]
    pub fn new(
        instruments: Arc<dyn InstrumentRepository>,
        locks: Arc<dyn ScopeLocks>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            instruments,
            locks,
            clock,
            events,
        }
    }

    /// Drafts an instrument issued by the actor's company.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidAmount`] if face value or maturity payment is not positive
    /// - [`DomainError::InvalidDate`] if the maturity date is not after today
    /// - repository errors
    pub async fn create_draft(
        &self,
        actor: &Actor,
        terms: InstrumentTerms,
    ) -> ApplicationResult<Instrument> {
        debug!(%actor, name = %terms.name, "drafting instrument");

        let now = self.clock.now();
        let instrument = Instrument::draft(terms, actor.company_id, actor.user_id, now)?;
        self.instruments.save(&instrument).await?;

        info!(instrument_id = %instrument.id(), issuer_id = %instrument.issuer_id(), "instrument drafted");
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::InstrumentCreated {
                    instrument_id: instrument.id(),
                    issuer_id: instrument.issuer_id(),
                },
                now,
            )],
        );
        Ok(instrument)
    }

    /// Edits the terms of a draft on behalf of the issuer.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if the instrument does not exist
    /// - [`DomainError::NotEditable`] once the instrument has left `DRAFT`
    /// - [`DomainError::Forbidden`] unless the actor's company is the issuer
    /// - [`DomainError::InvalidAmount`] or [`DomainError::InvalidDate`] for bad values
    /// - repository errors
    pub async fn update_draft(
        &self,
        instrument_id: InstrumentId,
        actor: &Actor,
        update: DraftUpdate,
    ) -> ApplicationResult<Instrument> {
        debug!(%instrument_id, %actor, "editing draft");

        let guard = self.locks.instrument(instrument_id).await;
        let mut instrument = self.require(instrument_id).await?;
        if !instrument.is_editable() {
            return Err(DomainError::NotEditable {
                instrument_id,
                status: instrument.instrument_status(),
            }
            .into());
        }
        if !actor.acts_for(instrument.issuer_id()) {
            return Err(DomainError::forbidden(
                EntityKind::Instrument,
                instrument_id,
                "only the issuer may edit a draft",
            )
            .into());
        }
        if update.is_empty() {
            return Ok(instrument);
        }

        let now = self.clock.now();
        instrument.apply_draft_update(update, now)?;
        self.instruments.save(&instrument).await?;
        drop(guard);

        info!(%instrument_id, version = instrument.version(), "draft updated");
        Ok(instrument)
    }

    /// Moves an instrument to `target`.
    ///
    /// Requesting the current status succeeds without writing.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if the instrument does not exist
    /// - [`DomainError::Forbidden`] if the actor may not make the move
    /// - repository errors
    pub async fn transition(
        &self,
        instrument_id: InstrumentId,
        target: InstrumentStatus,
        actor: &Actor,
    ) -> ApplicationResult<InstrumentTransition> {
        debug!(%instrument_id, %target, %actor, "transitioning instrument");

        let guard = self.locks.instrument(instrument_id).await;
        let mut instrument = self.require(instrument_id).await?;
        let from = instrument.instrument_status();
        if from == target {
            return Ok(InstrumentTransition {
                instrument,
                previous_status: from,
            });
        }

        let standing = Standing::resolve(actor, instrument.issuer_id());
        TransitionPolicy::authorize(from, target, standing, instrument_id)?;

        let now = self.clock.now();
        instrument.move_to(target, now);
        self.instruments.save(&instrument).await?;
        drop(guard);

        info!(
            %instrument_id,
            %from,
            to = %target,
            maturity_status = %instrument.maturity_status(),
            %standing,
            "instrument status changed"
        );
        dispatch(
            self.events.as_ref(),
            vec![MarketEvent::new(
                MarketEventBody::InstrumentStatusChanged {
                    instrument_id,
                    from,
                    to: target,
                    maturity_status: instrument.maturity_status(),
                },
                now,
            )],
        );
        Ok(InstrumentTransition {
            instrument,
            previous_status: from,
        })
    }

    /// Returns an instrument by ID.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn get(&self, instrument_id: InstrumentId) -> ApplicationResult<Option<Instrument>> {
        Ok(self.instruments.get(&instrument_id).await?)
    }

    /// Returns the instruments issued by a company, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn issued_by(&self, issuer_id: CompanyId) -> ApplicationResult<Vec<Instrument>> {
        Ok(self.instruments.find_by_issuer(&issuer_id).await?)
    }

    /// Returns the instruments matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn search(&self, filter: &InstrumentFilter) -> ApplicationResult<Vec<Instrument>> {
        Ok(self.instruments.find(filter).await?)
    }

    async fn require(&self, instrument_id: InstrumentId) -> ApplicationResult<Instrument> {
        self.instruments
            .get(&instrument_id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Instrument, instrument_id).into())
    }
}
