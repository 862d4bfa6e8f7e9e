//! # Instrument Aggregate
//!
//! A debt instrument issued by a company.
//!
//! An instrument is created in `DRAFT` by a user of the issuing company, and
//! its terms can be edited only while it stays in `DRAFT`. Approval moves it
//! through `PENDING_APPROVAL` to `ACTIVE` or `REJECTED`. Entering `ACTIVE` sets
//! the maturity status to `DUE` in the same mutation.
//!
//! # Examples
//!
//! ```
//! use instrument_market::domain::entities::instrument::{Instrument, InstrumentTerms};
//! use instrument_market::domain::value_objects::{CompanyId, Currency, Timestamp, UserId};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let now = Timestamp::from_unix_secs(1_700_000_000).unwrap();
//! let terms = InstrumentTerms {
//!     name: "Receivable 2031".to_string(),
//!     face_value: Decimal::new(100_000, 0),
//!     currency: Currency::new("USD").unwrap(),
//!     maturity_date: NaiveDate::from_ymd_opt(2031, 6, 30).unwrap(),
//!     maturity_payment: Decimal::new(105_000, 0),
//!     public_payload: None,
//! };
//!
//! let instrument = Instrument::draft(terms, CompanyId::new_v4(), UserId::new_v4(), now).unwrap();
//! assert!(instrument.is_editable());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    Amount, CompanyId, Currency, InstrumentId, InstrumentStatus, MaturityStatus, Timestamp,
    TradingStatus, UserId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Terms supplied when drafting a new instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentTerms {
    /// Display name.
    pub name: String,
    /// Nominal value; must be positive.
    pub face_value: Decimal,
    /// Denomination currency.
    pub currency: Currency,
    /// Maturity date; must be after the current date.
    pub maturity_date: NaiveDate,
    /// Amount repaid at maturity; must be positive.
    pub maturity_payment: Decimal,
    /// Opaque public metadata.
    pub public_payload: Option<serde_json::Value>,
}

/// Partial update of draft terms. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New nominal value.
    pub face_value: Option<Decimal>,
    /// New currency.
    pub currency: Option<Currency>,
    /// New maturity date.
    pub maturity_date: Option<NaiveDate>,
    /// New maturity payment.
    pub maturity_payment: Option<Decimal>,
    /// New public metadata.
    pub public_payload: Option<serde_json::Value>,
}

impl DraftUpdate {
    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.face_value.is_none()
            && self.currency.is_none()
            && self.maturity_date.is_none()
            && self.maturity_payment.is_none()
            && self.public_payload.is_none()
    }
}

/// A debt instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    id: InstrumentId,
    issuer_id: CompanyId,
    created_by: UserId,
    name: String,
    face_value: Amount,
    currency: Currency,
    maturity_date: NaiveDate,
    maturity_payment: Amount,
    public_payload: Option<serde_json::Value>,
    instrument_status: InstrumentStatus,
    maturity_status: MaturityStatus,
    trading_status: TradingStatus,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
    deleted_at: Option<Timestamp>,
}

impl Instrument {
    /// Drafts a new instrument for `issuer_id`.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidAmount`] if face value or maturity payment is not positive
    /// - [`DomainError::InvalidDate`] if the maturity date is not after `now`
    pub fn draft(
        terms: InstrumentTerms,
        issuer_id: CompanyId,
        created_by: UserId,
        now: Timestamp,
    ) -> DomainResult<Self> {
        let face_value = Amount::new(terms.face_value)?;
        let maturity_payment = Amount::new(terms.maturity_payment)?;
        ensure_future_date(terms.maturity_date, now)?;

        Ok(Self {
            id: InstrumentId::new_v4(),
            issuer_id,
            created_by,
            name: terms.name,
            face_value,
            currency: terms.currency,
            maturity_date: terms.maturity_date,
            maturity_payment,
            public_payload: terms.public_payload,
            instrument_status: InstrumentStatus::Draft,
            maturity_status: MaturityStatus::NotDue,
            trading_status: TradingStatus::Draft,
            version: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    // ========== Accessors ==========

    /// Returns the instrument ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> InstrumentId {
        self.id
    }

    /// Returns the issuing company.
    #[inline]
    #[must_use]
    pub fn issuer_id(&self) -> CompanyId {
        self.issuer_id
    }

    /// Returns the user who drafted the instrument.
    #[inline]
    #[must_use]
    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the face value.
    #[inline]
    #[must_use]
    pub fn face_value(&self) -> Amount {
        self.face_value
    }

    /// Returns the denomination currency.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Returns the maturity date.
    #[inline]
    #[must_use]
    pub fn maturity_date(&self) -> NaiveDate {
        self.maturity_date
    }

    /// Returns the amount due at maturity.
    #[inline]
    #[must_use]
    pub fn maturity_payment(&self) -> Amount {
        self.maturity_payment
    }

    /// Returns the opaque public metadata.
    #[inline]
    #[must_use]
    pub fn public_payload(&self) -> Option<&serde_json::Value> {
        self.public_payload.as_ref()
    }

    /// Returns the approval status.
    #[inline]
    #[must_use]
    pub fn instrument_status(&self) -> InstrumentStatus {
        self.instrument_status
    }

    /// Returns the maturity status.
    #[inline]
    #[must_use]
    pub fn maturity_status(&self) -> MaturityStatus {
        self.maturity_status
    }

    /// Returns the trading status.
    #[inline]
    #[must_use]
    pub fn trading_status(&self) -> TradingStatus {
        self.trading_status
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the instrument was drafted.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the instrument was last changed.
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

    /// Returns true while the terms may be edited.
    #[inline]
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.instrument_status.is_editable()
    }

    /// Returns true if the instrument has been soft-deleted.
    #[inline]
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    // ========== Mutations ==========

    /// Applies a partial update of the draft terms.
    ///
    /// All fields are validated before any is written.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotEditable`] unless the instrument is in `DRAFT`
    /// - [`DomainError::InvalidAmount`] for a non-positive face value or maturity payment
    /// - [`DomainError::InvalidDate`] for a maturity date not after `now`
    pub fn apply_draft_update(&mut self, update: DraftUpdate, now: Timestamp) -> DomainResult<()> {
        if !self.is_editable() {
            return Err(DomainError::NotEditable {
                instrument_id: self.id,
                status: self.instrument_status,
            });
        }

        let face_value = update.face_value.map(Amount::new).transpose()?;
        let maturity_payment = update.maturity_payment.map(Amount::new).transpose()?;
        if let Some(date) = update.maturity_date {
            ensure_future_date(date, now)?;
        }

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(face_value) = face_value {
            self.face_value = face_value;
        }
        if let Some(currency) = update.currency {
            self.currency = currency;
        }
        if let Some(date) = update.maturity_date {
            self.maturity_date = date;
        }
        if let Some(maturity_payment) = maturity_payment {
            self.maturity_payment = maturity_payment;
        }
        if let Some(payload) = update.public_payload {
            self.public_payload = Some(payload);
        }
        self.touch(now);
        Ok(())
    }

    /// Moves the instrument to `target`. Callers authorize the move first.
    ///
    /// Entering `ACTIVE` also sets the maturity status to `DUE`.
    pub(crate) fn move_to(&mut self, target: InstrumentStatus, now: Timestamp) {
        self.instrument_status = target;
        if target == InstrumentStatus::Active {
            self.maturity_status = MaturityStatus::Due;
        }
        self.touch(now);
    }

    /// Soft-deletes the instrument.
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

fn ensure_future_date(date: NaiveDate, now: Timestamp) -> DomainResult<()> {
    if date <= now.date() {
        return Err(DomainError::InvalidDate(format!(
            "maturity date {date} must be after {}",
            now.date()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    fn terms() -> InstrumentTerms {
        InstrumentTerms {
            name: "Invoice 42".to_string(),
            face_value: dec!(50000),
            currency: Currency::new("EUR").unwrap(),
            maturity_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            maturity_payment: dec!(52000),
            public_payload: Some(serde_json::json!({ "sector": "logistics" })),
        }
    }

    fn draft() -> Instrument {
        Instrument::draft(terms(), CompanyId::new_v4(), UserId::new_v4(), now()).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn starts_in_draft_with_defaults() {
            let instrument = draft();
            assert_eq!(instrument.instrument_status(), InstrumentStatus::Draft);
            assert_eq!(instrument.maturity_status(), MaturityStatus::NotDue);
            assert_eq!(instrument.trading_status(), TradingStatus::Draft);
            assert_eq!(instrument.version(), 1);
            assert!(!instrument.is_deleted());
        }

        #[test]
        fn rejects_non_positive_face_value() {
            let mut t = terms();
            t.face_value = Decimal::ZERO;
            let result = Instrument::draft(t, CompanyId::new_v4(), UserId::new_v4(), now());
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
        }

        #[test]
        fn rejects_past_maturity() {
            let mut t = terms();
            t.maturity_date = now().date();
            let result = Instrument::draft(t, CompanyId::new_v4(), UserId::new_v4(), now());
            assert!(matches!(result, Err(DomainError::InvalidDate(_))));
        }
    }

    mod draft_updates {
        use super::*;

        #[test]
        fn partial_update_changes_only_given_fields() {
            let mut instrument = draft();
            let later = now().add_secs(60);
            instrument
                .apply_draft_update(
                    DraftUpdate {
                        name: Some("Invoice 43".to_string()),
                        maturity_payment: Some(dec!(53000)),
                        ..DraftUpdate::default()
                    },
                    later,
                )
                .unwrap();

            assert_eq!(instrument.name(), "Invoice 43");
            assert_eq!(instrument.maturity_payment().get(), dec!(53000));
            assert_eq!(instrument.face_value().get(), dec!(50000));
            assert_eq!(instrument.updated_at(), later);
            assert_eq!(instrument.version(), 2);
        }

        #[test]
        fn invalid_field_leaves_instrument_untouched() {
            let mut instrument = draft();
            let before = instrument.clone();
            let result = instrument.apply_draft_update(
                DraftUpdate {
                    name: Some("renamed".to_string()),
                    face_value: Some(dec!(-1)),
                    ..DraftUpdate::default()
                },
                now(),
            );
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
            assert_eq!(instrument, before);
        }

        #[test]
        fn not_editable_after_submission() {
            let mut instrument = draft();
            instrument.move_to(InstrumentStatus::PendingApproval, now());
            let result = instrument.apply_draft_update(DraftUpdate::default(), now());
            assert!(matches!(
                result,
                Err(DomainError::NotEditable {
                    status: InstrumentStatus::PendingApproval,
                    ..
                })
            ));
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn activation_sets_maturity_due_in_one_mutation() {
            let mut instrument = draft();
            instrument.move_to(InstrumentStatus::PendingApproval, now());
            let version = instrument.version();

            instrument.move_to(InstrumentStatus::Active, now());

            assert_eq!(instrument.instrument_status(), InstrumentStatus::Active);
            assert_eq!(instrument.maturity_status(), MaturityStatus::Due);
            assert_eq!(instrument.version(), version + 1);
        }

        #[test]
        fn rejection_keeps_maturity_status() {
            let mut instrument = draft();
            instrument.move_to(InstrumentStatus::Rejected, now());
            assert_eq!(instrument.maturity_status(), MaturityStatus::NotDue);
        }

        #[test]
        fn tombstone_is_set_once() {
            let mut instrument = draft();
            let first = now().add_secs(10);
            instrument.tombstone(first);
            instrument.tombstone(now().add_secs(20));
            assert_eq!(instrument.deleted_at(), Some(first));
        }
    }
}
