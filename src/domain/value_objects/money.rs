//! # Money Value Objects
//!
//! Validated monetary primitives for bids, asks and instrument terms.
//!
//! - [`Amount`]: strictly positive decimal amount
//! - [`Currency`]: three-letter ISO-4217 style currency code
//!
//! # Examples
//!
//! ```
//! use instrument_market::domain::value_objects::money::{Amount, Currency};
//! use rust_decimal::Decimal;
//!
//! let amount = Amount::new(Decimal::new(1_000_000, 2)).unwrap();
//! let currency = Currency::new("usd").unwrap();
//! assert_eq!(currency.as_str(), "USD");
//! assert_eq!(amount.to_string(), "10000.00");
//!
//! assert!(Amount::new(Decimal::ZERO).is_err());
//! assert!(Currency::new("US").is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A strictly positive monetary amount.
///
/// # Invariants
///
/// - Amount is always > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new amount.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] if `value` is zero or negative.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount(format!(
                "amount must be positive, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Returns the inner decimal value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three-letter upper-case currency code (e.g. `USD`, `EUR`).
///
/// Lower-case input is normalized to upper case. Anything that is not exactly
/// three ASCII letters is rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Creates a currency code.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCurrency`] unless `code` is three ASCII letters.
    pub fn new(code: &str) -> DomainResult<Self> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCurrency(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    mod amount {
        use super::*;

        #[test]
        fn accepts_positive() {
            assert_eq!(Amount::new(dec!(0.01)).unwrap().get(), dec!(0.01));
        }

        #[test]
        fn rejects_zero_and_negative() {
            assert!(matches!(
                Amount::new(Decimal::ZERO),
                Err(DomainError::InvalidAmount(_))
            ));
            assert!(matches!(
                Amount::new(dec!(-5)),
                Err(DomainError::InvalidAmount(_))
            ));
        }

        #[test]
        fn deserialization_validates() {
            let ok: Amount = serde_json::from_str("\"10000\"").unwrap();
            assert_eq!(ok.get(), dec!(10000));
            assert!(serde_json::from_str::<Amount>("\"0\"").is_err());
        }
    }

    mod currency {
        use super::*;

        #[test]
        fn normalizes_case() {
            assert_eq!(Currency::new("eur").unwrap().as_str(), "EUR");
        }

        #[test]
        fn rejects_malformed_codes() {
            for bad in ["", "US", "USDT", "U5D", "€€€"] {
                assert!(
                    matches!(Currency::new(bad), Err(DomainError::InvalidCurrency(_))),
                    "{bad} should be rejected"
                );
            }
        }

        #[test]
        fn serde_uses_plain_string() {
            let usd: Currency = "USD".parse().unwrap();
            assert_eq!(serde_json::to_string(&usd).unwrap(), "\"USD\"");
            assert!(serde_json::from_str::<Currency>("\"dollars\"").is_err());
        }
    }
}
