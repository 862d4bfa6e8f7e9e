//! # Application Errors
//!
//! Error types for the application layer.
//!
//! A lifecycle operation fails either because a domain rule rejected it or
//! because the repository refused the write. Both are returned unchanged to
//! the caller; the engine never retries.

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain rule rejected the operation.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The repository refused or failed the operation.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ApplicationError {
    /// Returns the domain error, if this is one.
    #[must_use]
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(err) => Some(err),
            Self::Repository(_) => None,
        }
    }

    /// Returns the numeric error code.
    ///
    /// Domain errors keep their own code; repository failures map into 5000s.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::Domain(err) => err.code(),
            Self::Repository(RepositoryError::NotFound { .. }) => 5001,
            Self::Repository(RepositoryError::VersionConflict { .. }) => 5002,
            Self::Repository(RepositoryError::Constraint { .. }) => 5003,
        }
    }

    /// Returns true if the write lost a compare-and-swap race.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_version_conflict())
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{EntityKind, ListingId};

    #[test]
    fn domain_errors_keep_their_code() {
        let err: ApplicationError =
            DomainError::not_found(EntityKind::Listing, ListingId::new_v4()).into();
        assert_eq!(err.code(), 4001);
        assert!(err.domain().is_some());
    }

    #[test]
    fn repository_errors_map_to_5000s() {
        let err: ApplicationError =
            RepositoryError::version_conflict("Bid", ListingId::new_v4(), 2, 3).into();
        assert_eq!(err.code(), 5002);
        assert!(err.is_version_conflict());
        assert!(err.domain().is_none());
        assert!(err.to_string().contains("repository error"));
    }
}
