//! # Actor
//!
//! The authenticated principal on whose behalf an operation runs.
//!
//! Identity is verified upstream; the engine only reads the user, the company
//! the user acts for, and the user's role.

use super::enums::UserRole;
use super::ids::{CompanyId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An already-verified user acting for a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user.
    pub user_id: UserId,
    /// The company the user belongs to.
    pub company_id: CompanyId,
    /// The user's role.
    pub role: UserRole,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(user_id: UserId, company_id: CompanyId, role: UserRole) -> Self {
        Self {
            user_id,
            company_id,
            role,
        }
    }

    /// Returns true if the actor's company is `company_id`.
    #[inline]
    #[must_use]
    pub fn acts_for(&self, company_id: CompanyId) -> bool {
        self.company_id == company_id
    }

    /// Returns true if the actor holds the administrator role.
    #[inline]
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.user_id, self.company_id, self.role)
    }
}
