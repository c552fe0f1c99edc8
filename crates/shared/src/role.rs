//! User roles and authorization predicates.
//!
//! The caller's identity layer resolves the requesting user to a role string;
//! the core trusts that resolution and applies the predicates below inline
//! before mutating state.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Company-scoped user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Senior accountant: all ledger operations including period close.
    SeniorAccountant,
    /// Accountant: day-to-day posting.
    Accountant,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// Parses a role from the string form stored by the identity layer.
    #[must_use]
    pub fn parse(role: &str) -> Option<Self> {
        match role.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "senior_accountant" => Some(Self::SeniorAccountant),
            "accountant" => Some(Self::Accountant),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Returns true if this role may create or delete ledger postings.
    #[must_use]
    pub const fn can_post(self) -> bool {
        matches!(self, Self::Admin | Self::SeniorAccountant | Self::Accountant)
    }

    /// Returns true if this role may manage the chart of accounts.
    #[must_use]
    pub const fn can_manage_accounts(self) -> bool {
        matches!(self, Self::Admin | Self::SeniorAccountant)
    }
}

/// Rejects the operation unless the role may post to the ledger.
pub fn require_posting_role(role: Role) -> AppResult<()> {
    if role.can_post() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role {role:?} may not post to the ledger"
        )))
    }
}

/// Rejects the operation unless the role may manage the chart of accounts.
pub fn require_account_management_role(role: Role) -> AppResult<()> {
    if role.can_manage_accounts() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role {role:?} may not manage the chart of accounts"
        )))
    }
}
