//! Account registry error types.

use thiserror::Error;
use uuid::Uuid;

use saldo_shared::AppError;

use super::types::AccountType;

/// Errors that can occur during chart-of-accounts operations.
#[derive(Debug, Error)]
pub enum CoaError {
    /// Account code already exists in the company.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Parent account belongs to a different company.
    #[error("Parent account belongs to a different company")]
    ParentWrongCompany,

    /// Parent account type does not match the child's type.
    #[error("Parent type {parent:?} does not match account type {child:?}")]
    ParentTypeMismatch {
        /// Parent account type.
        parent: AccountType,
        /// Child account type.
        child: AccountType,
    },

    /// Parent must be a header account.
    #[error("Parent account {0} is not a header account")]
    ParentNotHeader(Uuid),

    /// An account cannot be its own parent.
    #[error("Account cannot be its own parent")]
    OwnParent,

    /// Subtype is required for this account type.
    #[error("Subtype is required for {0:?} accounts")]
    SubtypeRequired(AccountType),

    /// Subtype does not belong to this account type.
    #[error("Subtype does not belong to account type {0:?}")]
    SubtypeMismatch(AccountType),

    /// Structural fields are locked once the account has postings.
    #[error(
        "Account has posted lines; only name, notes, and is_active may change \
         (rejected fields: {fields:?})"
    )]
    StructuralChangeBlocked {
        /// The structural fields the caller attempted to change.
        fields: Vec<&'static str>,
    },

    /// Account has child accounts and cannot be deleted.
    #[error("Cannot delete account: it has {0} child accounts")]
    HasChildren(u64),

    /// Account has posted lines and cannot be deleted.
    #[error("Cannot delete account: it has {0} posted lines")]
    HasPostedLines(u64),
}

impl From<CoaError> for AppError {
    fn from(err: CoaError) -> Self {
        match err {
            CoaError::AccountNotFound(_) | CoaError::ParentNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}
