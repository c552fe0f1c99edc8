//! Ledger error types for validation and state errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use saldo_shared::AppError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Journal must have lines.
    #[error("Journal must have at least one debit and one credit line")]
    EmptyJournal,

    /// Journal is not balanced (debits != credits within tolerance).
    #[error("Journal is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// A line must carry either a debit or a credit, never both.
    #[error("Line must carry either a debit or a credit, not both")]
    BothSidesSet,

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(Uuid),

    /// Header accounts never receive direct postings.
    #[error("Account {0} is a header account and cannot be posted to")]
    AccountIsHeader(Uuid),

    /// Account does not allow manual journal entry.
    #[error("Account {0} does not allow manual journal entry")]
    AccountNoManualEntry(Uuid),

    // ========== Period Errors ==========
    /// Accounting period not found.
    #[error("Accounting period not found: {0}")]
    PeriodNotFound(Uuid),

    /// No open accounting period covers the date.
    #[error("No open accounting period covers date {0}")]
    NoPeriodForDate(NaiveDate),

    /// Accounting period is closed.
    #[error("Accounting period is closed, no posting allowed")]
    PeriodClosed,

    /// The journal date falls outside the selected period.
    #[error("Date {date} is outside the accounting period")]
    DateOutsidePeriod {
        /// The offending date.
        date: NaiveDate,
    },

    // ========== Document Errors ==========
    /// Document number already used in the company.
    #[error("Document number '{0}' is already used")]
    DuplicateNumber(String),

    /// Journal not found.
    #[error("Journal not found: {0}")]
    JournalNotFound(Uuid),

    /// Journal belongs to a closed period and cannot be deleted.
    #[error("Journal {0} is closed and cannot be deleted")]
    JournalClosed(Uuid),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// Transaction is already posted; void is the only mutation path.
    #[error("Transaction {0} is already posted")]
    AlreadyPosted(Uuid),

    /// Transaction is not posted.
    #[error("Transaction {0} is not posted")]
    NotPosted(Uuid),

    /// Transaction is voided and immutable.
    #[error("Transaction {0} is voided")]
    Voided(Uuid),

    // ========== Posting Configuration Errors ==========
    /// The company has no posting profile configured.
    #[error("Company has no posting profile configured")]
    NoPostingProfile,

    /// A designated posting account is missing from the posting profile.
    #[error("No {0} account is configured in the posting profile")]
    MissingPostingAccount(&'static str),

    // ========== Payroll Errors ==========
    /// Payroll record is already paid.
    #[error("Payroll {0} is already paid")]
    PayrollAlreadyPaid(Uuid),

    /// No salary expense account could be resolved.
    #[error("No salary expense account could be resolved")]
    NoExpenseAccount,

    // ========== Infrastructure ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyJournal => "EMPTY_JOURNAL",
            Self::Unbalanced { .. } => "UNBALANCED_JOURNAL",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::BothSidesSet => "BOTH_SIDES_SET",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::AccountIsHeader(_) => "ACCOUNT_IS_HEADER",
            Self::AccountNoManualEntry(_) => "ACCOUNT_NO_MANUAL_ENTRY",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::NoPeriodForDate(_) => "NO_PERIOD_FOR_DATE",
            Self::PeriodClosed => "PERIOD_CLOSED",
            Self::DateOutsidePeriod { .. } => "DATE_OUTSIDE_PERIOD",
            Self::DuplicateNumber(_) => "DUPLICATE_NUMBER",
            Self::JournalNotFound(_) => "JOURNAL_NOT_FOUND",
            Self::JournalClosed(_) => "JOURNAL_CLOSED",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::NotPosted(_) => "NOT_POSTED",
            Self::Voided(_) => "VOIDED",
            Self::NoPostingProfile => "NO_POSTING_PROFILE",
            Self::MissingPostingAccount(_) => "MISSING_POSTING_ACCOUNT",
            Self::PayrollAlreadyPaid(_) => "PAYROLL_ALREADY_PAID",
            Self::NoExpenseAccount => "NO_EXPENSE_ACCOUNT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if a retry may succeed.
    ///
    /// Only numbering collisions retry; every other failure surfaces.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::DuplicateNumber(_))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound(_)
            | LedgerError::PeriodNotFound(_)
            | LedgerError::JournalNotFound(_)
            | LedgerError::TransactionNotFound(_) => Self::NotFound(err.to_string()),
            LedgerError::DuplicateNumber(_) => Self::Conflict(err.to_string()),
            LedgerError::Database(msg) => Self::Database(msg),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::Unbalanced {
                debit: dec!(100),
                credit: dec!(50),
            }
            .error_code(),
            "UNBALANCED_JOURNAL"
        );
        assert_eq!(
            LedgerError::AccountIsHeader(Uuid::nil()).error_code(),
            "ACCOUNT_IS_HEADER"
        );
        assert_eq!(LedgerError::PeriodClosed.error_code(), "PERIOD_CLOSED");
    }

    #[test]
    fn test_retryable() {
        assert!(LedgerError::DuplicateNumber("JU/202401/0001".into()).is_retryable());
        assert!(!LedgerError::PeriodClosed.is_retryable());
        assert!(!LedgerError::Database("lost".into()).is_retryable());
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = LedgerError::JournalNotFound(Uuid::nil()).into();
        assert_eq!(app.status_code(), 404);

        let app: AppError = LedgerError::DuplicateNumber("x".into()).into();
        assert_eq!(app.status_code(), 409);

        let app: AppError = LedgerError::PeriodClosed.into();
        assert_eq!(app.status_code(), 400);
    }

    #[test]
    fn test_display() {
        let err = LedgerError::Unbalanced {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal is not balanced. Debit: 100.00, Credit: 50.00"
        );
    }
}
