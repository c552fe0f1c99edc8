//! Recurring template domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::RecurringError;

/// A typed line on a recurring template.
///
/// Exactly one of `debit`/`credit` is nonzero, same shape as a journal
/// line input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateLine {
    /// The account to post to.
    pub account_id: Uuid,
    /// Optional line description.
    pub description: Option<String>,
    /// Debit amount (0 if credit line).
    pub debit: Decimal,
    /// Credit amount (0 if debit line).
    pub credit: Decimal,
}

impl TemplateLine {
    /// The line's single-sided value, whichever side carries it.
    #[must_use]
    pub fn value(&self) -> Decimal {
        if self.debit.is_zero() {
            self.credit
        } else {
            self.debit
        }
    }
}

/// The document total for a template: the sum of each line's value.
///
/// # Errors
///
/// Returns `EmptyTemplate` when the template has no lines.
pub fn template_total(lines: &[TemplateLine]) -> Result<Decimal, RecurringError> {
    if lines.is_empty() {
        return Err(RecurringError::EmptyTemplate);
    }
    Ok(lines.iter().map(TemplateLine::value).sum())
}

/// The outcome of one template's run, recorded as a history row.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The template generated (and possibly posted) a transaction.
    Success {
        /// The generated transaction id.
        transaction_id: Uuid,
    },
    /// The template failed; the rest of the batch is unaffected.
    Failure {
        /// The failure message recorded in history.
        message: String,
    },
}

impl RunOutcome {
    /// The status string persisted for this outcome.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Failure { .. } => "failure",
        }
    }

    /// Returns true for a successful run.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
