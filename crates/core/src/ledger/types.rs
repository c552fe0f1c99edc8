//! Ledger domain types for journal creation and validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use saldo_shared::tolerance;

use crate::coa::NormalBalance;

/// Where a journal originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalSource {
    /// Entered by hand. Subject to the allow-manual-entry account flag.
    Manual,
    /// Auto-posted from a business transaction (sale/purchase).
    Transaction,
    /// Auto-posted from a voucher's own debit/credit detail.
    Voucher,
    /// Auto-posted by payroll payment.
    Payroll,
    /// Generated by the recurring scheduler.
    Recurring,
}

impl JournalSource {
    /// Only manual journals require the per-account manual-entry permission.
    #[must_use]
    pub const fn requires_manual_entry_flag(self) -> bool {
        matches!(self, Self::Manual)
    }
}

/// Input for a single journal line.
///
/// Exactly one of `debit`/`credit` must be nonzero (and positive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: Uuid,
    /// Optional line description.
    pub description: Option<String>,
    /// Debit amount (0 if credit line).
    pub debit: Decimal,
    /// Credit amount (0 if debit line).
    pub credit: Decimal,
}

impl JournalLineInput {
    /// Convenience constructor for a debit line.
    #[must_use]
    pub fn debit(account_id: Uuid, amount: Decimal, description: Option<String>) -> Self {
        Self {
            account_id,
            description,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// Convenience constructor for a credit line.
    #[must_use]
    pub fn credit(account_id: Uuid, amount: Decimal, description: Option<String>) -> Self {
        Self {
            account_id,
            description,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }
}

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct CreateJournalInput {
    /// The company this journal belongs to.
    pub company_id: Uuid,
    /// The accounting period; when absent the store resolves the open
    /// period covering `journal_date`.
    pub period_id: Option<Uuid>,
    /// Journal date.
    pub journal_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Pre-assigned journal number; generated when absent.
    pub journal_number: Option<String>,
    /// Where this journal originated.
    pub source: JournalSource,
    /// The originating document (transaction/voucher/payroll id).
    pub source_id: Option<Uuid>,
    /// The journal lines.
    pub lines: Vec<JournalLineInput>,
    /// The user creating the journal.
    pub created_by: Uuid,
}

/// Information about an account needed for posting validation.
#[derive(Debug, Clone)]
pub struct AccountInfo {
    /// The account ID.
    pub id: Uuid,
    /// Whether the account is active.
    pub is_active: bool,
    /// Header accounts never receive direct postings.
    pub is_header: bool,
    /// Whether manual journal entry is permitted.
    pub allow_manual_entry: bool,
    /// Normal balance side for the directional rule.
    pub normal_balance: NormalBalance,
    /// Running balance before this journal.
    pub current_balance: Decimal,
}

/// Information about an accounting period needed for posting validation.
#[derive(Debug, Clone)]
pub struct PeriodInfo {
    /// The period ID.
    pub id: Uuid,
    /// Period start date (inclusive).
    pub start_date: NaiveDate,
    /// Period end date (inclusive).
    pub end_date: NaiveDate,
    /// Whether the period is open for posting.
    pub is_open: bool,
}

impl PeriodInfo {
    /// Returns true if the period covers the given date.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// A validated journal line with balance snapshots applied.
#[derive(Debug, Clone)]
pub struct ResolvedLine {
    /// The account to post to.
    pub account_id: Uuid,
    /// Position within the journal, 1-based.
    pub line_no: i32,
    /// Optional line description.
    pub description: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// The account's running balance before this line.
    pub balance_before: Decimal,
    /// The account's running balance after this line.
    pub balance_after: Decimal,
}

impl ResolvedLine {
    /// The signed balance delta this line applies to its account.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.balance_after - self.balance_before
    }
}

/// Journal totals for validation and display.
#[derive(Debug, Clone)]
pub struct JournalTotals {
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Whether debits equal credits within the canonical tolerance.
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Creates journal totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: tolerance::is_balanced(total_debit, total_credit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_source_manual_entry_flag() {
        assert!(JournalSource::Manual.requires_manual_entry_flag());
        assert!(!JournalSource::Transaction.requires_manual_entry_flag());
        assert!(!JournalSource::Voucher.requires_manual_entry_flag());
        assert!(!JournalSource::Payroll.requires_manual_entry_flag());
        assert!(!JournalSource::Recurring.requires_manual_entry_flag());
    }

    #[test]
    fn test_period_covers() {
        let period = PeriodInfo {
            id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            is_open: true,
        };
        assert!(period.covers(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(period.covers(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert!(!period.covers(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
    }

    #[test]
    fn test_totals_within_tolerance() {
        let totals = JournalTotals::new(dec!(100.00), dec!(100.01));
        assert!(totals.is_balanced);

        let totals = JournalTotals::new(dec!(100.00), dec!(100.02));
        assert!(!totals.is_balanced);
    }

    #[test]
    fn test_line_constructors() {
        let id = Uuid::new_v4();
        let line = JournalLineInput::debit(id, dec!(50), None);
        assert_eq!(line.debit, dec!(50));
        assert_eq!(line.credit, dec!(0));

        let line = JournalLineInput::credit(id, dec!(50), Some("sales".into()));
        assert_eq!(line.debit, dec!(0));
        assert_eq!(line.credit, dec!(50));
    }
}
