//! Payroll payment journal derivation.
//!
//! Paying a payroll record posts a two-line journal for the net pay: debit
//! the salary expense account, credit the cash/bank account the payment was
//! made from.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::{JournalLineInput, LedgerError, PostingProfile};

/// The payroll fields that drive journal derivation.
#[derive(Debug, Clone)]
pub struct PayrollRecord {
    /// The payroll row id.
    pub id: Uuid,
    /// Employee being paid.
    pub employee_name: String,
    /// Period label, e.g. "January 2024".
    pub period: String,
    /// Net pay (gross minus deductions), the amount actually journaled.
    pub net_pay: Decimal,
    /// Whether the payroll has already been paid.
    pub is_paid: bool,
}

/// Resolves the salary expense account for a payroll payment.
///
/// Resolution order: the explicitly supplied account, then the posting
/// profile's `salary_expense_id`, then a name-contains-"salary" lookup
/// injected by the caller. The name heuristic is brittle (any account whose
/// name happens to contain "salary" matches) and exists only as a
/// last-resort fallback for companies without a configured profile.
///
/// # Errors
///
/// Returns `NoExpenseAccount` when nothing resolves.
pub fn resolve_expense_account<F>(
    explicit: Option<Uuid>,
    profile: &PostingProfile,
    find_by_name_salary: F,
) -> Result<Uuid, LedgerError>
where
    F: FnOnce() -> Result<Option<Uuid>, LedgerError>,
{
    if let Some(id) = explicit {
        return Ok(id);
    }
    if let Some(id) = profile.salary_expense_id {
        return Ok(id);
    }
    find_by_name_salary()?.ok_or(LedgerError::NoExpenseAccount)
}

/// Derives the two journal lines for a payroll payment.
///
/// # Errors
///
/// Returns `PayrollAlreadyPaid` when the record is already paid, and
/// `ZeroAmount`/`NegativeAmount` for a non-positive net pay.
pub fn derive_payroll_lines(
    payroll: &PayrollRecord,
    expense_account_id: Uuid,
    cash_account_id: Uuid,
) -> Result<Vec<JournalLineInput>, LedgerError> {
    if payroll.is_paid {
        return Err(LedgerError::PayrollAlreadyPaid(payroll.id));
    }
    if payroll.net_pay < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount);
    }
    if payroll.net_pay.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }

    let description = format!(
        "Salary payment {} - {}",
        payroll.employee_name, payroll.period
    );
    Ok(vec![
        JournalLineInput::debit(expense_account_id, payroll.net_pay, Some(description.clone())),
        JournalLineInput::credit(cash_account_id, payroll.net_pay, Some(description)),
    ])
}
