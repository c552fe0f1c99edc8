//! Report input rows and output statements.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::coa::{AccountType, NormalBalance};

/// An account row as the store hands it to the aggregator.
#[derive(Debug, Clone)]
pub struct ReportAccount {
    /// The account id.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Current running balance.
    pub current_balance: Decimal,
}

/// An account's journal-line movement over a date range.
#[derive(Debug, Clone)]
pub struct AccountMovement {
    /// The account id.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
    /// Sum of debits in range.
    pub debit: Decimal,
    /// Sum of credits in range.
    pub credit: Decimal,
}

/// One account row on the balance sheet.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Current balance.
    pub balance: Decimal,
}

/// One side of the balance sheet.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetSection {
    /// Account rows, ordered by code.
    pub rows: Vec<BalanceSheetRow>,
    /// Section total.
    pub total: Decimal,
}

/// Balance sheet: assets against liabilities plus equity.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheet {
    /// Asset accounts.
    pub assets: BalanceSheetSection,
    /// Liability accounts.
    pub liabilities: BalanceSheetSection,
    /// Equity accounts.
    pub equity: BalanceSheetSection,
    /// Whether assets equal liabilities + equity within tolerance.
    pub balanced: bool,
}

/// One account row on the income statement.
#[derive(Debug, Clone, Serialize)]
pub struct IncomeStatementRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Net amount for the range (directional).
    pub amount: Decimal,
}

/// Income statement over a date range.
#[derive(Debug, Clone, Serialize)]
pub struct IncomeStatement {
    /// Revenue rows, netted `credit - debit`.
    pub revenue: Vec<IncomeStatementRow>,
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Expense rows, netted `debit - credit`.
    pub expenses: Vec<IncomeStatementRow>,
    /// Total expenses.
    pub total_expenses: Decimal,
    /// `total_revenue - total_expenses`.
    pub net_income: Decimal,
}

/// One section of the cash flow statement.
#[derive(Debug, Clone, Serialize)]
pub struct CashFlowSection {
    /// Cash received.
    pub inflow: Decimal,
    /// Cash paid out.
    pub outflow: Decimal,
    /// `inflow - outflow`.
    pub net: Decimal,
}

/// Cash flow statement over a date range.
///
/// Only the operating section carries data; investing and financing are
/// reported as zero pending activity classification.
#[derive(Debug, Clone, Serialize)]
pub struct CashFlowStatement {
    /// Operating activity, from cash-account movements.
    pub operating: CashFlowSection,
    /// Investing activity (always zero).
    pub investing: CashFlowSection,
    /// Financing activity (always zero).
    pub financing: CashFlowSection,
    /// Net change in cash across all sections.
    pub net_change: Decimal,
}

/// One account row on the trial balance.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Debit movement to the cutoff.
    pub debit: Decimal,
    /// Credit movement to the cutoff.
    pub credit: Decimal,
    /// Opening balance combined with movements via the directional rule.
    pub balance: Decimal,
}

/// Trial balance as of a cutoff date.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalance {
    /// Account rows; all-zero rows are filtered out.
    pub rows: Vec<TrialBalanceRow>,
    /// Total debit movement.
    pub total_debit: Decimal,
    /// Total credit movement.
    pub total_credit: Decimal,
}

/// An open (not fully paid) trade document row.
#[derive(Debug, Clone, Serialize)]
pub struct OpenDocumentRow {
    /// The transaction id.
    pub transaction_id: Uuid,
    /// Document number.
    pub number: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Customer or supplier name.
    pub contact_name: String,
    /// Document total.
    pub total: Decimal,
    /// Amount settled so far.
    pub amount_paid: Decimal,
    /// Outstanding balance.
    pub remaining_balance: Decimal,
}

/// A subsidiary ledger group: one customer or supplier with their open
/// documents.
#[derive(Debug, Clone, Serialize)]
pub struct SubsidiaryRow {
    /// Customer or supplier name.
    pub contact_name: String,
    /// Open documents, ordered by date.
    pub documents: Vec<OpenDocumentRow>,
    /// Sum of outstanding balances.
    pub total_remaining: Decimal,
}
