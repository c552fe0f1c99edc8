//! Financial statement aggregation.
//!
//! Pure aggregation over rows the store supplies: account balances for the
//! balance sheet, journal-line movements for the income statement, trial
//! balance, and cash flow, and transaction rows for the subsidiary ledgers.

pub mod service;
pub mod types;

pub use service::ReportService;
pub use types::{
    AccountMovement, BalanceSheet, BalanceSheetRow, BalanceSheetSection, CashFlowSection,
    CashFlowStatement, IncomeStatement, IncomeStatementRow, OpenDocumentRow, ReportAccount,
    SubsidiaryRow, TrialBalance, TrialBalanceRow,
};
