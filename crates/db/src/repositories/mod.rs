//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Validation lives in `saldo-core`; repositories feed it
//! store lookups and apply the validated results atomically.

pub mod account;
pub mod journal;
pub mod payroll;
pub mod period;
pub mod recurring;
pub mod report;
pub mod transaction;

mod ledger_workflow_tests;

pub use account::{AccountError, AccountRepository};
pub use journal::{JournalError, JournalRepository, JournalWithLines};
pub use payroll::{CreatePayrollInput, PayrollError, PayrollRepository};
pub use period::{CreatePeriodInput, PeriodError, PeriodRepository};
pub use recurring::{
    CreateTemplateInput, ProcessSummary, RecurringError, RecurringRepository, TemplateLineInput,
};
pub use report::{ReportError, ReportRepository};
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionItemInput, TransactionRepository,
};
