//! Payroll repository.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use saldo_core::ledger::{CreateJournalInput, JournalSource, LedgerError};
use saldo_core::payroll::{PayrollRecord, derive_payroll_lines, resolve_expense_account};
use saldo_shared::AppError;
use saldo_shared::config::NumberingConfig;
use saldo_shared::role::{Role, require_posting_role};

use crate::entities::{chart_of_accounts, payrolls};
use crate::repositories::journal::{
    JournalError, JournalWithLines, post_journal_in, posting_profile, with_numbering_retry,
};

const DEFAULT_MAX_RETRIES: u32 = 5;

/// Error types for payroll operations.
#[derive(Debug, thiserror::Error)]
pub enum PayrollError {
    /// Payroll record not found.
    #[error("Payroll not found: {0}")]
    NotFound(Uuid),

    /// A posting rule was violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The actor's role does not permit the operation.
    #[error(transparent)]
    Forbidden(#[from] AppError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<JournalError> for PayrollError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::Ledger(e) => Self::Ledger(e),
            JournalError::Forbidden(e) => Self::Forbidden(e),
            JournalError::Database(e) => Self::Database(e),
        }
    }
}

/// Input for creating a payroll record.
#[derive(Debug, Clone)]
pub struct CreatePayrollInput {
    /// Company ID.
    pub company_id: Uuid,
    /// Employee being paid.
    pub employee_name: String,
    /// Period label, e.g. "January 2024".
    pub period: String,
    /// Payment date.
    pub pay_date: NaiveDate,
    /// Gross pay.
    pub gross: Decimal,
    /// Total deductions.
    pub deductions: Decimal,
}

/// Payroll repository for payroll records and salary payment posting.
#[derive(Debug, Clone)]
pub struct PayrollRepository {
    db: DatabaseConnection,
    max_retries: u32,
}

impl PayrollRepository {
    /// Creates a new payroll repository with the default retry bound.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Creates a repository with the configured numbering retry bound.
    #[must_use]
    pub const fn with_config(db: DatabaseConnection, config: &NumberingConfig) -> Self {
        Self {
            db,
            max_retries: config.max_retries,
        }
    }

    /// Creates an unpaid payroll record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn create_payroll(
        &self,
        input: CreatePayrollInput,
    ) -> Result<payrolls::Model, PayrollError> {
        let now = Utc::now().into();
        let payroll = payrolls::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(input.company_id),
            employee_name: Set(input.employee_name),
            period: Set(input.period),
            pay_date: Set(input.pay_date),
            gross: Set(input.gross),
            deductions: Set(input.deductions),
            net_pay: Set(input.gross - input.deductions),
            is_paid: Set(false),
            journal_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(payroll.insert(&self.db).await?)
    }

    /// Finds a payroll record by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id does not exist.
    pub async fn find_payroll(&self, id: Uuid) -> Result<payrolls::Model, PayrollError> {
        payrolls::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PayrollError::NotFound(id))
    }

    /// Lists a company's payroll records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_payrolls(&self, company_id: Uuid) -> Result<Vec<payrolls::Model>, PayrollError> {
        Ok(payrolls::Entity::find()
            .filter(payrolls::Column::CompanyId.eq(company_id))
            .order_by_desc(payrolls::Column::PayDate)
            .all(&self.db)
            .await?)
    }

    /// Pays a payroll record.
    ///
    /// Posts a two-line journal for the net pay (debit salary expense,
    /// credit the given cash/bank account), then flags the record paid and
    /// links the journal, all in one unit of work. The expense account is
    /// the explicit one, the posting profile's `salary_expense_id`, or a
    /// name-contains-"salary" fallback lookup.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for a non-posting role; fails when the record
    /// is already paid, no expense account resolves, or no open period
    /// covers the pay date.
    pub async fn pay_payroll(
        &self,
        role: Role,
        payroll_id: Uuid,
        cash_account_id: Uuid,
        expense_account_id: Option<Uuid>,
        actor: Uuid,
    ) -> Result<JournalWithLines, PayrollError> {
        require_posting_role(role)?;
        let result = with_numbering_retry(&self.db, self.max_retries, |txn| {
            pay_in(txn, payroll_id, cash_account_id, expense_account_id, actor)
        })
        .await?;
        Ok(result)
    }
}

async fn pay_in(
    txn: DatabaseTransaction,
    payroll_id: Uuid,
    cash_account_id: Uuid,
    expense_account_id: Option<Uuid>,
    actor: Uuid,
) -> Result<(DatabaseTransaction, JournalWithLines), JournalError> {
    let payroll = payrolls::Entity::find_by_id(payroll_id)
        .one(&txn)
        .await?
        .ok_or(LedgerError::TransactionNotFound(payroll_id))?;

    let record = PayrollRecord {
        id: payroll.id,
        employee_name: payroll.employee_name.clone(),
        period: payroll.period.clone(),
        net_pay: payroll.net_pay,
        is_paid: payroll.is_paid,
    };

    let profile = match posting_profile(&txn, payroll.company_id).await {
        Ok(profile) => profile,
        // The name heuristic below still works without a profile.
        Err(JournalError::Ledger(LedgerError::NoPostingProfile)) => {
            saldo_core::ledger::PostingProfile::default()
        }
        Err(err) => return Err(err),
    };
    let salary_fallback = find_salary_account(&txn, payroll.company_id).await?;
    let expense_account = resolve_expense_account(expense_account_id, &profile, || {
        Ok(salary_fallback)
    })?;

    let lines = derive_payroll_lines(&record, expense_account, cash_account_id)?;

    let input = CreateJournalInput {
        company_id: payroll.company_id,
        period_id: None,
        journal_date: payroll.pay_date,
        description: format!(
            "Salary payment {} - {}",
            payroll.employee_name, payroll.period
        ),
        journal_number: None,
        source: JournalSource::Payroll,
        source_id: Some(payroll_id),
        lines,
        created_by: actor,
    };
    let posted = post_journal_in(&txn, &input).await?;

    let mut active: payrolls::ActiveModel = payroll.into();
    active.is_paid = Set(true);
    active.journal_id = Set(Some(posted.journal.id));
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    Ok((txn, posted))
}

/// Finds an active expense account whose name contains "salary".
///
/// Brittle by nature; used only when neither an explicit account nor the
/// posting profile resolves one.
async fn find_salary_account(
    txn: &DatabaseTransaction,
    company_id: Uuid,
) -> Result<Option<Uuid>, DbErr> {
    let account = chart_of_accounts::Entity::find()
        .filter(chart_of_accounts::Column::CompanyId.eq(company_id))
        .filter(chart_of_accounts::Column::IsActive.eq(true))
        .filter(chart_of_accounts::Column::IsHeader.eq(false))
        .filter(chart_of_accounts::Column::Name.contains("salary"))
        .order_by_asc(chart_of_accounts::Column::Code)
        .one(txn)
        .await?;
    Ok(account.map(|a| a.id))
}
