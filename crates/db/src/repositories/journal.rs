//! Journal repository: the posting engine's persistence layer.
//!
//! All writes here follow the one-request-one-transaction rule: a journal
//! and its balance effects commit or roll back as a unit. Document number
//! collisions under concurrency are retried with a fresh transaction.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use saldo_core::ledger::{
    AccountInfo, CreateJournalInput, JournalSource, LedgerError, LedgerService, PeriodInfo,
    ResolvedLine, reversal_description, reverse_lines,
};
use saldo_core::ledger::{PostedLine, derive_trade_lines, derive_voucher_lines};
use saldo_core::numbering::{self, DocumentType};
use saldo_shared::AppError;
use saldo_shared::config::NumberingConfig;
use saldo_shared::role::{Role, require_posting_role};

use crate::entities::{
    chart_of_accounts, journal_lines, journals, posting_profiles,
    sea_orm_active_enums::{PeriodStatus, TransactionStatus, VoucherStatus},
    transaction_items, transactions, voucher_lines, vouchers,
};
use crate::repositories::account::apply_balance_delta;
use crate::repositories::period::find_covering_in;

const DEFAULT_MAX_RETRIES: u32 = 5;

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
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

/// A journal header with its ordered lines.
#[derive(Debug, Clone)]
pub struct JournalWithLines {
    /// Journal header.
    pub journal: journals::Model,
    /// Lines in `line_no` order.
    pub lines: Vec<journal_lines::Model>,
}

/// Journal repository for posting, reversal, and deletion.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    max_retries: u32,
}

impl JournalRepository {
    /// Creates a new journal repository with the default retry bound.
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

    /// Creates and posts a journal entry.
    ///
    /// The journal is posted on creation; there is no draft state. Number
    /// collisions regenerate and retry up to the configured bound.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for a non-posting role, and an error when
    /// validation fails or the store rejects the write.
    pub async fn create_journal(
        &self,
        role: Role,
        input: CreateJournalInput,
    ) -> Result<JournalWithLines, JournalError> {
        require_posting_role(role)?;
        self.retry_numbering(|txn| post_journal(txn, input.clone()))
            .await
    }

    /// Gets a journal with its lines.
    ///
    /// # Errors
    ///
    /// Returns `JournalNotFound` when the id does not exist.
    pub async fn get_journal(&self, id: Uuid) -> Result<JournalWithLines, JournalError> {
        let journal = journals::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::JournalNotFound(id))?;
        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalId.eq(id))
            .order_by_asc(journal_lines::Column::LineNo)
            .all(&self.db)
            .await?;
        Ok(JournalWithLines { journal, lines })
    }

    /// Lists a company's journals, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_journals(&self, company_id: Uuid) -> Result<Vec<journals::Model>, JournalError> {
        Ok(journals::Entity::find()
            .filter(journals::Column::CompanyId.eq(company_id))
            .order_by_desc(journals::Column::JournalDate)
            .order_by_desc(journals::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Deletes a journal, rolling its balance effects back.
    ///
    /// Inside one transaction: the inverse of every line's directional
    /// delta is applied to its account, the lines are deleted explicitly,
    /// then the header.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for a non-posting role, `JournalClosed` when the
    /// journal is flagged closed, and `PeriodClosed` when the journal's
    /// period has been closed.
    pub async fn delete_journal(&self, role: Role, id: Uuid) -> Result<(), JournalError> {
        require_posting_role(role)?;
        let txn = self.db.begin().await?;

        let journal = journals::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(LedgerError::JournalNotFound(id))?;
        if journal.is_closed {
            return Err(LedgerError::JournalClosed(id).into());
        }
        // The flag is maintained at period close; checking the period itself
        // also covers journals inserted after the flag sweep.
        let period = accounting_period(&txn, journal.period_id).await?;
        if period.status == PeriodStatus::Closed {
            return Err(LedgerError::PeriodClosed.into());
        }

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalId.eq(id))
            .all(&txn)
            .await?;

        for line in &lines {
            // Inverse directional delta rather than a blind balance_before
            // restore, so later postings to the account are not clobbered.
            let delta = line.balance_after - line.balance_before;
            apply_balance_delta(&txn, line.account_id, -delta).await?;
        }

        journal_lines::Entity::delete_many()
            .filter(journal_lines::Column::JournalId.eq(id))
            .exec(&txn)
            .await?;
        journals::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(journal_id = %id, "journal deleted and balances reversed");
        Ok(())
    }

    /// Posts a draft trade transaction to the ledger.
    ///
    /// Sale: debit receivable for the total, credit item accounts, credit
    /// output tax. Purchase mirrors. The transaction is flagged posted and
    /// linked to the journal in the same unit of work.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for a non-posting role, and an error when the
    /// transaction is missing, already posted or voided, the posting
    /// profile is incomplete, or no open period covers the date.
    pub async fn post_from_transaction(
        &self,
        role: Role,
        transaction_id: Uuid,
        actor: Uuid,
    ) -> Result<JournalWithLines, JournalError> {
        require_posting_role(role)?;
        self.retry_numbering(|txn| post_transaction_in(txn, transaction_id, actor))
            .await
    }

    /// Posts a batch of draft transactions, all-or-nothing.
    ///
    /// The whole batch shares one database transaction; the first failing
    /// member rolls back every posting. A number collision retries the
    /// batch from scratch.
    ///
    /// # Errors
    ///
    /// Returns the first failing member's error; nothing is persisted on
    /// failure.
    pub async fn batch_post(
        &self,
        role: Role,
        transaction_ids: Vec<Uuid>,
        actor: Uuid,
    ) -> Result<Vec<JournalWithLines>, JournalError> {
        require_posting_role(role)?;
        let posted = with_numbering_retry(&self.db, self.max_retries, |txn| {
            post_batch_in(txn, transaction_ids.clone(), actor)
        })
        .await?;
        tracing::info!(count = posted.len(), "transaction batch posted");
        Ok(posted)
    }

    /// Voids a posted transaction by synthesizing a reversing journal.
    ///
    /// The reversal swaps every debit and credit of the posted journal and
    /// is posted through the normal engine; the transaction is flagged
    /// voided in the same unit of work.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for a non-posting role, `NotPosted` for drafts,
    /// and `Voided` for transactions voided already.
    pub async fn void_transaction(
        &self,
        role: Role,
        transaction_id: Uuid,
        actor: Uuid,
    ) -> Result<JournalWithLines, JournalError> {
        require_posting_role(role)?;
        self.retry_numbering(|txn| void_transaction_in(txn, transaction_id, actor))
            .await
    }

    /// Posts a draft voucher from its own debit/credit detail.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for a non-posting role, and an error when the
    /// voucher is missing, already posted, or its lines fail validation.
    pub async fn post_from_voucher(
        &self,
        role: Role,
        voucher_id: Uuid,
        actor: Uuid,
    ) -> Result<JournalWithLines, JournalError> {
        require_posting_role(role)?;
        self.retry_numbering(|txn| post_voucher_in(txn, voucher_id, actor))
            .await
    }

    async fn retry_numbering<F, Fut>(&self, operation: F) -> Result<JournalWithLines, JournalError>
    where
        F: Fn(DatabaseTransaction) -> Fut,
        Fut: Future<Output = Result<(DatabaseTransaction, JournalWithLines), JournalError>>,
    {
        with_numbering_retry(&self.db, self.max_retries, operation).await
    }
}

/// Runs a posting closure with a fresh transaction per attempt, retrying
/// on document number collisions.
///
/// Postgres aborts the whole transaction on a unique violation, so the
/// retry must start over rather than re-issue the insert.
pub(crate) async fn with_numbering_retry<F, Fut, T>(
    db: &DatabaseConnection,
    max_retries: u32,
    operation: F,
) -> Result<T, JournalError>
where
    F: Fn(DatabaseTransaction) -> Fut,
    Fut: Future<Output = Result<(DatabaseTransaction, T), JournalError>>,
{
    let mut attempt = 0;
    loop {
        let txn = db.begin().await?;
        match operation(txn).await {
            Ok((txn, result)) => {
                txn.commit().await?;
                return Ok(result);
            }
            Err(JournalError::Ledger(err)) if err.is_retryable() && attempt + 1 < max_retries => {
                attempt += 1;
                tracing::warn!(attempt, error = %err, "document number collision, retrying");
            }
            Err(err) => return Err(err),
        }
    }
}

/// Validates and inserts a journal with its lines and balance effects.
///
/// The caller owns the transaction; this routine never commits.
pub(crate) async fn post_journal_in(
    txn: &DatabaseTransaction,
    input: &CreateJournalInput,
) -> Result<JournalWithLines, JournalError> {
    // Resolve the accounting period.
    let period = match input.period_id {
        Some(period_id) => accounting_period(txn, period_id).await?,
        None => find_covering_in(txn, input.company_id, input.journal_date)
            .await?
            .ok_or(LedgerError::NoPeriodForDate(input.journal_date))?,
    };
    let period_info = PeriodInfo {
        id: period.id,
        start_date: period.start_date,
        end_date: period.end_date,
        is_open: period.status == PeriodStatus::Open,
    };

    // Preload every referenced account so validation stays pure.
    let account_ids: Vec<Uuid> = input.lines.iter().map(|l| l.account_id).collect();
    let accounts: HashMap<Uuid, AccountInfo> = chart_of_accounts::Entity::find()
        .filter(chart_of_accounts::Column::Id.is_in(account_ids))
        .all(txn)
        .await?
        .into_iter()
        .map(|model| {
            (
                model.id,
                AccountInfo {
                    id: model.id,
                    is_active: model.is_active,
                    is_header: model.is_header,
                    allow_manual_entry: model.allow_manual_entry,
                    normal_balance: model.normal_balance.into(),
                    current_balance: model.current_balance,
                },
            )
        })
        .collect();

    let (resolved, _totals) = LedgerService::validate_and_resolve(input, &period_info, |id| {
        accounts
            .get(&id)
            .cloned()
            .ok_or(LedgerError::AccountNotFound(id))
    })?;

    // Assign the document number inside the same transaction as the insert.
    let journal_number = match &input.journal_number {
        Some(number) => {
            if number_taken(txn, input.company_id, number).await? {
                return Err(LedgerError::DuplicateNumber(number.clone()).into());
            }
            number.clone()
        }
        None => next_journal_number(txn, input.company_id, input.journal_date, input.source).await?,
    };

    let now = Utc::now().into();
    let journal_id = Uuid::new_v4();
    let header = journals::ActiveModel {
        id: Set(journal_id),
        company_id: Set(input.company_id),
        journal_number: Set(journal_number.clone()),
        period_id: Set(period_info.id),
        journal_date: Set(input.journal_date),
        description: Set(input.description.clone()),
        source: Set(input.source.into()),
        source_id: Set(input.source_id),
        is_closed: Set(false),
        posted: Set(true),
        created_by: Set(input.created_by),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let journal = header
        .insert(txn)
        .await
        .map_err(|err| map_unique_violation(err, &journal_number))?;

    let mut lines = Vec::with_capacity(resolved.len());
    for line in &resolved {
        let inserted = insert_line(txn, journal_id, line, now).await?;
        apply_balance_delta(txn, line.account_id, line.delta()).await?;
        lines.push(inserted);
    }

    tracing::info!(
        journal_id = %journal_id,
        journal_number = %journal.journal_number,
        line_count = lines.len(),
        "journal posted"
    );
    Ok(JournalWithLines { journal, lines })
}

async fn post_journal(
    txn: DatabaseTransaction,
    input: CreateJournalInput,
) -> Result<(DatabaseTransaction, JournalWithLines), JournalError> {
    let result = post_journal_in(&txn, &input).await?;
    Ok((txn, result))
}

pub(crate) async fn post_transaction_in(
    txn: DatabaseTransaction,
    transaction_id: Uuid,
    actor: Uuid,
) -> Result<(DatabaseTransaction, JournalWithLines), JournalError> {
    let transaction = trade_transaction(&txn, transaction_id).await?;
    match transaction.status {
        TransactionStatus::Posted => {
            return Err(LedgerError::AlreadyPosted(transaction_id).into());
        }
        TransactionStatus::Voided => return Err(LedgerError::Voided(transaction_id).into()),
        TransactionStatus::Draft => {}
    }

    let items = transaction_items::Entity::find()
        .filter(transaction_items::Column::TransactionId.eq(transaction_id))
        .all(&txn)
        .await?;
    let profile = posting_profile(&txn, transaction.company_id).await?;

    let document = saldo_core::ledger::TradeDocument {
        kind: transaction.transaction_type.into(),
        number: transaction.transaction_number.clone(),
        contact_name: transaction.contact_name.clone(),
        subtotal: transaction.subtotal,
        tax_amount: transaction.tax_amount,
        total: transaction.total,
    };
    let trade_items: Vec<saldo_core::ledger::TradeItem> = items
        .iter()
        .map(|item| saldo_core::ledger::TradeItem {
            account_id: item.account_id,
            description: item.description.clone(),
            subtotal: item.subtotal,
        })
        .collect();
    let lines = derive_trade_lines(&document, &trade_items, &profile)?;

    let input = CreateJournalInput {
        company_id: transaction.company_id,
        period_id: None,
        journal_date: transaction.transaction_date,
        description: transaction.description.clone(),
        journal_number: None,
        source: JournalSource::Transaction,
        source_id: Some(transaction_id),
        lines,
        created_by: actor,
    };
    let posted = post_journal_in(&txn, &input).await?;

    let mut active: transactions::ActiveModel = transaction.into();
    active.status = Set(TransactionStatus::Posted);
    active.posted_journal_id = Set(Some(posted.journal.id));
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    Ok((txn, posted))
}

async fn post_batch_in(
    mut txn: DatabaseTransaction,
    transaction_ids: Vec<Uuid>,
    actor: Uuid,
) -> Result<(DatabaseTransaction, Vec<JournalWithLines>), JournalError> {
    let mut posted = Vec::with_capacity(transaction_ids.len());
    for id in transaction_ids {
        let (returned, journal) = post_transaction_in(txn, id, actor).await?;
        txn = returned;
        posted.push(journal);
    }
    Ok((txn, posted))
}

async fn void_transaction_in(
    txn: DatabaseTransaction,
    transaction_id: Uuid,
    actor: Uuid,
) -> Result<(DatabaseTransaction, JournalWithLines), JournalError> {
    let transaction = trade_transaction(&txn, transaction_id).await?;
    match transaction.status {
        TransactionStatus::Draft => return Err(LedgerError::NotPosted(transaction_id).into()),
        TransactionStatus::Voided => return Err(LedgerError::Voided(transaction_id).into()),
        TransactionStatus::Posted => {}
    }

    let journal_id = transaction
        .posted_journal_id
        .ok_or(LedgerError::NotPosted(transaction_id))?;
    let posted_lines: Vec<PostedLine> = journal_lines::Entity::find()
        .filter(journal_lines::Column::JournalId.eq(journal_id))
        .order_by_asc(journal_lines::Column::LineNo)
        .all(&txn)
        .await?
        .into_iter()
        .map(|line| PostedLine {
            account_id: line.account_id,
            description: line.description,
            debit: line.debit,
            credit: line.credit,
        })
        .collect();

    let input = CreateJournalInput {
        company_id: transaction.company_id,
        period_id: None,
        journal_date: Utc::now().date_naive(),
        description: reversal_description(&transaction.transaction_number),
        journal_number: None,
        source: JournalSource::Transaction,
        source_id: Some(transaction_id),
        lines: reverse_lines(&posted_lines),
        created_by: actor,
    };
    let reversal = post_journal_in(&txn, &input).await?;

    let mut active: transactions::ActiveModel = transaction.into();
    active.status = Set(TransactionStatus::Voided);
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    Ok((txn, reversal))
}

async fn post_voucher_in(
    txn: DatabaseTransaction,
    voucher_id: Uuid,
    actor: Uuid,
) -> Result<(DatabaseTransaction, JournalWithLines), JournalError> {
    let voucher = vouchers::Entity::find_by_id(voucher_id)
        .one(&txn)
        .await?
        .ok_or(LedgerError::TransactionNotFound(voucher_id))?;
    if voucher.status == VoucherStatus::Posted {
        return Err(LedgerError::AlreadyPosted(voucher_id).into());
    }

    let detail: Vec<saldo_core::ledger::VoucherLine> = voucher_lines::Entity::find()
        .filter(voucher_lines::Column::VoucherId.eq(voucher_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|line| saldo_core::ledger::VoucherLine {
            account_id: line.account_id,
            description: line.description,
            debit: line.debit,
            credit: line.credit,
        })
        .collect();
    let lines = derive_voucher_lines(&detail)?;

    let input = CreateJournalInput {
        company_id: voucher.company_id,
        period_id: None,
        journal_date: voucher.voucher_date,
        description: voucher.description.clone(),
        journal_number: None,
        source: JournalSource::Voucher,
        source_id: Some(voucher_id),
        lines,
        created_by: actor,
    };
    let posted = post_journal_in(&txn, &input).await?;

    let mut active: vouchers::ActiveModel = voucher.into();
    active.status = Set(VoucherStatus::Posted);
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    Ok((txn, posted))
}

async fn accounting_period(
    txn: &DatabaseTransaction,
    period_id: Uuid,
) -> Result<crate::entities::accounting_periods::Model, JournalError> {
    crate::entities::accounting_periods::Entity::find_by_id(period_id)
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::PeriodNotFound(period_id).into())
}

async fn trade_transaction(
    txn: &DatabaseTransaction,
    transaction_id: Uuid,
) -> Result<transactions::Model, JournalError> {
    transactions::Entity::find_by_id(transaction_id)
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::TransactionNotFound(transaction_id).into())
}

/// Loads a company's posting profile as the core configuration type.
pub(crate) async fn posting_profile(
    txn: &DatabaseTransaction,
    company_id: Uuid,
) -> Result<saldo_core::ledger::PostingProfile, JournalError> {
    let profile = posting_profiles::Entity::find()
        .filter(posting_profiles::Column::CompanyId.eq(company_id))
        .one(txn)
        .await?
        .ok_or(LedgerError::NoPostingProfile)?;
    Ok(saldo_core::ledger::PostingProfile {
        accounts_receivable_id: profile.accounts_receivable_id,
        accounts_payable_id: profile.accounts_payable_id,
        output_tax_id: profile.output_tax_id,
        input_tax_id: profile.input_tax_id,
        salary_expense_id: profile.salary_expense_id,
        cash_account_code_prefix: profile.cash_account_code_prefix,
    })
}

async fn insert_line(
    txn: &DatabaseTransaction,
    journal_id: Uuid,
    line: &ResolvedLine,
    now: chrono::DateTime<chrono::FixedOffset>,
) -> Result<journal_lines::Model, JournalError> {
    let model = journal_lines::ActiveModel {
        id: Set(Uuid::new_v4()),
        journal_id: Set(journal_id),
        account_id: Set(line.account_id),
        line_no: Set(line.line_no),
        description: Set(line.description.clone()),
        debit: Set(line.debit),
        credit: Set(line.credit),
        balance_before: Set(line.balance_before),
        balance_after: Set(line.balance_after),
        created_at: Set(now),
    };
    Ok(model.insert(txn).await?)
}

async fn number_taken(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    number: &str,
) -> Result<bool, DbErr> {
    let count = journals::Entity::find()
        .filter(journals::Column::CompanyId.eq(company_id))
        .filter(journals::Column::JournalNumber.eq(number))
        .count(txn)
        .await?;
    Ok(count > 0)
}

/// Generates the next journal number from the month's count of journals
/// in the same number series, inside the caller's transaction.
///
/// Payroll journals carry the `PAY` prefix and their own sequence; every
/// other source shares the `JU` series.
async fn next_journal_number(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    date: NaiveDate,
    source: JournalSource,
) -> Result<String, JournalError> {
    let payroll = crate::entities::sea_orm_active_enums::JournalSource::Payroll;
    let (from, to) = month_bounds(date);
    let mut query = journals::Entity::find()
        .filter(journals::Column::CompanyId.eq(company_id))
        .filter(journals::Column::JournalDate.gte(from))
        .filter(journals::Column::JournalDate.lte(to));
    let document_type = if source == JournalSource::Payroll {
        query = query.filter(journals::Column::Source.eq(payroll));
        DocumentType::Payroll
    } else {
        query = query.filter(journals::Column::Source.ne(payroll));
        DocumentType::Journal
    };
    let existing = query.count(txn).await?;
    Ok(numbering::format_number(
        document_type,
        date,
        numbering::next_sequence(existing),
    ))
}

/// The first and last day of the month containing `date`.
pub(crate) fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(date);
    (first, last)
}

/// Maps a unique-violation insert failure to the retryable duplicate
/// number error; any other failure passes through.
fn map_unique_violation(err: DbErr, number: &str) -> JournalError {
    if err.to_string().contains("uq_journal_company_number") {
        LedgerError::DuplicateNumber(number.to_string()).into()
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn journal_input() -> CreateJournalInput {
        CreateJournalInput {
            company_id: Uuid::new_v4(),
            period_id: None,
            journal_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "Cash sale".to_string(),
            journal_number: None,
            source: JournalSource::Manual,
            source_id: None,
            lines: vec![],
            created_by: Uuid::new_v4(),
        }
    }

    // The role gate fires before any connection use, so a disconnected
    // handle is enough to exercise it.
    #[tokio::test]
    async fn test_viewer_cannot_post_or_delete() {
        let repo = JournalRepository::new(DatabaseConnection::default());

        let err = repo
            .create_journal(Role::Viewer, journal_input())
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Forbidden(_)));

        let err = repo
            .delete_journal(Role::Viewer, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Forbidden(_)));

        let err = repo
            .post_from_transaction(Role::Viewer, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Forbidden(_)));

        let err = repo
            .void_transaction(Role::Viewer, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Forbidden(_)));

        let err = repo
            .batch_post(Role::Viewer, vec![Uuid::new_v4()], Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Forbidden(_)));

        let err = repo
            .post_from_voucher(Role::Viewer, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Forbidden(_)));
    }

    #[test]
    fn test_month_bounds() {
        let (from, to) = month_bounds(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        let (from, to) = month_bounds(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        let (from, to) = month_bounds(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
