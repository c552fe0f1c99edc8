//! Recurring transaction scheduler repository.
//!
//! `process_due` runs each due template in its own unit of work: one
//! template's failure is recorded and never aborts the rest of the batch.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use saldo_core::recurring::{
    Frequency, RunOutcome, TemplateLine, advance, is_due, template_total,
};
use saldo_core::recurring::RecurringError as CoreRecurringError;
use saldo_shared::config::NumberingConfig;
use saldo_core::numbering::{self, DocumentType};

use crate::entities::{
    recurring_runs, recurring_template_lines, recurring_templates,
    sea_orm_active_enums::{RunStatus, TransactionType},
    transactions,
};
use crate::repositories::journal::{
    JournalError, month_bounds, post_transaction_in, with_numbering_retry,
};
use crate::repositories::transaction::{
    CreateTransactionInput, TransactionError, TransactionItemInput, insert_transaction_numbered,
};

const DEFAULT_MAX_RETRIES: u32 = 5;

/// Error types for recurring template operations.
#[derive(Debug, thiserror::Error)]
pub enum RecurringError {
    /// A scheduling rule was violated.
    #[error(transparent)]
    Core(#[from] CoreRecurringError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for a single template line.
#[derive(Debug, Clone)]
pub struct TemplateLineInput {
    /// The account to post to.
    pub account_id: Uuid,
    /// Optional line description.
    pub description: Option<String>,
    /// Debit amount (0 if credit line).
    pub debit: Decimal,
    /// Credit amount (0 if debit line).
    pub credit: Decimal,
}

/// Input for creating a recurring template.
#[derive(Debug, Clone)]
pub struct CreateTemplateInput {
    /// Company ID.
    pub company_id: Uuid,
    /// Template name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// The kind of document the template generates.
    pub transaction_type: TransactionType,
    /// How often the template fires.
    pub frequency: Frequency,
    /// Day interval for the custom frequency.
    pub interval_days: Option<u32>,
    /// First run date.
    pub start_date: NaiveDate,
    /// Last run date (inclusive), open-ended when absent.
    pub end_date: Option<NaiveDate>,
    /// Post generated documents immediately.
    pub auto_posting: bool,
    /// The typed lines.
    pub lines: Vec<TemplateLineInput>,
}

/// The outcome summary of one scheduler pass.
#[derive(Debug, Default)]
pub struct ProcessSummary {
    /// Templates that were due.
    pub processed: u64,
    /// Runs that generated a document.
    pub succeeded: u64,
    /// Runs that failed (recorded, not fatal).
    pub failed: u64,
}

/// Recurring repository for template management and scheduled generation.
#[derive(Debug, Clone)]
pub struct RecurringRepository {
    db: DatabaseConnection,
    max_retries: u32,
}

impl RecurringRepository {
    /// Creates a new recurring repository with the default retry bound.
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

    /// Creates a recurring template with its typed lines.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTemplate` when no lines are given.
    pub async fn create_template(
        &self,
        input: CreateTemplateInput,
    ) -> Result<recurring_templates::Model, RecurringError> {
        if input.lines.is_empty() {
            return Err(CoreRecurringError::EmptyTemplate.into());
        }

        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let template_id = Uuid::new_v4();

        let template = recurring_templates::ActiveModel {
            id: Set(template_id),
            company_id: Set(input.company_id),
            name: Set(input.name),
            description: Set(input.description),
            transaction_type: Set(input.transaction_type),
            frequency: Set(input.frequency.into()),
            interval_days: Set(input.interval_days.map(|d| i32::try_from(d).unwrap_or(1))),
            next_run_at: Set(input.start_date),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            is_active: Set(true),
            auto_posting: Set(input.auto_posting),
            executions_total: Set(0),
            success_total: Set(0),
            failure_total: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = template.insert(&txn).await?;

        for line in &input.lines {
            let model = recurring_template_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                template_id: Set(template_id),
                account_id: Set(line.account_id),
                description: Set(line.description.clone()),
                debit: Set(line.debit),
                credit: Set(line.credit),
                created_at: Set(now),
            };
            model.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok(created)
    }

    /// Lists a company's templates.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_templates(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<recurring_templates::Model>, RecurringError> {
        Ok(recurring_templates::Entity::find()
            .filter(recurring_templates::Column::CompanyId.eq(company_id))
            .order_by_asc(recurring_templates::Column::NextRunAt)
            .all(&self.db)
            .await?)
    }

    /// Lists the run history of a template, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn run_history(
        &self,
        template_id: Uuid,
    ) -> Result<Vec<recurring_runs::Model>, RecurringError> {
        Ok(recurring_runs::Entity::find()
            .filter(recurring_runs::Column::TemplateId.eq(template_id))
            .order_by_desc(recurring_runs::Column::RunAt)
            .all(&self.db)
            .await?)
    }

    /// Deactivates a template.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` when the id does not exist.
    pub async fn deactivate_template(
        &self,
        id: Uuid,
    ) -> Result<recurring_templates::Model, RecurringError> {
        let template = recurring_templates::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CoreRecurringError::TemplateNotFound(id))?;
        let mut active: recurring_templates::ActiveModel = template.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Processes every due template.
    ///
    /// Each due template generates a transaction from its typed line list
    /// (total = sum of each line's debit-or-credit value) with an `RTR`
    /// document number, posts it immediately when `auto_posting` is set,
    /// records a history row, advances `next_run_at`, and bumps the
    /// execution counters. Failures are isolated per template.
    ///
    /// # Errors
    ///
    /// Returns an error only when the due-template query itself fails;
    /// per-template failures are recorded in the summary and history.
    pub async fn process_due(&self, now: NaiveDate, actor: Uuid) -> Result<ProcessSummary, RecurringError> {
        let due = recurring_templates::Entity::find()
            .filter(recurring_templates::Column::IsActive.eq(true))
            .filter(recurring_templates::Column::NextRunAt.lte(now))
            .filter(
                Condition::any()
                    .add(recurring_templates::Column::EndDate.is_null())
                    .add(recurring_templates::Column::EndDate.gte(now)),
            )
            .order_by_asc(recurring_templates::Column::NextRunAt)
            .all(&self.db)
            .await?;

        let mut summary = ProcessSummary::default();
        for template in due {
            // Belt and braces on top of the query filter.
            if !is_due(template.is_active, template.next_run_at, template.end_date, now) {
                continue;
            }
            summary.processed += 1;

            let outcome = self.run_template(&template, now, actor).await;
            match &outcome {
                RunOutcome::Success { .. } => summary.succeeded += 1,
                RunOutcome::Failure { message } => {
                    summary.failed += 1;
                    tracing::warn!(
                        template_id = %template.id,
                        error = %message,
                        "recurring template run failed"
                    );
                }
            }
            if let Err(err) = self.record_outcome(&template, now, &outcome).await {
                tracing::error!(
                    template_id = %template.id,
                    error = %err,
                    "failed to record recurring run outcome"
                );
            }
        }

        tracing::info!(
            processed = summary.processed,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "recurring scheduler pass complete"
        );
        Ok(summary)
    }

    /// Generates one template's document in its own unit of work.
    async fn run_template(
        &self,
        template: &recurring_templates::Model,
        now: NaiveDate,
        actor: Uuid,
    ) -> RunOutcome {
        let result = with_numbering_retry(&self.db, self.max_retries, |txn| {
            generate_in(txn, template.clone(), now, actor)
        })
        .await;
        match result {
            Ok(transaction_id) => RunOutcome::Success { transaction_id },
            Err(err) => RunOutcome::Failure {
                message: err.to_string(),
            },
        }
    }

    /// Writes the history row, advances the schedule, and bumps counters.
    ///
    /// Runs in its own transaction so a generation failure still leaves a
    /// history trail.
    async fn record_outcome(
        &self,
        template: &recurring_templates::Model,
        now: NaiveDate,
        outcome: &RunOutcome,
    ) -> Result<(), RecurringError> {
        let txn = self.db.begin().await?;

        let lines = template_lines(&txn, template.id).await?;
        let snapshot = serde_json::json!({
            "template_name": template.name,
            "run_date": now,
            "total": template_total(&lines).unwrap_or(Decimal::ZERO),
            "lines": lines,
        });

        let (status, transaction_id, error_message) = match outcome {
            RunOutcome::Success { transaction_id } => {
                (RunStatus::Success, Some(*transaction_id), None)
            }
            RunOutcome::Failure { message } => (RunStatus::Failure, None, Some(message.clone())),
        };

        let run = recurring_runs::ActiveModel {
            id: Set(Uuid::new_v4()),
            template_id: Set(template.id),
            run_at: Set(Utc::now().into()),
            status: Set(status),
            transaction_id: Set(transaction_id),
            error_message: Set(error_message),
            snapshot: Set(Some(snapshot)),
            created_at: Set(Utc::now().into()),
        };
        run.insert(&txn).await?;

        let next_run = advance(
            template.next_run_at,
            template.frequency.into(),
            template.interval_days.and_then(|d| u32::try_from(d).ok()),
        )?;

        let mut active: recurring_templates::ActiveModel = template.clone().into();
        active.next_run_at = Set(next_run);
        active.executions_total = Set(template.executions_total + 1);
        match outcome {
            RunOutcome::Success { .. } => {
                active.success_total = Set(template.success_total + 1);
            }
            RunOutcome::Failure { .. } => {
                active.failure_total = Set(template.failure_total + 1);
            }
        }
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}

/// Generates the template's transaction (and posts it when auto-posting)
/// inside one database transaction.
async fn generate_in(
    txn: DatabaseTransaction,
    template: recurring_templates::Model,
    now: NaiveDate,
    actor: Uuid,
) -> Result<(DatabaseTransaction, Uuid), JournalError> {
    let lines = template_lines(&txn, template.id).await?;
    let total = template_total(&lines)
        .map_err(|_| JournalError::Ledger(saldo_core::ledger::LedgerError::EmptyJournal))?;

    let items: Vec<TransactionItemInput> = lines
        .iter()
        .map(|line| TransactionItemInput {
            account_id: line.account_id,
            description: line.description.clone(),
            quantity: Decimal::ONE,
            unit_price: line.value(),
            discount: Decimal::ZERO,
            item_id: None,
            asset_id: None,
        })
        .collect();

    let input = CreateTransactionInput {
        company_id: template.company_id,
        transaction_type: template.transaction_type,
        transaction_date: now,
        description: template
            .description
            .clone()
            .unwrap_or_else(|| format!("Recurring: {}", template.name)),
        contact_id: None,
        contact_name: None,
        tax_amount: Decimal::ZERO,
        items,
    };
    let number = next_recurring_number(&txn, template.company_id, now).await?;
    let created = insert_transaction_numbered(&txn, &input, number)
        .await
        .map_err(transaction_err)?;
    debug_assert_eq!(created.transaction.total, total);

    if template.auto_posting {
        let (txn, _journal) = post_transaction_in(txn, created.transaction.id, actor).await?;
        return Ok((txn, created.transaction.id));
    }
    Ok((txn, created.transaction.id))
}

/// Generates the next `RTR` number from the month's count of
/// recurring-generated transactions.
async fn next_recurring_number(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    date: NaiveDate,
) -> Result<String, JournalError> {
    let (from, to) = month_bounds(date);
    let existing = transactions::Entity::find()
        .filter(transactions::Column::CompanyId.eq(company_id))
        .filter(transactions::Column::TransactionNumber.starts_with("RTR/"))
        .filter(transactions::Column::TransactionDate.gte(from))
        .filter(transactions::Column::TransactionDate.lte(to))
        .count(txn)
        .await?;
    Ok(numbering::format_number(
        DocumentType::Recurring,
        date,
        numbering::next_sequence(existing),
    ))
}

async fn template_lines(
    txn: &DatabaseTransaction,
    template_id: Uuid,
) -> Result<Vec<TemplateLine>, DbErr> {
    Ok(recurring_template_lines::Entity::find()
        .filter(recurring_template_lines::Column::TemplateId.eq(template_id))
        .all(txn)
        .await?
        .into_iter()
        .map(|line| TemplateLine {
            account_id: line.account_id,
            description: line.description,
            debit: line.debit,
            credit: line.credit,
        })
        .collect())
}

fn transaction_err(err: TransactionError) -> JournalError {
    match err {
        TransactionError::Ledger(e) => JournalError::Ledger(e),
        TransactionError::Database(e) => JournalError::Database(e),
        other => JournalError::Ledger(saldo_core::ledger::LedgerError::Database(other.to_string())),
    }
}
