//! Accounting period repository.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{accounting_periods, journals, sea_orm_active_enums::PeriodStatus};

/// Error types for period operations.
#[derive(Debug, thiserror::Error)]
pub enum PeriodError {
    /// Period not found.
    #[error("Accounting period not found: {0}")]
    NotFound(Uuid),

    /// No period covers the date.
    #[error("No accounting period covers date {0}")]
    NoneForDate(NaiveDate),

    /// Start date after end date.
    #[error("Period start date must not be after end date")]
    InvalidRange,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an accounting period.
#[derive(Debug, Clone)]
pub struct CreatePeriodInput {
    /// Company ID.
    pub company_id: Uuid,
    /// Period name, e.g. "January 2024".
    pub name: String,
    /// Start date (inclusive).
    pub start_date: NaiveDate,
    /// End date (inclusive).
    pub end_date: NaiveDate,
}

/// Period repository for accounting period management.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new open period.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when start is after end.
    pub async fn create_period(
        &self,
        input: CreatePeriodInput,
    ) -> Result<accounting_periods::Model, PeriodError> {
        if input.start_date > input.end_date {
            return Err(PeriodError::InvalidRange);
        }

        let now = Utc::now().into();
        let period = accounting_periods::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(input.company_id),
            name: Set(input.name),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set(PeriodStatus::Open),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(period.insert(&self.db).await?)
    }

    /// Finds a period by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id does not exist.
    pub async fn find_period(&self, id: Uuid) -> Result<accounting_periods::Model, PeriodError> {
        accounting_periods::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PeriodError::NotFound(id))
    }

    /// Finds the period of a company covering the given date.
    ///
    /// # Errors
    ///
    /// Returns `NoneForDate` when no period covers the date.
    pub async fn find_covering(
        &self,
        company_id: Uuid,
        date: NaiveDate,
    ) -> Result<accounting_periods::Model, PeriodError> {
        find_covering_in(&self.db, company_id, date)
            .await?
            .ok_or(PeriodError::NoneForDate(date))
    }

    /// Lists a company's periods, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_periods(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<accounting_periods::Model>, PeriodError> {
        Ok(accounting_periods::Entity::find()
            .filter(accounting_periods::Column::CompanyId.eq(company_id))
            .order_by_desc(accounting_periods::Column::StartDate)
            .all(&self.db)
            .await?)
    }

    /// Closes a period, blocking all further posting into it.
    ///
    /// The period's journals are flagged closed in the same transaction,
    /// so the document-level delete gate holds without a period join.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id does not exist.
    pub async fn close_period(&self, id: Uuid) -> Result<accounting_periods::Model, PeriodError> {
        self.set_status(id, PeriodStatus::Closed).await
    }

    /// Reopens a closed period and unflags its journals.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id does not exist.
    pub async fn reopen_period(&self, id: Uuid) -> Result<accounting_periods::Model, PeriodError> {
        self.set_status(id, PeriodStatus::Open).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: PeriodStatus,
    ) -> Result<accounting_periods::Model, PeriodError> {
        let txn = self.db.begin().await?;
        let period = accounting_periods::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(PeriodError::NotFound(id))?;

        let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
        let closed = status == PeriodStatus::Closed;
        let mut active: accounting_periods::ActiveModel = period.into();
        active.status = Set(status);
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        journals::Entity::update_many()
            .set(journals::ActiveModel {
                is_closed: Set(closed),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(journals::Column::PeriodId.eq(id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        tracing::info!(period_id = %id, status = ?updated.status, "period status changed");
        Ok(updated)
    }
}

/// Finds the period covering a date on any connection (used inside
/// database transactions by the posting paths).
pub(crate) async fn find_covering_in<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    date: NaiveDate,
) -> Result<Option<accounting_periods::Model>, DbErr> {
    accounting_periods::Entity::find()
        .filter(accounting_periods::Column::CompanyId.eq(company_id))
        .filter(accounting_periods::Column::StartDate.lte(date))
        .filter(accounting_periods::Column::EndDate.gte(date))
        .one(conn)
        .await
}
