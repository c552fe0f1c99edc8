//! Report repository: feeds store rows into the pure aggregator.
//!
//! Statements come from `saldo_core::reports::ReportService`; this module
//! only selects and shapes the rows. Subsidiary ledgers read transaction
//! and item rows, not journal lines.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use uuid::Uuid;

use saldo_core::reports::{
    AccountMovement, BalanceSheet, CashFlowStatement, IncomeStatement, OpenDocumentRow,
    ReportAccount, ReportService, SubsidiaryRow, TrialBalance,
};

use crate::entities::{
    chart_of_accounts, journal_lines, journals, posting_profiles,
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transaction_items, transactions,
};

/// Error types for report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The cash flow report needs the posting profile's cash code prefix.
    #[error("No cash account code prefix is configured in the posting profile")]
    NoCashPrefix,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One inventory movement, from a transaction item with an item reference.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryMovementRow {
    /// The inventory item.
    pub item_id: Uuid,
    /// The document the movement came from.
    pub transaction_id: Uuid,
    /// Document number.
    pub number: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Sale (out) or purchase (in).
    pub transaction_type: TransactionType,
    /// Item description.
    pub description: Option<String>,
    /// Quantity moved.
    pub quantity: Decimal,
    /// Unit price on the document.
    pub unit_price: Decimal,
    /// Line subtotal.
    pub subtotal: Decimal,
}

/// One fixed-asset acquisition, from a purchase item with an asset
/// reference.
#[derive(Debug, Clone, Serialize)]
pub struct FixedAssetRow {
    /// The fixed asset.
    pub asset_id: Uuid,
    /// The acquiring document.
    pub transaction_id: Uuid,
    /// Document number.
    pub number: String,
    /// Acquisition date.
    pub date: NaiveDate,
    /// Item description.
    pub description: Option<String>,
    /// Acquisition cost.
    pub cost: Decimal,
}

/// Report repository for financial statements and subsidiary ledgers.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Balance sheet over current running balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_sheet(&self, company_id: Uuid) -> Result<BalanceSheet, ReportError> {
        let accounts = self.report_accounts(company_id).await?;
        Ok(ReportService::balance_sheet(&accounts))
    }

    /// Income statement over journal-line movements in the date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn income_statement(
        &self,
        company_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<IncomeStatement, ReportError> {
        let movements = self.movements(company_id, Some(from), to).await?;
        Ok(ReportService::income_statement(&movements))
    }

    /// Cash flow statement from cash-account movements in the date range.
    ///
    /// Cash accounts are the ones whose code starts with the posting
    /// profile's `cash_account_code_prefix`.
    ///
    /// # Errors
    ///
    /// Returns `NoCashPrefix` when the company has no configured prefix.
    pub async fn cash_flow(
        &self,
        company_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<CashFlowStatement, ReportError> {
        let prefix = posting_profiles::Entity::find()
            .filter(posting_profiles::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .and_then(|profile| profile.cash_account_code_prefix)
            .ok_or(ReportError::NoCashPrefix)?;

        let movements = self.movements(company_id, Some(from), to).await?;
        let cash: Vec<AccountMovement> = movements
            .into_iter()
            .filter(|m| m.code.starts_with(&prefix))
            .collect();
        Ok(ReportService::cash_flow(&cash))
    }

    /// Trial balance as of a cutoff date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn trial_balance(
        &self,
        company_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<TrialBalance, ReportError> {
        let accounts = self.report_accounts(company_id).await?;
        let movements = self.movements(company_id, None, as_of).await?;
        Ok(ReportService::trial_balance(&accounts, &movements))
    }

    /// Accounts receivable subsidiary ledger: open sales by customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn receivables(&self, company_id: Uuid) -> Result<Vec<SubsidiaryRow>, ReportError> {
        let documents = self
            .open_documents(company_id, TransactionType::Sale)
            .await?;
        Ok(ReportService::subsidiary_ledger(&documents))
    }

    /// Accounts payable subsidiary ledger: open purchases by supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn payables(&self, company_id: Uuid) -> Result<Vec<SubsidiaryRow>, ReportError> {
        let documents = self
            .open_documents(company_id, TransactionType::Purchase)
            .await?;
        Ok(ReportService::subsidiary_ledger(&documents))
    }

    /// Inventory movements from transaction items carrying an item
    /// reference, ordered by item then date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn inventory_movements(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<InventoryMovementRow>, ReportError> {
        let headers = self.non_voided_transactions(company_id).await?;
        let ids: Vec<Uuid> = headers.keys().copied().collect();

        let items = transaction_items::Entity::find()
            .filter(transaction_items::Column::TransactionId.is_in(ids))
            .filter(transaction_items::Column::ItemId.is_not_null())
            .all(&self.db)
            .await?;

        let mut rows: Vec<InventoryMovementRow> = items
            .into_iter()
            .filter_map(|item| {
                let header = headers.get(&item.transaction_id)?;
                let item_id = item.item_id?;
                Some(InventoryMovementRow {
                    item_id,
                    transaction_id: header.id,
                    number: header.transaction_number.clone(),
                    date: header.transaction_date,
                    transaction_type: header.transaction_type,
                    description: item.description,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    subtotal: item.subtotal,
                })
            })
            .collect();
        rows.sort_by(|a, b| (a.item_id, a.date).cmp(&(b.item_id, b.date)));
        Ok(rows)
    }

    /// Fixed-asset register from purchase items carrying an asset
    /// reference, ordered by acquisition date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fixed_assets(&self, company_id: Uuid) -> Result<Vec<FixedAssetRow>, ReportError> {
        let headers = self.non_voided_transactions(company_id).await?;
        let ids: Vec<Uuid> = headers
            .values()
            .filter(|t| t.transaction_type == TransactionType::Purchase)
            .map(|t| t.id)
            .collect();

        let items = transaction_items::Entity::find()
            .filter(transaction_items::Column::TransactionId.is_in(ids))
            .filter(transaction_items::Column::AssetId.is_not_null())
            .all(&self.db)
            .await?;

        let mut rows: Vec<FixedAssetRow> = items
            .into_iter()
            .filter_map(|item| {
                let header = headers.get(&item.transaction_id)?;
                let asset_id = item.asset_id?;
                Some(FixedAssetRow {
                    asset_id,
                    transaction_id: header.id,
                    number: header.transaction_number.clone(),
                    date: header.transaction_date,
                    description: item.description,
                    cost: item.subtotal,
                })
            })
            .collect();
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }

    /// Active postable accounts shaped for the aggregator.
    async fn report_accounts(&self, company_id: Uuid) -> Result<Vec<ReportAccount>, ReportError> {
        Ok(active_accounts(&self.db, company_id)
            .await?
            .into_iter()
            .map(|account| ReportAccount {
                id: account.id,
                code: account.code,
                name: account.name,
                account_type: account.account_type.into(),
                normal_balance: account.normal_balance.into(),
                opening_balance: account.opening_balance,
                current_balance: account.current_balance,
            })
            .collect())
    }

    /// Per-account debit/credit sums over journal lines in the date range.
    ///
    /// `from = None` means everything up to `to` (trial balance cutoff).
    async fn movements(
        &self,
        company_id: Uuid,
        from: Option<NaiveDate>,
        to: NaiveDate,
    ) -> Result<Vec<AccountMovement>, ReportError> {
        let mut journal_query = journals::Entity::find()
            .filter(journals::Column::CompanyId.eq(company_id))
            .filter(journals::Column::JournalDate.lte(to));
        if let Some(from) = from {
            journal_query = journal_query.filter(journals::Column::JournalDate.gte(from));
        }
        let journal_ids: Vec<Uuid> = journal_query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|j| j.id)
            .collect();

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalId.is_in(journal_ids))
            .all(&self.db)
            .await?;

        let mut sums: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        for line in lines {
            let entry = sums.entry(line.account_id).or_default();
            entry.0 += line.debit;
            entry.1 += line.credit;
        }

        Ok(active_accounts(&self.db, company_id)
            .await?
            .into_iter()
            .filter_map(|account| {
                let (debit, credit) = sums.get(&account.id).copied()?;
                Some(AccountMovement {
                    account_id: account.id,
                    code: account.code,
                    name: account.name,
                    account_type: account.account_type.into(),
                    normal_balance: account.normal_balance.into(),
                    debit,
                    credit,
                })
            })
            .collect())
    }

    /// Non-voided transaction headers keyed by id.
    async fn non_voided_transactions(
        &self,
        company_id: Uuid,
    ) -> Result<HashMap<Uuid, transactions::Model>, ReportError> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::CompanyId.eq(company_id))
            .filter(transactions::Column::Status.ne(TransactionStatus::Voided))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect())
    }

    /// Non-voided documents of one type with an outstanding balance.
    async fn open_documents(
        &self,
        company_id: Uuid,
        transaction_type: TransactionType,
    ) -> Result<Vec<OpenDocumentRow>, ReportError> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::CompanyId.eq(company_id))
            .filter(transactions::Column::TransactionType.eq(transaction_type))
            .filter(transactions::Column::Status.ne(TransactionStatus::Voided))
            .filter(transactions::Column::RemainingBalance.gt(Decimal::ZERO))
            .order_by_asc(transactions::Column::TransactionDate)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| OpenDocumentRow {
                transaction_id: t.id,
                number: t.transaction_number,
                date: t.transaction_date,
                contact_name: t.contact_name.unwrap_or_else(|| "Unknown".to_string()),
                total: t.total,
                amount_paid: t.amount_paid,
                remaining_balance: t.remaining_balance,
            })
            .collect())
    }
}

/// Active non-header accounts for a company, code-ordered.
async fn active_accounts(
    db: &DatabaseConnection,
    company_id: Uuid,
) -> Result<Vec<chart_of_accounts::Model>, DbErr> {
    chart_of_accounts::Entity::find()
        .filter(chart_of_accounts::Column::CompanyId.eq(company_id))
        .filter(chart_of_accounts::Column::IsActive.eq(true))
        .filter(chart_of_accounts::Column::IsHeader.eq(false))
        .order_by_asc(chart_of_accounts::Column::Code)
        .all(db)
        .await
}
