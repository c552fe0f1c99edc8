//! Trade transaction repository for sales and purchase documents.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use saldo_core::ledger::LedgerError;
use saldo_core::numbering::{self, DocumentType};

use crate::entities::{
    sea_orm_active_enums::{PaymentStatus, TransactionStatus, TransactionType},
    transaction_items, transactions,
};
use crate::repositories::journal::month_bounds;

/// Error types for trade transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// A posting or state rule was violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A transaction must carry at least one item.
    #[error("Transaction must have at least one item")]
    NoItems,

    /// Payment amount must be positive.
    #[error("Payment amount must be positive")]
    InvalidPayment,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for a single transaction item.
#[derive(Debug, Clone)]
pub struct TransactionItemInput {
    /// The revenue/expense account for this item.
    pub account_id: Uuid,
    /// Item description.
    pub description: Option<String>,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Discount subtracted from `quantity * unit_price`.
    pub discount: Decimal,
    /// Inventory item reference.
    pub item_id: Option<Uuid>,
    /// Fixed asset reference.
    pub asset_id: Option<Uuid>,
}

impl TransactionItemInput {
    /// The item subtotal after discount.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.quantity * self.unit_price - self.discount
    }
}

/// Input for creating a trade transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Company ID.
    pub company_id: Uuid,
    /// Sale or purchase.
    pub transaction_type: TransactionType,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Customer/supplier reference.
    pub contact_id: Option<Uuid>,
    /// Customer/supplier display name.
    pub contact_name: Option<String>,
    /// Tax on top of the item subtotals.
    pub tax_amount: Decimal,
    /// The items.
    pub items: Vec<TransactionItemInput>,
}

/// Transaction with its items.
#[derive(Debug, Clone)]
pub struct TransactionWithItems {
    /// Transaction header.
    pub transaction: transactions::Model,
    /// Item rows.
    pub items: Vec<transaction_items::Model>,
}

/// Transaction repository for trade document management.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft transaction with its items.
    ///
    /// The document number (`INV`/`PUR`) is generated from the month's
    /// count inside the same database transaction as the insert.
    ///
    /// # Errors
    ///
    /// Returns `NoItems` for an empty item list.
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<TransactionWithItems, TransactionError> {
        let txn = self.db.begin().await?;
        let created = insert_transaction(&txn, &input).await?;
        txn.commit().await?;
        Ok(created)
    }

    /// Creates a batch of transactions, all-or-nothing.
    ///
    /// The first failure rolls back every document in the batch.
    ///
    /// # Errors
    ///
    /// Returns the first item's error; nothing is persisted on failure.
    pub async fn batch_create(
        &self,
        inputs: Vec<CreateTransactionInput>,
    ) -> Result<Vec<TransactionWithItems>, TransactionError> {
        let txn = self.db.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in &inputs {
            created.push(insert_transaction(&txn, input).await?);
        }
        txn.commit().await?;
        tracing::info!(count = created.len(), "transaction batch created");
        Ok(created)
    }

    /// Deletes a batch of draft transactions, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Posted or voided documents fail the whole batch.
    pub async fn batch_delete(&self, ids: Vec<Uuid>) -> Result<(), TransactionError> {
        let txn = self.db.begin().await?;
        for id in &ids {
            delete_draft(&txn, *id).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    /// Gets a transaction with its items.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` when the id does not exist.
    pub async fn get_transaction(&self, id: Uuid) -> Result<TransactionWithItems, TransactionError> {
        let transaction = transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::TransactionNotFound(id))?;
        let items = transaction_items::Entity::find()
            .filter(transaction_items::Column::TransactionId.eq(id))
            .all(&self.db)
            .await?;
        Ok(TransactionWithItems { transaction, items })
    }

    /// Lists a company's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::CompanyId.eq(company_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Deletes a draft transaction and its items.
    ///
    /// # Errors
    ///
    /// Posted transactions must be voided instead; voided ones are
    /// immutable.
    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), TransactionError> {
        let txn = self.db.begin().await?;
        delete_draft(&txn, id).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Records a payment against a transaction.
    ///
    /// Updates `amount_paid`, `remaining_balance`, and the payment status
    /// (`unpaid`, `partially_paid`, `paid`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidPayment` for non-positive amounts and `Voided` for
    /// voided documents.
    pub async fn record_payment(
        &self,
        id: Uuid,
        amount: Decimal,
    ) -> Result<transactions::Model, TransactionError> {
        if amount <= Decimal::ZERO {
            return Err(TransactionError::InvalidPayment);
        }

        let txn = self.db.begin().await?;
        let transaction = transactions::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(LedgerError::TransactionNotFound(id))?;
        if transaction.status == TransactionStatus::Voided {
            return Err(LedgerError::Voided(id).into());
        }

        let amount_paid = transaction.amount_paid + amount;
        let remaining = transaction.total - amount_paid;
        let payment_status = if remaining <= Decimal::ZERO {
            PaymentStatus::Paid
        } else if amount_paid > Decimal::ZERO {
            PaymentStatus::PartiallyPaid
        } else {
            PaymentStatus::Unpaid
        };

        let mut active: transactions::ActiveModel = transaction.into();
        active.amount_paid = Set(amount_paid);
        active.remaining_balance = Set(remaining);
        active.payment_status = Set(payment_status);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }
}

/// Inserts a transaction header and items inside the caller's database
/// transaction.
pub(crate) async fn insert_transaction(
    txn: &DatabaseTransaction,
    input: &CreateTransactionInput,
) -> Result<TransactionWithItems, TransactionError> {
    let number = next_transaction_number(
        txn,
        input.company_id,
        input.transaction_type,
        input.transaction_date,
    )
    .await?;
    insert_transaction_numbered(txn, input, number).await
}

/// Inserts a transaction with a caller-supplied document number (used by
/// the recurring scheduler's `RTR` series).
pub(crate) async fn insert_transaction_numbered(
    txn: &DatabaseTransaction,
    input: &CreateTransactionInput,
    number: String,
) -> Result<TransactionWithItems, TransactionError> {
    if input.items.is_empty() {
        return Err(TransactionError::NoItems);
    }

    let subtotal: Decimal = input.items.iter().map(TransactionItemInput::subtotal).sum();
    let total = subtotal + input.tax_amount;

    let now = Utc::now().into();
    let transaction_id = Uuid::new_v4();
    let header = transactions::ActiveModel {
        id: Set(transaction_id),
        company_id: Set(input.company_id),
        transaction_number: Set(number),
        transaction_type: Set(input.transaction_type),
        transaction_date: Set(input.transaction_date),
        description: Set(input.description.clone()),
        contact_id: Set(input.contact_id),
        contact_name: Set(input.contact_name.clone()),
        subtotal: Set(subtotal),
        tax_amount: Set(input.tax_amount),
        total: Set(total),
        amount_paid: Set(Decimal::ZERO),
        remaining_balance: Set(total),
        payment_status: Set(PaymentStatus::Unpaid),
        status: Set(TransactionStatus::Draft),
        posted_journal_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let transaction = header.insert(txn).await?;

    let mut items = Vec::with_capacity(input.items.len());
    for item in &input.items {
        let model = transaction_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            transaction_id: Set(transaction_id),
            account_id: Set(item.account_id),
            description: Set(item.description.clone()),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            discount: Set(item.discount),
            subtotal: Set(item.subtotal()),
            item_id: Set(item.item_id),
            asset_id: Set(item.asset_id),
            created_at: Set(now),
        };
        items.push(model.insert(txn).await?);
    }

    Ok(TransactionWithItems { transaction, items })
}

async fn delete_draft(txn: &DatabaseTransaction, id: Uuid) -> Result<(), TransactionError> {
    let transaction = transactions::Entity::find_by_id(id)
        .one(txn)
        .await?
        .ok_or(LedgerError::TransactionNotFound(id))?;
    match transaction.status {
        TransactionStatus::Posted => return Err(LedgerError::AlreadyPosted(id).into()),
        TransactionStatus::Voided => return Err(LedgerError::Voided(id).into()),
        TransactionStatus::Draft => {}
    }

    transaction_items::Entity::delete_many()
        .filter(transaction_items::Column::TransactionId.eq(id))
        .exec(txn)
        .await?;
    transactions::Entity::delete_by_id(id).exec(txn).await?;
    Ok(())
}

/// Generates the next `INV`/`PUR` number from the month's count of
/// documents in the same number series, inside the caller's transaction.
///
/// Scheduler-generated documents share this table under the `RTR` prefix,
/// so the count goes by number prefix rather than transaction type to
/// keep each series gap-free.
pub(crate) async fn next_transaction_number(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    transaction_type: TransactionType,
    date: NaiveDate,
) -> Result<String, DbErr> {
    let document_type = match transaction_type {
        TransactionType::Sale => DocumentType::Sale,
        TransactionType::Purchase => DocumentType::Purchase,
    };
    let prefix = format!("{}/", document_type.prefix());
    let (from, to) = month_bounds(date);
    let existing = transactions::Entity::find()
        .filter(transactions::Column::CompanyId.eq(company_id))
        .filter(transactions::Column::TransactionNumber.starts_with(prefix))
        .filter(transactions::Column::TransactionDate.gte(from))
        .filter(transactions::Column::TransactionDate.lte(to))
        .count(txn)
        .await?;
    Ok(numbering::format_number(
        document_type,
        date,
        numbering::next_sequence(existing),
    ))
}
