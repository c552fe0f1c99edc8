//! Account repository for chart of accounts database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use saldo_core::coa::{
    AccountNode, AccountRecord, CoaError, CoaService, CreateAccountInput, UpdateAccountPatch,
    build_hierarchy,
};
use saldo_shared::AppError;
use saldo_shared::role::{Role, require_account_management_role};

use crate::entities::{chart_of_accounts, journal_lines};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// A chart-of-accounts rule was violated.
    #[error(transparent)]
    Coa(#[from] CoaError),

    /// The actor's role does not permit the operation.
    #[error(transparent)]
    Forbidden(#[from] AppError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Account repository for CRUD operations on the chart of accounts.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account after validating the registry rules.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for a role without account management rights,
    /// and an error when the code is taken, the parent checks fail, or the
    /// subtype rules are violated.
    pub async fn create_account(
        &self,
        role: Role,
        input: CreateAccountInput,
    ) -> Result<chart_of_accounts::Model, AccountError> {
        require_account_management_role(role)?;
        let code_exists = self
            .code_exists(input.company_id, &input.code)
            .await?;

        let parent = match input.parent_id {
            Some(parent_id) => Some(self.find_record(parent_id).await?),
            None => None,
        };

        let validated = CoaService::validate_create(input, parent.as_ref(), code_exists)?;

        let now = Utc::now().into();
        let account = chart_of_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(validated.input.company_id),
            code: Set(validated.input.code.clone()),
            name: Set(validated.input.name.clone()),
            account_type: Set(validated.input.account_type.into()),
            account_subtype: Set(validated.input.subtype.map(Into::into)),
            normal_balance: Set(validated.normal_balance.into()),
            is_header: Set(validated.input.is_header),
            is_active: Set(true),
            allow_manual_entry: Set(validated.allow_manual_entry),
            parent_id: Set(validated.input.parent_id),
            level: Set(validated.level),
            opening_balance: Set(validated.input.opening_balance),
            current_balance: Set(validated.current_balance),
            notes: Set(validated.input.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Lists all accounts for a company, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<chart_of_accounts::Model>, AccountError> {
        Ok(chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::CompanyId.eq(company_id))
            .order_by_asc(chart_of_accounts::Column::Code)
            .all(&self.db)
            .await?)
    }

    /// Builds the account hierarchy for a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_hierarchy(&self, company_id: Uuid) -> Result<Vec<AccountNode>, AccountError> {
        let accounts = self.list_accounts(company_id).await?;
        Ok(build_hierarchy(
            accounts.into_iter().map(model_to_record).collect(),
        ))
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` when the id does not exist.
    pub async fn find_account(&self, id: Uuid) -> Result<chart_of_accounts::Model, AccountError> {
        chart_of_accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoaError::AccountNotFound(id).into())
    }

    /// Updates an account.
    ///
    /// Accounts with journal lines only accept name/notes/is_active
    /// changes; structural patches are rejected listing the offending
    /// fields. Structural patches on a clean account re-run the creation
    /// rules against the merged state, so a code, type, subtype, or parent
    /// change cannot slip past the registry invariants and the level is
    /// recomputed on reparenting.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for a role without account management rights,
    /// and an error when the account is missing, the patch is structurally
    /// blocked, or the merged state fails validation.
    pub async fn update_account(
        &self,
        role: Role,
        id: Uuid,
        patch: UpdateAccountPatch,
    ) -> Result<chart_of_accounts::Model, AccountError> {
        require_account_management_role(role)?;
        let existing = self.find_account(id).await?;
        let has_lines = self.line_count(id).await? > 0;

        CoaService::validate_update(&patch, has_lines)?;

        let record = model_to_record(existing.clone());
        let merged = CoaService::merge_for_update(&record, &patch);
        if merged.parent_id == Some(id) {
            return Err(CoaError::OwnParent.into());
        }
        let code_taken =
            merged.code != record.code && self.code_exists(record.company_id, &merged.code).await?;
        let parent = match merged.parent_id {
            Some(parent_id) => Some(self.find_record(parent_id).await?),
            None => None,
        };
        let validated = CoaService::validate_create(merged, parent.as_ref(), code_taken)?;

        let opening_changed = patch.opening_balance.is_some();
        let is_active = patch.is_active.unwrap_or(existing.is_active);

        let mut active: chart_of_accounts::ActiveModel = existing.into();
        active.code = Set(validated.input.code.clone());
        active.name = Set(validated.input.name.clone());
        active.account_type = Set(validated.input.account_type.into());
        active.account_subtype = Set(validated.input.subtype.map(Into::into));
        active.normal_balance = Set(validated.normal_balance.into());
        active.parent_id = Set(validated.input.parent_id);
        active.level = Set(validated.level);
        active.allow_manual_entry = Set(validated.allow_manual_entry);
        active.opening_balance = Set(validated.input.opening_balance);
        active.notes = Set(validated.input.notes.clone());
        active.is_active = Set(is_active);
        if opening_changed {
            // Opening balance only changes while the account has no lines,
            // so the running balance still equals it.
            active.current_balance = Set(validated.current_balance);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Hard-deletes an account.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for a role without account management rights;
    /// fails when the account has children or journal lines.
    pub async fn delete_account(&self, role: Role, id: Uuid) -> Result<(), AccountError> {
        require_account_management_role(role)?;
        let account = self.find_account(id).await?;
        let child_count = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::ParentId.eq(id))
            .count(&self.db)
            .await?;
        let line_count = self.line_count(id).await?;

        CoaService::validate_delete(child_count, line_count)?;

        chart_of_accounts::Entity::delete_by_id(account.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Deactivates an account; the soft alternative to deletion.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for a role without account management rights
    /// and `AccountNotFound` when the id does not exist.
    pub async fn deactivate_account(
        &self,
        role: Role,
        id: Uuid,
    ) -> Result<chart_of_accounts::Model, AccountError> {
        require_account_management_role(role)?;
        let existing = self.find_account(id).await?;
        let mut active: chart_of_accounts::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Checks whether a code is already used in a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn code_exists(&self, company_id: Uuid, code: &str) -> Result<bool, AccountError> {
        let count = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::CompanyId.eq(company_id))
            .filter(chart_of_accounts::Column::Code.eq(code))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn find_record(&self, id: Uuid) -> Result<AccountRecord, AccountError> {
        Ok(model_to_record(self.find_account(id).await?))
    }

    async fn line_count(&self, account_id: Uuid) -> Result<u64, AccountError> {
        Ok(journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(account_id))
            .count(&self.db)
            .await?)
    }
}

/// Applies a signed balance delta to an account inside a transaction.
///
/// Every balance touch in the system goes through this one routine.
pub(crate) async fn apply_balance_delta(
    txn: &DatabaseTransaction,
    account_id: Uuid,
    delta: Decimal,
) -> Result<(), DbErr> {
    let account = chart_of_accounts::Entity::find_by_id(account_id)
        .one(txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("account {account_id}")))?;

    let new_balance = account.current_balance + delta;
    let mut active: chart_of_accounts::ActiveModel = account.into();
    active.current_balance = Set(new_balance);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await?;
    Ok(())
}

/// Converts a database model into the core account record.
pub(crate) fn model_to_record(model: chart_of_accounts::Model) -> AccountRecord {
    AccountRecord {
        id: model.id,
        company_id: model.company_id,
        code: model.code,
        name: model.name,
        account_type: model.account_type.into(),
        subtype: model.account_subtype.map(Into::into),
        normal_balance: model.normal_balance.into(),
        is_header: model.is_header,
        is_active: model.is_active,
        allow_manual_entry: model.allow_manual_entry,
        parent_id: model.parent_id,
        level: model.level,
        opening_balance: model.opening_balance,
        current_balance: model.current_balance,
        notes: model.notes,
    }
}
