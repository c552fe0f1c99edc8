//! Postgres enum mappings.
//!
//! Each enum mirrors a `CREATE TYPE ... AS ENUM` in the initial migration.
//! Conversions to and from the core domain enums live here so repositories
//! never match on raw strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use saldo_core::coa;
use saldo_core::ledger;
use saldo_core::recurring;

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    /// Asset account.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability account.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity account.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Revenue account.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Expense account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Account subtype, required for balance-sheet account types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_subtype")]
pub enum AccountSubtype {
    /// Current asset.
    #[sea_orm(string_value = "current_asset")]
    CurrentAsset,
    /// Fixed asset.
    #[sea_orm(string_value = "fixed_asset")]
    FixedAsset,
    /// Other asset.
    #[sea_orm(string_value = "other_asset")]
    OtherAsset,
    /// Current liability.
    #[sea_orm(string_value = "current_liability")]
    CurrentLiability,
    /// Long-term liability.
    #[sea_orm(string_value = "long_term_liability")]
    LongTermLiability,
    /// Owner equity.
    #[sea_orm(string_value = "owner_equity")]
    OwnerEquity,
    /// Retained earnings.
    #[sea_orm(string_value = "retained_earnings")]
    RetainedEarnings,
}

/// Normal balance side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "normal_balance")]
pub enum NormalBalance {
    /// Debit-normal.
    #[sea_orm(string_value = "debit")]
    Debit,
    /// Credit-normal.
    #[sea_orm(string_value = "credit")]
    Credit,
}

/// Accounting period status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_status")]
pub enum PeriodStatus {
    /// Open for posting.
    #[sea_orm(string_value = "open")]
    Open,
    /// Closed, no posting allowed.
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Where a journal originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_source")]
pub enum JournalSource {
    /// Entered by hand.
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Auto-posted from a trade transaction.
    #[sea_orm(string_value = "transaction")]
    Transaction,
    /// Auto-posted from a voucher.
    #[sea_orm(string_value = "voucher")]
    Voucher,
    /// Auto-posted by payroll payment.
    #[sea_orm(string_value = "payroll")]
    Payroll,
    /// Generated by the recurring scheduler.
    #[sea_orm(string_value = "recurring")]
    Recurring,
}

/// Trade transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
pub enum TransactionType {
    /// Sale to a customer.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Purchase from a supplier.
    #[sea_orm(string_value = "purchase")]
    Purchase,
}

/// Trade transaction lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
pub enum TransactionStatus {
    /// Created, not yet posted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Posted to the ledger.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Voided via a reversing journal.
    #[sea_orm(string_value = "voided")]
    Voided,
}

/// Payment settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    /// Nothing received/paid yet.
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Partially settled.
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    /// Fully settled.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Voucher lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "voucher_status")]
pub enum VoucherStatus {
    /// Created, not yet posted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Posted to the ledger.
    #[sea_orm(string_value = "posted")]
    Posted,
}

/// Recurring template frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "recurring_frequency")]
pub enum RecurringFrequency {
    /// Every day.
    #[sea_orm(string_value = "daily")]
    Daily,
    /// Every 7 days.
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Every calendar month.
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Every 3 calendar months.
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    /// Every calendar year.
    #[sea_orm(string_value = "yearly")]
    Yearly,
    /// Every `interval_days` days.
    #[sea_orm(string_value = "custom")]
    Custom,
}

/// Recurring run outcome status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "run_status")]
pub enum RunStatus {
    /// The run generated a transaction.
    #[sea_orm(string_value = "success")]
    Success,
    /// The run failed; recorded with its message.
    #[sea_orm(string_value = "failure")]
    Failure,
}

impl From<AccountType> for coa::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<coa::AccountType> for AccountType {
    fn from(value: coa::AccountType) -> Self {
        match value {
            coa::AccountType::Asset => Self::Asset,
            coa::AccountType::Liability => Self::Liability,
            coa::AccountType::Equity => Self::Equity,
            coa::AccountType::Revenue => Self::Revenue,
            coa::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountSubtype> for coa::AccountSubtype {
    fn from(value: AccountSubtype) -> Self {
        match value {
            AccountSubtype::CurrentAsset => Self::CurrentAsset,
            AccountSubtype::FixedAsset => Self::FixedAsset,
            AccountSubtype::OtherAsset => Self::OtherAsset,
            AccountSubtype::CurrentLiability => Self::CurrentLiability,
            AccountSubtype::LongTermLiability => Self::LongTermLiability,
            AccountSubtype::OwnerEquity => Self::OwnerEquity,
            AccountSubtype::RetainedEarnings => Self::RetainedEarnings,
        }
    }
}

impl From<coa::AccountSubtype> for AccountSubtype {
    fn from(value: coa::AccountSubtype) -> Self {
        match value {
            coa::AccountSubtype::CurrentAsset => Self::CurrentAsset,
            coa::AccountSubtype::FixedAsset => Self::FixedAsset,
            coa::AccountSubtype::OtherAsset => Self::OtherAsset,
            coa::AccountSubtype::CurrentLiability => Self::CurrentLiability,
            coa::AccountSubtype::LongTermLiability => Self::LongTermLiability,
            coa::AccountSubtype::OwnerEquity => Self::OwnerEquity,
            coa::AccountSubtype::RetainedEarnings => Self::RetainedEarnings,
        }
    }
}

impl From<NormalBalance> for coa::NormalBalance {
    fn from(value: NormalBalance) -> Self {
        match value {
            NormalBalance::Debit => Self::Debit,
            NormalBalance::Credit => Self::Credit,
        }
    }
}

impl From<coa::NormalBalance> for NormalBalance {
    fn from(value: coa::NormalBalance) -> Self {
        match value {
            coa::NormalBalance::Debit => Self::Debit,
            coa::NormalBalance::Credit => Self::Credit,
        }
    }
}

impl From<JournalSource> for ledger::JournalSource {
    fn from(value: JournalSource) -> Self {
        match value {
            JournalSource::Manual => Self::Manual,
            JournalSource::Transaction => Self::Transaction,
            JournalSource::Voucher => Self::Voucher,
            JournalSource::Payroll => Self::Payroll,
            JournalSource::Recurring => Self::Recurring,
        }
    }
}

impl From<ledger::JournalSource> for JournalSource {
    fn from(value: ledger::JournalSource) -> Self {
        match value {
            ledger::JournalSource::Manual => Self::Manual,
            ledger::JournalSource::Transaction => Self::Transaction,
            ledger::JournalSource::Voucher => Self::Voucher,
            ledger::JournalSource::Payroll => Self::Payroll,
            ledger::JournalSource::Recurring => Self::Recurring,
        }
    }
}

impl From<RecurringFrequency> for recurring::Frequency {
    fn from(value: RecurringFrequency) -> Self {
        match value {
            RecurringFrequency::Daily => Self::Daily,
            RecurringFrequency::Weekly => Self::Weekly,
            RecurringFrequency::Monthly => Self::Monthly,
            RecurringFrequency::Quarterly => Self::Quarterly,
            RecurringFrequency::Yearly => Self::Yearly,
            RecurringFrequency::Custom => Self::Custom,
        }
    }
}

impl From<recurring::Frequency> for RecurringFrequency {
    fn from(value: recurring::Frequency) -> Self {
        match value {
            recurring::Frequency::Daily => Self::Daily,
            recurring::Frequency::Weekly => Self::Weekly,
            recurring::Frequency::Monthly => Self::Monthly,
            recurring::Frequency::Quarterly => Self::Quarterly,
            recurring::Frequency::Yearly => Self::Yearly,
            recurring::Frequency::Custom => Self::Custom,
        }
    }
}

impl From<TransactionType> for ledger::TradeKind {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Sale => Self::Sale,
            TransactionType::Purchase => Self::Purchase,
        }
    }
}
