//! Account domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset accounts (cash, receivables, inventory, fixed assets).
    Asset,
    /// Liability accounts (payables, loans, taxes owed).
    Liability,
    /// Equity accounts (capital, retained earnings).
    Equity,
    /// Revenue accounts.
    Revenue,
    /// Expense accounts.
    Expense,
}

impl AccountType {
    /// The side on which this account type naturally increases.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true if accounts of this type must carry a subtype.
    #[must_use]
    pub const fn requires_subtype(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns true if this type appears on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }
}

/// Account subtype for more specific categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSubtype {
    /// Current asset (cash, bank, receivables).
    CurrentAsset,
    /// Fixed asset (equipment, buildings).
    FixedAsset,
    /// Other asset.
    OtherAsset,
    /// Current liability (payables, short-term debt).
    CurrentLiability,
    /// Long-term liability.
    LongTermLiability,
    /// Owner's equity / paid-in capital.
    OwnerEquity,
    /// Retained earnings.
    RetainedEarnings,
}

impl AccountSubtype {
    /// The account type this subtype belongs to.
    #[must_use]
    pub const fn account_type(self) -> AccountType {
        match self {
            Self::CurrentAsset | Self::FixedAsset | Self::OtherAsset => AccountType::Asset,
            Self::CurrentLiability | Self::LongTermLiability => AccountType::Liability,
            Self::OwnerEquity | Self::RetainedEarnings => AccountType::Equity,
        }
    }
}

/// Normal balance side: the side on which an account increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debit-normal (asset, expense).
    Debit,
    /// Credit-normal (liability, equity, revenue).
    Credit,
}

impl NormalBalance {
    /// Signed balance delta for a posting against an account with this
    /// normal side. This directionality rule is used uniformly everywhere
    /// balances are touched:
    /// - Debit-normal: balance += debit - credit
    /// - Credit-normal: balance += credit - debit
    #[must_use]
    pub fn balance_delta(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// A chart-of-accounts node as seen by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account ID.
    pub id: Uuid,
    /// Owning company.
    pub company_id: Uuid,
    /// Account code (unique per company).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Account subtype (required for asset/liability/equity).
    pub subtype: Option<AccountSubtype>,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
    /// Header accounts aggregate children and never receive postings.
    pub is_header: bool,
    /// Inactive accounts reject new postings.
    pub is_active: bool,
    /// Whether manual journal entry is permitted against this account.
    pub allow_manual_entry: bool,
    /// Parent account for hierarchy (same type as this account).
    pub parent_id: Option<Uuid>,
    /// Depth in the tree: `parent.level + 1`, roots at 1.
    pub level: i32,
    /// Balance carried in at account creation.
    pub opening_balance: Decimal,
    /// Running balance maintained by the posting engine.
    pub current_balance: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Owning company.
    pub company_id: Uuid,
    /// Account code (must be unique within the company).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Account subtype.
    pub subtype: Option<AccountSubtype>,
    /// Parent account for hierarchy.
    pub parent_id: Option<Uuid>,
    /// Header flag (non-postable aggregation node).
    pub is_header: bool,
    /// Whether manual journal entry is permitted. Forced to false for headers.
    pub allow_manual_entry: bool,
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Patch for updating an account.
///
/// Once an account has posted lines, only `name`, `notes`, and `is_active`
/// may change; the remaining fields are structural and locked.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountPatch {
    /// New account name.
    pub name: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// Activate/deactivate.
    pub is_active: Option<bool>,
    /// Structural: new code.
    pub code: Option<String>,
    /// Structural: new type.
    pub account_type: Option<AccountType>,
    /// Structural: new subtype.
    pub subtype: Option<AccountSubtype>,
    /// Structural: new parent.
    pub parent_id: Option<Option<Uuid>>,
    /// Structural: new opening balance.
    pub opening_balance: Option<Decimal>,
    /// Structural: toggle manual entry.
    pub allow_manual_entry: Option<bool>,
}

impl UpdateAccountPatch {
    /// Names of the structural fields present in this patch.
    #[must_use]
    pub fn structural_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.code.is_some() {
            fields.push("code");
        }
        if self.account_type.is_some() {
            fields.push("account_type");
        }
        if self.subtype.is_some() {
            fields.push("subtype");
        }
        if self.parent_id.is_some() {
            fields.push("parent_id");
        }
        if self.opening_balance.is_some() {
            fields.push("opening_balance");
        }
        if self.allow_manual_entry.is_some() {
            fields.push("allow_manual_entry");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normal_balance_by_type() {
        assert_eq!(AccountType::Asset.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Expense.normal_balance(), NormalBalance::Debit);
        assert_eq!(
            AccountType::Liability.normal_balance(),
            NormalBalance::Credit
        );
        assert_eq!(AccountType::Equity.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Revenue.normal_balance(), NormalBalance::Credit);
    }

    #[test]
    fn test_subtype_requirements() {
        assert!(AccountType::Asset.requires_subtype());
        assert!(AccountType::Liability.requires_subtype());
        assert!(AccountType::Equity.requires_subtype());
        assert!(!AccountType::Revenue.requires_subtype());
        assert!(!AccountType::Expense.requires_subtype());
    }

    #[test]
    fn test_debit_normal_delta() {
        let side = NormalBalance::Debit;
        assert_eq!(side.balance_delta(dec!(100), dec!(0)), dec!(100));
        assert_eq!(side.balance_delta(dec!(0), dec!(50)), dec!(-50));
        assert_eq!(side.balance_delta(dec!(100), dec!(30)), dec!(70));
    }

    #[test]
    fn test_credit_normal_delta() {
        let side = NormalBalance::Credit;
        assert_eq!(side.balance_delta(dec!(0), dec!(100)), dec!(100));
        assert_eq!(side.balance_delta(dec!(50), dec!(0)), dec!(-50));
        assert_eq!(side.balance_delta(dec!(30), dec!(100)), dec!(70));
    }

    #[test]
    fn test_structural_fields_listing() {
        let patch = UpdateAccountPatch {
            name: Some("Cash".into()),
            code: Some("1-1001".into()),
            opening_balance: Some(dec!(10)),
            ..Default::default()
        };
        assert_eq!(patch.structural_fields(), vec!["code", "opening_balance"]);
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The two directional rules are exact mirrors of each other.
        #[test]
        fn prop_delta_sides_mirror(
            debit in amount_strategy(),
            credit in amount_strategy(),
        ) {
            let d = NormalBalance::Debit.balance_delta(debit, credit);
            let c = NormalBalance::Credit.balance_delta(debit, credit);
            prop_assert_eq!(d, -c);
        }

        /// A debit-normal account increases by exactly the debit amount.
        #[test]
        fn prop_debit_increases_debit_normal(debit in amount_strategy()) {
            prop_assert_eq!(
                NormalBalance::Debit.balance_delta(debit, Decimal::ZERO),
                debit
            );
        }

        /// A credit-normal account increases by exactly the credit amount.
        #[test]
        fn prop_credit_increases_credit_normal(credit in amount_strategy()) {
            prop_assert_eq!(
                NormalBalance::Credit.balance_delta(Decimal::ZERO, credit),
                credit
            );
        }
    }
}
