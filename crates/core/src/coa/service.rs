//! Account registry validation rules.
//!
//! This service contains pure business logic with no database dependencies.
//! Callers supply the facts the store knows (duplicate code, parent record,
//! line counts) and receive either a resolved account shape or a validation
//! error.

use rust_decimal::Decimal;

use super::error::CoaError;
use super::types::{AccountRecord, CreateAccountInput, NormalBalance, UpdateAccountPatch};

/// A validated, resolved account ready to persist.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// The validated input.
    pub input: CreateAccountInput,
    /// Normal balance side, derived from the account type.
    pub normal_balance: NormalBalance,
    /// Depth in the tree: `parent.level + 1`, or 1 for roots.
    pub level: i32,
    /// Manual-entry flag after applying the header rule.
    pub allow_manual_entry: bool,
    /// Opening balance doubles as the initial running balance.
    pub current_balance: Decimal,
}

/// Stateless validation service for the chart of accounts.
pub struct CoaService;

impl CoaService {
    /// Validates account creation and resolves derived fields.
    ///
    /// Rules:
    /// - code must be unique per company (`code_exists` is the store's answer)
    /// - a given parent must exist, belong to the same company, share the
    ///   account type, and be a header account
    /// - `level = parent.level + 1` (roots at 1)
    /// - header accounts force `allow_manual_entry = false`
    /// - asset/liability/equity accounts require a matching subtype
    ///
    /// # Errors
    ///
    /// Returns `CoaError` on any rule violation.
    pub fn validate_create(
        input: CreateAccountInput,
        parent: Option<&AccountRecord>,
        code_exists: bool,
    ) -> Result<NewAccount, CoaError> {
        if code_exists {
            return Err(CoaError::DuplicateCode(input.code.clone()));
        }

        if input.account_type.requires_subtype() {
            match input.subtype {
                None => return Err(CoaError::SubtypeRequired(input.account_type)),
                Some(subtype) if subtype.account_type() != input.account_type => {
                    return Err(CoaError::SubtypeMismatch(input.account_type));
                }
                Some(_) => {}
            }
        }

        let level = match (input.parent_id, parent) {
            (None, _) => 1,
            (Some(parent_id), None) => return Err(CoaError::ParentNotFound(parent_id)),
            (Some(_), Some(parent)) => {
                if parent.company_id != input.company_id {
                    return Err(CoaError::ParentWrongCompany);
                }
                if parent.account_type != input.account_type {
                    return Err(CoaError::ParentTypeMismatch {
                        parent: parent.account_type,
                        child: input.account_type,
                    });
                }
                if !parent.is_header {
                    return Err(CoaError::ParentNotHeader(parent.id));
                }
                parent.level + 1
            }
        };

        // Header accounts never receive direct postings.
        let allow_manual_entry = if input.is_header {
            false
        } else {
            input.allow_manual_entry
        };

        let normal_balance = input.account_type.normal_balance();
        let current_balance = input.opening_balance;

        Ok(NewAccount {
            input,
            normal_balance,
            level,
            allow_manual_entry,
            current_balance,
        })
    }

    /// Merges an update patch over an existing record, producing the input
    /// shape for re-running the creation rules.
    ///
    /// A subtype carried over from a previous type is dropped when the new
    /// type does not use subtypes.
    #[must_use]
    pub fn merge_for_update(
        existing: &AccountRecord,
        patch: &UpdateAccountPatch,
    ) -> CreateAccountInput {
        let account_type = patch.account_type.unwrap_or(existing.account_type);
        let subtype = if account_type.requires_subtype() {
            patch.subtype.or(existing.subtype)
        } else {
            None
        };
        CreateAccountInput {
            company_id: existing.company_id,
            code: patch.code.clone().unwrap_or_else(|| existing.code.clone()),
            name: patch.name.clone().unwrap_or_else(|| existing.name.clone()),
            account_type,
            subtype,
            parent_id: patch.parent_id.unwrap_or(existing.parent_id),
            is_header: existing.is_header,
            allow_manual_entry: patch
                .allow_manual_entry
                .unwrap_or(existing.allow_manual_entry),
            opening_balance: patch.opening_balance.unwrap_or(existing.opening_balance),
            notes: patch.notes.clone().or_else(|| existing.notes.clone()),
        }
    }

    /// Validates an update patch against the account's posting history.
    ///
    /// Accounts with posted lines only accept name/notes/is_active changes.
    ///
    /// # Errors
    ///
    /// Returns `StructuralChangeBlocked` naming the rejected fields.
    pub fn validate_update(patch: &UpdateAccountPatch, has_lines: bool) -> Result<(), CoaError> {
        if has_lines {
            let fields = patch.structural_fields();
            if !fields.is_empty() {
                return Err(CoaError::StructuralChangeBlocked { fields });
            }
        }
        Ok(())
    }

    /// Validates account deletion.
    ///
    /// # Errors
    ///
    /// Returns an error when the account has children or posted lines;
    /// such accounts are deactivated instead of deleted.
    pub fn validate_delete(child_count: u64, line_count: u64) -> Result<(), CoaError> {
        if child_count > 0 {
            return Err(CoaError::HasChildren(child_count));
        }
        if line_count > 0 {
            return Err(CoaError::HasPostedLines(line_count));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::types::{AccountSubtype, AccountType};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn make_input(company_id: Uuid) -> CreateAccountInput {
        CreateAccountInput {
            company_id,
            code: "1-1001".to_string(),
            name: "Cash".to_string(),
            account_type: AccountType::Asset,
            subtype: Some(AccountSubtype::CurrentAsset),
            parent_id: None,
            is_header: false,
            allow_manual_entry: true,
            opening_balance: dec!(0),
            notes: None,
        }
    }

    fn make_parent(company_id: Uuid, account_type: AccountType, is_header: bool) -> AccountRecord {
        AccountRecord {
            id: Uuid::new_v4(),
            company_id,
            code: "1-1000".to_string(),
            name: "Current Assets".to_string(),
            account_type,
            subtype: Some(AccountSubtype::CurrentAsset),
            normal_balance: account_type.normal_balance(),
            is_header,
            is_active: true,
            allow_manual_entry: false,
            parent_id: None,
            level: 1,
            opening_balance: dec!(0),
            current_balance: dec!(0),
            notes: None,
        }
    }

    #[test]
    fn test_create_root_account() {
        let input = make_input(Uuid::new_v4());
        let new = CoaService::validate_create(input, None, false).unwrap();
        assert_eq!(new.level, 1);
        assert_eq!(new.normal_balance, NormalBalance::Debit);
        assert!(new.allow_manual_entry);
    }

    #[test]
    fn test_create_duplicate_code() {
        let input = make_input(Uuid::new_v4());
        let result = CoaService::validate_create(input, None, true);
        assert!(matches!(result, Err(CoaError::DuplicateCode(_))));
    }

    #[test]
    fn test_create_with_parent_sets_level() {
        let company_id = Uuid::new_v4();
        let parent = make_parent(company_id, AccountType::Asset, true);
        let mut input = make_input(company_id);
        input.parent_id = Some(parent.id);

        let new = CoaService::validate_create(input, Some(&parent), false).unwrap();
        assert_eq!(new.level, 2);
    }

    #[test]
    fn test_create_parent_missing() {
        let mut input = make_input(Uuid::new_v4());
        input.parent_id = Some(Uuid::new_v4());
        let result = CoaService::validate_create(input, None, false);
        assert!(matches!(result, Err(CoaError::ParentNotFound(_))));
    }

    #[test]
    fn test_create_parent_wrong_company() {
        let parent = make_parent(Uuid::new_v4(), AccountType::Asset, true);
        let mut input = make_input(Uuid::new_v4());
        input.parent_id = Some(parent.id);
        let result = CoaService::validate_create(input, Some(&parent), false);
        assert!(matches!(result, Err(CoaError::ParentWrongCompany)));
    }

    #[test]
    fn test_create_parent_type_mismatch() {
        let company_id = Uuid::new_v4();
        let parent = make_parent(company_id, AccountType::Liability, true);
        let mut input = make_input(company_id);
        input.parent_id = Some(parent.id);
        let result = CoaService::validate_create(input, Some(&parent), false);
        assert!(matches!(result, Err(CoaError::ParentTypeMismatch { .. })));
    }

    #[test]
    fn test_create_parent_not_header() {
        let company_id = Uuid::new_v4();
        let parent = make_parent(company_id, AccountType::Asset, false);
        let mut input = make_input(company_id);
        input.parent_id = Some(parent.id);
        let result = CoaService::validate_create(input, Some(&parent), false);
        assert!(matches!(result, Err(CoaError::ParentNotHeader(_))));
    }

    #[test]
    fn test_header_forces_no_manual_entry() {
        let mut input = make_input(Uuid::new_v4());
        input.is_header = true;
        input.allow_manual_entry = true;
        let new = CoaService::validate_create(input, None, false).unwrap();
        assert!(!new.allow_manual_entry);
    }

    #[test]
    fn test_subtype_required_for_asset() {
        let mut input = make_input(Uuid::new_v4());
        input.subtype = None;
        let result = CoaService::validate_create(input, None, false);
        assert!(matches!(
            result,
            Err(CoaError::SubtypeRequired(AccountType::Asset))
        ));
    }

    #[test]
    fn test_subtype_not_required_for_revenue() {
        let mut input = make_input(Uuid::new_v4());
        input.account_type = AccountType::Revenue;
        input.subtype = None;
        let new = CoaService::validate_create(input, None, false).unwrap();
        assert_eq!(new.normal_balance, NormalBalance::Credit);
    }

    #[test]
    fn test_subtype_type_mismatch() {
        let mut input = make_input(Uuid::new_v4());
        input.account_type = AccountType::Liability;
        input.subtype = Some(AccountSubtype::CurrentAsset);
        let result = CoaService::validate_create(input, None, false);
        assert!(matches!(
            result,
            Err(CoaError::SubtypeMismatch(AccountType::Liability))
        ));
    }

    #[test]
    fn test_update_posted_account_allows_cosmetic_fields() {
        let patch = UpdateAccountPatch {
            name: Some("Petty Cash".into()),
            notes: Some("renamed".into()),
            is_active: Some(false),
            ..Default::default()
        };
        assert!(CoaService::validate_update(&patch, true).is_ok());
    }

    #[test]
    fn test_update_posted_account_blocks_structural_fields() {
        let patch = UpdateAccountPatch {
            code: Some("9-9999".into()),
            account_type: Some(AccountType::Expense),
            ..Default::default()
        };
        let result = CoaService::validate_update(&patch, true);
        match result {
            Err(CoaError::StructuralChangeBlocked { fields }) => {
                assert_eq!(fields, vec!["code", "account_type"]);
            }
            other => panic!("expected StructuralChangeBlocked, got {other:?}"),
        }
    }

    #[test]
    fn test_update_unposted_account_allows_structural_fields() {
        let patch = UpdateAccountPatch {
            code: Some("1-2000".into()),
            ..Default::default()
        };
        assert!(CoaService::validate_update(&patch, false).is_ok());
    }

    fn make_record(company_id: Uuid) -> AccountRecord {
        let mut record = make_parent(company_id, AccountType::Asset, false);
        record.code = "1-1001".to_string();
        record.name = "Cash".to_string();
        record.allow_manual_entry = true;
        record
    }

    #[test]
    fn test_update_merge_keeps_unpatched_fields() {
        let existing = make_record(Uuid::new_v4());
        let patch = UpdateAccountPatch {
            name: Some("Petty Cash".into()),
            ..Default::default()
        };
        let merged = CoaService::merge_for_update(&existing, &patch);
        assert_eq!(merged.name, "Petty Cash");
        assert_eq!(merged.code, existing.code);
        assert_eq!(merged.account_type, existing.account_type);
        assert_eq!(merged.subtype, existing.subtype);
        assert_eq!(merged.opening_balance, existing.opening_balance);
    }

    #[test]
    fn test_update_type_change_revalidates_subtype() {
        // Switching to liability while the stale asset subtype remains must
        // fail the merged-state check.
        let existing = make_record(Uuid::new_v4());
        let patch = UpdateAccountPatch {
            account_type: Some(AccountType::Liability),
            ..Default::default()
        };
        let merged = CoaService::merge_for_update(&existing, &patch);
        let result = CoaService::validate_create(merged, None, false);
        assert!(matches!(
            result,
            Err(CoaError::SubtypeMismatch(AccountType::Liability))
        ));
    }

    #[test]
    fn test_update_type_change_drops_subtype_when_unused() {
        let existing = make_record(Uuid::new_v4());
        let patch = UpdateAccountPatch {
            account_type: Some(AccountType::Expense),
            ..Default::default()
        };
        let merged = CoaService::merge_for_update(&existing, &patch);
        assert_eq!(merged.subtype, None);
        let new = CoaService::validate_create(merged, None, false).unwrap();
        assert_eq!(new.normal_balance, NormalBalance::Debit);
    }

    #[test]
    fn test_update_reparent_recomputes_level() {
        let company_id = Uuid::new_v4();
        let mut parent = make_parent(company_id, AccountType::Asset, true);
        parent.level = 2;
        let existing = make_record(company_id);
        let patch = UpdateAccountPatch {
            parent_id: Some(Some(parent.id)),
            ..Default::default()
        };
        let merged = CoaService::merge_for_update(&existing, &patch);
        let new = CoaService::validate_create(merged, Some(&parent), false).unwrap();
        assert_eq!(new.level, 3);
    }

    #[test]
    fn test_update_reparent_rejects_non_header() {
        let company_id = Uuid::new_v4();
        let parent = make_parent(company_id, AccountType::Asset, false);
        let existing = make_record(company_id);
        let patch = UpdateAccountPatch {
            parent_id: Some(Some(parent.id)),
            ..Default::default()
        };
        let merged = CoaService::merge_for_update(&existing, &patch);
        let result = CoaService::validate_create(merged, Some(&parent), false);
        assert!(matches!(result, Err(CoaError::ParentNotHeader(_))));
    }

    #[test]
    fn test_update_code_change_checks_uniqueness() {
        let existing = make_record(Uuid::new_v4());
        let patch = UpdateAccountPatch {
            code: Some("1-2000".into()),
            ..Default::default()
        };
        let merged = CoaService::merge_for_update(&existing, &patch);
        let result = CoaService::validate_create(merged, None, true);
        assert!(matches!(result, Err(CoaError::DuplicateCode(_))));
    }

    #[test]
    fn test_delete_rules() {
        assert!(CoaService::validate_delete(0, 0).is_ok());
        assert!(matches!(
            CoaService::validate_delete(2, 0),
            Err(CoaError::HasChildren(2))
        ));
        assert!(matches!(
            CoaService::validate_delete(0, 7),
            Err(CoaError::HasPostedLines(7))
        ));
    }
}
