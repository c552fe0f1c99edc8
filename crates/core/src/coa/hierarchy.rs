//! Pure hierarchy construction for the chart of accounts.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use super::types::AccountRecord;

/// A node in the account forest.
#[derive(Debug, Clone, Serialize)]
pub struct AccountNode {
    /// The account at this node.
    pub account: AccountRecord,
    /// Child accounts, ordered by code.
    pub children: Vec<AccountNode>,
}

/// Builds a forest from a flat account list keyed by `parent_id`.
///
/// Accounts whose parent is not present in the input become forest roots;
/// dangling parent references are tolerated, not an error. Siblings are
/// ordered by account code at every level.
#[must_use]
pub fn build_hierarchy(accounts: Vec<AccountRecord>) -> Vec<AccountNode> {
    let present: HashSet<Uuid> = accounts.iter().map(|a| a.id).collect();

    let mut children_of: HashMap<Uuid, Vec<AccountRecord>> = HashMap::new();
    let mut roots: Vec<AccountRecord> = Vec::new();

    for account in accounts {
        match account.parent_id {
            Some(parent_id) if present.contains(&parent_id) => {
                children_of.entry(parent_id).or_default().push(account);
            }
            // No parent, or the parent is missing from the list: root.
            _ => roots.push(account),
        }
    }

    roots.sort_by(|a, b| a.code.cmp(&b.code));
    roots
        .into_iter()
        .map(|account| attach_children(account, &mut children_of))
        .collect()
}

fn attach_children(
    account: AccountRecord,
    children_of: &mut HashMap<Uuid, Vec<AccountRecord>>,
) -> AccountNode {
    let mut child_records = children_of.remove(&account.id).unwrap_or_default();
    child_records.sort_by(|a, b| a.code.cmp(&b.code));

    let children = child_records
        .into_iter()
        .map(|child| attach_children(child, children_of))
        .collect();

    AccountNode { account, children }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::types::{AccountSubtype, AccountType};
    use rust_decimal_macros::dec;

    fn account(code: &str, parent_id: Option<Uuid>) -> AccountRecord {
        AccountRecord {
            id: Uuid::new_v4(),
            company_id: Uuid::nil(),
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type: AccountType::Asset,
            subtype: Some(AccountSubtype::CurrentAsset),
            normal_balance: AccountType::Asset.normal_balance(),
            is_header: parent_id.is_none(),
            is_active: true,
            allow_manual_entry: parent_id.is_some(),
            parent_id,
            level: if parent_id.is_some() { 2 } else { 1 },
            opening_balance: dec!(0),
            current_balance: dec!(0),
            notes: None,
        }
    }

    #[test]
    fn test_builds_forest() {
        let root_a = account("1-1000", None);
        let child_1 = account("1-1001", Some(root_a.id));
        let child_2 = account("1-1002", Some(root_a.id));
        let root_b = account("2-1000", None);

        let forest = build_hierarchy(vec![child_2.clone(), root_b, root_a.clone(), child_1]);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].account.code, "1-1000");
        assert_eq!(forest[0].children.len(), 2);
        assert_eq!(forest[0].children[0].account.code, "1-1001");
        assert_eq!(forest[0].children[1].account.code, "1-1002");
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn test_dangling_parent_becomes_root() {
        let orphan = account("1-1001", Some(Uuid::new_v4()));
        let forest = build_hierarchy(vec![orphan]);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].account.code, "1-1001");
    }

    #[test]
    fn test_nested_levels() {
        let root = account("1-0000", None);
        let mid = account("1-1000", Some(root.id));
        let leaf = account("1-1001", Some(mid.id));

        let forest = build_hierarchy(vec![leaf, mid, root]);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].children.len(), 1);
        assert_eq!(forest[0].children[0].children[0].account.code, "1-1001");
    }

    #[test]
    fn test_empty_input() {
        assert!(build_hierarchy(vec![]).is_empty());
    }
}
