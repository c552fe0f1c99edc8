//! Auto-posting line derivation for trade documents and vouchers.
//!
//! Sales and purchases post through the company's posting profile: the
//! receivable/payable and tax accounts are configured per company, never
//! discovered by account-name matching. A document carrying tax with no
//! matching tax account configured is a hard validation error.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::JournalLineInput;

/// Which side of trade a transaction document represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    /// Sale to a customer. Debits receivable, credits revenue lines.
    Sale,
    /// Purchase from a supplier. Credits payable, debits item lines.
    Purchase,
}

/// Per-company posting account configuration.
///
/// One row per company; every auto-posted document resolves its designated
/// accounts through this profile.
#[derive(Debug, Clone, Default)]
pub struct PostingProfile {
    /// Accounts receivable, debited by sales.
    pub accounts_receivable_id: Option<Uuid>,
    /// Accounts payable, credited by purchases.
    pub accounts_payable_id: Option<Uuid>,
    /// Output tax (sales tax collected).
    pub output_tax_id: Option<Uuid>,
    /// Input tax (purchase tax paid).
    pub input_tax_id: Option<Uuid>,
    /// Salary expense, used by payroll when no explicit account is given.
    pub salary_expense_id: Option<Uuid>,
    /// Account-code prefix identifying cash-like accounts for the
    /// cash-flow report.
    pub cash_account_code_prefix: Option<String>,
}

/// An item row on a trade document.
#[derive(Debug, Clone)]
pub struct TradeItem {
    /// The revenue or expense/inventory account for this item.
    pub account_id: Uuid,
    /// Item description, carried onto the journal line.
    pub description: Option<String>,
    /// Line subtotal after discount.
    pub subtotal: Decimal,
}

/// The amounts of a trade document relevant to posting.
#[derive(Debug, Clone)]
pub struct TradeDocument {
    /// Sale or purchase.
    pub kind: TradeKind,
    /// Document number, used in line descriptions.
    pub number: String,
    /// Customer or supplier name.
    pub contact_name: Option<String>,
    /// Sum of item subtotals.
    pub subtotal: Decimal,
    /// Tax on top of the subtotal; zero means no tax line.
    pub tax_amount: Decimal,
    /// Grand total (subtotal + tax).
    pub total: Decimal,
}

/// A voucher detail line carrying its own debit/credit split.
#[derive(Debug, Clone)]
pub struct VoucherLine {
    /// The account to post to.
    pub account_id: Uuid,
    /// Optional line description.
    pub description: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Derives journal lines for a sale or purchase document.
///
/// Sale: debit receivable for the total, credit each item's account for its
/// subtotal, credit output tax when `tax_amount > 0`. Purchase is the
/// mirror: credit payable, debit items, debit input tax.
///
/// # Errors
///
/// Returns `MissingPostingAccount` when the receivable/payable account, or
/// the tax account for a taxed document, is not configured.
pub fn derive_trade_lines(
    document: &TradeDocument,
    items: &[TradeItem],
    profile: &PostingProfile,
) -> Result<Vec<JournalLineInput>, LedgerError> {
    if items.is_empty() {
        return Err(LedgerError::EmptyJournal);
    }

    let contact = document.contact_name.as_deref().unwrap_or("-");
    let mut lines = Vec::with_capacity(items.len() + 2);

    match document.kind {
        TradeKind::Sale => {
            let receivable = profile
                .accounts_receivable_id
                .ok_or(LedgerError::MissingPostingAccount("accounts receivable"))?;
            lines.push(JournalLineInput::debit(
                receivable,
                document.total,
                Some(format!("Sale {} to {contact}", document.number)),
            ));
            for item in items {
                lines.push(JournalLineInput::credit(
                    item.account_id,
                    item.subtotal,
                    item.description.clone(),
                ));
            }
            if document.tax_amount > Decimal::ZERO {
                let tax = profile
                    .output_tax_id
                    .ok_or(LedgerError::MissingPostingAccount("output tax"))?;
                lines.push(JournalLineInput::credit(
                    tax,
                    document.tax_amount,
                    Some(format!("Output tax on {}", document.number)),
                ));
            }
        }
        TradeKind::Purchase => {
            let payable = profile
                .accounts_payable_id
                .ok_or(LedgerError::MissingPostingAccount("accounts payable"))?;
            lines.push(JournalLineInput::credit(
                payable,
                document.total,
                Some(format!("Purchase {} from {contact}", document.number)),
            ));
            for item in items {
                lines.push(JournalLineInput::debit(
                    item.account_id,
                    item.subtotal,
                    item.description.clone(),
                ));
            }
            if document.tax_amount > Decimal::ZERO {
                let tax = profile
                    .input_tax_id
                    .ok_or(LedgerError::MissingPostingAccount("input tax"))?;
                lines.push(JournalLineInput::debit(
                    tax,
                    document.tax_amount,
                    Some(format!("Input tax on {}", document.number)),
                ));
            }
        }
    }

    Ok(lines)
}

/// Derives journal lines from a voucher's own debit/credit detail.
///
/// Vouchers carry their full double-entry split, so each line maps across
/// directly; the balance check happens downstream in validation.
///
/// # Errors
///
/// Returns `EmptyJournal` when the voucher has no lines.
pub fn derive_voucher_lines(lines: &[VoucherLine]) -> Result<Vec<JournalLineInput>, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::EmptyJournal);
    }
    Ok(lines
        .iter()
        .map(|line| JournalLineInput {
            account_id: line.account_id,
            description: line.description.clone(),
            debit: line.debit,
            credit: line.credit,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn full_profile() -> PostingProfile {
        PostingProfile {
            accounts_receivable_id: Some(Uuid::new_v4()),
            accounts_payable_id: Some(Uuid::new_v4()),
            output_tax_id: Some(Uuid::new_v4()),
            input_tax_id: Some(Uuid::new_v4()),
            salary_expense_id: Some(Uuid::new_v4()),
            cash_account_code_prefix: Some("1-11".to_string()),
        }
    }

    fn sale(subtotal: Decimal, tax: Decimal) -> TradeDocument {
        TradeDocument {
            kind: TradeKind::Sale,
            number: "INV/202401/0001".to_string(),
            contact_name: Some("PT Maju".to_string()),
            subtotal,
            tax_amount: tax,
            total: subtotal + tax,
        }
    }

    #[test]
    fn test_sale_with_tax() {
        let profile = full_profile();
        let revenue = Uuid::new_v4();
        let items = vec![TradeItem {
            account_id: revenue,
            description: Some("Widgets".to_string()),
            subtotal: dec!(40_000_000),
        }];
        let document = sale(dec!(40_000_000), dec!(4_400_000));

        let lines = derive_trade_lines(&document, &items, &profile).unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].account_id, profile.accounts_receivable_id.unwrap());
        assert_eq!(lines[0].debit, dec!(44_400_000));
        assert_eq!(lines[1].account_id, revenue);
        assert_eq!(lines[1].credit, dec!(40_000_000));
        assert_eq!(lines[2].account_id, profile.output_tax_id.unwrap());
        assert_eq!(lines[2].credit, dec!(4_400_000));

        let debits: Decimal = lines.iter().map(|l| l.debit).sum();
        let credits: Decimal = lines.iter().map(|l| l.credit).sum();
        assert_eq!(debits, credits);
    }

    #[test]
    fn test_sale_without_tax_has_no_tax_line() {
        let profile = full_profile();
        let items = vec![TradeItem {
            account_id: Uuid::new_v4(),
            description: None,
            subtotal: dec!(100),
        }];
        let lines = derive_trade_lines(&sale(dec!(100), dec!(0)), &items, &profile).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_purchase_mirrors_sale() {
        let profile = full_profile();
        let expense = Uuid::new_v4();
        let items = vec![TradeItem {
            account_id: expense,
            description: None,
            subtotal: dec!(500),
        }];
        let document = TradeDocument {
            kind: TradeKind::Purchase,
            number: "PUR/202401/0001".to_string(),
            contact_name: None,
            subtotal: dec!(500),
            tax_amount: dec!(55),
            total: dec!(555),
        };

        let lines = derive_trade_lines(&document, &items, &profile).unwrap();

        assert_eq!(lines[0].account_id, profile.accounts_payable_id.unwrap());
        assert_eq!(lines[0].credit, dec!(555));
        assert_eq!(lines[1].account_id, expense);
        assert_eq!(lines[1].debit, dec!(500));
        assert_eq!(lines[2].account_id, profile.input_tax_id.unwrap());
        assert_eq!(lines[2].debit, dec!(55));
    }

    #[test]
    fn test_taxed_sale_requires_output_tax_account() {
        let mut profile = full_profile();
        profile.output_tax_id = None;
        let items = vec![TradeItem {
            account_id: Uuid::new_v4(),
            description: None,
            subtotal: dec!(100),
        }];
        let result = derive_trade_lines(&sale(dec!(100), dec!(11)), &items, &profile);
        assert!(matches!(
            result,
            Err(LedgerError::MissingPostingAccount("output tax"))
        ));
    }

    #[test]
    fn test_untaxed_sale_tolerates_missing_tax_account() {
        let mut profile = full_profile();
        profile.output_tax_id = None;
        let items = vec![TradeItem {
            account_id: Uuid::new_v4(),
            description: None,
            subtotal: dec!(100),
        }];
        assert!(derive_trade_lines(&sale(dec!(100), dec!(0)), &items, &profile).is_ok());
    }

    #[test]
    fn test_missing_receivable_rejected() {
        let mut profile = full_profile();
        profile.accounts_receivable_id = None;
        let items = vec![TradeItem {
            account_id: Uuid::new_v4(),
            description: None,
            subtotal: dec!(100),
        }];
        let result = derive_trade_lines(&sale(dec!(100), dec!(0)), &items, &profile);
        assert!(matches!(
            result,
            Err(LedgerError::MissingPostingAccount("accounts receivable"))
        ));
    }

    #[test]
    fn test_no_items_rejected() {
        let result = derive_trade_lines(&sale(dec!(0), dec!(0)), &[], &full_profile());
        assert!(matches!(result, Err(LedgerError::EmptyJournal)));
    }

    #[test]
    fn test_voucher_lines_map_directly() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let lines = derive_voucher_lines(&[
            VoucherLine {
                account_id: a,
                description: Some("office rent".to_string()),
                debit: dec!(2_000),
                credit: dec!(0),
            },
            VoucherLine {
                account_id: b,
                description: None,
                debit: dec!(0),
                credit: dec!(2_000),
            },
        ])
        .unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].account_id, a);
        assert_eq!(lines[0].debit, dec!(2_000));
        assert_eq!(lines[1].credit, dec!(2_000));
    }

    #[test]
    fn test_empty_voucher_rejected() {
        assert!(matches!(
            derive_voucher_lines(&[]),
            Err(LedgerError::EmptyJournal)
        ));
    }
}
