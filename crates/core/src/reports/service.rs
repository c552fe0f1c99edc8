//! Pure report aggregation over store-supplied rows.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use saldo_shared::tolerance;

use crate::coa::AccountType;

use super::types::{
    AccountMovement, BalanceSheet, BalanceSheetRow, BalanceSheetSection, CashFlowSection,
    CashFlowStatement, IncomeStatement, IncomeStatementRow, OpenDocumentRow, ReportAccount,
    SubsidiaryRow, TrialBalance, TrialBalanceRow,
};

/// Financial statement aggregator.
pub struct ReportService;

impl ReportService {
    /// Builds a balance sheet from active-account balances.
    ///
    /// Accounts partition into assets, liabilities, and equity; revenue and
    /// expense accounts do not appear (their effect is already in retained
    /// earnings via running balances).
    #[must_use]
    pub fn balance_sheet(accounts: &[ReportAccount]) -> BalanceSheet {
        let section = |account_type: AccountType| {
            let mut rows: Vec<BalanceSheetRow> = accounts
                .iter()
                .filter(|a| a.account_type == account_type)
                .map(|a| BalanceSheetRow {
                    code: a.code.clone(),
                    name: a.name.clone(),
                    balance: a.current_balance,
                })
                .collect();
            rows.sort_by(|a, b| a.code.cmp(&b.code));
            let total = rows.iter().map(|r| r.balance).sum();
            BalanceSheetSection { rows, total }
        };

        let assets = section(AccountType::Asset);
        let liabilities = section(AccountType::Liability);
        let equity = section(AccountType::Equity);
        let balanced = tolerance::is_balanced(assets.total, liabilities.total + equity.total);

        BalanceSheet {
            assets,
            liabilities,
            equity,
            balanced,
        }
    }

    /// Builds an income statement from revenue/expense movements in range.
    ///
    /// Revenue nets `credit - debit`; expense nets `debit - credit`.
    #[must_use]
    pub fn income_statement(movements: &[AccountMovement]) -> IncomeStatement {
        let rows = |account_type: AccountType, net: fn(&AccountMovement) -> Decimal| {
            let mut rows: Vec<IncomeStatementRow> = movements
                .iter()
                .filter(|m| m.account_type == account_type)
                .map(|m| IncomeStatementRow {
                    code: m.code.clone(),
                    name: m.name.clone(),
                    amount: net(m),
                })
                .collect();
            rows.sort_by(|a, b| a.code.cmp(&b.code));
            rows
        };

        let revenue = rows(AccountType::Revenue, |m| m.credit - m.debit);
        let expenses = rows(AccountType::Expense, |m| m.debit - m.credit);
        let total_revenue: Decimal = revenue.iter().map(|r| r.amount).sum();
        let total_expenses: Decimal = expenses.iter().map(|r| r.amount).sum();

        IncomeStatement {
            revenue,
            total_revenue,
            expenses,
            total_expenses,
            net_income: total_revenue - total_expenses,
        }
    }

    /// Builds a cash flow statement from cash-account movements in range.
    ///
    /// The store selects the movements by the posting profile's cash account
    /// code prefix. Debits to cash are inflows, credits outflows. Investing
    /// and financing are zero sections.
    #[must_use]
    pub fn cash_flow(cash_movements: &[AccountMovement]) -> CashFlowStatement {
        let inflow: Decimal = cash_movements.iter().map(|m| m.debit).sum();
        let outflow: Decimal = cash_movements.iter().map(|m| m.credit).sum();

        let operating = CashFlowSection {
            inflow,
            outflow,
            net: inflow - outflow,
        };
        let zero = CashFlowSection {
            inflow: Decimal::ZERO,
            outflow: Decimal::ZERO,
            net: Decimal::ZERO,
        };
        let net_change = operating.net;

        CashFlowStatement {
            operating,
            investing: zero.clone(),
            financing: zero,
            net_change,
        }
    }

    /// Builds a trial balance from opening balances and movements to a
    /// cutoff.
    ///
    /// Each row's balance combines the opening balance with the movement via
    /// the account's directional rule. Rows with zero debit, zero credit,
    /// and zero balance are filtered out.
    #[must_use]
    pub fn trial_balance(accounts: &[ReportAccount], movements: &[AccountMovement]) -> TrialBalance {
        let by_account: BTreeMap<_, _> = movements.iter().map(|m| (m.account_id, m)).collect();

        let mut rows = Vec::new();
        for account in accounts {
            let (debit, credit) = by_account
                .get(&account.id)
                .map_or((Decimal::ZERO, Decimal::ZERO), |m| (m.debit, m.credit));
            let balance =
                account.opening_balance + account.normal_balance.balance_delta(debit, credit);

            if debit.is_zero() && credit.is_zero() && balance.is_zero() {
                continue;
            }
            rows.push(TrialBalanceRow {
                code: account.code.clone(),
                name: account.name.clone(),
                debit,
                credit,
                balance,
            });
        }
        rows.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debit = rows.iter().map(|r| r.debit).sum();
        let total_credit = rows.iter().map(|r| r.credit).sum();

        TrialBalance {
            rows,
            total_debit,
            total_credit,
        }
    }

    /// Groups open trade documents into a subsidiary ledger by contact.
    ///
    /// Used for both receivables (open sales by customer) and payables
    /// (open purchases by supplier); the store filters the document rows.
    #[must_use]
    pub fn subsidiary_ledger(documents: &[OpenDocumentRow]) -> Vec<SubsidiaryRow> {
        let mut groups: BTreeMap<String, Vec<OpenDocumentRow>> = BTreeMap::new();
        for document in documents {
            groups
                .entry(document.contact_name.clone())
                .or_default()
                .push(document.clone());
        }

        groups
            .into_iter()
            .map(|(contact_name, mut documents)| {
                documents.sort_by_key(|d| d.date);
                let total_remaining = documents.iter().map(|d| d.remaining_balance).sum();
                SubsidiaryRow {
                    contact_name,
                    documents,
                    total_remaining,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::NormalBalance;
    use chrono::{Datelike, NaiveDate};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn account(
        code: &str,
        account_type: AccountType,
        opening: Decimal,
        current: Decimal,
    ) -> ReportAccount {
        ReportAccount {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type,
            normal_balance: account_type.normal_balance(),
            opening_balance: opening,
            current_balance: current,
        }
    }

    fn movement(
        account: &ReportAccount,
        debit: Decimal,
        credit: Decimal,
    ) -> AccountMovement {
        AccountMovement {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            normal_balance: account.normal_balance,
            debit,
            credit,
        }
    }

    #[test]
    fn test_balance_sheet_partitions_and_balances() {
        let accounts = vec![
            account("1-100", AccountType::Asset, dec!(0), dec!(1_000)),
            account("1-200", AccountType::Asset, dec!(0), dec!(500)),
            account("2-100", AccountType::Liability, dec!(0), dec!(600)),
            account("3-100", AccountType::Equity, dec!(0), dec!(900)),
        ];
        let sheet = ReportService::balance_sheet(&accounts);

        assert_eq!(sheet.assets.total, dec!(1_500));
        assert_eq!(sheet.liabilities.total, dec!(600));
        assert_eq!(sheet.equity.total, dec!(900));
        assert!(sheet.balanced);
        assert_eq!(sheet.assets.rows[0].code, "1-100");
    }

    #[test]
    fn test_balance_sheet_detects_imbalance() {
        let accounts = vec![
            account("1-100", AccountType::Asset, dec!(0), dec!(1_000)),
            account("2-100", AccountType::Liability, dec!(0), dec!(500)),
        ];
        assert!(!ReportService::balance_sheet(&accounts).balanced);
    }

    #[test]
    fn test_income_statement_nets_directionally() {
        let revenue = account("4-100", AccountType::Revenue, dec!(0), dec!(0));
        let expense = account("5-100", AccountType::Expense, dec!(0), dec!(0));
        let movements = vec![
            movement(&revenue, dec!(100), dec!(1_100)),
            movement(&expense, dec!(400), dec!(50)),
        ];

        let statement = ReportService::income_statement(&movements);

        assert_eq!(statement.total_revenue, dec!(1_000));
        assert_eq!(statement.total_expenses, dec!(350));
        assert_eq!(statement.net_income, dec!(650));
    }

    #[test]
    fn test_cash_flow_operating_only() {
        let cash = account("1-110", AccountType::Asset, dec!(0), dec!(0));
        let statement = ReportService::cash_flow(&[movement(&cash, dec!(900), dec!(300))]);

        assert_eq!(statement.operating.inflow, dec!(900));
        assert_eq!(statement.operating.outflow, dec!(300));
        assert_eq!(statement.operating.net, dec!(600));
        assert_eq!(statement.investing.net, dec!(0));
        assert_eq!(statement.financing.net, dec!(0));
        assert_eq!(statement.net_change, dec!(600));
    }

    #[test]
    fn test_trial_balance_filters_zero_rows() {
        let active = account("1-100", AccountType::Asset, dec!(100), dec!(0));
        let idle = account("1-200", AccountType::Asset, dec!(0), dec!(0));
        let movements = vec![movement(&active, dec!(50), dec!(20))];

        let trial = ReportService::trial_balance(&[active, idle], &movements);

        assert_eq!(trial.rows.len(), 1);
        assert_eq!(trial.rows[0].code, "1-100");
        // Debit-normal: 100 + (50 - 20) = 130.
        assert_eq!(trial.rows[0].balance, dec!(130));
        assert_eq!(trial.total_debit, dec!(50));
        assert_eq!(trial.total_credit, dec!(20));
    }

    #[test]
    fn test_trial_balance_keeps_opening_only_rows() {
        // No movement but a nonzero opening balance still shows.
        let opening_only = account("1-300", AccountType::Asset, dec!(250), dec!(250));
        let trial = ReportService::trial_balance(&[opening_only], &[]);
        assert_eq!(trial.rows.len(), 1);
        assert_eq!(trial.rows[0].balance, dec!(250));
    }

    #[test]
    fn test_trial_balance_credit_normal_combine() {
        let mut payable = account("2-100", AccountType::Liability, dec!(500), dec!(0));
        payable.normal_balance = NormalBalance::Credit;
        let movements = vec![movement(&payable, dec!(100), dec!(300))];

        let trial = ReportService::trial_balance(&[payable], &movements);
        // Credit-normal: 500 + (300 - 100) = 700.
        assert_eq!(trial.rows[0].balance, dec!(700));
    }

    #[test]
    fn test_subsidiary_ledger_groups_by_contact() {
        let doc = |contact: &str, day: u32, remaining: Decimal| OpenDocumentRow {
            transaction_id: Uuid::new_v4(),
            number: format!("INV/202401/{day:04}"),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            contact_name: contact.to_string(),
            total: remaining,
            amount_paid: dec!(0),
            remaining_balance: remaining,
        };
        let rows = ReportService::subsidiary_ledger(&[
            doc("PT Maju", 20, dec!(300)),
            doc("CV Abadi", 5, dec!(100)),
            doc("PT Maju", 10, dec!(200)),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].contact_name, "CV Abadi");
        assert_eq!(rows[1].contact_name, "PT Maju");
        assert_eq!(rows[1].total_remaining, dec!(500));
        // Documents within a contact are date-ordered.
        assert_eq!(rows[1].documents[0].date.day(), 10);
    }
}
