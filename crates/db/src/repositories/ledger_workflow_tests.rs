//! Integration tests for the posting workflow.
//!
//! Exercises the full cycle over the pure engine: derive → validate →
//! apply → reverse, plus numbering and scheduler isolation. Store-backed
//! variants live under `tests/` and need a live database.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use saldo_core::coa::NormalBalance;
    use saldo_core::ledger::posting::{derive_trade_lines, derive_voucher_lines};
    use saldo_core::ledger::{
        AccountInfo, CreateJournalInput, JournalLineInput, JournalSource, LedgerError,
        LedgerService, PeriodInfo, PostingProfile, ResolvedLine, TradeDocument, TradeItem,
        TradeKind, VoucherLine, reversal_description, reverse_lines,
    };
    use saldo_core::numbering::{self, DocumentType};
    use saldo_core::recurring::{RunOutcome, TemplateLine, template_total};

    fn open_period() -> PeriodInfo {
        PeriodInfo {
            id: Uuid::new_v4(),
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            is_open: true,
        }
    }

    fn account(id: Uuid, normal_balance: NormalBalance, balance: Decimal) -> AccountInfo {
        AccountInfo {
            id,
            is_active: true,
            is_header: false,
            allow_manual_entry: true,
            normal_balance,
            current_balance: balance,
        }
    }

    fn journal_input(lines: Vec<JournalLineInput>, source: JournalSource) -> CreateJournalInput {
        CreateJournalInput {
            company_id: Uuid::new_v4(),
            period_id: None,
            journal_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "Workflow test".to_string(),
            journal_number: None,
            source,
            source_id: None,
            lines,
            created_by: Uuid::new_v4(),
        }
    }

    /// Applies resolved lines to the account map the way the store does:
    /// each account ends at its last line's `balance_after`.
    fn apply(accounts: &mut HashMap<Uuid, AccountInfo>, resolved: &[ResolvedLine]) {
        for line in resolved {
            if let Some(account) = accounts.get_mut(&line.account_id) {
                account.current_balance = line.balance_after;
            }
        }
    }

    fn resolve(
        input: &CreateJournalInput,
        accounts: &HashMap<Uuid, AccountInfo>,
    ) -> Result<Vec<ResolvedLine>, LedgerError> {
        let (resolved, _) = LedgerService::validate_and_resolve(input, &open_period(), |id| {
            accounts
                .get(&id)
                .cloned()
                .ok_or(LedgerError::AccountNotFound(id))
        })?;
        Ok(resolved)
    }

    /// Strategy for positive two-decimal amounts.
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for opening balances, either side of zero.
    fn balance_strategy() -> impl Strategy<Value = Decimal> {
        (-1_000_000_000i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// For any amount and opening balances, posting a journal and then
        /// posting its reversal leaves every account balance unchanged.
        #[test]
        fn prop_post_then_reverse_restores_balances(
            amount in amount_strategy(),
            cash_opening in balance_strategy(),
            revenue_opening in balance_strategy(),
        ) {
            let cash = Uuid::new_v4();
            let revenue = Uuid::new_v4();
            let mut accounts = HashMap::from([
                (cash, account(cash, NormalBalance::Debit, cash_opening)),
                (revenue, account(revenue, NormalBalance::Credit, revenue_opening)),
            ]);

            let input = journal_input(
                vec![
                    JournalLineInput::debit(cash, amount, Some("Cash sale".to_string())),
                    JournalLineInput::credit(revenue, amount, None),
                ],
                JournalSource::Manual,
            );
            let resolved = resolve(&input, &accounts).unwrap();
            apply(&mut accounts, &resolved);

            prop_assert_eq!(accounts[&cash].current_balance, cash_opening + amount);
            prop_assert_eq!(accounts[&revenue].current_balance, revenue_opening + amount);

            // Void: swap every side and post through the same engine.
            let posted: Vec<_> = resolved
                .iter()
                .map(|line| saldo_core::ledger::PostedLine {
                    account_id: line.account_id,
                    description: line.description.clone(),
                    debit: line.debit,
                    credit: line.credit,
                })
                .collect();
            let reversal = journal_input(reverse_lines(&posted), JournalSource::Transaction);
            let resolved = resolve(&reversal, &accounts).unwrap();
            apply(&mut accounts, &resolved);

            prop_assert_eq!(accounts[&cash].current_balance, cash_opening);
            prop_assert_eq!(accounts[&revenue].current_balance, revenue_opening);
        }

        /// For any month count, the generated number parses back to the
        /// next sequence: numbering is gap-free under serialized counts.
        #[test]
        fn prop_numbering_is_gap_free(
            existing in 0u64..9_999,
            month in 1u32..=12,
        ) {
            let date = chrono::NaiveDate::from_ymd_opt(2024, month, 1).unwrap();
            let number = numbering::format_number(
                DocumentType::Journal,
                date,
                numbering::next_sequence(existing),
            );
            let parsed = numbering::parse_number(&number).unwrap();
            prop_assert_eq!(parsed.prefix, "JU");
            prop_assert_eq!(u64::from(parsed.sequence), existing + 1);
            prop_assert_eq!(parsed.month, month);
        }

        /// A batch of journals applies all-or-nothing: when any member
        /// fails validation, no member's deltas reach the accounts.
        #[test]
        fn prop_batch_is_all_or_nothing(
            amount in amount_strategy(),
            bad_index in 0usize..3,
        ) {
            let cash = Uuid::new_v4();
            let revenue = Uuid::new_v4();
            let accounts = HashMap::from([
                (cash, account(cash, NormalBalance::Debit, dec!(0))),
                (revenue, account(revenue, NormalBalance::Credit, dec!(0))),
            ]);

            let good = || journal_input(
                vec![
                    JournalLineInput::debit(cash, amount, None),
                    JournalLineInput::credit(revenue, amount, None),
                ],
                JournalSource::Manual,
            );
            // One member is unbalanced.
            let bad = journal_input(
                vec![JournalLineInput::debit(cash, amount, None)],
                JournalSource::Manual,
            );

            let mut batch = vec![good(), good(), good()];
            batch[bad_index] = bad;

            // The store's batch path: validate each against a working copy,
            // commit only when all succeed.
            let mut working = accounts.clone();
            let mut failed = false;
            for input in &batch {
                match resolve(input, &working) {
                    Ok(resolved) => apply(&mut working, &resolved),
                    Err(_) => {
                        failed = true;
                        break;
                    }
                }
            }
            let committed = if failed { accounts.clone() } else { working };

            prop_assert!(failed);
            prop_assert_eq!(committed[&cash].current_balance, dec!(0));
            prop_assert_eq!(committed[&revenue].current_balance, dec!(0));
        }
    }

    /// The full auto-posting scenario: a 40,000,000 sale with no tax
    /// derives a two-line journal (debit receivable, credit revenue) that
    /// validates and moves both balances by the document total.
    #[test]
    fn test_sale_auto_posting_scenario() {
        let receivable = Uuid::new_v4();
        let revenue = Uuid::new_v4();
        let profile = PostingProfile {
            accounts_receivable_id: Some(receivable),
            ..PostingProfile::default()
        };

        let document = TradeDocument {
            kind: TradeKind::Sale,
            number: "INV/202401/0001".to_string(),
            contact_name: Some("PT Maju Jaya".to_string()),
            subtotal: dec!(40_000_000),
            tax_amount: dec!(0),
            total: dec!(40_000_000),
        };
        let items = vec![TradeItem {
            account_id: revenue,
            description: Some("Consulting services".to_string()),
            subtotal: dec!(40_000_000),
        }];

        let lines = derive_trade_lines(&document, &items, &profile).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].debit, dec!(40_000_000));
        assert_eq!(lines[1].credit, dec!(40_000_000));

        let mut accounts = HashMap::from([
            (receivable, account(receivable, NormalBalance::Debit, dec!(0))),
            (revenue, account(revenue, NormalBalance::Credit, dec!(0))),
        ]);
        let input = journal_input(lines, JournalSource::Transaction);
        let resolved = resolve(&input, &accounts).unwrap();
        apply(&mut accounts, &resolved);

        assert_eq!(accounts[&receivable].current_balance, dec!(40_000_000));
        assert_eq!(accounts[&revenue].current_balance, dec!(40_000_000));
    }

    /// A taxed sale with no output tax account configured is a hard error,
    /// not a silently skipped tax line.
    #[test]
    fn test_taxed_sale_requires_tax_account() {
        let profile = PostingProfile {
            accounts_receivable_id: Some(Uuid::new_v4()),
            ..PostingProfile::default()
        };
        let document = TradeDocument {
            kind: TradeKind::Sale,
            number: "INV/202401/0002".to_string(),
            contact_name: None,
            subtotal: dec!(1_000),
            tax_amount: dec!(110),
            total: dec!(1_110),
        };
        let items = vec![TradeItem {
            account_id: Uuid::new_v4(),
            description: None,
            subtotal: dec!(1_000),
        }];

        let result = derive_trade_lines(&document, &items, &profile);
        assert!(matches!(
            result,
            Err(LedgerError::MissingPostingAccount("output tax"))
        ));
    }

    /// Voiding a posted purchase synthesizes the mirrored journal: the
    /// payable credit becomes a debit and the reversal is still balanced.
    #[test]
    fn test_purchase_void_synthesizes_mirror() {
        let payable = Uuid::new_v4();
        let expense = Uuid::new_v4();
        let profile = PostingProfile {
            accounts_payable_id: Some(payable),
            input_tax_id: Some(Uuid::new_v4()),
            ..PostingProfile::default()
        };
        let document = TradeDocument {
            kind: TradeKind::Purchase,
            number: "PUR/202401/0004".to_string(),
            contact_name: Some("CV Sumber Makmur".to_string()),
            subtotal: dec!(5_000),
            tax_amount: dec!(550),
            total: dec!(5_550),
        };
        let items = vec![TradeItem {
            account_id: expense,
            description: Some("Office supplies".to_string()),
            subtotal: dec!(5_000),
        }];

        let lines = derive_trade_lines(&document, &items, &profile).unwrap();
        let posted: Vec<_> = lines
            .iter()
            .map(|line| saldo_core::ledger::PostedLine {
                account_id: line.account_id,
                description: line.description.clone(),
                debit: line.debit,
                credit: line.credit,
            })
            .collect();
        let reversed = reverse_lines(&posted);

        // Payable was credited 5,550 by the purchase; the reversal debits it.
        assert_eq!(reversed[0].account_id, payable);
        assert_eq!(reversed[0].debit, dec!(5_550));
        let debits: Decimal = reversed.iter().map(|l| l.debit).sum();
        let credits: Decimal = reversed.iter().map(|l| l.credit).sum();
        assert_eq!(debits, credits);
        assert_eq!(
            reversal_description(&document.number),
            "Reversal of PUR/202401/0004"
        );
    }

    /// Voucher lines carry their own split and validate through the same
    /// engine as manual journals.
    #[test]
    fn test_voucher_posting_flow() {
        let bank = Uuid::new_v4();
        let expense = Uuid::new_v4();
        let lines = derive_voucher_lines(&[
            VoucherLine {
                account_id: expense,
                description: Some("Utilities".to_string()),
                debit: dec!(2_500),
                credit: dec!(0),
            },
            VoucherLine {
                account_id: bank,
                description: None,
                debit: dec!(0),
                credit: dec!(2_500),
            },
        ])
        .unwrap();

        let accounts = HashMap::from([
            (bank, account(bank, NormalBalance::Debit, dec!(10_000))),
            (expense, account(expense, NormalBalance::Debit, dec!(0))),
        ]);
        let input = journal_input(lines, JournalSource::Voucher);
        let resolved = resolve(&input, &accounts).unwrap();

        // Bank is debit-normal, so a credit drops it.
        assert_eq!(resolved[1].balance_after, dec!(7_500));
    }

    /// Scheduler isolation: the middle template's failure is recorded as
    /// its own outcome while its neighbors still generate.
    #[test]
    fn test_recurring_failure_is_isolated() {
        let line = |amount: Decimal| TemplateLine {
            account_id: Uuid::new_v4(),
            description: None,
            debit: amount,
            credit: Decimal::ZERO,
        };
        let templates: Vec<Vec<TemplateLine>> =
            vec![vec![line(dec!(100))], vec![], vec![line(dec!(300))]];

        let outcomes: Vec<RunOutcome> = templates
            .iter()
            .map(|lines| match template_total(lines) {
                Ok(_) => RunOutcome::Success {
                    transaction_id: Uuid::new_v4(),
                },
                Err(err) => RunOutcome::Failure {
                    message: err.to_string(),
                },
            })
            .collect();

        assert_eq!(
            outcomes.iter().map(RunOutcome::status).collect::<Vec<_>>(),
            vec!["success", "failure", "success"]
        );
    }
}
