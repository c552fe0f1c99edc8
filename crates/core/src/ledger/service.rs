//! Ledger service for journal validation and resolution.
//!
//! This service contains pure business logic with no database dependencies.
//! It validates journal entries and computes per-line balance snapshots
//! before the caller persists them; all store lookups are injected.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{
    AccountInfo, CreateJournalInput, JournalLineInput, JournalTotals, PeriodInfo, ResolvedLine,
};

/// Ledger service for journal validation and resolution.
pub struct LedgerService;

impl LedgerService {
    /// Validate a journal and resolve per-line balance snapshots.
    ///
    /// Preconditions, checked in order (each a distinct failure):
    /// 1. The period is open and covers the journal date.
    /// 2. Every line's account exists, is active, is not a header, and (for
    ///    manual journals) allows manual entry.
    /// 3. Each line carries exactly one positive side.
    /// 4. Debits equal credits within the canonical tolerance.
    ///
    /// Resolution snapshots each account's balance before and after the line
    /// using the directional rule; an account appearing on several lines is
    /// chained through the journal in line order.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` naming the failed precondition.
    pub fn validate_and_resolve<A>(
        input: &CreateJournalInput,
        period: &PeriodInfo,
        account_lookup: A,
    ) -> Result<(Vec<ResolvedLine>, JournalTotals), LedgerError>
    where
        A: Fn(Uuid) -> Result<AccountInfo, LedgerError>,
    {
        Self::validate_period(period, input.journal_date)?;

        if input.lines.is_empty() {
            return Err(LedgerError::EmptyJournal);
        }

        let requires_manual_flag = input.source.requires_manual_entry_flag();

        // Running balance per account across the lines of this journal.
        let mut balances: HashMap<Uuid, (AccountInfo, Decimal)> = HashMap::new();
        let mut resolved = Vec::with_capacity(input.lines.len());

        for (index, line) in input.lines.iter().enumerate() {
            Self::validate_line_shape(line)?;

            let (account, balance) = match balances.get(&line.account_id) {
                Some((account, balance)) => (account.clone(), *balance),
                None => {
                    let account = account_lookup(line.account_id)?;
                    Self::validate_account(&account, requires_manual_flag)?;
                    let balance = account.current_balance;
                    (account, balance)
                }
            };

            let delta = account.normal_balance.balance_delta(line.debit, line.credit);
            let balance_after = balance + delta;
            balances.insert(line.account_id, (account, balance_after));

            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            resolved.push(ResolvedLine {
                account_id: line.account_id,
                line_no: (index + 1) as i32,
                description: line.description.clone(),
                debit: line.debit,
                credit: line.credit,
                balance_before: balance,
                balance_after,
            });
        }

        let totals = Self::calculate_totals(&resolved);
        if !totals.is_balanced {
            return Err(LedgerError::Unbalanced {
                debit: totals.total_debit,
                credit: totals.total_credit,
            });
        }

        Ok((resolved, totals))
    }

    /// Validates that the period is open and covers the date.
    pub fn validate_period(period: &PeriodInfo, date: chrono::NaiveDate) -> Result<(), LedgerError> {
        if !period.is_open {
            return Err(LedgerError::PeriodClosed);
        }
        if !period.covers(date) {
            return Err(LedgerError::DateOutsidePeriod { date });
        }
        Ok(())
    }

    /// Validates the debit/credit shape of a single line.
    fn validate_line_shape(line: &JournalLineInput) -> Result<(), LedgerError> {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        match (line.debit.is_zero(), line.credit.is_zero()) {
            (true, true) => Err(LedgerError::ZeroAmount),
            (false, false) => Err(LedgerError::BothSidesSet),
            _ => Ok(()),
        }
    }

    /// Validates an account for posting.
    fn validate_account(
        account: &AccountInfo,
        requires_manual_flag: bool,
    ) -> Result<(), LedgerError> {
        if !account.is_active {
            return Err(LedgerError::AccountInactive(account.id));
        }
        if account.is_header {
            return Err(LedgerError::AccountIsHeader(account.id));
        }
        if requires_manual_flag && !account.allow_manual_entry {
            return Err(LedgerError::AccountNoManualEntry(account.id));
        }
        Ok(())
    }

    /// Calculates journal totals from resolved lines.
    #[must_use]
    pub fn calculate_totals(lines: &[ResolvedLine]) -> JournalTotals {
        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();
        JournalTotals::new(total_debit, total_credit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::NormalBalance;
    use crate::ledger::types::JournalSource;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn open_period() -> PeriodInfo {
        PeriodInfo {
            id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            is_open: true,
        }
    }

    fn make_account(id: Uuid, normal_balance: NormalBalance, balance: Decimal) -> AccountInfo {
        AccountInfo {
            id,
            is_active: true,
            is_header: false,
            allow_manual_entry: true,
            normal_balance,
            current_balance: balance,
        }
    }

    fn make_input(lines: Vec<JournalLineInput>, source: JournalSource) -> CreateJournalInput {
        CreateJournalInput {
            company_id: Uuid::new_v4(),
            period_id: None,
            journal_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "Test journal".to_string(),
            journal_number: None,
            source,
            source_id: None,
            lines,
            created_by: Uuid::new_v4(),
        }
    }

    fn two_line_input(debit_id: Uuid, credit_id: Uuid, amount: Decimal) -> CreateJournalInput {
        make_input(
            vec![
                JournalLineInput::debit(debit_id, amount, None),
                JournalLineInput::credit(credit_id, amount, None),
            ],
            JournalSource::Manual,
        )
    }

    #[test]
    fn test_balanced_journal_resolves() {
        let cash = Uuid::new_v4();
        let revenue = Uuid::new_v4();
        let input = two_line_input(cash, revenue, dec!(500));

        let lookup = |id: Uuid| {
            if id == cash {
                Ok(make_account(id, NormalBalance::Debit, dec!(1000)))
            } else {
                Ok(make_account(id, NormalBalance::Credit, dec!(0)))
            }
        };

        let (resolved, totals) =
            LedgerService::validate_and_resolve(&input, &open_period(), lookup).unwrap();

        assert_eq!(resolved.len(), 2);
        assert!(totals.is_balanced);

        // Debit-normal cash: 1000 -> 1500
        assert_eq!(resolved[0].balance_before, dec!(1000));
        assert_eq!(resolved[0].balance_after, dec!(1500));
        assert_eq!(resolved[0].line_no, 1);

        // Credit-normal revenue: 0 -> 500
        assert_eq!(resolved[1].balance_before, dec!(0));
        assert_eq!(resolved[1].balance_after, dec!(500));
        assert_eq!(resolved[1].line_no, 2);
    }

    #[test]
    fn test_repeated_account_chains_balances() {
        let cash = Uuid::new_v4();
        let other = Uuid::new_v4();
        let input = make_input(
            vec![
                JournalLineInput::debit(cash, dec!(100), None),
                JournalLineInput::debit(cash, dec!(50), None),
                JournalLineInput::credit(other, dec!(150), None),
            ],
            JournalSource::Manual,
        );

        let lookup = move |id: Uuid| {
            if id == cash {
                Ok(make_account(id, NormalBalance::Debit, dec!(0)))
            } else {
                Ok(make_account(id, NormalBalance::Credit, dec!(0)))
            }
        };

        let (resolved, _) =
            LedgerService::validate_and_resolve(&input, &open_period(), lookup).unwrap();

        assert_eq!(resolved[0].balance_before, dec!(0));
        assert_eq!(resolved[0].balance_after, dec!(100));
        assert_eq!(resolved[1].balance_before, dec!(100));
        assert_eq!(resolved[1].balance_after, dec!(150));
    }

    #[test]
    fn test_closed_period_rejected_first() {
        let mut period = open_period();
        period.is_open = false;
        // Even an unbalanced journal fails with PeriodClosed first.
        let input = make_input(
            vec![JournalLineInput::debit(Uuid::new_v4(), dec!(1), None)],
            JournalSource::Manual,
        );
        let result = LedgerService::validate_and_resolve(&input, &period, |id| {
            Ok(make_account(id, NormalBalance::Debit, dec!(0)))
        });
        assert!(matches!(result, Err(LedgerError::PeriodClosed)));
    }

    #[test]
    fn test_date_outside_period() {
        let period = PeriodInfo {
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            ..open_period()
        };
        let input = two_line_input(Uuid::new_v4(), Uuid::new_v4(), dec!(1));
        let result = LedgerService::validate_and_resolve(&input, &period, |id| {
            Ok(make_account(id, NormalBalance::Debit, dec!(0)))
        });
        assert!(matches!(result, Err(LedgerError::DateOutsidePeriod { .. })));
    }

    #[test]
    fn test_empty_journal_rejected() {
        let input = make_input(vec![], JournalSource::Manual);
        let result = LedgerService::validate_and_resolve(&input, &open_period(), |id| {
            Ok(make_account(id, NormalBalance::Debit, dec!(0)))
        });
        assert!(matches!(result, Err(LedgerError::EmptyJournal)));
    }

    #[test]
    fn test_unbalanced_rejected() {
        let input = make_input(
            vec![
                JournalLineInput::debit(Uuid::new_v4(), dec!(100), None),
                JournalLineInput::credit(Uuid::new_v4(), dec!(50), None),
            ],
            JournalSource::Manual,
        );
        let result = LedgerService::validate_and_resolve(&input, &open_period(), |id| {
            Ok(make_account(id, NormalBalance::Debit, dec!(0)))
        });
        assert!(matches!(result, Err(LedgerError::Unbalanced { .. })));
    }

    #[test]
    fn test_header_account_rejected() {
        let input = two_line_input(Uuid::new_v4(), Uuid::new_v4(), dec!(10));
        let result = LedgerService::validate_and_resolve(&input, &open_period(), |id| {
            let mut account = make_account(id, NormalBalance::Debit, dec!(0));
            account.is_header = true;
            Ok(account)
        });
        assert!(matches!(result, Err(LedgerError::AccountIsHeader(_))));
    }

    #[test]
    fn test_inactive_account_rejected() {
        let input = two_line_input(Uuid::new_v4(), Uuid::new_v4(), dec!(10));
        let result = LedgerService::validate_and_resolve(&input, &open_period(), |id| {
            let mut account = make_account(id, NormalBalance::Debit, dec!(0));
            account.is_active = false;
            Ok(account)
        });
        assert!(matches!(result, Err(LedgerError::AccountInactive(_))));
    }

    #[test]
    fn test_manual_entry_flag_enforced_for_manual_only() {
        let no_manual = |id: Uuid| {
            let mut account = make_account(id, NormalBalance::Debit, dec!(0));
            account.allow_manual_entry = false;
            Ok(account)
        };

        let manual = two_line_input(Uuid::new_v4(), Uuid::new_v4(), dec!(10));
        let result = LedgerService::validate_and_resolve(&manual, &open_period(), no_manual);
        assert!(matches!(result, Err(LedgerError::AccountNoManualEntry(_))));

        // Auto-posted journals skip the manual-entry flag.
        let mut auto = two_line_input(Uuid::new_v4(), Uuid::new_v4(), dec!(10));
        auto.source = JournalSource::Transaction;
        let result = LedgerService::validate_and_resolve(&auto, &open_period(), no_manual);
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let input = make_input(
            vec![
                JournalLineInput {
                    account_id: Uuid::new_v4(),
                    description: None,
                    debit: dec!(0),
                    credit: dec!(0),
                },
                JournalLineInput::credit(Uuid::new_v4(), dec!(10), None),
            ],
            JournalSource::Manual,
        );
        let result = LedgerService::validate_and_resolve(&input, &open_period(), |id| {
            Ok(make_account(id, NormalBalance::Debit, dec!(0)))
        });
        assert!(matches!(result, Err(LedgerError::ZeroAmount)));
    }

    #[test]
    fn test_both_sides_rejected() {
        let input = make_input(
            vec![
                JournalLineInput {
                    account_id: Uuid::new_v4(),
                    description: None,
                    debit: dec!(10),
                    credit: dec!(10),
                },
                JournalLineInput::credit(Uuid::new_v4(), dec!(10), None),
            ],
            JournalSource::Manual,
        );
        let result = LedgerService::validate_and_resolve(&input, &open_period(), |id| {
            Ok(make_account(id, NormalBalance::Debit, dec!(0)))
        });
        assert!(matches!(result, Err(LedgerError::BothSidesSet)));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let input = make_input(
            vec![
                JournalLineInput::debit(Uuid::new_v4(), dec!(-5), None),
                JournalLineInput::credit(Uuid::new_v4(), dec!(-5), None),
            ],
            JournalSource::Manual,
        );
        let result = LedgerService::validate_and_resolve(&input, &open_period(), |id| {
            Ok(make_account(id, NormalBalance::Debit, dec!(0)))
        });
        assert!(matches!(result, Err(LedgerError::NegativeAmount)));
    }

    #[test]
    fn test_account_lookup_failure_propagates() {
        let missing = Uuid::new_v4();
        let input = two_line_input(missing, Uuid::new_v4(), dec!(10));
        let result = LedgerService::validate_and_resolve(&input, &open_period(), |id| {
            Err(LedgerError::AccountNotFound(id))
        });
        assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));
    }
}
