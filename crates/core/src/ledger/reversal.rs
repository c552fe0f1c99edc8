//! Reversal synthesis for voiding posted documents.
//!
//! A posted transaction is never mutated; voiding appends a reversing
//! journal with every debit and credit swapped, restoring account balances
//! through the normal posting path.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::JournalLineInput;

/// A line of an already-posted journal, as read back from the store.
#[derive(Debug, Clone)]
pub struct PostedLine {
    /// The account the original line posted to.
    pub account_id: Uuid,
    /// Original line description.
    pub description: Option<String>,
    /// Original debit amount.
    pub debit: Decimal,
    /// Original credit amount.
    pub credit: Decimal,
}

/// Builds reversing line inputs by swapping each line's debit and credit.
///
/// Posting the result through the normal engine applies the exact inverse
/// directional delta to every account, so a post-then-void round trip
/// leaves balances unchanged.
#[must_use]
pub fn reverse_lines(lines: &[PostedLine]) -> Vec<JournalLineInput> {
    lines
        .iter()
        .map(|line| JournalLineInput {
            account_id: line.account_id,
            description: line
                .description
                .as_ref()
                .map(|d| format!("Reversal: {d}")),
            debit: line.credit,
            credit: line.debit,
        })
        .collect()
}

/// The description for a reversing journal of the given document.
#[must_use]
pub fn reversal_description(document_number: &str) -> String {
    format!("Reversal of {document_number}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_swaps_sides() {
        let account = Uuid::new_v4();
        let reversed = reverse_lines(&[PostedLine {
            account_id: account,
            description: Some("Cash sale".to_string()),
            debit: dec!(750),
            credit: dec!(0),
        }]);

        assert_eq!(reversed.len(), 1);
        assert_eq!(reversed[0].account_id, account);
        assert_eq!(reversed[0].debit, dec!(0));
        assert_eq!(reversed[0].credit, dec!(750));
        assert_eq!(reversed[0].description.as_deref(), Some("Reversal: Cash sale"));
    }

    #[test]
    fn test_reversal_of_balanced_journal_is_balanced() {
        let lines = vec![
            PostedLine {
                account_id: Uuid::new_v4(),
                description: None,
                debit: dec!(100),
                credit: dec!(0),
            },
            PostedLine {
                account_id: Uuid::new_v4(),
                description: None,
                debit: dec!(0),
                credit: dec!(100),
            },
        ];
        let reversed = reverse_lines(&lines);
        let debits: Decimal = reversed.iter().map(|l| l.debit).sum();
        let credits: Decimal = reversed.iter().map(|l| l.credit).sum();
        assert_eq!(debits, dec!(100));
        assert_eq!(credits, dec!(100));
    }

    #[test]
    fn test_description() {
        assert_eq!(
            reversal_description("INV/202401/0003"),
            "Reversal of INV/202401/0003"
        );
    }
}
