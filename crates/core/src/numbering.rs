//! Human-readable document number generation.
//!
//! Numbers follow the bit-exact external contract
//! `{PREFIX}/{YYYY}{MM}/{sequence:04}` (e.g. `JU/202401/0007`,
//! `INV/202401/0001`); the format is preserved for compatibility with
//! existing printed and referenced documents.
//!
//! The sequence is `count of existing documents of this type in this month
//! + 1`. That count-then-increment step is only correct under serialized
//! access, so the persistence layer computes the count inside the same
//! database transaction as the insert and treats a unique-violation on
//! `(company_id, number)` as a signal to regenerate and retry.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Document kinds that receive sequential numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Manual journal entry.
    Journal,
    /// Sales invoice.
    Sale,
    /// Purchase document.
    Purchase,
    /// Voucher.
    Voucher,
    /// Payroll payment.
    Payroll,
    /// Transaction generated by the recurring scheduler.
    Recurring,
}

impl DocumentType {
    /// The number prefix for this document type.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Journal => "JU",
            Self::Sale => "INV",
            Self::Purchase => "PUR",
            Self::Voucher => "VCH",
            Self::Payroll => "PAY",
            Self::Recurring => "RTR",
        }
    }
}

/// Errors from document number parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumberingError {
    /// The string does not match `{PREFIX}/{YYYYMM}/{seq}`.
    #[error("Invalid document number format: '{0}'")]
    InvalidFormat(String),
}

/// A parsed document number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNumber {
    /// The type prefix (e.g. "JU").
    pub prefix: String,
    /// Four-digit year.
    pub year: i32,
    /// Month 1-12.
    pub month: u32,
    /// Sequence within the month, 1-based.
    pub sequence: u32,
}

/// Formats a document number for the given type, date, and sequence.
#[must_use]
pub fn format_number(document_type: DocumentType, date: NaiveDate, sequence: u32) -> String {
    format!(
        "{}/{:04}{:02}/{:04}",
        document_type.prefix(),
        date.year(),
        date.month(),
        sequence
    )
}

/// The next sequence given the count of existing documents in the month.
#[must_use]
pub const fn next_sequence(existing_in_month: u64) -> u32 {
    // Sequences are tiny in practice; saturate rather than wrap.
    let next = existing_in_month.saturating_add(1);
    let capped = if next > u32::MAX as u64 {
        u32::MAX as u64
    } else {
        next
    };
    #[allow(clippy::cast_possible_truncation)]
    let capped = capped as u32;
    capped
}

/// Parses a document number back into its parts.
///
/// # Errors
///
/// Returns `InvalidFormat` when the string does not match the contract.
pub fn parse_number(number: &str) -> Result<ParsedNumber, NumberingError> {
    let invalid = || NumberingError::InvalidFormat(number.to_string());

    let mut parts = number.split('/');
    let (Some(prefix), Some(period), Some(seq), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    if prefix.is_empty() || period.len() != 6 || seq.len() != 4 {
        return Err(invalid());
    }

    let year: i32 = period[..4].parse().map_err(|_| invalid())?;
    let month: u32 = period[4..].parse().map_err(|_| invalid())?;
    let sequence: u32 = seq.parse().map_err(|_| invalid())?;

    if !(1..=12).contains(&month) || sequence == 0 {
        return Err(invalid());
    }

    Ok(ParsedNumber {
        prefix: prefix.to_string(),
        year,
        month,
        sequence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_contract() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(format_number(DocumentType::Journal, date, 7), "JU/202401/0007");
        assert_eq!(format_number(DocumentType::Sale, date, 1), "INV/202401/0001");
    }

    #[test]
    fn test_format_month_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 30).unwrap();
        assert_eq!(
            format_number(DocumentType::Purchase, date, 123),
            "PUR/202409/0123"
        );
    }

    #[test]
    fn test_next_sequence() {
        assert_eq!(next_sequence(0), 1);
        assert_eq!(next_sequence(6), 7);
    }

    #[test]
    fn test_next_sequence_saturates() {
        assert_eq!(next_sequence(u64::from(u32::MAX)), u32::MAX);
        assert_eq!(next_sequence(u64::MAX), u32::MAX);
    }

    #[test]
    fn test_parse_round_trip() {
        let parsed = parse_number("JU/202401/0007").unwrap();
        assert_eq!(parsed.prefix, "JU");
        assert_eq!(parsed.year, 2024);
        assert_eq!(parsed.month, 1);
        assert_eq!(parsed.sequence, 7);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in [
            "",
            "JU",
            "JU/202401",
            "JU/2024/0007",
            "JU/202413/0007",
            "JU/202401/0000",
            "JU/202401/007",
            "JU/202401/0007/extra",
            "/202401/0007",
        ] {
            assert!(parse_number(bad).is_err(), "should reject '{bad}'");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Sequential generation in one month yields strictly increasing,
        /// gap-free, zero-padded numbers.
        #[test]
        fn prop_sequences_gap_free(count in 1u64..200) {
            let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
            let mut previous = None;
            for existing in 0..count {
                let seq = next_sequence(existing);
                let number = format_number(DocumentType::Journal, date, seq);
                let parsed = parse_number(&number).unwrap();
                prop_assert_eq!(parsed.sequence, seq);
                if let Some(prev) = previous {
                    prop_assert_eq!(seq, prev + 1);
                }
                previous = Some(seq);
            }
        }

        /// Every formatted number parses back to the same parts.
        #[test]
        fn prop_format_parse_inverse(
            year in 2000i32..2100,
            month in 1u32..=12,
            seq in 1u32..10_000,
        ) {
            let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            let number = format_number(DocumentType::Voucher, date, seq);
            let parsed = parse_number(&number).unwrap();
            prop_assert_eq!(parsed.year, year);
            prop_assert_eq!(parsed.month, month);
            prop_assert_eq!(parsed.sequence, seq);
        }
    }
}
