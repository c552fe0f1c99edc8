//! Canonical rounding tolerance for balance-equality checks.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every debit/credit equality check in the system (manual journals,
//! auto-posted journals, statement balancing) uses this single tolerance.

use rust_decimal::Decimal;

/// Maximum absolute difference at which two monetary sums count as equal.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2); // 0.01

/// Returns true if `debit` and `credit` are equal within [`BALANCE_TOLERANCE`].
#[must_use]
pub fn is_balanced(debit: Decimal, credit: Decimal) -> bool {
    (debit - credit).abs() <= BALANCE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_value() {
        assert_eq!(BALANCE_TOLERANCE, dec!(0.01));
    }

    #[test]
    fn test_exact_equality() {
        assert!(is_balanced(dec!(100), dec!(100)));
    }

    #[test]
    fn test_within_tolerance() {
        assert!(is_balanced(dec!(100.00), dec!(100.01)));
        assert!(is_balanced(dec!(100.01), dec!(100.00)));
    }

    #[test]
    fn test_outside_tolerance() {
        assert!(!is_balanced(dec!(100.00), dec!(100.02)));
        assert!(!is_balanced(dec!(100), dec!(99)));
    }
}
