//! Frequency arithmetic for recurring templates.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::RecurringError;

/// How often a recurring template fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Every 7 days.
    Weekly,
    /// Every calendar month.
    Monthly,
    /// Every 3 calendar months.
    Quarterly,
    /// Every calendar year.
    Yearly,
    /// Every `interval_days` days.
    Custom,
}

/// Advances a run date by one frequency step.
///
/// Monthly/quarterly/yearly use calendar increments (Jan 31 + 1 month =
/// Feb 29 in a leap year); custom uses `interval_days`, defaulting to 1
/// when unset or zero.
///
/// # Errors
///
/// Returns `DateOverflow` if the result leaves chrono's representable range.
pub fn advance(
    from: NaiveDate,
    frequency: Frequency,
    interval_days: Option<u32>,
) -> Result<NaiveDate, RecurringError> {
    let overflow = || RecurringError::DateOverflow(from);
    match frequency {
        Frequency::Daily => from.checked_add_days(Days::new(1)).ok_or_else(overflow),
        Frequency::Weekly => from.checked_add_days(Days::new(7)).ok_or_else(overflow),
        Frequency::Monthly => from.checked_add_months(Months::new(1)).ok_or_else(overflow),
        Frequency::Quarterly => from.checked_add_months(Months::new(3)).ok_or_else(overflow),
        Frequency::Yearly => from.checked_add_months(Months::new(12)).ok_or_else(overflow),
        Frequency::Custom => {
            let days = interval_days.filter(|d| *d > 0).unwrap_or(1);
            from.checked_add_days(Days::new(u64::from(days)))
                .ok_or_else(overflow)
        }
    }
}

/// Whether a template is due to run.
///
/// Due means active, `next_run_at <= now`, and the end date (when set) has
/// not passed.
#[must_use]
pub fn is_due(
    is_active: bool,
    next_run_at: NaiveDate,
    end_date: Option<NaiveDate>,
    now: NaiveDate,
) -> bool {
    is_active && next_run_at <= now && end_date.is_none_or(|end| now <= end)
}
