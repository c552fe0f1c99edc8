//! Recurring transaction scheduling.
//!
//! Templates carry a typed line list and a calendar frequency; the scheduler
//! selects due templates, generates a transaction-shaped document from each,
//! and advances `next_run_at`. One template's failure never aborts the rest
//! of the batch.

pub mod error;
pub mod schedule;
pub mod types;

pub use error::RecurringError;
pub use schedule::{Frequency, advance, is_due};
pub use types::{RunOutcome, TemplateLine, template_total};
