//! Double-entry posting engine logic.
//!
//! This module implements the core ledger functionality:
//! - Journal input/resolved types with balance snapshots
//! - Validation of balanced journal entries against injected lookups
//! - Auto-posting line derivation for sales, purchases, and vouchers
//! - Reversal synthesis for voiding posted documents
//! - Error types for ledger operations

pub mod error;
pub mod posting;
pub mod reversal;
pub mod service;
pub mod types;

pub use error::LedgerError;
pub use posting::{
    PostingProfile, TradeDocument, TradeItem, TradeKind, VoucherLine, derive_trade_lines,
    derive_voucher_lines,
};
pub use reversal::{PostedLine, reversal_description, reverse_lines};
pub use service::LedgerService;
pub use types::{
    AccountInfo, CreateJournalInput, JournalLineInput, JournalSource, JournalTotals, PeriodInfo,
    ResolvedLine,
};
