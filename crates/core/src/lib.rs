//! Core business logic for Saldo.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here; persistence lookups are injected by the caller.
//!
//! # Modules
//!
//! - `coa` - Chart of accounts registry and balance directionality
//! - `numbering` - Human-readable document number generation
//! - `ledger` - Double-entry posting validation and auto-posting derivation
//! - `payroll` - Payroll journal derivation
//! - `recurring` - Recurring transaction scheduling
//! - `reports` - Financial statement aggregation

pub mod coa;
pub mod ledger;
pub mod numbering;
pub mod payroll;
pub mod recurring;
pub mod reports;
