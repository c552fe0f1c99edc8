//! Chart of accounts registry.
//!
//! This module implements the account catalog for one company:
//! - Account types, subtypes, and normal balance sides
//! - Creation/update/deletion validation rules
//! - The directional balance rule used everywhere balances are touched
//! - Pure hierarchy construction from a flat account list

pub mod error;
pub mod hierarchy;
pub mod service;
pub mod types;

pub use error::CoaError;
pub use hierarchy::{AccountNode, build_hierarchy};
pub use service::{CoaService, NewAccount};
pub use types::{
    AccountRecord, AccountSubtype, AccountType, CreateAccountInput, NormalBalance,
    UpdateAccountPatch,
};
