//! Shared types, errors, and configuration for Saldo.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - User roles and authorization predicates
//! - The canonical balance rounding tolerance
//! - Configuration management

pub mod config;
pub mod error;
pub mod role;
pub mod tolerance;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use role::Role;
pub use tolerance::BALANCE_TOLERANCE;
