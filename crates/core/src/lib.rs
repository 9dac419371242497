//! Core business logic for Tesoro.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; the `tesoro-db`
//! crate runs them inside database transactions.
//!
//! # Modules
//!
//! - `ledger` - Movement kinds, balance calculation, posting and transfer rules
//! - `check` - Check lifecycle state machine
//! - `payable` - Supplier invoice and payment rules
//! - `reconciliation` - Book versus bank comparison and outstanding items

pub mod check;
pub mod ledger;
pub mod payable;
pub mod reconciliation;

pub use ledger::{ErrorKind, LedgerError};
