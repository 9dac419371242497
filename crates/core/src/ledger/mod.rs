//! Bank ledger posting logic.
//!
//! This module implements the rules every movement obeys:
//! - Movement kinds and the sign each one applies to a balance
//! - Balance calculation over a movement log
//! - Posting validation (amount, account state, sufficient funds)
//! - Transfer planning (two legs sharing one correlation id)
//! - The error taxonomy shared by every engine component

pub mod balance;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::{AccountBalance, BalanceQuery, compute_balance};
pub use error::{ErrorKind, LedgerError};
pub use service::{AccountInfo, LedgerService, TransferInput, TransferPlan};
pub use types::{AccountStatus, Direction, MovementKind, MovementLine, MovementMetadata, NewMovement};
