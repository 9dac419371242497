//! Bank reconciliation.
//!
//! Compares the book balance at a cut-off date with the balance reported by
//! the bank, and lists the items that explain the gap.

pub mod service;
pub mod types;

pub use service::ReconciliationService;
pub use types::{OutstandingCheck, OutstandingItems, OutstandingMovement, ReconciliationFigures};
