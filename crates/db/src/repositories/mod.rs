//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every posting runs inside one database transaction.

pub mod account;
pub mod check;
pub mod movement;
pub mod payable;
pub mod reconciliation;
mod support;
pub mod transfer;

pub use account::{
    AccountBalanceRecord, AccountRecord, AccountRepository, OpenAccountInput, StatementFilter,
};
pub use check::{CheckDetails, CheckRepository};
pub use movement::{MovementRecord, MovementRepository};
pub use payable::{
    InvoiceRecord, OPEN_INVOICES_DEFAULT_LIMIT, PaidInvoiceRecord, PayableRepository,
    PayablesFilter, PaymentHistoryRecord,
};
pub use reconciliation::{
    CommitReconciliationInput, ReconciliationFilter, ReconciliationRecord,
    ReconciliationRepository,
};
pub use transfer::TransferRepository;
