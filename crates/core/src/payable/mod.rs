//! Supplier invoices and payments.
//!
//! An invoice moves PENDING → PARTIAL → PAID as payments reduce its
//! outstanding balance, or to VOIDED by administrative action.

pub mod service;
pub mod types;

pub use service::{PayablesService, PaymentApplication};
pub use types::{InvoiceSnapshot, InvoiceStatus, NewInvoiceInput, PayInvoiceInput, PaymentForm};
