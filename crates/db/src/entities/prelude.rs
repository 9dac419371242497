//! Entity re-exports.

pub use super::account_types::Entity as AccountTypes;
pub use super::bank_accounts::Entity as BankAccounts;
pub use super::bank_movements::Entity as BankMovements;
pub use super::bank_reconciliations::Entity as BankReconciliations;
pub use super::banks::Entity as Banks;
pub use super::check_types::Entity as CheckTypes;
pub use super::checks::Entity as Checks;
pub use super::currencies::Entity as Currencies;
pub use super::purchase_invoices::Entity as PurchaseInvoices;
pub use super::supplier_payments::Entity as SupplierPayments;
pub use super::suppliers::Entity as Suppliers;
