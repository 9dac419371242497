//! `SeaORM` entity definitions.

pub mod prelude;

pub mod account_types;
pub mod bank_accounts;
pub mod bank_movements;
pub mod bank_reconciliations;
pub mod banks;
pub mod check_types;
pub mod checks;
pub mod currencies;
pub mod purchase_invoices;
pub mod sea_orm_active_enums;
pub mod supplier_payments;
pub mod suppliers;
