//! Bank ledger schema.
//!
//! Written with the portable schema builder so the same migration runs on
//! Postgres in production and on SQLite in tests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_catalogs(manager).await?;
        create_bank_accounts(manager).await?;
        create_checks(manager).await?;
        create_payables(manager).await?;
        create_bank_movements(manager).await?;
        create_bank_reconciliations(manager).await?;

        manager
            .get_connection()
            .execute_unprepared(ACCOUNT_BALANCES_VIEW_SQL)
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP VIEW IF EXISTS account_balances")
            .await?;

        drop_table(manager, BankReconciliations::Table).await?;
        drop_table(manager, BankMovements::Table).await?;
        drop_table(manager, SupplierPayments::Table).await?;
        drop_table(manager, PurchaseInvoices::Table).await?;
        drop_table(manager, Suppliers::Table).await?;
        drop_table(manager, Checks::Table).await?;
        drop_table(manager, CheckTypes::Table).await?;
        drop_table(manager, BankAccounts::Table).await?;
        drop_table(manager, Currencies::Table).await?;
        drop_table(manager, AccountTypes::Table).await?;
        drop_table(manager, Banks::Table).await?;
        Ok(())
    }
}

const ACCOUNT_BALANCES_VIEW_SQL: &str = r"
CREATE VIEW account_balances AS
SELECT
    bank_account_id,
    SUM(
        CASE
            WHEN kind IN ('DEPOSIT', 'TRANSFER_IN', 'CHECK_CLEARED') THEN amount
            ELSE -amount
        END
    ) AS balance
FROM bank_movements
GROUP BY bank_account_id
";

async fn drop_table<T>(manager: &SchemaManager<'_>, table: T) -> Result<(), DbErr>
where
    T: IntoTableRef,
{
    manager
        .drop_table(Table::drop().table(table).if_exists().to_owned())
        .await
}

fn money(column: impl IntoIden) -> ColumnDef {
    ColumnDef::new(column).decimal_len(16, 2).not_null().to_owned()
}

async fn create_catalogs(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Banks::Table)
                .if_not_exists()
                .col(ColumnDef::new(Banks::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Banks::Name).string_len(100).not_null())
                .col(ColumnDef::new(Banks::Address).string_len(255))
                .col(ColumnDef::new(Banks::Phone).string_len(30))
                .col(ColumnDef::new(Banks::IsActive).boolean().not_null().default(true))
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(AccountTypes::Table)
                .if_not_exists()
                .col(ColumnDef::new(AccountTypes::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(AccountTypes::Description).string_len(50).not_null())
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(Currencies::Table)
                .if_not_exists()
                .col(ColumnDef::new(Currencies::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Currencies::Code).string_len(3).not_null().unique_key())
                .col(ColumnDef::new(Currencies::Description).string_len(50).not_null())
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(CheckTypes::Table)
                .if_not_exists()
                .col(ColumnDef::new(CheckTypes::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(CheckTypes::Description).string_len(50).not_null())
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(Suppliers::Table)
                .if_not_exists()
                .col(ColumnDef::new(Suppliers::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Suppliers::Name).string_len(150).not_null())
                .col(ColumnDef::new(Suppliers::TaxId).string_len(30))
                .col(ColumnDef::new(Suppliers::Phone).string_len(30))
                .col(ColumnDef::new(Suppliers::Email).string_len(100))
                .col(ColumnDef::new(Suppliers::IsActive).boolean().not_null().default(true))
                .to_owned(),
        )
        .await
}

async fn create_bank_accounts(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(BankAccounts::Table)
                .if_not_exists()
                .col(ColumnDef::new(BankAccounts::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(BankAccounts::BankId).uuid().not_null())
                .col(ColumnDef::new(BankAccounts::AccountTypeId).uuid().not_null())
                .col(ColumnDef::new(BankAccounts::CurrencyId).uuid().not_null())
                .col(ColumnDef::new(BankAccounts::AccountNumber).string_len(30).not_null())
                .col(ColumnDef::new(BankAccounts::HolderName).string_len(150).not_null())
                .col(ColumnDef::new(BankAccounts::Status).string_len(20).not_null())
                .col(ColumnDef::new(BankAccounts::OpenedOn).date().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_bank_accounts_bank")
                        .from(BankAccounts::Table, BankAccounts::BankId)
                        .to(Banks::Table, Banks::Id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_bank_accounts_type")
                        .from(BankAccounts::Table, BankAccounts::AccountTypeId)
                        .to(AccountTypes::Table, AccountTypes::Id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_bank_accounts_currency")
                        .from(BankAccounts::Table, BankAccounts::CurrencyId)
                        .to(Currencies::Table, Currencies::Id),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_bank_accounts_bank_number")
                .table(BankAccounts::Table)
                .col(BankAccounts::BankId)
                .col(BankAccounts::AccountNumber)
                .unique()
                .to_owned(),
        )
        .await
}

async fn create_checks(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Checks::Table)
                .if_not_exists()
                .col(ColumnDef::new(Checks::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Checks::BankAccountId).uuid().not_null())
                .col(ColumnDef::new(Checks::CheckTypeId).uuid().not_null())
                .col(ColumnDef::new(Checks::CheckNumber).string_len(30).not_null())
                .col(ColumnDef::new(Checks::Beneficiary).string_len(150).not_null())
                .col(money(Checks::Amount).check(Expr::col(Checks::Amount).gt(0)))
                .col(ColumnDef::new(Checks::IssuedOn).date().not_null())
                .col(ColumnDef::new(Checks::Status).string_len(20).not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_checks_account")
                        .from(Checks::Table, Checks::BankAccountId)
                        .to(BankAccounts::Table, BankAccounts::Id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_checks_type")
                        .from(Checks::Table, Checks::CheckTypeId)
                        .to(CheckTypes::Table, CheckTypes::Id),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_checks_account_number")
                .table(Checks::Table)
                .col(Checks::BankAccountId)
                .col(Checks::CheckNumber)
                .unique()
                .to_owned(),
        )
        .await
}

async fn create_payables(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(PurchaseInvoices::Table)
                .if_not_exists()
                .col(ColumnDef::new(PurchaseInvoices::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(PurchaseInvoices::SupplierId).uuid().not_null())
                .col(ColumnDef::new(PurchaseInvoices::InvoiceNumber).string_len(50).not_null())
                .col(ColumnDef::new(PurchaseInvoices::IssuedOn).date().not_null())
                .col(ColumnDef::new(PurchaseInvoices::DueOn).date())
                .col(ColumnDef::new(PurchaseInvoices::CurrencyId).uuid().not_null())
                .col(
                    money(PurchaseInvoices::TotalAmount)
                        .check(Expr::col(PurchaseInvoices::TotalAmount).gte(0)),
                )
                .col(
                    money(PurchaseInvoices::OutstandingBalance)
                        .check(Expr::col(PurchaseInvoices::OutstandingBalance).gte(0)),
                )
                .col(ColumnDef::new(PurchaseInvoices::Status).string_len(20).not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_purchase_invoices_supplier")
                        .from(PurchaseInvoices::Table, PurchaseInvoices::SupplierId)
                        .to(Suppliers::Table, Suppliers::Id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_purchase_invoices_currency")
                        .from(PurchaseInvoices::Table, PurchaseInvoices::CurrencyId)
                        .to(Currencies::Table, Currencies::Id),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_purchase_invoices_supplier_number")
                .table(PurchaseInvoices::Table)
                .col(PurchaseInvoices::SupplierId)
                .col(PurchaseInvoices::InvoiceNumber)
                .unique()
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(SupplierPayments::Table)
                .if_not_exists()
                .col(ColumnDef::new(SupplierPayments::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(SupplierPayments::SupplierId).uuid().not_null())
                .col(ColumnDef::new(SupplierPayments::InvoiceId).uuid())
                .col(ColumnDef::new(SupplierPayments::BankAccountId).uuid().not_null())
                .col(
                    ColumnDef::new(SupplierPayments::PaidAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(money(SupplierPayments::Amount).check(Expr::col(SupplierPayments::Amount).gt(0)))
                .col(ColumnDef::new(SupplierPayments::Form).string_len(20).not_null())
                .col(ColumnDef::new(SupplierPayments::BankReference).string_len(100))
                .col(ColumnDef::new(SupplierPayments::Notes).text())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_supplier_payments_supplier")
                        .from(SupplierPayments::Table, SupplierPayments::SupplierId)
                        .to(Suppliers::Table, Suppliers::Id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_supplier_payments_invoice")
                        .from(SupplierPayments::Table, SupplierPayments::InvoiceId)
                        .to(PurchaseInvoices::Table, PurchaseInvoices::Id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_supplier_payments_account")
                        .from(SupplierPayments::Table, SupplierPayments::BankAccountId)
                        .to(BankAccounts::Table, BankAccounts::Id),
                )
                .to_owned(),
        )
        .await
}

async fn create_bank_movements(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(BankMovements::Table)
                .if_not_exists()
                .col(ColumnDef::new(BankMovements::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(BankMovements::BankAccountId).uuid().not_null())
                .col(
                    ColumnDef::new(BankMovements::RecordedAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(ColumnDef::new(BankMovements::Kind).string_len(20).not_null())
                .col(money(BankMovements::Amount).check(Expr::col(BankMovements::Amount).gt(0)))
                .col(ColumnDef::new(BankMovements::Reference).string_len(255))
                .col(ColumnDef::new(BankMovements::Description).text())
                .col(ColumnDef::new(BankMovements::ExternalReference).string_len(100))
                .col(ColumnDef::new(BankMovements::CorrelationId).uuid())
                .col(ColumnDef::new(BankMovements::CheckId).uuid())
                .col(ColumnDef::new(BankMovements::PaymentId).uuid())
                .col(ColumnDef::new(BankMovements::RecordedBy).string_len(100))
                .col(
                    ColumnDef::new(BankMovements::Reconciled)
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_bank_movements_account")
                        .from(BankMovements::Table, BankMovements::BankAccountId)
                        .to(BankAccounts::Table, BankAccounts::Id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_bank_movements_check")
                        .from(BankMovements::Table, BankMovements::CheckId)
                        .to(Checks::Table, Checks::Id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_bank_movements_payment")
                        .from(BankMovements::Table, BankMovements::PaymentId)
                        .to(SupplierPayments::Table, SupplierPayments::Id),
                )
                .to_owned(),
        )
        .await?;

    // NULLs never collide, so only set references are unique.
    manager
        .create_index(
            Index::create()
                .name("uq_bank_movements_external_reference")
                .table(BankMovements::Table)
                .col(BankMovements::ExternalReference)
                .unique()
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("idx_bank_movements_account_recorded")
                .table(BankMovements::Table)
                .col(BankMovements::BankAccountId)
                .col(BankMovements::RecordedAt)
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("idx_bank_movements_correlation")
                .table(BankMovements::Table)
                .col(BankMovements::CorrelationId)
                .to_owned(),
        )
        .await
}

async fn create_bank_reconciliations(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(BankReconciliations::Table)
                .if_not_exists()
                .col(ColumnDef::new(BankReconciliations::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(BankReconciliations::BankAccountId).uuid().not_null())
                .col(ColumnDef::new(BankReconciliations::CutoffDate).date().not_null())
                .col(money(BankReconciliations::BookBalance))
                .col(money(BankReconciliations::BankBalance))
                .col(money(BankReconciliations::Difference))
                .col(ColumnDef::new(BankReconciliations::Notes).text())
                .col(ColumnDef::new(BankReconciliations::RecordedBy).string_len(100))
                .col(
                    ColumnDef::new(BankReconciliations::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_bank_reconciliations_account")
                        .from(BankReconciliations::Table, BankReconciliations::BankAccountId)
                        .to(BankAccounts::Table, BankAccounts::Id),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("idx_bank_reconciliations_account_cutoff")
                .table(BankReconciliations::Table)
                .col(BankReconciliations::BankAccountId)
                .col(BankReconciliations::CutoffDate)
                .to_owned(),
        )
        .await
}

#[derive(DeriveIden)]
enum Banks {
    Table,
    Id,
    Name,
    Address,
    Phone,
    IsActive,
}

#[derive(DeriveIden)]
enum AccountTypes {
    Table,
    Id,
    Description,
}

#[derive(DeriveIden)]
enum Currencies {
    Table,
    Id,
    Code,
    Description,
}

#[derive(DeriveIden)]
enum CheckTypes {
    Table,
    Id,
    Description,
}

#[derive(DeriveIden)]
enum Suppliers {
    Table,
    Id,
    Name,
    TaxId,
    Phone,
    Email,
    IsActive,
}

#[derive(DeriveIden)]
enum BankAccounts {
    Table,
    Id,
    BankId,
    AccountTypeId,
    CurrencyId,
    AccountNumber,
    HolderName,
    Status,
    OpenedOn,
}

#[derive(DeriveIden)]
enum Checks {
    Table,
    Id,
    BankAccountId,
    CheckTypeId,
    CheckNumber,
    Beneficiary,
    Amount,
    IssuedOn,
    Status,
}

#[derive(DeriveIden)]
enum PurchaseInvoices {
    Table,
    Id,
    SupplierId,
    InvoiceNumber,
    IssuedOn,
    DueOn,
    CurrencyId,
    TotalAmount,
    OutstandingBalance,
    Status,
}

#[derive(DeriveIden)]
enum SupplierPayments {
    Table,
    Id,
    SupplierId,
    InvoiceId,
    BankAccountId,
    PaidAt,
    Amount,
    Form,
    BankReference,
    Notes,
}

#[derive(DeriveIden)]
enum BankMovements {
    Table,
    Id,
    BankAccountId,
    RecordedAt,
    Kind,
    Amount,
    Reference,
    Description,
    ExternalReference,
    CorrelationId,
    CheckId,
    PaymentId,
    RecordedBy,
    Reconciled,
}

#[derive(DeriveIden)]
enum BankReconciliations {
    Table,
    Id,
    BankAccountId,
    CutoffDate,
    BookBalance,
    BankBalance,
    Difference,
    Notes,
    RecordedBy,
    CreatedAt,
}
