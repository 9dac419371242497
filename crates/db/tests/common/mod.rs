//! Shared fixture for the repository integration tests.
//!
//! Every test gets its own in-memory SQLite database migrated with the
//! production migration and seeded with one row per reference catalog.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use tesoro_core::ledger::{MovementKind, MovementMetadata};
use tesoro_db::entities::{account_types, banks, check_types, currencies, suppliers};
use tesoro_db::migration::{Migrator, MigratorTrait};
use tesoro_db::repositories::{
    AccountRepository, CheckRepository, MovementRecord, MovementRepository, OpenAccountInput,
    PayableRepository, ReconciliationRepository, StatementFilter, TransferRepository,
};
use tesoro_shared::LedgerConfig;
use tesoro_shared::types::{
    AccountId, AccountTypeId, BankId, CheckTypeId, CurrencyId, MovementId, SupplierId,
};

pub struct TestLedger {
    pub db: DatabaseConnection,
    pub config: LedgerConfig,
    pub bank_id: BankId,
    pub account_type_id: AccountTypeId,
    pub currency_id: CurrencyId,
    pub check_type_id: CheckTypeId,
    pub supplier_id: SupplierId,
}

impl TestLedger {
    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.db.clone(), self.config.clone())
    }

    pub fn movements(&self) -> MovementRepository {
        MovementRepository::new(self.db.clone(), self.config.clone())
    }

    pub fn transfers(&self) -> TransferRepository {
        TransferRepository::new(self.db.clone(), self.config.clone())
    }

    pub fn checks(&self) -> CheckRepository {
        CheckRepository::new(self.db.clone(), self.config.clone())
    }

    pub fn payables(&self) -> PayableRepository {
        PayableRepository::new(self.db.clone(), self.config.clone())
    }

    pub fn reconciliations(&self) -> ReconciliationRepository {
        ReconciliationRepository::new(self.db.clone(), self.config.clone())
    }

    /// Opens an ACTIVE account in the seeded bank.
    pub async fn open_account(&self, number: &str) -> AccountId {
        self.accounts()
            .open_account(OpenAccountInput {
                bank_id: self.bank_id,
                account_type_id: self.account_type_id,
                currency_id: self.currency_id,
                account_number: number.to_string(),
                holder_name: "Tesoro Test Holder".to_string(),
                opened_on: Some(date(2024, 1, 2)),
            })
            .await
            .expect("Failed to open account")
    }

    /// Appends a movement recorded at noon UTC of `on`.
    pub async fn post(
        &self,
        account_id: AccountId,
        kind: MovementKind,
        amount: Decimal,
        on: NaiveDate,
    ) -> MovementId {
        self.movements()
            .append_movement(
                account_id,
                kind,
                amount,
                MovementMetadata::default()
                    .with_reference(format!("{kind} {amount}"))
                    .recorded_by("tester")
                    .at(noon(on)),
            )
            .await
            .expect("Failed to append movement")
    }

    pub async fn deposit(&self, account_id: AccountId, amount: Decimal, on: NaiveDate) -> MovementId {
        self.post(account_id, MovementKind::Deposit, amount, on).await
    }

    /// Every movement of the account, oldest first.
    pub async fn statement(&self, account_id: AccountId) -> Vec<MovementRecord> {
        self.accounts()
            .statement(account_id, StatementFilter::default())
            .await
            .expect("Failed to read statement")
    }

    /// Today's balance over all movements.
    pub async fn balance(&self, account_id: AccountId) -> Decimal {
        self.accounts()
            .balance(account_id, None, false)
            .await
            .expect("Failed to read balance")
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn noon(on: NaiveDate) -> DateTime<Utc> {
    on.and_hms_opt(12, 0, 0).expect("valid time").and_utc()
}

pub async fn setup() -> TestLedger {
    setup_with(LedgerConfig::default()).await
}

pub async fn setup_with(config: LedgerConfig) -> TestLedger {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    let bank_id = BankId::new();
    banks::ActiveModel {
        id: Set(bank_id.into_inner()),
        name: Set("Banco Central de Prueba".to_string()),
        address: Set(None),
        phone: Set(None),
        is_active: Set(true),
    }
    .insert(&db)
    .await
    .expect("Failed to seed bank");

    let account_type_id = AccountTypeId::new();
    account_types::ActiveModel {
        id: Set(account_type_id.into_inner()),
        description: Set("Checking".to_string()),
    }
    .insert(&db)
    .await
    .expect("Failed to seed account type");

    let currency_id = CurrencyId::new();
    currencies::ActiveModel {
        id: Set(currency_id.into_inner()),
        code: Set("USD".to_string()),
        description: Set("US Dollar".to_string()),
    }
    .insert(&db)
    .await
    .expect("Failed to seed currency");

    let check_type_id = CheckTypeId::new();
    check_types::ActiveModel {
        id: Set(check_type_id.into_inner()),
        description: Set("Standard".to_string()),
    }
    .insert(&db)
    .await
    .expect("Failed to seed check type");

    let supplier_id = insert_supplier(&db, "ACME Supplies").await;

    TestLedger {
        db,
        config,
        bank_id,
        account_type_id,
        currency_id,
        check_type_id,
        supplier_id,
    }
}

pub async fn insert_supplier(db: &DatabaseConnection, name: &str) -> SupplierId {
    let supplier_id = SupplierId::new();
    suppliers::ActiveModel {
        id: Set(supplier_id.into_inner()),
        name: Set(name.to_string()),
        tax_id: Set(None),
        phone: Set(None),
        email: Set(None),
        is_active: Set(true),
    }
    .insert(db)
    .await
    .expect("Failed to seed supplier");
    supplier_id
}
