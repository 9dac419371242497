//! Database seeder for Tesoro development and testing.
//!
//! Seeds the reference catalogs, a demo supplier and a demo account with an
//! opening deposit. Every step is idempotent, so the seeder can be re-run.
//!
//! Usage: cargo run --bin seeder

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tesoro_core::ledger::{MovementKind, MovementMetadata};
use tesoro_db::entities::{account_types, bank_accounts, banks, check_types, currencies, suppliers};
use tesoro_db::repositories::{AccountRepository, MovementRepository, OpenAccountInput};
use tesoro_shared::AppConfig;
use tesoro_shared::types::{AccountId, AccountTypeId, BankId, CurrencyId};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const BANK_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
const CHECKING_TYPE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0011);
const SAVINGS_TYPE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0012);
const USD_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0021);
const EUR_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0022);
const STANDARD_CHECK_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0031);
const CERTIFIED_CHECK_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0032);
const SUPPLIER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0041);

const DEMO_ACCOUNT_NUMBER: &str = "0001-000001";
const OPENING_DEPOSIT_REFERENCE: &str = "SEED-OPENING-DEPOSIT";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tesoro=debug,seeder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let db = tesoro_db::connect(&config.database).await?;

    info!("Seeding reference catalogs");
    seed_catalogs(&db).await?;

    info!("Seeding demo supplier");
    seed_supplier(&db).await?;

    info!("Seeding demo account");
    let account_id = seed_demo_account(&db, &config).await?;

    let movements = MovementRepository::new(db.clone(), config.ledger.clone());
    let movement_id = movements
        .append_movement(
            account_id,
            MovementKind::Deposit,
            Decimal::new(1_000_000, 2),
            MovementMetadata::default()
                .with_reference("Opening deposit")
                .with_external_reference(OPENING_DEPOSIT_REFERENCE)
                .recorded_by("seeder"),
        )
        .await?;
    info!(account_id = %account_id, movement_id = %movement_id, "Opening deposit in place");

    info!("Seeding complete");
    Ok(())
}

async fn seed_catalogs(db: &DatabaseConnection) -> anyhow::Result<()> {
    if banks::Entity::find_by_id(BANK_ID).one(db).await?.is_none() {
        banks::ActiveModel {
            id: Set(BANK_ID),
            name: Set("Banco Demo".to_string()),
            address: Set(Some("Av. Principal 100".to_string())),
            phone: Set(None),
            is_active: Set(true),
        }
        .insert(db)
        .await?;
    }

    for (id, description) in [(CHECKING_TYPE_ID, "Checking"), (SAVINGS_TYPE_ID, "Savings")] {
        if account_types::Entity::find_by_id(id).one(db).await?.is_none() {
            account_types::ActiveModel {
                id: Set(id),
                description: Set(description.to_string()),
            }
            .insert(db)
            .await?;
        }
    }

    for (id, code, description) in [(USD_ID, "USD", "US Dollar"), (EUR_ID, "EUR", "Euro")] {
        if currencies::Entity::find_by_id(id).one(db).await?.is_none() {
            currencies::ActiveModel {
                id: Set(id),
                code: Set(code.to_string()),
                description: Set(description.to_string()),
            }
            .insert(db)
            .await?;
        }
    }

    for (id, description) in [(STANDARD_CHECK_ID, "Standard"), (CERTIFIED_CHECK_ID, "Certified")] {
        if check_types::Entity::find_by_id(id).one(db).await?.is_none() {
            check_types::ActiveModel {
                id: Set(id),
                description: Set(description.to_string()),
            }
            .insert(db)
            .await?;
        }
    }

    Ok(())
}

async fn seed_supplier(db: &DatabaseConnection) -> anyhow::Result<()> {
    if suppliers::Entity::find_by_id(SUPPLIER_ID).one(db).await?.is_some() {
        info!("Demo supplier already exists, skipping");
        return Ok(());
    }

    suppliers::ActiveModel {
        id: Set(SUPPLIER_ID),
        name: Set("Suministros Demo".to_string()),
        tax_id: Set(Some("J-00000000-1".to_string())),
        phone: Set(None),
        email: Set(Some("billing@suministros.example".to_string())),
        is_active: Set(true),
    }
    .insert(db)
    .await?;
    Ok(())
}

async fn seed_demo_account(db: &DatabaseConnection, config: &AppConfig) -> anyhow::Result<AccountId> {
    let existing = bank_accounts::Entity::find()
        .filter(bank_accounts::Column::BankId.eq(BANK_ID))
        .filter(bank_accounts::Column::AccountNumber.eq(DEMO_ACCOUNT_NUMBER))
        .one(db)
        .await?;
    if let Some(account) = existing {
        info!(account_id = %account.id, "Demo account already exists, skipping");
        return Ok(account.id.into());
    }

    let accounts = AccountRepository::new(db.clone(), config.ledger.clone());
    let account_id = accounts
        .open_account(OpenAccountInput {
            bank_id: BankId::from_uuid(BANK_ID),
            account_type_id: AccountTypeId::from_uuid(CHECKING_TYPE_ID),
            currency_id: CurrencyId::from_uuid(USD_ID),
            account_number: DEMO_ACCOUNT_NUMBER.to_string(),
            holder_name: "Tesoro Demo".to_string(),
            opened_on: NaiveDate::from_ymd_opt(2024, 1, 2),
        })
        .await?;
    Ok(account_id)
}
