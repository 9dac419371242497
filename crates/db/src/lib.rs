//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The bank ledger schema migration
//! - Repositories that run every posting inside one transaction

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, CheckRepository, MovementRepository, PayableRepository,
    ReconciliationRepository, TransferRepository,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tesoro_shared::DatabaseConfig;

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
