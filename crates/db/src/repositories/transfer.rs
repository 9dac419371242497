//! Transfer Engine: two legs, one correlation id, one transaction.

use sea_orm::{DatabaseConnection, TransactionTrait};
use tesoro_core::LedgerError;
use tesoro_core::ledger::{LedgerService, TransferInput};
use tesoro_shared::LedgerConfig;
use tesoro_shared::types::CorrelationId;
use tracing::info;

use super::support::{active_account, ensure_funds, insert_movement, map_db_err};

/// Repository posting internal transfers.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Moves `amount` from the source to the destination account.
    ///
    /// Both legs are committed together or not at all.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not positive or has more than two decimals
    /// - Source and destination are the same account
    /// - Either account is missing or not ACTIVE
    /// - The source balance is below the amount
    pub async fn transfer(&self, input: TransferInput) -> Result<CorrelationId, LedgerError> {
        let plan = LedgerService::plan_transfer(&input)?;
        let lock = self.config.lock_accounts;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        // Lock in id order so opposite transfers cannot deadlock.
        let (first, second) = if input.source < input.destination {
            (input.source, input.destination)
        } else {
            (input.destination, input.source)
        };
        let first_row = active_account(&txn, first, lock).await;
        let second_row = active_account(&txn, second, lock).await;
        if first == input.source {
            first_row?;
            second_row?;
        } else {
            second_row?;
            first_row?;
        }

        let amount = plan.outgoing.amount;
        ensure_funds(&txn, input.source, amount).await?;

        insert_movement(&txn, plan.outgoing).await?;
        insert_movement(&txn, plan.incoming).await?;
        txn.commit().await.map_err(map_db_err)?;

        info!(
            correlation_id = %plan.correlation_id,
            source = %input.source,
            destination = %input.destination,
            amount = %amount,
            "Transfer posted"
        );
        Ok(plan.correlation_id)
    }
}
