//! Movement Ledger: validated, idempotent appends to the movement log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use serde::Serialize;
use tesoro_core::LedgerError;
use tesoro_core::ledger::{LedgerService, MovementKind, MovementMetadata, NewMovement};
use tesoro_shared::LedgerConfig;
use tesoro_shared::types::{AccountId, CheckId, CorrelationId, MovementId, PaymentId};
use tracing::{info, warn};

use super::support::{
    active_account, ensure_funds, find_by_external_reference, insert_movement, map_db_err,
};
use crate::entities::bank_movements;

/// A stored movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementRecord {
    /// Movement ID.
    pub id: MovementId,
    /// Owning account.
    pub account_id: AccountId,
    /// When the movement was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Movement kind.
    pub kind: MovementKind,
    /// Positive amount; the kind gives the sign.
    pub amount: Decimal,
    /// Human-readable reference.
    pub reference: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Idempotency key.
    pub external_reference: Option<String>,
    /// Shared by the legs of one operation.
    pub correlation_id: Option<CorrelationId>,
    /// Originating check, if any.
    pub check_id: Option<CheckId>,
    /// Originating supplier payment, if any.
    pub payment_id: Option<PaymentId>,
    /// Recording actor.
    pub recorded_by: Option<String>,
    /// Whether the movement has been reconciled.
    pub reconciled: bool,
}

impl From<bank_movements::Model> for MovementRecord {
    fn from(model: bank_movements::Model) -> Self {
        Self {
            id: model.id.into(),
            account_id: model.bank_account_id.into(),
            recorded_at: model.recorded_at,
            kind: model.kind.into(),
            amount: model.amount,
            reference: model.reference,
            description: model.description,
            external_reference: model.external_reference,
            correlation_id: model.correlation_id.map(Into::into),
            check_id: model.check_id.map(Into::into),
            payment_id: model.payment_id.map(Into::into),
            recorded_by: model.recorded_by,
            reconciled: model.reconciled,
        }
    }
}

/// Repository appending single movements.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Appends one movement and returns its id.
    ///
    /// If `metadata.external_reference` is already carried by a stored
    /// movement, nothing is written and that movement's id is returned.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` / `InvalidScale` for a bad amount
    /// - `AccountNotFound` / `AccountNotActive` for the account
    /// - `InsufficientFunds` for a debit beyond the balance, unless overdraft is allowed
    /// - `Conflict` if a racing insert took the same external reference
    pub async fn append_movement(
        &self,
        account_id: AccountId,
        kind: MovementKind,
        amount: Decimal,
        metadata: MovementMetadata,
    ) -> Result<MovementId, LedgerError> {
        let amount = LedgerService::validate_amount(amount)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        active_account(&txn, account_id, self.config.lock_accounts).await?;

        let replay = match metadata.external_reference.as_deref() {
            Some(external_reference) => find_by_external_reference(&txn, external_reference).await?,
            None => None,
        };
        if let Some(existing) = replay {
            txn.rollback().await.map_err(map_db_err)?;
            warn!(
                account_id = %account_id,
                movement_id = %existing.id,
                external_reference = ?existing.external_reference,
                "Idempotent replay, movement already recorded"
            );
            return Ok(existing.id.into());
        }

        if LedgerService::needs_funds_check(kind, self.config.allow_overdraft) {
            ensure_funds(&txn, account_id, amount).await?;
        }

        let movement = insert_movement(&txn, NewMovement::new(account_id, kind, amount, metadata))
            .await?;
        txn.commit().await.map_err(map_db_err)?;

        info!(
            account_id = %account_id,
            movement_id = %movement.id,
            kind = %kind,
            amount = %amount,
            "Movement appended"
        );
        Ok(movement.id.into())
    }

    /// Loads one movement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_movement(
        &self,
        movement_id: MovementId,
    ) -> Result<Option<MovementRecord>, LedgerError> {
        let movement = bank_movements::Entity::find_by_id(movement_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(movement.map(MovementRecord::from))
    }
}
