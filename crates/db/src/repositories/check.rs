//! Check repository: issue, clear and void, each with its ledger postings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tesoro_core::LedgerError;
use tesoro_core::check::{CheckLifecycle, CheckRecord, CheckStatus, IssueCheckInput};
use tesoro_shared::LedgerConfig;
use tesoro_shared::types::{AccountId, CheckId, CheckTypeId, CorrelationId};
use tracing::{info, warn};

use super::support::{
    active_account, ensure_funds, find_account, find_check_movement, insert_movement, map_db_err,
    today,
};
use crate::entities::sea_orm_active_enums::MovementKind;
use crate::entities::{bank_movements, check_types, checks};

/// A stored check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckDetails {
    /// Check ID.
    pub id: CheckId,
    /// Issuing account.
    pub account_id: AccountId,
    /// Check type.
    pub check_type_id: CheckTypeId,
    /// Check number, unique per account.
    pub check_number: String,
    /// Payee.
    pub beneficiary: String,
    /// Face amount.
    pub amount: Decimal,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Lifecycle state.
    pub status: CheckStatus,
}

impl From<checks::Model> for CheckDetails {
    fn from(model: checks::Model) -> Self {
        Self {
            id: model.id.into(),
            account_id: model.bank_account_id.into(),
            check_type_id: model.check_type_id.into(),
            check_number: model.check_number,
            beneficiary: model.beneficiary,
            amount: model.amount,
            issued_on: model.issued_on,
            status: model.status.into(),
        }
    }
}

fn check_record(model: &checks::Model) -> CheckRecord {
    CheckRecord {
        id: model.id.into(),
        account_id: model.bank_account_id.into(),
        check_number: model.check_number.clone(),
        amount: model.amount,
        status: model.status.into(),
    }
}

/// Check repository.
#[derive(Debug, Clone)]
pub struct CheckRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl CheckRepository {
    /// Creates a new check repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Issues a check and posts its CHECK_ISSUED movement.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input is malformed or the amount invalid
    /// - The account is missing or not ACTIVE
    /// - The balance is below the amount
    /// - The check type does not exist
    /// - The check number is already used on the account
    pub async fn issue(&self, input: IssueCheckInput) -> Result<CheckId, LedgerError> {
        let amount = CheckLifecycle::validate_issue(&input)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        active_account(&txn, input.account_id, self.config.lock_accounts).await?;
        ensure_funds(&txn, input.account_id, amount).await?;

        check_types::Entity::find_by_id(input.check_type_id.into_inner())
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::CatalogEntryNotFound {
                catalog: "Check type",
                id: input.check_type_id.into_inner(),
            })?;

        let check_number = input.check_number.trim().to_string();
        let duplicate = checks::Entity::find()
            .filter(checks::Column::BankAccountId.eq(input.account_id.into_inner()))
            .filter(checks::Column::CheckNumber.eq(&check_number))
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        if duplicate.is_some() {
            return Err(LedgerError::DuplicateCheckNumber {
                account_id: input.account_id.into_inner(),
                check_number,
            });
        }

        let check_id = CheckId::new();
        checks::ActiveModel {
            id: Set(check_id.into_inner()),
            bank_account_id: Set(input.account_id.into_inner()),
            check_type_id: Set(input.check_type_id.into_inner()),
            check_number: Set(check_number),
            beneficiary: Set(input.beneficiary.trim().to_string()),
            amount: Set(amount),
            issued_on: Set(input.issued_on.unwrap_or_else(today)),
            status: Set(CheckStatus::Issued.into()),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        let movement = CheckLifecycle::issue_movement(check_id, &input, amount, CorrelationId::new());
        insert_movement(&txn, movement).await?;
        txn.commit().await.map_err(map_db_err)?;

        info!(
            check_id = %check_id,
            account_id = %input.account_id,
            amount = %amount,
            "Check issued"
        );
        Ok(check_id)
    }

    /// Marks an ISSUED check as cleared and reconciles its originating movement.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The check does not exist
    /// - The check is not ISSUED
    /// - The originating movement is missing
    pub async fn clear(&self, check_id: CheckId) -> Result<CheckDetails, LedgerError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let check = Self::lock_check(&txn, check_id).await?;
        let status = CheckLifecycle::clear(&check_record(&check))?;

        let original = find_check_movement(&txn, check_id, MovementKind::CheckIssued)
            .await?
            .ok_or(LedgerError::MissingCheckMovement(check_id.into_inner()))?;

        let updated = Self::set_status(&txn, check, status).await?;
        mark_reconciled(&txn, original).await?;
        txn.commit().await.map_err(map_db_err)?;

        info!(check_id = %check_id, "Check cleared");
        Ok(updated.into())
    }

    /// Voids an ISSUED check and posts the reversing deposit.
    ///
    /// The issuing account may have been suspended since the check was
    /// written; the reversal is posted regardless of its state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The check does not exist
    /// - The check is not ISSUED
    pub async fn void(
        &self,
        check_id: CheckId,
        reason: Option<String>,
        recorded_by: Option<String>,
    ) -> Result<CheckDetails, LedgerError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let check = Self::lock_check(&txn, check_id).await?;
        let record = check_record(&check);
        let status = CheckLifecycle::void(&record)?;
        find_account(&txn, record.account_id, self.config.lock_accounts).await?;

        let original = find_check_movement(&txn, check_id, MovementKind::CheckIssued).await?;
        let correlation_id = original
            .as_ref()
            .and_then(|movement| movement.correlation_id)
            .map(CorrelationId::from);

        let updated = Self::set_status(&txn, check, status).await?;
        let reversal = CheckLifecycle::void_movement(&record, reason, recorded_by, correlation_id);
        insert_movement(&txn, reversal).await?;

        match original {
            Some(movement) => mark_reconciled(&txn, movement).await?,
            None => warn!(check_id = %check_id, "Voided check has no originating movement"),
        }
        txn.commit().await.map_err(map_db_err)?;

        info!(check_id = %check_id, amount = %record.amount, "Check voided");
        Ok(updated.into())
    }

    /// Loads one check.
    ///
    /// # Errors
    ///
    /// `CheckNotFound` if missing.
    pub async fn get_check(&self, check_id: CheckId) -> Result<CheckDetails, LedgerError> {
        checks::Entity::find_by_id(check_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(CheckDetails::from)
            .ok_or(LedgerError::CheckNotFound(check_id.into_inner()))
    }

    async fn lock_check<C>(conn: &C, check_id: CheckId) -> Result<checks::Model, LedgerError>
    where
        C: ConnectionTrait,
    {
        checks::Entity::find_by_id(check_id.into_inner())
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::CheckNotFound(check_id.into_inner()))
    }

    async fn set_status<C>(
        conn: &C,
        check: checks::Model,
        status: CheckStatus,
    ) -> Result<checks::Model, LedgerError>
    where
        C: ConnectionTrait,
    {
        let mut active = check.into_active_model();
        active.status = Set(status.into());
        active.update(conn).await.map_err(map_db_err)
    }
}

async fn mark_reconciled<C>(conn: &C, movement: bank_movements::Model) -> Result<(), LedgerError>
where
    C: ConnectionTrait,
{
    let mut active = movement.into_active_model();
    active.reconciled = Set(true);
    active.update(conn).await.map_err(map_db_err)?;
    Ok(())
}
