//! Reconciliation Engine: previews, commits and outstanding items.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use serde::Serialize;
use tesoro_core::LedgerError;
use tesoro_core::check::CheckStatus;
use tesoro_core::ledger::{BalanceQuery, compute_balance};
use tesoro_core::reconciliation::{
    OutstandingCheck, OutstandingItems, OutstandingMovement, ReconciliationFigures,
    ReconciliationService,
};
use tesoro_shared::LedgerConfig;
use tesoro_shared::types::{AccountId, ReconciliationId, has_money_scale, round_money};
use tracing::info;

use super::support::{active_account, day_after, find_account, map_db_err, movement_lines};
use crate::entities::sea_orm_active_enums::{
    CheckStatus as StoredCheckStatus, MovementKind as StoredMovementKind,
};
use crate::entities::{bank_movements, bank_reconciliations, checks};

/// Input for committing a reconciliation.
#[derive(Debug, Clone)]
pub struct CommitReconciliationInput {
    /// Reconciled account.
    pub account_id: AccountId,
    /// Last day covered.
    pub cutoff_date: NaiveDate,
    /// Balance reported by the bank statement.
    pub bank_balance: Decimal,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Recording actor.
    pub recorded_by: Option<String>,
}

/// A committed reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationRecord {
    /// Reconciliation ID.
    pub id: ReconciliationId,
    /// Reconciled account.
    pub account_id: AccountId,
    /// Last day covered.
    pub cutoff_date: NaiveDate,
    /// Book balance at the cut-off.
    pub book_balance: Decimal,
    /// Balance reported by the bank.
    pub bank_balance: Decimal,
    /// `bank_balance - book_balance`.
    pub difference: Decimal,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Recording actor.
    pub recorded_by: Option<String>,
    /// When the reconciliation was committed.
    pub created_at: DateTime<Utc>,
}

impl From<bank_reconciliations::Model> for ReconciliationRecord {
    fn from(model: bank_reconciliations::Model) -> Self {
        Self {
            id: model.id.into(),
            account_id: model.bank_account_id.into(),
            cutoff_date: model.cutoff_date,
            book_balance: model.book_balance,
            bank_balance: model.bank_balance,
            difference: model.difference,
            notes: model.notes,
            recorded_by: model.recorded_by,
            created_at: model.created_at,
        }
    }
}

/// Filter options for listing reconciliations.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationFilter {
    /// Earliest cut-off included.
    pub from: Option<NaiveDate>,
    /// Latest cut-off included.
    pub to: Option<NaiveDate>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
}

fn validate_bank_balance(bank_balance: Decimal) -> Result<Decimal, LedgerError> {
    if has_money_scale(bank_balance) {
        Ok(round_money(bank_balance))
    } else {
        Err(LedgerError::InvalidScale(bank_balance))
    }
}

/// Reconciliation repository.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Read-only preview of a reconciliation.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or not ACTIVE, or the bank
    /// balance has more than two decimals.
    pub async fn projected_difference(
        &self,
        account_id: AccountId,
        cutoff_date: NaiveDate,
        bank_balance: Decimal,
    ) -> Result<ReconciliationFigures, LedgerError> {
        let bank_balance = validate_bank_balance(bank_balance)?;
        active_account(&self.db, account_id, false).await?;

        let lines = movement_lines(&self.db, account_id, cutoff_date).await?;
        Ok(ReconciliationService::project(&lines, cutoff_date, bank_balance))
    }

    /// Marks every unreconciled movement up to the cut-off as reconciled and
    /// records the comparison, in one transaction.
    ///
    /// Each call inserts a new row, even for an already reconciled period.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or not ACTIVE, or the bank
    /// balance has more than two decimals.
    pub async fn commit_reconciliation(
        &self,
        input: CommitReconciliationInput,
    ) -> Result<ReconciliationId, LedgerError> {
        let bank_balance = validate_bank_balance(input.bank_balance)?;
        let account_id = input.account_id;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        active_account(&txn, account_id, self.config.lock_accounts).await?;

        let marked = bank_movements::Entity::update_many()
            .col_expr(bank_movements::Column::Reconciled, Expr::value(true))
            .filter(bank_movements::Column::BankAccountId.eq(account_id.into_inner()))
            .filter(bank_movements::Column::RecordedAt.lt(day_after(input.cutoff_date)))
            .filter(bank_movements::Column::Reconciled.eq(false))
            .exec(&txn)
            .await
            .map_err(map_db_err)?
            .rows_affected;

        let lines = movement_lines(&txn, account_id, input.cutoff_date).await?;
        let book_balance = compute_balance(&lines, BalanceQuery::as_of(input.cutoff_date));
        let difference = ReconciliationService::difference(bank_balance, book_balance);

        let reconciliation_id = ReconciliationId::new();
        bank_reconciliations::ActiveModel {
            id: Set(reconciliation_id.into_inner()),
            bank_account_id: Set(account_id.into_inner()),
            cutoff_date: Set(input.cutoff_date),
            book_balance: Set(book_balance),
            bank_balance: Set(bank_balance),
            difference: Set(difference),
            notes: Set(input.notes),
            recorded_by: Set(input.recorded_by),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        info!(
            reconciliation_id = %reconciliation_id,
            account_id = %account_id,
            cutoff_date = %input.cutoff_date,
            marked,
            difference = %difference,
            "Reconciliation committed"
        );
        Ok(reconciliation_id)
    }

    /// Unreconciled non-check movements and ISSUED checks up to the cut-off.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if missing.
    pub async fn list_outstanding(
        &self,
        account_id: AccountId,
        cutoff_date: NaiveDate,
    ) -> Result<OutstandingItems, LedgerError> {
        find_account(&self.db, account_id, false).await?;

        let movements = bank_movements::Entity::find()
            .filter(bank_movements::Column::BankAccountId.eq(account_id.into_inner()))
            .filter(bank_movements::Column::Reconciled.eq(false))
            .filter(bank_movements::Column::RecordedAt.lt(day_after(cutoff_date)))
            .filter(bank_movements::Column::Kind.is_not_in([
                StoredMovementKind::CheckIssued,
                StoredMovementKind::CheckCleared,
            ]))
            .order_by_asc(bank_movements::Column::RecordedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|movement| OutstandingMovement {
                movement_id: movement.id.into(),
                recorded_at: movement.recorded_at,
                kind: movement.kind.into(),
                amount: movement.amount,
                reconciled: movement.reconciled,
                reference: movement.reference,
                description: movement.description,
            })
            .collect();

        let checks = checks::Entity::find()
            .filter(checks::Column::BankAccountId.eq(account_id.into_inner()))
            .filter(checks::Column::Status.eq(StoredCheckStatus::from(CheckStatus::Issued)))
            .filter(checks::Column::IssuedOn.lte(cutoff_date))
            .order_by_asc(checks::Column::IssuedOn)
            .order_by_asc(checks::Column::CheckNumber)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|check| OutstandingCheck {
                check_id: check.id.into(),
                check_number: check.check_number,
                beneficiary: check.beneficiary,
                amount: check.amount,
                issued_on: check.issued_on,
                status: check.status.into(),
            })
            .collect();

        Ok(ReconciliationService::outstanding(cutoff_date, movements, checks))
    }

    /// Committed reconciliations of an account, latest cut-off first.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if missing.
    pub async fn list_reconciliations(
        &self,
        account_id: AccountId,
        filter: ReconciliationFilter,
    ) -> Result<Vec<ReconciliationRecord>, LedgerError> {
        find_account(&self.db, account_id, false).await?;

        let mut query = bank_reconciliations::Entity::find()
            .filter(bank_reconciliations::Column::BankAccountId.eq(account_id.into_inner()));
        if let Some(from) = filter.from {
            query = query.filter(bank_reconciliations::Column::CutoffDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(bank_reconciliations::Column::CutoffDate.lte(to));
        }

        let rows = query
            .order_by_desc(bank_reconciliations::Column::CutoffDate)
            .order_by_desc(bank_reconciliations::Column::CreatedAt)
            .limit(self.config.clamp_limit(filter.limit))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(ReconciliationRecord::from).collect())
    }
}
