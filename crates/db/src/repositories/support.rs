//! Helpers shared by the posting repositories.
//!
//! Every helper is generic over the connection so that it runs on the
//! transaction of the calling operation.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use tesoro_core::LedgerError;
use tesoro_core::ledger::{
    AccountInfo, BalanceQuery, LedgerService, MovementLine, NewMovement, compute_balance,
};
use tesoro_shared::types::{AccountId, CheckId, MovementId};
use tracing::warn;

use crate::entities::sea_orm_active_enums::MovementKind;
use crate::entities::{bank_accounts, bank_movements};

/// Maps a storage error into the engine taxonomy.
///
/// Unique-key violations become `Conflict`; everything else is `Database`.
pub(crate) fn map_db_err(err: DbErr) -> LedgerError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => LedgerError::Conflict(detail),
        _ => LedgerError::Database(err.to_string()),
    }
}

/// Current UTC calendar date.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// First instant after `date`. `recorded_at < day_after(d)` means "on or before d".
pub(crate) fn day_after(date: NaiveDate) -> DateTime<Utc> {
    date.succ_opt()
        .unwrap_or(NaiveDate::MAX)
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Loads an account row, optionally under `SELECT ... FOR UPDATE`.
pub(crate) async fn find_account<C>(
    conn: &C,
    account_id: AccountId,
    lock: bool,
) -> Result<bank_accounts::Model, LedgerError>
where
    C: ConnectionTrait,
{
    let mut query = bank_accounts::Entity::find_by_id(account_id.into_inner());
    if lock {
        query = query.lock_exclusive();
    }
    query
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(LedgerError::AccountNotFound(account_id.into_inner()))
}

/// Loads an account row and fails unless it accepts postings.
pub(crate) async fn active_account<C>(
    conn: &C,
    account_id: AccountId,
    lock: bool,
) -> Result<bank_accounts::Model, LedgerError>
where
    C: ConnectionTrait,
{
    let account = find_account(conn, account_id, lock).await?;
    LedgerService::ensure_active(AccountInfo {
        id: account_id,
        status: account.status.into(),
    })?;
    Ok(account)
}

/// Projects a stored movement onto the balance calculator's input.
pub(crate) fn movement_line(model: &bank_movements::Model) -> MovementLine {
    MovementLine {
        kind: model.kind.into(),
        amount: model.amount,
        recorded_on: model.recorded_at.date_naive(),
        reconciled: model.reconciled,
    }
}

/// Movement lines of an account recorded on or before `as_of`.
pub(crate) async fn movement_lines<C>(
    conn: &C,
    account_id: AccountId,
    as_of: NaiveDate,
) -> Result<Vec<MovementLine>, LedgerError>
where
    C: ConnectionTrait,
{
    let rows = bank_movements::Entity::find()
        .filter(bank_movements::Column::BankAccountId.eq(account_id.into_inner()))
        .filter(bank_movements::Column::RecordedAt.lt(day_after(as_of)))
        .all(conn)
        .await
        .map_err(map_db_err)?;

    Ok(rows.iter().map(movement_line).collect())
}

/// Recomputes the balance of an account from its movement log.
pub(crate) async fn account_balance<C>(
    conn: &C,
    account_id: AccountId,
    query: BalanceQuery,
) -> Result<Decimal, LedgerError>
where
    C: ConnectionTrait,
{
    let lines = movement_lines(conn, account_id, query.as_of).await?;
    Ok(compute_balance(&lines, query))
}

/// Fails with `InsufficientFunds` when today's balance is below `requested`.
pub(crate) async fn ensure_funds<C>(
    conn: &C,
    account_id: AccountId,
    requested: Decimal,
) -> Result<(), LedgerError>
where
    C: ConnectionTrait,
{
    let balance = account_balance(conn, account_id, BalanceQuery::as_of(today())).await?;
    LedgerService::ensure_sufficient_funds(account_id, balance, requested).inspect_err(|_| {
        warn!(
            account_id = %account_id,
            balance = %balance,
            requested = %requested,
            "Posting rejected for insufficient funds"
        );
    })
}

/// Finds the movement already carrying `external_reference`, if any.
pub(crate) async fn find_by_external_reference<C>(
    conn: &C,
    external_reference: &str,
) -> Result<Option<bank_movements::Model>, LedgerError>
where
    C: ConnectionTrait,
{
    bank_movements::Entity::find()
        .filter(bank_movements::Column::ExternalReference.eq(external_reference))
        .one(conn)
        .await
        .map_err(map_db_err)
}

/// Finds the oldest movement of `kind` linked to a check.
pub(crate) async fn find_check_movement<C>(
    conn: &C,
    check_id: CheckId,
    kind: MovementKind,
) -> Result<Option<bank_movements::Model>, LedgerError>
where
    C: ConnectionTrait,
{
    bank_movements::Entity::find()
        .filter(bank_movements::Column::CheckId.eq(check_id.into_inner()))
        .filter(bank_movements::Column::Kind.eq(kind))
        .order_by_asc(bank_movements::Column::RecordedAt)
        .one(conn)
        .await
        .map_err(map_db_err)
}

/// Inserts one immutable movement row.
pub(crate) async fn insert_movement<C>(
    conn: &C,
    movement: NewMovement,
) -> Result<bank_movements::Model, LedgerError>
where
    C: ConnectionTrait,
{
    let NewMovement {
        account_id,
        kind,
        amount,
        metadata,
        correlation_id,
        reconciled,
        check_id,
        payment_id,
    } = movement;

    let row = bank_movements::ActiveModel {
        id: Set(MovementId::new().into_inner()),
        bank_account_id: Set(account_id.into_inner()),
        recorded_at: Set(metadata.recorded_at.unwrap_or_else(Utc::now)),
        kind: Set(kind.into()),
        amount: Set(amount),
        reference: Set(metadata.reference),
        description: Set(metadata.description),
        external_reference: Set(metadata.external_reference),
        correlation_id: Set(correlation_id.map(|id| id.into_inner())),
        check_id: Set(check_id.map(|id| id.into_inner())),
        payment_id: Set(payment_id.map(|id| id.into_inner())),
        recorded_by: Set(metadata.recorded_by),
        reconciled: Set(reconciled),
    };

    row.insert(conn).await.map_err(map_db_err)
}
