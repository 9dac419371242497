//! Account repository: opening, administrative status, balances and statements.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
    TransactionTrait,
};
use serde::Serialize;
use tesoro_core::LedgerError;
use tesoro_core::ledger::{AccountStatus, BalanceQuery};
use tesoro_shared::LedgerConfig;
use tesoro_shared::types::{AccountId, AccountTypeId, BankId, CurrencyId, round_money};
use tracing::info;
use uuid::Uuid;

use super::movement::MovementRecord;
use super::support::{account_balance, active_account, day_after, find_account, map_db_err, today};
use crate::entities::{account_types, bank_accounts, bank_movements, banks, currencies};

/// Input for opening an account.
#[derive(Debug, Clone)]
pub struct OpenAccountInput {
    /// Owning bank.
    pub bank_id: BankId,
    /// Account type.
    pub account_type_id: AccountTypeId,
    /// Account currency.
    pub currency_id: CurrencyId,
    /// Account number, unique within the bank.
    pub account_number: String,
    /// Holder name.
    pub holder_name: String,
    /// Opening date; defaults to today.
    pub opened_on: Option<NaiveDate>,
}

/// A bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRecord {
    /// Account ID.
    pub id: AccountId,
    /// Owning bank.
    pub bank_id: BankId,
    /// Account type.
    pub account_type_id: AccountTypeId,
    /// Account currency.
    pub currency_id: CurrencyId,
    /// Account number.
    pub account_number: String,
    /// Holder name.
    pub holder_name: String,
    /// Lifecycle state.
    pub status: AccountStatus,
    /// Opening date.
    pub opened_on: NaiveDate,
}

impl From<bank_accounts::Model> for AccountRecord {
    fn from(model: bank_accounts::Model) -> Self {
        Self {
            id: model.id.into(),
            bank_id: model.bank_id.into(),
            account_type_id: model.account_type_id.into(),
            currency_id: model.currency_id.into(),
            account_number: model.account_number,
            holder_name: model.holder_name,
            status: model.status.into(),
            opened_on: model.opened_on,
        }
    }
}

/// Row of the `account_balances` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalanceRecord {
    /// Account ID.
    pub account_id: AccountId,
    /// Balance over every stored movement.
    pub balance: Decimal,
}

/// Filter options for an account statement.
#[derive(Debug, Clone, Default)]
pub struct StatementFilter {
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
}

#[derive(Debug, FromQueryResult)]
struct BalanceRow {
    bank_account_id: Uuid,
    balance: Option<Decimal>,
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Opens an ACTIVE account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bank, account type or currency does not exist
    /// - The bank is inactive
    /// - The account number is already used in the bank
    pub async fn open_account(&self, input: OpenAccountInput) -> Result<AccountId, LedgerError> {
        let account_number = input.account_number.trim().to_string();
        if account_number.is_empty() {
            return Err(LedgerError::Validation("account number is required".into()));
        }
        if input.holder_name.trim().is_empty() {
            return Err(LedgerError::Validation("holder name is required".into()));
        }

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let bank = banks::Entity::find_by_id(input.bank_id.into_inner())
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::BankNotFound(input.bank_id.into_inner()))?;
        if !bank.is_active {
            return Err(LedgerError::BankInactive(bank.id));
        }

        account_types::Entity::find_by_id(input.account_type_id.into_inner())
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::CatalogEntryNotFound {
                catalog: "Account type",
                id: input.account_type_id.into_inner(),
            })?;

        currencies::Entity::find_by_id(input.currency_id.into_inner())
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::CatalogEntryNotFound {
                catalog: "Currency",
                id: input.currency_id.into_inner(),
            })?;

        let duplicate = bank_accounts::Entity::find()
            .filter(bank_accounts::Column::BankId.eq(input.bank_id.into_inner()))
            .filter(bank_accounts::Column::AccountNumber.eq(&account_number))
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        if duplicate.is_some() {
            return Err(LedgerError::DuplicateAccountNumber {
                bank_id: input.bank_id.into_inner(),
                account_number,
            });
        }

        let account_id = AccountId::new();
        let account = bank_accounts::ActiveModel {
            id: Set(account_id.into_inner()),
            bank_id: Set(input.bank_id.into_inner()),
            account_type_id: Set(input.account_type_id.into_inner()),
            currency_id: Set(input.currency_id.into_inner()),
            account_number: Set(account_number),
            holder_name: Set(input.holder_name.trim().to_string()),
            status: Set(AccountStatus::Active.into()),
            opened_on: Set(input.opened_on.unwrap_or_else(today)),
        };
        account.insert(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        info!(account_id = %account_id, bank_id = %input.bank_id, "Account opened");
        Ok(account_id)
    }

    /// Changes the administrative state of an account.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if missing, `AccountClosed` if the account is closed.
    pub async fn set_status(
        &self,
        account_id: AccountId,
        status: AccountStatus,
    ) -> Result<AccountRecord, LedgerError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let account = find_account(&txn, account_id, true).await?;

        let current: AccountStatus = account.status.into();
        if !current.can_change() {
            return Err(LedgerError::AccountClosed(account_id.into_inner()));
        }

        let mut active = account.into_active_model();
        active.status = Set(status.into());
        let updated = active.update(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        info!(account_id = %account_id, from = %current, to = %status, "Account status changed");
        Ok(updated.into())
    }

    /// Loads one account.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if missing.
    pub async fn get_account(&self, account_id: AccountId) -> Result<AccountRecord, LedgerError> {
        Ok(find_account(&self.db, account_id, false).await?.into())
    }

    /// Balance of an ACTIVE account as of a date (today by default).
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if missing, `AccountNotActive` if not ACTIVE.
    pub async fn balance(
        &self,
        account_id: AccountId,
        as_of: Option<NaiveDate>,
        only_unreconciled: bool,
    ) -> Result<Decimal, LedgerError> {
        active_account(&self.db, account_id, false).await?;

        let mut query = BalanceQuery::as_of(as_of.unwrap_or_else(today));
        if only_unreconciled {
            query = query.unreconciled();
        }
        account_balance(&self.db, account_id, query).await
    }

    /// Movements of an account in chronological order.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if missing.
    pub async fn statement(
        &self,
        account_id: AccountId,
        filter: StatementFilter,
    ) -> Result<Vec<MovementRecord>, LedgerError> {
        find_account(&self.db, account_id, false).await?;

        let mut query = bank_movements::Entity::find()
            .filter(bank_movements::Column::BankAccountId.eq(account_id.into_inner()));
        if let Some(from) = filter.from {
            query = query.filter(
                bank_movements::Column::RecordedAt.gte(from.and_time(NaiveTime::MIN).and_utc()),
            );
        }
        if let Some(to) = filter.to {
            query = query.filter(bank_movements::Column::RecordedAt.lt(day_after(to)));
        }

        let rows = query
            .order_by_asc(bank_movements::Column::RecordedAt)
            .limit(self.config.clamp_limit(filter.limit))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(MovementRecord::from).collect())
    }

    /// Balances of every account with movements, read from the derived view.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_overview(&self) -> Result<Vec<AccountBalanceRecord>, LedgerError> {
        let backend = self.db.get_database_backend();
        let rows = BalanceRow::find_by_statement(Statement::from_string(
            backend,
            "SELECT bank_account_id, balance FROM account_balances ORDER BY bank_account_id",
        ))
        .all(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| AccountBalanceRecord {
                account_id: row.bank_account_id.into(),
                balance: round_money(row.balance.unwrap_or_default()),
            })
            .collect())
    }
}
