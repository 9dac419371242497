//! Supplier payables: invoices, payments and their reports.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tesoro_core::LedgerError;
use tesoro_core::ledger::LedgerService;
use tesoro_core::payable::{
    InvoiceSnapshot, InvoiceStatus, NewInvoiceInput, PayInvoiceInput, PayablesService,
    PaymentForm,
};
use tesoro_shared::LedgerConfig;
use tesoro_shared::types::{
    AccountId, CorrelationId, CurrencyId, InvoiceId, PaymentId, SupplierId, round_money,
};
use tracing::info;

use super::support::{active_account, day_after, ensure_funds, insert_movement, map_db_err};
use crate::entities::sea_orm_active_enums::InvoiceStatus as StoredInvoiceStatus;
use crate::entities::{currencies, purchase_invoices, supplier_payments, suppliers};

/// Default number of rows returned by [`PayableRepository::open_invoices`].
pub const OPEN_INVOICES_DEFAULT_LIMIT: u64 = 20;

/// A purchase invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRecord {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Issuing supplier.
    pub supplier_id: SupplierId,
    /// Invoice number, unique per supplier.
    pub invoice_number: String,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Due date.
    pub due_on: Option<NaiveDate>,
    /// Currency.
    pub currency_id: CurrencyId,
    /// Invoice total.
    pub total_amount: Decimal,
    /// Remaining amount to pay.
    pub outstanding_balance: Decimal,
    /// Lifecycle state.
    pub status: InvoiceStatus,
}

impl From<purchase_invoices::Model> for InvoiceRecord {
    fn from(model: purchase_invoices::Model) -> Self {
        Self {
            id: model.id.into(),
            supplier_id: model.supplier_id.into(),
            invoice_number: model.invoice_number,
            issued_on: model.issued_on,
            due_on: model.due_on,
            currency_id: model.currency_id.into(),
            total_amount: model.total_amount,
            outstanding_balance: model.outstanding_balance,
            status: model.status.into(),
        }
    }
}

/// A supplier payment joined with the supplier name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentHistoryRecord {
    /// Payment ID.
    pub payment_id: PaymentId,
    /// Paid supplier.
    pub supplier_id: SupplierId,
    /// Supplier name.
    pub supplier_name: Option<String>,
    /// Settled invoice, if any.
    pub invoice_id: Option<InvoiceId>,
    /// Paying account.
    pub account_id: AccountId,
    /// Payment timestamp.
    pub paid_at: DateTime<Utc>,
    /// Amount paid.
    pub amount: Decimal,
    /// Payment form.
    pub form: PaymentForm,
    /// Bank reference supplied by the caller.
    pub bank_reference: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// A fully paid invoice with its payment totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaidInvoiceRecord {
    /// Invoice ID.
    pub invoice_id: InvoiceId,
    /// Issuing supplier.
    pub supplier_id: SupplierId,
    /// Supplier name.
    pub supplier_name: Option<String>,
    /// Invoice number.
    pub invoice_number: String,
    /// Invoice total.
    pub total_amount: Decimal,
    /// Sum of the payments applied to the invoice.
    pub total_paid: Decimal,
    /// Most recent payment.
    pub last_payment_at: Option<DateTime<Utc>>,
}

/// Filter options for payables reports.
#[derive(Debug, Clone, Default)]
pub struct PayablesFilter {
    /// Restrict to one supplier.
    pub supplier_id: Option<SupplierId>,
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
}

impl PayablesFilter {
    fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

fn snapshot(model: &purchase_invoices::Model) -> InvoiceSnapshot {
    InvoiceSnapshot {
        id: model.id.into(),
        supplier_id: model.supplier_id.into(),
        invoice_number: model.invoice_number.clone(),
        status: model.status.into(),
        outstanding: model.outstanding_balance,
    }
}

/// Repository for supplier invoices and payments.
#[derive(Debug, Clone)]
pub struct PayableRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl PayableRepository {
    /// Creates a new payable repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Registers a PENDING invoice whose outstanding balance equals its total.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input is malformed
    /// - The supplier or currency does not exist
    /// - The invoice number is already used by the supplier
    pub async fn create_invoice(&self, input: NewInvoiceInput) -> Result<InvoiceId, LedgerError> {
        let total = PayablesService::validate_new_invoice(&input)?;
        let invoice_number = input.invoice_number.trim().to_string();

        let txn = self.db.begin().await.map_err(map_db_err)?;
        find_supplier(&txn, input.supplier_id).await?;

        currencies::Entity::find_by_id(input.currency_id.into_inner())
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::CatalogEntryNotFound {
                catalog: "Currency",
                id: input.currency_id.into_inner(),
            })?;

        let duplicate = purchase_invoices::Entity::find()
            .filter(purchase_invoices::Column::SupplierId.eq(input.supplier_id.into_inner()))
            .filter(purchase_invoices::Column::InvoiceNumber.eq(&invoice_number))
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        if duplicate.is_some() {
            return Err(LedgerError::DuplicateInvoiceNumber {
                supplier_id: input.supplier_id.into_inner(),
                invoice_number,
            });
        }

        let invoice_id = InvoiceId::new();
        purchase_invoices::ActiveModel {
            id: Set(invoice_id.into_inner()),
            supplier_id: Set(input.supplier_id.into_inner()),
            invoice_number: Set(invoice_number),
            issued_on: Set(input.issued_on),
            due_on: Set(input.due_on),
            currency_id: Set(input.currency_id.into_inner()),
            total_amount: Set(total),
            outstanding_balance: Set(total),
            status: Set(InvoiceStatus::Pending.into()),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        info!(invoice_id = %invoice_id, supplier_id = %input.supplier_id, total = %total, "Invoice created");
        Ok(invoice_id)
    }

    /// Loads one invoice.
    ///
    /// # Errors
    ///
    /// `InvoiceNotFound` if missing.
    pub async fn get_invoice(&self, invoice_id: InvoiceId) -> Result<InvoiceRecord, LedgerError> {
        purchase_invoices::Entity::find_by_id(invoice_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(InvoiceRecord::from)
            .ok_or(LedgerError::InvoiceNotFound(invoice_id.into_inner()))
    }

    /// Voids a PENDING or PARTIAL invoice.
    ///
    /// # Errors
    ///
    /// `InvoiceNotFound` if missing; `CannotVoidPaidInvoice` or `InvoiceVoided`
    /// for terminal invoices.
    pub async fn void_invoice(&self, invoice_id: InvoiceId) -> Result<InvoiceRecord, LedgerError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let invoice = lock_invoice(&txn, invoice_id).await?;
        let status = PayablesService::void(&snapshot(&invoice))?;

        let mut active = invoice.into_active_model();
        active.status = Set(status.into());
        let updated = active.update(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        info!(invoice_id = %invoice_id, "Invoice voided");
        Ok(updated.into())
    }

    /// Pays a supplier, optionally against one of its invoices.
    ///
    /// Inserts the payment, its WITHDRAWAL movement and, when an invoice is
    /// given, the reduced outstanding balance in one transaction. The invoice
    /// row is locked before it is read.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is invalid
    /// - The account is missing or not ACTIVE, or its balance is below the amount
    /// - The supplier or invoice does not exist
    /// - The invoice belongs to another supplier, is voided, already paid, or
    ///   has less outstanding than the amount
    pub async fn pay_invoice(&self, input: PayInvoiceInput) -> Result<PaymentId, LedgerError> {
        let amount = LedgerService::validate_amount(input.amount)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        active_account(&txn, input.account_id, self.config.lock_accounts).await?;
        ensure_funds(&txn, input.account_id, amount).await?;
        find_supplier(&txn, input.supplier_id).await?;

        let invoice = match input.invoice_id {
            Some(invoice_id) => {
                let invoice = lock_invoice(&txn, invoice_id).await?;
                PayablesService::validate_payment(&snapshot(&invoice), input.supplier_id, amount)?;
                Some(invoice)
            }
            None => None,
        };

        let payment_id = PaymentId::new();
        supplier_payments::ActiveModel {
            id: Set(payment_id.into_inner()),
            supplier_id: Set(input.supplier_id.into_inner()),
            invoice_id: Set(input.invoice_id.map(InvoiceId::into_inner)),
            bank_account_id: Set(input.account_id.into_inner()),
            paid_at: Set(Utc::now()),
            amount: Set(amount),
            form: Set(input.form.into()),
            bank_reference: Set(input.bank_reference.clone()),
            notes: Set(input.notes.clone()),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        let movement = PayablesService::payment_movement(
            payment_id,
            &input,
            amount,
            invoice.as_ref().map(|invoice| invoice.invoice_number.as_str()),
            CorrelationId::new(),
        );
        insert_movement(&txn, movement).await?;

        if let Some(invoice) = invoice {
            let applied = PayablesService::apply_payment(&snapshot(&invoice), amount)?;
            let mut active = invoice.into_active_model();
            active.outstanding_balance = Set(applied.outstanding);
            active.status = Set(applied.status.into());
            active.update(&txn).await.map_err(map_db_err)?;
        }
        txn.commit().await.map_err(map_db_err)?;

        info!(
            payment_id = %payment_id,
            supplier_id = %input.supplier_id,
            account_id = %input.account_id,
            amount = %amount,
            "Supplier payment posted"
        );
        Ok(payment_id)
    }

    /// PENDING and PARTIAL invoices of a supplier, earliest due date first,
    /// undated invoices last.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn open_invoices(
        &self,
        supplier_id: SupplierId,
        limit: Option<u64>,
    ) -> Result<Vec<InvoiceRecord>, LedgerError> {
        let rows = purchase_invoices::Entity::find()
            .filter(purchase_invoices::Column::SupplierId.eq(supplier_id.into_inner()))
            .filter(
                purchase_invoices::Column::Status
                    .is_in([StoredInvoiceStatus::Pending, StoredInvoiceStatus::Partial]),
            )
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut invoices: Vec<InvoiceRecord> = rows.into_iter().map(InvoiceRecord::from).collect();
        invoices.sort_by(|a, b| {
            (a.due_on.is_none(), a.due_on, &a.invoice_number)
                .cmp(&(b.due_on.is_none(), b.due_on, &b.invoice_number))
        });
        let limit = self
            .config
            .clamp_limit(Some(limit.unwrap_or(OPEN_INVOICES_DEFAULT_LIMIT)));
        invoices.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(invoices)
    }

    /// Payments, newest first, with the supplier name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn payment_history(
        &self,
        filter: PayablesFilter,
    ) -> Result<Vec<PaymentHistoryRecord>, LedgerError> {
        let mut query = supplier_payments::Entity::find();
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(supplier_payments::Column::SupplierId.eq(supplier_id.into_inner()));
        }
        if let Some(from) = filter.from {
            query = query.filter(
                supplier_payments::Column::PaidAt.gte(from.and_time(NaiveTime::MIN).and_utc()),
            );
        }
        if let Some(to) = filter.to {
            query = query.filter(supplier_payments::Column::PaidAt.lt(day_after(to)));
        }

        let rows = query
            .order_by_desc(supplier_payments::Column::PaidAt)
            .limit(self.config.clamp_limit(filter.limit))
            .find_also_related(suppliers::Entity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(payment, supplier)| PaymentHistoryRecord {
                payment_id: payment.id.into(),
                supplier_id: payment.supplier_id.into(),
                supplier_name: supplier.map(|s| s.name),
                invoice_id: payment.invoice_id.map(Into::into),
                account_id: payment.bank_account_id.into(),
                paid_at: payment.paid_at,
                amount: payment.amount,
                form: payment.form.into(),
                bank_reference: payment.bank_reference,
                notes: payment.notes,
            })
            .collect())
    }

    /// PAID invoices with what was paid and when, largest total paid first.
    ///
    /// The date range applies to the last payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn paid_invoices(
        &self,
        filter: PayablesFilter,
    ) -> Result<Vec<PaidInvoiceRecord>, LedgerError> {
        let mut query = purchase_invoices::Entity::find()
            .filter(purchase_invoices::Column::Status.eq(StoredInvoiceStatus::Paid));
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(purchase_invoices::Column::SupplierId.eq(supplier_id.into_inner()));
        }
        let invoices = query
            .find_also_related(suppliers::Entity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        if invoices.is_empty() {
            return Ok(Vec::new());
        }

        let payments = supplier_payments::Entity::find()
            .filter(
                supplier_payments::Column::InvoiceId
                    .is_in(invoices.iter().map(|(invoice, _)| invoice.id)),
            )
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut totals: HashMap<uuid::Uuid, (Decimal, Option<DateTime<Utc>>)> = HashMap::new();
        for payment in payments {
            let Some(invoice_id) = payment.invoice_id else {
                continue;
            };
            let entry = totals.entry(invoice_id).or_insert((Decimal::ZERO, None));
            entry.0 += payment.amount;
            entry.1 = entry.1.max(Some(payment.paid_at));
        }

        let mut records: Vec<PaidInvoiceRecord> = invoices
            .into_iter()
            .filter_map(|(invoice, supplier)| {
                let (total_paid, last_payment_at) =
                    totals.get(&invoice.id).copied().unwrap_or((Decimal::ZERO, None));
                let in_range = match last_payment_at {
                    Some(at) => filter.contains(at.date_naive()),
                    None => filter.from.is_none() && filter.to.is_none(),
                };
                in_range.then(|| PaidInvoiceRecord {
                    invoice_id: invoice.id.into(),
                    supplier_id: invoice.supplier_id.into(),
                    supplier_name: supplier.map(|s| s.name),
                    invoice_number: invoice.invoice_number,
                    total_amount: invoice.total_amount,
                    total_paid: round_money(total_paid),
                    last_payment_at,
                })
            })
            .collect();

        records.sort_by(|a, b| b.total_paid.cmp(&a.total_paid));
        let limit = self.config.clamp_limit(filter.limit);
        records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(records)
    }
}

async fn find_supplier<C>(conn: &C, supplier_id: SupplierId) -> Result<suppliers::Model, LedgerError>
where
    C: ConnectionTrait,
{
    suppliers::Entity::find_by_id(supplier_id.into_inner())
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(LedgerError::SupplierNotFound(supplier_id.into_inner()))
}

async fn lock_invoice<C>(
    conn: &C,
    invoice_id: InvoiceId,
) -> Result<purchase_invoices::Model, LedgerError>
where
    C: ConnectionTrait,
{
    purchase_invoices::Entity::find_by_id(invoice_id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(LedgerError::InvoiceNotFound(invoice_id.into_inner()))
}
