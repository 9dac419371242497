//! `SeaORM` Entity for bank_movements table.

use super::sea_orm_active_enums::MovementKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bank_account_id: Uuid,
    pub recorded_at: DateTimeUtc,
    pub kind: MovementKind,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub amount: Decimal,
    pub reference: Option<String>,
    pub description: Option<String>,
    #[sea_orm(unique)]
    pub external_reference: Option<String>,
    pub correlation_id: Option<Uuid>,
    pub check_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub recorded_by: Option<String>,
    pub reconciled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id"
    )]
    BankAccounts,
    #[sea_orm(
        belongs_to = "super::checks::Entity",
        from = "Column::CheckId",
        to = "super::checks::Column::Id"
    )]
    Checks,
    #[sea_orm(
        belongs_to = "super::supplier_payments::Entity",
        from = "Column::PaymentId",
        to = "super::supplier_payments::Column::Id"
    )]
    SupplierPayments,
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl Related<super::checks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Checks.def()
    }
}

impl Related<super::supplier_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
