//! `SeaORM` Entity for checks table.

use super::sea_orm_active_enums::CheckStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "checks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bank_account_id: Uuid,
    pub check_type_id: Uuid,
    pub check_number: String,
    pub beneficiary: String,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub amount: Decimal,
    pub issued_on: Date,
    pub status: CheckStatus,
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
        belongs_to = "super::check_types::Entity",
        from = "Column::CheckTypeId",
        to = "super::check_types::Column::Id"
    )]
    CheckTypes,
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl Related<super::check_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CheckTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
