use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock batch (e.g. one delivery) grouping zero or more stock lines.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stocks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub reference: Option<String>,

    /// Reference number of the delivery note this batch arrived under
    pub delivery_note_ref: Option<i64>,

    pub date_of_stock_added: Option<NaiveDate>,

    pub date_of_stock_updated: Option<NaiveDate>,

    pub storage_cost: Option<Decimal>,

    pub status_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::status::Entity",
        from = "Column::StatusId",
        to = "super::status::Column::Id"
    )]
    Status,
}

impl Related<super::status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl Related<super::stock_line::Entity> for Entity {
    fn to() -> RelationDef {
        super::stock_stock_line::Relation::StockLine.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::stock_stock_line::Relation::Stock.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
