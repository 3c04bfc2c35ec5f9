use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join table: stock batch <-> stock line.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_stock_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub stock_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub stock_line_id: i64,

    /// Zero-based slot within the batch; marshalled views read in this order
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock::Entity",
        from = "Column::StockId",
        to = "super::stock::Column::Id"
    )]
    Stock,
    #[sea_orm(
        belongs_to = "super::stock_line::Entity",
        from = "Column::StockLineId",
        to = "super::stock_line::Column::Id"
    )]
    StockLine,
}

impl ActiveModelBehavior for ActiveModel {}
