use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join table: product <-> unit of measure.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_uoms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub uom_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::uom::Entity",
        from = "Column::UomId",
        to = "super::uom::Column::Id"
    )]
    Uom,
}

impl ActiveModelBehavior for ActiveModel {}
