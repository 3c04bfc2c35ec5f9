use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Unit of measure.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "uoms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_line::Entity")]
    StockLines,
}

impl Related<super::stock_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockLines.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_uom::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_uom::Relation::Uom.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
