use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tax rate belonging to a tax category.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "taxes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    pub description: Option<String>,

    /// Rate value; interpretation depends on `tax_type`
    pub rate: Option<Decimal>,

    /// "PERCENTAGE" or "AMOUNT"
    pub tax_type: Option<String>,

    pub tax_category_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tax_category::Entity",
        from = "Column::TaxCategoryId",
        to = "super::tax_category::Column::Id"
    )]
    TaxCategory,
}

impl Related<super::tax_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
