use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tax category grouping one or more tax rates.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tax_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
    #[sea_orm(has_many = "super::tax::Entity")]
    Taxes,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::tax::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Taxes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
