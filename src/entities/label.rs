use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Display label attached to products (many-to-many).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "labels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_label::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_label::Relation::Label.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
