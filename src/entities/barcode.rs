use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Barcode assigned one-to-one to a product.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "barcodes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub code: String,

    /// Symbology, e.g. "EAN13", "UPC", "CODE128", "QR"
    pub barcode_type: Option<String>,

    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
