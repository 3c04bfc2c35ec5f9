use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key)]
    pub id: i64,

    /// External reference code
    pub reference: Option<String>,

    /// Free-form lookup key used by point-of-sale search
    pub search_key: Option<String>,

    /// Product name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// Product description
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    /// SKU (Stock Keeping Unit)
    pub sku: Option<String>,

    /// MPN (Manufacturer Part Number)
    pub mpn: Option<String>,

    /// URL to the product image
    pub image_url: Option<String>,

    /// Whether the product appears in customer-facing queries
    pub visible: bool,

    /// Manufacture date
    pub date_of_mfd: Option<NaiveDate>,

    /// Expiry date
    pub date_of_expiry: Option<NaiveDate>,

    /// Upper bound for stock on hand
    pub maximum_stock_level: Option<Decimal>,

    /// Quantity at which restocking should be triggered
    pub reorder_level: Option<Decimal>,

    /// One-to-one barcode, if assigned
    pub barcode_id: Option<i64>,

    /// Owning category, if assigned
    pub category_id: Option<i64>,

    /// Lifecycle status, if assigned
    pub status_id: Option<i64>,

    /// Tax category, if assigned
    pub tax_category_id: Option<i64>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::barcode::Entity",
        from = "Column::BarcodeId",
        to = "super::barcode::Column::Id"
    )]
    Barcode,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::status::Entity",
        from = "Column::StatusId",
        to = "super::status::Column::Id"
    )]
    Status,
    #[sea_orm(
        belongs_to = "super::tax_category::Entity",
        from = "Column::TaxCategoryId",
        to = "super::tax_category::Column::Id"
    )]
    TaxCategory,
    #[sea_orm(has_many = "super::note::Entity")]
    Notes,
    #[sea_orm(has_many = "super::stock_line::Entity")]
    StockLines,
}

impl Related<super::barcode::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Barcode.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl Related<super::tax_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxCategory.def()
    }
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notes.def()
    }
}

impl Related<super::stock_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockLines.def()
    }
}

impl Related<super::label::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_label::Relation::Label.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_label::Relation::Product.def().rev())
    }
}

impl Related<super::uom::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_uom::Relation::Uom.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_uom::Relation::Product.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.visible {
                active_model.visible = Set(true);
            }
            active_model.created_at = Set(Utc::now());
        }

        active_model.updated_at = Set(Some(Utc::now()));

        // On insert the id is still unset, so validate the written fields
        // themselves rather than materializing a Model first.
        if let ActiveValue::Set(ref name) = active_model.name {
            let length = name.chars().count();
            if length == 0 || length > 255 {
                return Err(DbErr::Custom(
                    "Validation error: product name must be between 1 and 255 characters"
                        .to_string(),
                ));
            }
        }

        if let ActiveValue::Set(Some(ref description)) = active_model.description {
            if description.chars().count() > 2000 {
                return Err(DbErr::Custom(
                    "Validation error: description cannot exceed 2000 characters".to_string(),
                ));
            }
        }

        Ok(active_model)
    }
}
