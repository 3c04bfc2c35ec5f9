use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

/// Stock line: the smallest unit of trackable inventory quantity.
///
/// Each line is owned by exactly one product, measured in one unit of
/// measure, and may be grouped under zero or more stock batches. The
/// `units` column is the remaining quantity and is never written negative;
/// the adjustment service enforces that invariant.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub reference: Option<String>,

    pub buy_price: Option<Decimal>,

    pub sell_price_exclusive: Option<Decimal>,

    pub sell_price_inclusive: Option<Decimal>,

    pub gross_profit: Option<Decimal>,

    pub margin: Option<Decimal>,

    /// Remaining quantity on this line
    pub units: Decimal,

    pub supplier_ref: Option<i64>,

    pub infrastructure_id: Option<i64>,

    pub location_id: Option<String>,

    /// Owning product (required)
    pub product_id: i64,

    /// Unit of measure (required)
    pub uom_id: i64,

    pub created_at: DateTime<Utc>,

    pub updated_at: Option<DateTime<Utc>>,
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

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::uom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uom.def()
    }
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        super::stock_stock_line::Relation::Stock.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::stock_stock_line::Relation::StockLine.def().rev())
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
            active_model.created_at = Set(Utc::now());
        }
        active_model.updated_at = Set(Some(Utc::now()));

        Ok(active_model)
    }
}
