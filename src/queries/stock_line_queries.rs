//! Stock-line lookups. Product-scoped predicates join the owning product
//! and only see lines whose product is visible.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use serde::{Deserialize, Serialize};

use crate::entities::{barcode, product, stock_line};
use crate::errors::ServiceError;
use crate::queries::Query;

#[derive(Debug, Serialize, Deserialize)]
pub struct GetStockLineByReferenceQuery {
    pub reference: String,
}

#[async_trait]
impl Query for GetStockLineByReferenceQuery {
    type Result = stock_line::Model;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .filter(stock_line::Column::Reference.eq(self.reference.clone()))
            .one(db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Stock line with reference '{}' not found",
                    self.reference
                ))
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStockLinesByProductIdQuery {
    pub product_id: i64,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStockLinesByProductIdQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .inner_join(product::Entity)
            .filter(stock_line::Column::ProductId.eq(self.product_id))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStockLinesByProductNameQuery {
    pub product_name: String,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStockLinesByProductNameQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .inner_join(product::Entity)
            .filter(
                Expr::expr(Func::lower(Expr::col((
                    product::Entity,
                    product::Column::Name,
                ))))
                .eq(self.product_name.to_lowercase()),
            )
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStockLinesByProductSkuQuery {
    pub sku: String,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStockLinesByProductSkuQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .inner_join(product::Entity)
            .filter(product::Column::Sku.eq(self.sku.clone()))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStockLinesByProductReferenceQuery {
    pub reference: String,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStockLinesByProductReferenceQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .inner_join(product::Entity)
            .filter(product::Column::Reference.eq(self.reference.clone()))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStockLinesByProductSearchKeyQuery {
    pub search_key: String,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStockLinesByProductSearchKeyQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .inner_join(product::Entity)
            .filter(product::Column::SearchKey.eq(self.search_key.clone()))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStockLinesByProductMpnQuery {
    pub mpn: String,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStockLinesByProductMpnQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .inner_join(product::Entity)
            .filter(product::Column::Mpn.eq(self.mpn.clone()))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

/// Lines owned by a customer-visible product.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListVisibleStockLinesQuery {
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListVisibleStockLinesQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .inner_join(product::Entity)
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

/// Lines whose owning product is hidden; the back-office counterpart.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListInvisibleStockLinesQuery {
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListInvisibleStockLinesQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .inner_join(product::Entity)
            .filter(product::Column::Visible.eq(false))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

/// Lines whose owning product carries the given barcode code.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListStockLinesByProductBarcodeQuery {
    pub code: String,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStockLinesByProductBarcodeQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .inner_join(product::Entity)
            .join(JoinType::InnerJoin, product::Relation::Barcode.def())
            .filter(barcode::Column::Code.eq(self.code.clone()))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStockLinesByProductExpiryBetweenQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStockLinesByProductExpiryBetweenQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        if self.from > self.to {
            return Ok(Vec::new());
        }

        stock_line::Entity::find()
            .inner_join(product::Entity)
            .filter(product::Column::DateOfExpiry.between(self.from, self.to))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStockLinesBySupplierRefQuery {
    pub supplier_ref: i64,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStockLinesBySupplierRefQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .filter(stock_line::Column::SupplierRef.eq(self.supplier_ref))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStockLinesByInfrastructureIdQuery {
    pub infrastructure_id: i64,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStockLinesByInfrastructureIdQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .filter(stock_line::Column::InfrastructureId.eq(self.infrastructure_id))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStockLinesByLocationIdQuery {
    pub location_id: String,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStockLinesByLocationIdQuery {
    type Result = Vec<stock_line::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock_line::Entity::find()
            .filter(stock_line::Column::LocationId.eq(self.location_id.clone()))
            .order_by_asc(stock_line::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}
