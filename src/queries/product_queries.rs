//! Product lookups. Customer-facing predicates carry a `visible = true`
//! conjunct; only the explicit invisible listing drops it.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::entities::{barcode, category, product, status};
use crate::errors::ServiceError;
use crate::queries::Query;

fn lower(col: (product::Entity, product::Column)) -> sea_orm::sea_query::SimpleExpr {
    Func::lower(Expr::col(col)).into()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetProductByNameQuery {
    pub name: String,
}

#[async_trait]
impl Query for GetProductByNameQuery {
    type Result = product::Model;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .filter(Expr::expr(lower((product::Entity, product::Column::Name))).eq(self.name.to_lowercase()))
            .filter(product::Column::Visible.eq(true))
            .one(db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product named '{}' not found", self.name))
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchProductsByNameQuery {
    pub name_contains: String,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for SearchProductsByNameQuery {
    type Result = Vec<product::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let pattern = format!("%{}%", self.name_contains.to_lowercase());

        product::Entity::find()
            .filter(Expr::expr(lower((product::Entity, product::Column::Name))).like(pattern))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(product::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetProductByReferenceQuery {
    pub reference: String,
}

#[async_trait]
impl Query for GetProductByReferenceQuery {
    type Result = product::Model;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .filter(product::Column::Reference.eq(self.reference.clone()))
            .filter(product::Column::Visible.eq(true))
            .one(db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Product with reference '{}' not found",
                    self.reference
                ))
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetProductBySkuQuery {
    pub sku: String,
}

#[async_trait]
impl Query for GetProductBySkuQuery {
    type Result = product::Model;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .filter(product::Column::Sku.eq(self.sku.clone()))
            .filter(product::Column::Visible.eq(true))
            .one(db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product with sku '{}' not found", self.sku))
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetProductBySearchKeyQuery {
    pub search_key: String,
}

#[async_trait]
impl Query for GetProductBySearchKeyQuery {
    type Result = product::Model;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .filter(product::Column::SearchKey.eq(self.search_key.clone()))
            .filter(product::Column::Visible.eq(true))
            .one(db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Product with search key '{}' not found",
                    self.search_key
                ))
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetProductByMpnQuery {
    pub mpn: String,
}

#[async_trait]
impl Query for GetProductByMpnQuery {
    type Result = product::Model;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .filter(product::Column::Mpn.eq(self.mpn.clone()))
            .filter(product::Column::Visible.eq(true))
            .one(db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product with mpn '{}' not found", self.mpn))
            })
    }
}

/// Resolves a product through its assigned barcode code.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetProductByBarcodeCodeQuery {
    pub code: String,
}

#[async_trait]
impl Query for GetProductByBarcodeCodeQuery {
    type Result = product::Model;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .inner_join(barcode::Entity)
            .filter(barcode::Column::Code.eq(self.code.clone()))
            .filter(product::Column::Visible.eq(true))
            .one(db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product with barcode '{}' not found", self.code))
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListProductsByCategoryIdQuery {
    pub category_id: i64,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListProductsByCategoryIdQuery {
    type Result = Vec<product::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .filter(product::Column::CategoryId.eq(self.category_id))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(product::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListProductsByCategoryNameQuery {
    pub category_name: String,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListProductsByCategoryNameQuery {
    type Result = Vec<product::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .inner_join(category::Entity)
            .filter(
                Expr::expr(Func::lower(Expr::col((
                    category::Entity,
                    category::Column::Name,
                ))))
                .eq(self.category_name.to_lowercase()),
            )
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(product::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListProductsByStatusNameQuery {
    pub status_name: String,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListProductsByStatusNameQuery {
    type Result = Vec<product::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .inner_join(status::Entity)
            .filter(
                Expr::expr(Func::lower(Expr::col((status::Entity, status::Column::Name))))
                    .eq(self.status_name.to_lowercase()),
            )
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(product::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListProductsByDateOfMfdQuery {
    pub date: NaiveDate,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListProductsByDateOfMfdQuery {
    type Result = Vec<product::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .filter(product::Column::DateOfMfd.eq(self.date))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(product::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListProductsByDateOfExpiryQuery {
    pub date: NaiveDate,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListProductsByDateOfExpiryQuery {
    type Result = Vec<product::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .filter(product::Column::DateOfExpiry.eq(self.date))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(product::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

/// Products expiring within an inclusive date range. An inverted range is a
/// well-formed question with an empty answer, not an error.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListProductsExpiringBetweenQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListProductsExpiringBetweenQuery {
    type Result = Vec<product::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        if self.from > self.to {
            return Ok(Vec::new());
        }

        product::Entity::find()
            .filter(product::Column::DateOfExpiry.between(self.from, self.to))
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(product::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListVisibleProductsQuery {
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListVisibleProductsQuery {
    type Result = Vec<product::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .filter(product::Column::Visible.eq(true))
            .order_by_asc(product::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

/// Back-office listing of hidden products.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListInvisibleProductsQuery {
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListInvisibleProductsQuery {
    type Result = Vec<product::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        product::Entity::find()
            .filter(product::Column::Visible.eq(false))
            .order_by_asc(product::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}
