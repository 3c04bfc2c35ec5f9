//! Stock batch lookups.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::entities::{status, stock};
use crate::errors::ServiceError;
use crate::queries::Query;

#[derive(Debug, Serialize, Deserialize)]
pub struct GetStockByReferenceQuery {
    pub reference: String,
}

#[async_trait]
impl Query for GetStockByReferenceQuery {
    type Result = stock::Model;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock::Entity::find()
            .filter(stock::Column::Reference.eq(self.reference.clone()))
            .one(db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Stock with reference '{}' not found",
                    self.reference
                ))
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetStockByDeliveryNoteRefQuery {
    pub delivery_note_ref: i64,
}

#[async_trait]
impl Query for GetStockByDeliveryNoteRefQuery {
    type Result = stock::Model;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock::Entity::find()
            .filter(stock::Column::DeliveryNoteRef.eq(self.delivery_note_ref))
            .one(db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Stock with delivery note ref {} not found",
                    self.delivery_note_ref
                ))
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStocksByDateOfStockUpdatedQuery {
    pub date: NaiveDate,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStocksByDateOfStockUpdatedQuery {
    type Result = Vec<stock::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock::Entity::find()
            .filter(stock::Column::DateOfStockUpdated.eq(self.date))
            .order_by_asc(stock::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

/// Stocks updated within an inclusive date range; an inverted range yields
/// an empty result.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListStocksUpdatedBetweenQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStocksUpdatedBetweenQuery {
    type Result = Vec<stock::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        if self.from > self.to {
            return Ok(Vec::new());
        }

        stock::Entity::find()
            .filter(stock::Column::DateOfStockUpdated.between(self.from, self.to))
            .order_by_asc(stock::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListStocksByStatusNameQuery {
    pub status_name: String,
    pub limit: u64,
    pub offset: u64,
}

#[async_trait]
impl Query for ListStocksByStatusNameQuery {
    type Result = Vec<stock::Model>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        stock::Entity::find()
            .inner_join(status::Entity)
            .filter(
                Expr::expr(Func::lower(Expr::col((status::Entity, status::Column::Name))))
                    .eq(self.status_name.to_lowercase()),
            )
            .order_by_asc(stock::Column::Id)
            .limit(self.limit)
            .offset(self.offset)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}
