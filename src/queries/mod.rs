use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;

pub mod product_queries;
pub mod stock_line_queries;
pub mod stock_queries;

/// A self-contained read against the store. One struct per predicate keeps
/// the filter surface explicit and individually testable.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError>;
}
