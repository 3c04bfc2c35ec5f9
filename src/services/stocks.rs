use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{status, stock, stock_line, stock_stock_line};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::views::{assemble_stock_view, StockView};
use crate::queries::stock_queries::{GetStockByDeliveryNoteRefQuery, GetStockByReferenceQuery};
use crate::queries::Query;
use crate::services::stock_lines::StockLineService;

/// Payload for creating or replacing a stock batch.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StockInput {
    pub reference: Option<String>,
    pub delivery_note_ref: Option<i64>,
    pub date_of_stock_added: Option<NaiveDate>,
    pub date_of_stock_updated: Option<NaiveDate>,
    pub storage_cost: Option<Decimal>,
    pub status_id: Option<i64>,
    /// Lines grouped under this batch, in presentation order
    #[serde(default)]
    pub stock_line_ids: Vec<i64>,
}

/// Service for stock batches and their marshalled read model.
#[derive(Clone)]
pub struct StockService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
    stock_lines: StockLineService,
}

impl StockService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        let stock_lines = StockLineService::new(db_pool.clone(), event_sender.clone());
        Self {
            db_pool,
            event_sender,
            stock_lines,
        }
    }

    async fn check_line_ids(&self, line_ids: &[i64]) -> Result<(), ServiceError> {
        if line_ids.is_empty() {
            return Ok(());
        }

        let db = self.db_pool.as_ref();
        let found = stock_line::Entity::find()
            .filter(stock_line::Column::Id.is_in(line_ids.to_vec()))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        if found.len() != line_ids.len() {
            let found_ids: Vec<i64> = found.iter().map(|l| l.id).collect();
            let missing: Vec<i64> = line_ids
                .iter()
                .copied()
                .filter(|id| !found_ids.contains(id))
                .collect();
            return Err(ServiceError::ValidationError(format!(
                "stock lines do not exist: {:?}",
                missing
            )));
        }

        Ok(())
    }

    /// Replaces the batch's line membership. Each row records its slot in the
    /// requested order; the position column is the view order.
    async fn replace_lines(&self, stock_id: i64, line_ids: &[i64]) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        stock_stock_line::Entity::delete_many()
            .filter(stock_stock_line::Column::StockId.eq(stock_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        for (position, line_id) in line_ids.iter().enumerate() {
            stock_stock_line::ActiveModel {
                stock_id: Set(stock_id),
                stock_line_id: Set(*line_id),
                position: Set(position as i32),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: StockInput) -> Result<stock::Model, ServiceError> {
        input.validate()?;
        self.check_line_ids(&input.stock_line_ids).await?;

        let db = self.db_pool.as_ref();

        let model = stock::ActiveModel {
            reference: Set(input.reference),
            delivery_note_ref: Set(input.delivery_note_ref),
            date_of_stock_added: Set(input.date_of_stock_added),
            date_of_stock_updated: Set(input.date_of_stock_updated),
            storage_cost: Set(input.storage_cost),
            status_id: Set(input.status_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(ServiceError::db_error)?;

        self.replace_lines(model.id, &input.stock_line_ids).await?;

        info!(stock_id = model.id, "stock created");

        self.event_sender
            .send(Event::StockCreated(model.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(model)
    }

    pub async fn get(&self, id: i64) -> Result<stock::Model, ServiceError> {
        stock::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Stock {} not found", id)))
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: StockInput) -> Result<stock::Model, ServiceError> {
        input.validate()?;
        self.check_line_ids(&input.stock_line_ids).await?;

        let db = self.db_pool.as_ref();
        let existing = self.get(id).await?;

        let mut active: stock::ActiveModel = existing.into();
        active.reference = Set(input.reference);
        active.delivery_note_ref = Set(input.delivery_note_ref);
        active.date_of_stock_added = Set(input.date_of_stock_added);
        active.date_of_stock_updated = Set(input.date_of_stock_updated);
        active.storage_cost = Set(input.storage_cost);
        active.status_id = Set(input.status_id);

        let model = active.update(db).await.map_err(ServiceError::db_error)?;

        self.replace_lines(model.id, &input.stock_line_ids).await?;

        self.event_sender
            .send(Event::StockUpdated(model.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let existing = self.get(id).await?;

        // Membership rows go first, then the batch itself.
        stock_stock_line::Entity::delete_many()
            .filter(stock_stock_line::Column::StockId.eq(id))
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;

        existing.delete(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::StockDeleted(id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }

    pub async fn list(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<stock::Model>, u64), ServiceError> {
        let db = self.db_pool.as_ref();

        let total = stock::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        let items = stock::Entity::find()
            .order_by_asc(stock::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((items, total))
    }

    pub async fn find_by_reference(&self, reference: &str) -> Result<stock::Model, ServiceError> {
        GetStockByReferenceQuery {
            reference: reference.to_string(),
        }
        .execute(self.db_pool.as_ref())
        .await
    }

    pub async fn find_by_delivery_note_ref(
        &self,
        delivery_note_ref: i64,
    ) -> Result<stock::Model, ServiceError> {
        GetStockByDeliveryNoteRefQuery { delivery_note_ref }
            .execute(self.db_pool.as_ref())
            .await
    }

    /// Resolves the fully marshalled stock view.
    ///
    /// Lines come back in the batch's recorded position order and each
    /// relation type is fetched once for the whole batch.
    #[instrument(skip(self))]
    pub async fn marshalled_stock(&self, id: i64) -> Result<StockView, ServiceError> {
        let db = self.db_pool.as_ref();
        let stock = self.get(id).await?;

        let status = match stock.status_id {
            Some(status_id) => status::Entity::find_by_id(status_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?,
            None => None,
        };

        let memberships = stock_stock_line::Entity::find()
            .filter(stock_stock_line::Column::StockId.eq(id))
            .order_by_asc(stock_stock_line::Column::Position)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let line_ids: Vec<i64> = memberships.iter().map(|m| m.stock_line_id).collect();

        let rows = stock_line::Entity::find()
            .filter(stock_line::Column::Id.is_in(line_ids.clone()))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        // Rows arrive in id order; put them back into position order.
        let mut by_id: HashMap<i64, stock_line::Model> =
            rows.into_iter().map(|line| (line.id, line)).collect();
        let lines: Vec<stock_line::Model> = line_ids
            .iter()
            .filter_map(|line_id| by_id.remove(line_id))
            .collect();

        let line_views = self.stock_lines.marshal_lines(lines).await?;

        Ok(assemble_stock_view(stock, status, line_views))
    }
}
