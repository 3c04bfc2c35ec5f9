use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{product, stock_line, tax_category, uom};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::views::{
    assemble_product_ref, assemble_stock_line_view, ProductRef, StockLineView,
};
use crate::queries::stock_line_queries::GetStockLineByReferenceQuery;
use crate::queries::Query;

/// Payload for creating or replacing a stock line.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StockLineInput {
    pub reference: Option<String>,
    pub buy_price: Option<Decimal>,
    pub sell_price_exclusive: Option<Decimal>,
    pub sell_price_inclusive: Option<Decimal>,
    pub gross_profit: Option<Decimal>,
    pub margin: Option<Decimal>,
    pub units: Decimal,
    pub supplier_ref: Option<i64>,
    pub infrastructure_id: Option<i64>,
    pub location_id: Option<String>,
    pub product_id: i64,
    pub uom_id: i64,
}

/// One requested decrement against a stock line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockAdjustment {
    pub stock_line_id: i64,
    /// Units to subtract from the line; must be non-negative
    pub quantity: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockAdjustmentErrorKind {
    Validation,
    InsufficientStock,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockAdjustmentFailure {
    pub stock_line_id: i64,
    pub kind: StockAdjustmentErrorKind,
    pub message: String,
}

/// Result of one adjustment batch. Successes and failures are reported side
/// by side; a failed item never prevents later items from being applied.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockAdjustmentOutcome {
    /// Updated lines, in input order
    #[schema(value_type = Vec<Object>)]
    pub updated: Vec<stock_line::Model>,
    pub failures: Vec<StockAdjustmentFailure>,
}

/// Service for stock lines: CRUD, marshalled views, and the quantity
/// adjustment operator.
#[derive(Clone)]
pub struct StockLineService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl StockLineService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn check_references(&self, input: &StockLineInput) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();

        if input.units < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "units must be non-negative".to_string(),
            ));
        }

        let product_exists = product::Entity::find_by_id(input.product_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .is_some();
        if !product_exists {
            return Err(ServiceError::ValidationError(format!(
                "product {} does not exist",
                input.product_id
            )));
        }

        let uom_exists = uom::Entity::find_by_id(input.uom_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .is_some();
        if !uom_exists {
            return Err(ServiceError::ValidationError(format!(
                "uom {} does not exist",
                input.uom_id
            )));
        }

        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: StockLineInput) -> Result<stock_line::Model, ServiceError> {
        input.validate()?;
        self.check_references(&input).await?;

        let db = self.db_pool.as_ref();

        let model = stock_line::ActiveModel {
            reference: Set(input.reference),
            buy_price: Set(input.buy_price),
            sell_price_exclusive: Set(input.sell_price_exclusive),
            sell_price_inclusive: Set(input.sell_price_inclusive),
            gross_profit: Set(input.gross_profit),
            margin: Set(input.margin),
            units: Set(input.units),
            supplier_ref: Set(input.supplier_ref),
            infrastructure_id: Set(input.infrastructure_id),
            location_id: Set(input.location_id),
            product_id: Set(input.product_id),
            uom_id: Set(input.uom_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(ServiceError::db_error)?;

        info!(stock_line_id = model.id, "stock line created");

        self.event_sender
            .send(Event::StockLineCreated(model.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(model)
    }

    pub async fn get(&self, id: i64) -> Result<stock_line::Model, ServiceError> {
        stock_line::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Stock line {} not found", id)))
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: StockLineInput,
    ) -> Result<stock_line::Model, ServiceError> {
        input.validate()?;
        self.check_references(&input).await?;

        let db = self.db_pool.as_ref();
        let existing = self.get(id).await?;

        let mut active: stock_line::ActiveModel = existing.into();
        active.reference = Set(input.reference);
        active.buy_price = Set(input.buy_price);
        active.sell_price_exclusive = Set(input.sell_price_exclusive);
        active.sell_price_inclusive = Set(input.sell_price_inclusive);
        active.gross_profit = Set(input.gross_profit);
        active.margin = Set(input.margin);
        active.units = Set(input.units);
        active.supplier_ref = Set(input.supplier_ref);
        active.infrastructure_id = Set(input.infrastructure_id);
        active.location_id = Set(input.location_id);
        active.product_id = Set(input.product_id);
        active.uom_id = Set(input.uom_id);

        let model = active.update(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::StockLineUpdated(model.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let existing = self.get(id).await?;

        existing.delete(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::StockLineDeleted(id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }

    pub async fn list(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<stock_line::Model>, u64), ServiceError> {
        let db = self.db_pool.as_ref();

        let total = stock_line::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        let items = stock_line::Entity::find()
            .order_by_asc(stock_line::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((items, total))
    }

    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<stock_line::Model, ServiceError> {
        GetStockLineByReferenceQuery {
            reference: reference.to_string(),
        }
        .execute(self.db_pool.as_ref())
        .await
    }

    /// Marshals one stock line with its reduced product reference and uom.
    #[instrument(skip(self))]
    pub async fn marshalled_stock_line(&self, id: i64) -> Result<StockLineView, ServiceError> {
        let line = self.get(id).await?;
        let mut views = self.marshal_lines(vec![line]).await?;

        // marshal_lines returns exactly one view for one input line
        views
            .pop()
            .ok_or_else(|| ServiceError::InternalError("marshalling produced no view".to_string()))
    }

    /// Marshals several stock lines at once, in the order the ids were
    /// given. Ids that resolve to no line are silently dropped.
    #[instrument(skip(self))]
    pub async fn marshalled_stock_lines(
        &self,
        ids: Vec<i64>,
    ) -> Result<Vec<StockLineView>, ServiceError> {
        let db = self.db_pool.as_ref();

        let rows = stock_line::Entity::find()
            .filter(stock_line::Column::Id.is_in(ids.clone()))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut by_id: HashMap<i64, stock_line::Model> =
            rows.into_iter().map(|row| (row.id, row)).collect();
        let ordered: Vec<stock_line::Model> =
            ids.into_iter().filter_map(|id| by_id.remove(&id)).collect();

        self.marshal_lines(ordered).await
    }

    /// Assembles views for the given lines with one batched query per
    /// relation type.
    pub(crate) async fn marshal_lines(
        &self,
        lines: Vec<stock_line::Model>,
    ) -> Result<Vec<StockLineView>, ServiceError> {
        let db = self.db_pool.as_ref();

        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<i64> = lines.iter().map(|l| l.product_id).collect();
        let uom_ids: Vec<i64> = lines.iter().map(|l| l.uom_id).collect();

        let products: HashMap<i64, product::Model> = product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let uoms: HashMap<i64, uom::Model> = uom::Entity::find()
            .filter(uom::Column::Id.is_in(uom_ids))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let tax_category_ids: Vec<i64> = products
            .values()
            .filter_map(|p| p.tax_category_id)
            .collect();
        let tax_categories: HashMap<i64, tax_category::Model> = if tax_category_ids.is_empty() {
            HashMap::new()
        } else {
            tax_category::Entity::find()
                .filter(tax_category::Column::Id.is_in(tax_category_ids))
                .all(db)
                .await
                .map_err(ServiceError::db_error)?
                .into_iter()
                .map(|t| (t.id, t))
                .collect()
        };

        let mut views = Vec::with_capacity(lines.len());
        for line in lines {
            let product = products.get(&line.product_id).ok_or_else(|| {
                ServiceError::IntegrityError(format!(
                    "stock line {} references missing product {}",
                    line.id, line.product_id
                ))
            })?;
            let uom = uoms.get(&line.uom_id).ok_or_else(|| {
                ServiceError::IntegrityError(format!(
                    "stock line {} references missing uom {}",
                    line.id, line.uom_id
                ))
            })?;

            let product_ref: ProductRef = assemble_product_ref(
                product,
                product
                    .tax_category_id
                    .and_then(|id| tax_categories.get(&id).cloned()),
            );

            views.push(assemble_stock_line_view(line, product_ref, uom.clone()));
        }

        Ok(views)
    }

    /// Applies a batch of per-line quantity decrements.
    ///
    /// Each item runs in its own row-locked transaction so one bad item
    /// cannot poison the rest of the batch, and concurrent batches cannot
    /// lose updates to the same line. Items are processed in input order.
    #[instrument(skip(self, batch), fields(batch_len = batch.len()))]
    pub async fn adjust_stock_levels(
        &self,
        batch: Vec<StockAdjustment>,
    ) -> Result<StockAdjustmentOutcome, ServiceError> {
        if batch.is_empty() {
            return Err(ServiceError::ValidationError(
                "adjustment batch must not be empty".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();
        let mut outcome = StockAdjustmentOutcome {
            updated: Vec::new(),
            failures: Vec::new(),
        };

        for item in batch {
            if item.quantity < Decimal::ZERO {
                outcome.failures.push(StockAdjustmentFailure {
                    stock_line_id: item.stock_line_id,
                    kind: StockAdjustmentErrorKind::Validation,
                    message: format!("quantity {} is negative", item.quantity),
                });
                continue;
            }

            let txn = db.begin().await.map_err(ServiceError::db_error)?;

            let line = stock_line::Entity::find_by_id(item.stock_line_id)
                .lock_exclusive()
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?;

            let Some(line) = line else {
                txn.rollback().await.map_err(ServiceError::db_error)?;
                outcome.failures.push(StockAdjustmentFailure {
                    stock_line_id: item.stock_line_id,
                    kind: StockAdjustmentErrorKind::Validation,
                    message: format!("stock line {} does not exist", item.stock_line_id),
                });
                continue;
            };

            let remaining = line.units - item.quantity;
            if remaining < Decimal::ZERO {
                txn.rollback().await.map_err(ServiceError::db_error)?;
                outcome.failures.push(StockAdjustmentFailure {
                    stock_line_id: item.stock_line_id,
                    kind: StockAdjustmentErrorKind::InsufficientStock,
                    message: format!(
                        "requested {} but only {} remaining",
                        item.quantity, line.units
                    ),
                });
                continue;
            }

            if item.quantity.is_zero() {
                // Nothing to persist; the line still counts as updated.
                txn.rollback().await.map_err(ServiceError::db_error)?;
                outcome.updated.push(line);
                continue;
            }

            let previous_units = line.units;
            let product_id = line.product_id;

            let mut active: stock_line::ActiveModel = line.into();
            active.units = Set(remaining);
            let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

            txn.commit().await.map_err(ServiceError::db_error)?;

            info!(
                stock_line_id = updated.id,
                %previous_units,
                new_units = %updated.units,
                "stock level adjusted"
            );

            // The write is already committed; a full event channel must not
            // fail the batch.
            if let Err(e) = self
                .event_sender
                .send(Event::StockLevelAdjusted {
                    stock_line_id: updated.id,
                    product_id,
                    previous_units,
                    new_units: updated.units,
                    timestamp: Utc::now(),
                })
                .await
            {
                warn!(stock_line_id = updated.id, error = %e, "failed to emit adjustment event");
            }

            outcome.updated.push(updated);
        }

        Ok(outcome)
    }
}
