use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{barcode, category, label, note, product, status, tax_category};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::views::{assemble_product_view, NoteView, ProductView};

/// Payload for creating or replacing a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub reference: Option<String>,
    pub search_key: Option<String>,
    pub sku: Option<String>,
    pub mpn: Option<String>,
    pub image_url: Option<String>,
    /// Defaults to true when omitted on create
    pub visible: Option<bool>,
    pub date_of_mfd: Option<NaiveDate>,
    pub date_of_expiry: Option<NaiveDate>,
    pub maximum_stock_level: Option<Decimal>,
    pub reorder_level: Option<Decimal>,
    pub barcode_id: Option<i64>,
    pub category_id: Option<i64>,
    pub status_id: Option<i64>,
    pub tax_category_id: Option<i64>,
}

/// Service for managing products and their marshalled read model.
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl ProductService {
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ProductInput) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let db = self.db_pool.as_ref();

        let model = product::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            reference: Set(input.reference),
            search_key: Set(input.search_key),
            sku: Set(input.sku),
            mpn: Set(input.mpn),
            image_url: Set(input.image_url),
            visible: match input.visible {
                Some(visible) => Set(visible),
                None => NotSet,
            },
            date_of_mfd: Set(input.date_of_mfd),
            date_of_expiry: Set(input.date_of_expiry),
            maximum_stock_level: Set(input.maximum_stock_level),
            reorder_level: Set(input.reorder_level),
            barcode_id: Set(input.barcode_id),
            category_id: Set(input.category_id),
            status_id: Set(input.status_id),
            tax_category_id: Set(input.tax_category_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(ServiceError::db_error)?;

        info!(product_id = model.id, "product created");

        self.event_sender
            .send(Event::ProductCreated(model.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(model)
    }

    pub async fn get(&self, id: i64) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: ProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let db = self.db_pool.as_ref();
        let existing = self.get(id).await?;

        let mut active: product::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.reference = Set(input.reference);
        active.search_key = Set(input.search_key);
        active.sku = Set(input.sku);
        active.mpn = Set(input.mpn);
        active.image_url = Set(input.image_url);
        if let Some(visible) = input.visible {
            active.visible = Set(visible);
        }
        active.date_of_mfd = Set(input.date_of_mfd);
        active.date_of_expiry = Set(input.date_of_expiry);
        active.maximum_stock_level = Set(input.maximum_stock_level);
        active.reorder_level = Set(input.reorder_level);
        active.barcode_id = Set(input.barcode_id);
        active.category_id = Set(input.category_id);
        active.status_id = Set(input.status_id);
        active.tax_category_id = Set(input.tax_category_id);

        let model = active.update(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::ProductUpdated(model.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let existing = self.get(id).await?;

        existing.delete(db).await.map_err(ServiceError::db_error)?;

        info!(product_id = id, "product deleted");

        self.event_sender
            .send(Event::ProductDeleted(id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }

    /// Paginated listing; returns the page plus the total row count.
    pub async fn list(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let db = self.db_pool.as_ref();

        let total = product::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        let items = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((items, total))
    }

    /// Resolves the fully marshalled product view.
    ///
    /// Each optional relation costs at most one query; labels and notes are
    /// each fetched with a single related query.
    #[instrument(skip(self))]
    pub async fn marshalled_product(&self, id: i64) -> Result<ProductView, ServiceError> {
        let db = self.db_pool.as_ref();
        let product = self.get(id).await?;

        let barcode = match product.barcode_id {
            Some(barcode_id) => barcode::Entity::find_by_id(barcode_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?,
            None => None,
        };

        let category = match product.category_id {
            Some(category_id) => category::Entity::find_by_id(category_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?,
            None => None,
        };

        let tax_category = match product.tax_category_id {
            Some(tax_category_id) => tax_category::Entity::find_by_id(tax_category_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?,
            None => None,
        };

        let status = match product.status_id {
            Some(status_id) => status::Entity::find_by_id(status_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?,
            None => None,
        };

        let labels = product
            .find_related(label::Entity)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let notes = product
            .find_related(note::Entity)
            .order_by_asc(note::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(assemble_product_view(
            product,
            barcode,
            category,
            tax_category,
            status,
            labels,
            notes,
        ))
    }

    /// Paginated notes for one product; the product must exist.
    pub async fn notes_for_product(
        &self,
        id: i64,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<NoteView>, ServiceError> {
        let db = self.db_pool.as_ref();
        let _ = self.get(id).await?;

        let notes = note::Entity::find()
            .filter(note::Column::ProductId.eq(id))
            .order_by_asc(note::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(notes.into_iter().map(Into::into).collect())
    }
}
