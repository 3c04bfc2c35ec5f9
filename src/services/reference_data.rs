//! CRUD for the lookup entities that hang off products and stocks. These
//! are mechanical; all interesting behavior lives in the product and stock
//! services.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{barcode, category, label, note, product, status, tax, tax_category, uom};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StatusInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct TaxCategoryInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct TaxInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub rate: Option<Decimal>,
    /// "PERCENTAGE" or "AMOUNT"
    pub tax_type: Option<String>,
    pub tax_category_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LabelInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UomInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BarcodeInput {
    #[validate(length(min = 1, max = 255))]
    pub code: String,
    pub barcode_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NoteInput {
    #[validate(length(min = 1))]
    pub matter: String,
    pub product_id: i64,
}

const TAX_TYPES: [&str; 2] = ["PERCENTAGE", "AMOUNT"];

#[derive(Clone)]
pub struct ReferenceDataService {
    db_pool: Arc<DatabaseConnection>,
}

impl ReferenceDataService {
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self { db_pool }
    }

    fn db(&self) -> &DatabaseConnection {
        self.db_pool.as_ref()
    }

    // Categories

    pub async fn create_category(
        &self,
        input: CategoryInput,
    ) -> Result<category::Model, ServiceError> {
        input.validate()?;
        category::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            image_url: Set(input.image_url),
            visible: Set(input.visible.unwrap_or(true)),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn get_category(&self, id: i64) -> Result<category::Model, ServiceError> {
        category::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn list_categories(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<category::Model>, u64), ServiceError> {
        let total = category::Entity::find()
            .count(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        let items = category::Entity::find()
            .order_by_asc(category::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    pub async fn update_category(
        &self,
        id: i64,
        input: CategoryInput,
    ) -> Result<category::Model, ServiceError> {
        input.validate()?;
        let mut active: category::ActiveModel = self.get_category(id).await?.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.image_url = Set(input.image_url);
        if let Some(visible) = input.visible {
            active.visible = Set(visible);
        }
        active.update(self.db()).await.map_err(ServiceError::db_error)
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get_category(id).await?;
        existing
            .delete(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(())
    }

    // Statuses

    pub async fn create_status(&self, input: StatusInput) -> Result<status::Model, ServiceError> {
        input.validate()?;
        status::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            reference: Set(input.reference),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn get_status(&self, id: i64) -> Result<status::Model, ServiceError> {
        status::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Status {} not found", id)))
    }

    pub async fn list_statuses(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<status::Model>, u64), ServiceError> {
        let total = status::Entity::find()
            .count(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        let items = status::Entity::find()
            .order_by_asc(status::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    pub async fn update_status(
        &self,
        id: i64,
        input: StatusInput,
    ) -> Result<status::Model, ServiceError> {
        input.validate()?;
        let mut active: status::ActiveModel = self.get_status(id).await?.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.reference = Set(input.reference);
        active.update(self.db()).await.map_err(ServiceError::db_error)
    }

    pub async fn delete_status(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get_status(id).await?;
        existing
            .delete(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(())
    }

    // Tax categories

    pub async fn create_tax_category(
        &self,
        input: TaxCategoryInput,
    ) -> Result<tax_category::Model, ServiceError> {
        input.validate()?;
        tax_category::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn get_tax_category(&self, id: i64) -> Result<tax_category::Model, ServiceError> {
        tax_category::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Tax category {} not found", id)))
    }

    pub async fn list_tax_categories(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<tax_category::Model>, u64), ServiceError> {
        let total = tax_category::Entity::find()
            .count(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        let items = tax_category::Entity::find()
            .order_by_asc(tax_category::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    pub async fn update_tax_category(
        &self,
        id: i64,
        input: TaxCategoryInput,
    ) -> Result<tax_category::Model, ServiceError> {
        input.validate()?;
        let mut active: tax_category::ActiveModel = self.get_tax_category(id).await?.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.update(self.db()).await.map_err(ServiceError::db_error)
    }

    pub async fn delete_tax_category(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get_tax_category(id).await?;
        existing
            .delete(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(())
    }

    // Taxes

    fn check_tax_type(input: &TaxInput) -> Result<(), ServiceError> {
        if let Some(tax_type) = &input.tax_type {
            if !TAX_TYPES.contains(&tax_type.as_str()) {
                return Err(ServiceError::ValidationError(format!(
                    "tax_type must be one of {:?}",
                    TAX_TYPES
                )));
            }
        }
        Ok(())
    }

    pub async fn create_tax(&self, input: TaxInput) -> Result<tax::Model, ServiceError> {
        input.validate()?;
        Self::check_tax_type(&input)?;
        tax::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            rate: Set(input.rate),
            tax_type: Set(input.tax_type),
            tax_category_id: Set(input.tax_category_id),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn get_tax(&self, id: i64) -> Result<tax::Model, ServiceError> {
        tax::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Tax {} not found", id)))
    }

    pub async fn list_taxes(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<tax::Model>, u64), ServiceError> {
        let total = tax::Entity::find()
            .count(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        let items = tax::Entity::find()
            .order_by_asc(tax::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    pub async fn update_tax(&self, id: i64, input: TaxInput) -> Result<tax::Model, ServiceError> {
        input.validate()?;
        Self::check_tax_type(&input)?;
        let mut active: tax::ActiveModel = self.get_tax(id).await?.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.rate = Set(input.rate);
        active.tax_type = Set(input.tax_type);
        active.tax_category_id = Set(input.tax_category_id);
        active.update(self.db()).await.map_err(ServiceError::db_error)
    }

    pub async fn delete_tax(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get_tax(id).await?;
        existing
            .delete(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(())
    }

    // Labels

    pub async fn create_label(&self, input: LabelInput) -> Result<label::Model, ServiceError> {
        input.validate()?;
        label::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn get_label(&self, id: i64) -> Result<label::Model, ServiceError> {
        label::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Label {} not found", id)))
    }

    pub async fn list_labels(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<label::Model>, u64), ServiceError> {
        let total = label::Entity::find()
            .count(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        let items = label::Entity::find()
            .order_by_asc(label::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    pub async fn update_label(
        &self,
        id: i64,
        input: LabelInput,
    ) -> Result<label::Model, ServiceError> {
        input.validate()?;
        let mut active: label::ActiveModel = self.get_label(id).await?.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.update(self.db()).await.map_err(ServiceError::db_error)
    }

    pub async fn delete_label(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get_label(id).await?;
        existing
            .delete(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(())
    }

    // Units of measure

    pub async fn create_uom(&self, input: UomInput) -> Result<uom::Model, ServiceError> {
        input.validate()?;
        uom::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn get_uom(&self, id: i64) -> Result<uom::Model, ServiceError> {
        uom::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Uom {} not found", id)))
    }

    pub async fn list_uoms(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<uom::Model>, u64), ServiceError> {
        let total = uom::Entity::find()
            .count(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        let items = uom::Entity::find()
            .order_by_asc(uom::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    pub async fn update_uom(&self, id: i64, input: UomInput) -> Result<uom::Model, ServiceError> {
        input.validate()?;
        let mut active: uom::ActiveModel = self.get_uom(id).await?.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.update(self.db()).await.map_err(ServiceError::db_error)
    }

    pub async fn delete_uom(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get_uom(id).await?;
        existing
            .delete(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(())
    }

    // Barcodes

    pub async fn create_barcode(
        &self,
        input: BarcodeInput,
    ) -> Result<barcode::Model, ServiceError> {
        input.validate()?;
        barcode::ActiveModel {
            code: Set(input.code),
            barcode_type: Set(input.barcode_type),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn get_barcode(&self, id: i64) -> Result<barcode::Model, ServiceError> {
        barcode::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Barcode {} not found", id)))
    }

    pub async fn list_barcodes(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<barcode::Model>, u64), ServiceError> {
        let total = barcode::Entity::find()
            .count(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        let items = barcode::Entity::find()
            .order_by_asc(barcode::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    pub async fn update_barcode(
        &self,
        id: i64,
        input: BarcodeInput,
    ) -> Result<barcode::Model, ServiceError> {
        input.validate()?;
        let mut active: barcode::ActiveModel = self.get_barcode(id).await?.into();
        active.code = Set(input.code);
        active.barcode_type = Set(input.barcode_type);
        active.description = Set(input.description);
        active.update(self.db()).await.map_err(ServiceError::db_error)
    }

    pub async fn delete_barcode(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get_barcode(id).await?;
        existing
            .delete(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(())
    }

    // Notes

    pub async fn create_note(&self, input: NoteInput) -> Result<note::Model, ServiceError> {
        input.validate()?;

        let product_exists = product::Entity::find_by_id(input.product_id)
            .one(self.db())
            .await
            .map_err(ServiceError::db_error)?
            .is_some();
        if !product_exists {
            return Err(ServiceError::ValidationError(format!(
                "product {} does not exist",
                input.product_id
            )));
        }

        note::ActiveModel {
            matter: Set(input.matter),
            date_of_creation: Set(Utc::now()),
            product_id: Set(input.product_id),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn get_note(&self, id: i64) -> Result<note::Model, ServiceError> {
        note::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Note {} not found", id)))
    }

    pub async fn list_notes(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<note::Model>, u64), ServiceError> {
        let total = note::Entity::find()
            .count(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        let items = note::Entity::find()
            .order_by_asc(note::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    pub async fn update_note(&self, id: i64, input: NoteInput) -> Result<note::Model, ServiceError> {
        input.validate()?;
        let mut active: note::ActiveModel = self.get_note(id).await?.into();
        active.matter = Set(input.matter);
        active.product_id = Set(input.product_id);
        active.update(self.db()).await.map_err(ServiceError::db_error)
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get_note(id).await?;
        existing
            .delete(self.db())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(())
    }
}
