//! Marshalled read models.
//!
//! Each view is an immutable, serializable record composed from several
//! independently stored entities. Optional relations are explicit
//! `Option<..View>` sub-records: a `None` means the relation is unset on the
//! source row, never that a lookup was skipped. Assembly functions are pure;
//! the services load the rows (one batched query per relation type) and hand
//! them here.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{barcode, category, label, note, product, status, stock, stock_line, tax_category, uom};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BarcodeView {
    pub id: i64,
    pub code: String,
    pub barcode_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TaxCategoryView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LabelView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteView {
    pub id: i64,
    pub date_of_creation: DateTime<Utc>,
    pub matter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UomView {
    pub id: i64,
    pub name: String,
}

/// Fully marshalled product: every reachable relation resolved one level
/// deep, labels and notes as complete lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductView {
    pub id: i64,
    pub reference: Option<String>,
    pub search_key: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub mpn: Option<String>,
    pub image_url: Option<String>,
    pub visible: bool,
    pub date_of_mfd: Option<NaiveDate>,
    pub date_of_expiry: Option<NaiveDate>,
    pub maximum_stock_level: Option<Decimal>,
    pub reorder_level: Option<Decimal>,
    pub barcode: Option<BarcodeView>,
    pub category: Option<CategoryView>,
    pub tax_category: Option<TaxCategoryView>,
    pub status: Option<StatusView>,
    pub labels: Vec<LabelView>,
    pub notes: Vec<NoteView>,
}

/// Reduced product reference embedded in stock-line views.
///
/// Deliberately not a full `ProductView`: a stock view holding many lines of
/// the same product would otherwise expand the whole product graph once per
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductRef {
    pub id: i64,
    pub name: String,
    pub tax_category: Option<TaxCategoryView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockLineView {
    pub id: i64,
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
    pub product: ProductRef,
    pub uom: UomView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockView {
    pub id: i64,
    pub reference: Option<String>,
    pub delivery_note_ref: Option<i64>,
    pub date_of_stock_added: Option<NaiveDate>,
    pub date_of_stock_updated: Option<NaiveDate>,
    pub storage_cost: Option<Decimal>,
    pub status: Option<StatusView>,
    pub stock_lines: Vec<StockLineView>,
}

impl From<barcode::Model> for BarcodeView {
    fn from(m: barcode::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            barcode_type: m.barcode_type,
            description: m.description,
        }
    }
}

impl From<category::Model> for CategoryView {
    fn from(m: category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            image_url: m.image_url,
        }
    }
}

impl From<tax_category::Model> for TaxCategoryView {
    fn from(m: tax_category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
        }
    }
}

impl From<status::Model> for StatusView {
    fn from(m: status::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            reference: m.reference,
        }
    }
}

impl From<label::Model> for LabelView {
    fn from(m: label::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
        }
    }
}

impl From<note::Model> for NoteView {
    fn from(m: note::Model) -> Self {
        Self {
            id: m.id,
            date_of_creation: m.date_of_creation,
            matter: m.matter,
        }
    }
}

impl From<uom::Model> for UomView {
    fn from(m: uom::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

/// Assembles the full product view from already-loaded rows.
pub fn assemble_product_view(
    product: product::Model,
    barcode: Option<barcode::Model>,
    category: Option<category::Model>,
    tax_category: Option<tax_category::Model>,
    status: Option<status::Model>,
    labels: Vec<label::Model>,
    notes: Vec<note::Model>,
) -> ProductView {
    ProductView {
        id: product.id,
        reference: product.reference,
        search_key: product.search_key,
        name: product.name,
        description: product.description,
        sku: product.sku,
        mpn: product.mpn,
        image_url: product.image_url,
        visible: product.visible,
        date_of_mfd: product.date_of_mfd,
        date_of_expiry: product.date_of_expiry,
        maximum_stock_level: product.maximum_stock_level,
        reorder_level: product.reorder_level,
        barcode: barcode.map(Into::into),
        category: category.map(Into::into),
        tax_category: tax_category.map(Into::into),
        status: status.map(Into::into),
        labels: labels.into_iter().map(Into::into).collect(),
        notes: notes.into_iter().map(Into::into).collect(),
    }
}

/// Builds the reduced product reference used inside stock-line views.
pub fn assemble_product_ref(
    product: &product::Model,
    tax_category: Option<tax_category::Model>,
) -> ProductRef {
    ProductRef {
        id: product.id,
        name: product.name.clone(),
        tax_category: tax_category.map(Into::into),
    }
}

/// Assembles a stock-line view from its row, owning product (reduced) and
/// unit of measure.
pub fn assemble_stock_line_view(
    line: stock_line::Model,
    product: ProductRef,
    uom: uom::Model,
) -> StockLineView {
    StockLineView {
        id: line.id,
        reference: line.reference,
        buy_price: line.buy_price,
        sell_price_exclusive: line.sell_price_exclusive,
        sell_price_inclusive: line.sell_price_inclusive,
        gross_profit: line.gross_profit,
        margin: line.margin,
        units: line.units,
        supplier_ref: line.supplier_ref,
        infrastructure_id: line.infrastructure_id,
        location_id: line.location_id,
        product,
        uom: uom.into(),
    }
}

/// Assembles a stock view. Line order is preserved exactly as given;
/// the assembler never re-sorts.
pub fn assemble_stock_view(
    stock: stock::Model,
    status: Option<status::Model>,
    stock_lines: Vec<StockLineView>,
) -> StockView {
    StockView {
        id: stock.id,
        reference: stock.reference,
        delivery_note_ref: stock.delivery_note_ref,
        date_of_stock_added: stock.date_of_stock_added,
        date_of_stock_updated: stock.date_of_stock_updated,
        storage_cost: stock.storage_cost,
        status: status.map(Into::into),
        stock_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample_product(id: i64) -> product::Model {
        product::Model {
            id,
            reference: Some("P-001".into()),
            search_key: None,
            name: "Arabica beans".into(),
            description: None,
            sku: Some("SKU-1".into()),
            mpn: None,
            image_url: None,
            visible: true,
            date_of_mfd: None,
            date_of_expiry: None,
            maximum_stock_level: Some(dec!(500)),
            reorder_level: Some(dec!(50)),
            barcode_id: None,
            category_id: None,
            status_id: None,
            tax_category_id: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn sample_line(id: i64, product_id: i64, uom_id: i64) -> stock_line::Model {
        stock_line::Model {
            id,
            reference: Some(format!("SL-{id}")),
            buy_price: Some(dec!(4.20)),
            sell_price_exclusive: Some(dec!(6.00)),
            sell_price_inclusive: Some(dec!(7.20)),
            gross_profit: Some(dec!(1.80)),
            margin: Some(dec!(0.30)),
            units: dec!(12),
            supplier_ref: None,
            infrastructure_id: None,
            location_id: Some("A-3".into()),
            product_id,
            uom_id,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn product_view_marks_unset_relations_absent() {
        let view = assemble_product_view(
            sample_product(1),
            None,
            None,
            None,
            None,
            vec![],
            vec![],
        );

        assert!(view.barcode.is_none());
        assert!(view.category.is_none());
        assert!(view.tax_category.is_none());
        assert!(view.status.is_none());
        assert!(view.labels.is_empty());
        assert!(view.notes.is_empty());
        assert_eq!(view.name, "Arabica beans");
    }

    #[test]
    fn product_view_resolves_present_relations() {
        let barcode = barcode::Model {
            id: 7,
            code: "4006381333931".into(),
            barcode_type: Some("EAN13".into()),
            description: None,
        };
        let status = status::Model {
            id: 3,
            name: "active".into(),
            description: None,
            reference: Some("ST-3".into()),
        };
        let labels = vec![label::Model {
            id: 9,
            name: "organic".into(),
            description: None,
        }];

        let view = assemble_product_view(
            sample_product(1),
            Some(barcode),
            None,
            None,
            Some(status),
            labels,
            vec![],
        );

        let bc = view.barcode.expect("barcode should be present");
        assert_eq!(bc.code, "4006381333931");
        assert_eq!(view.status.as_ref().map(|s| s.id), Some(3));
        assert_eq!(view.labels.len(), 1);
        assert_eq!(view.labels[0].name, "organic");
    }

    #[test]
    fn stock_line_view_embeds_reduced_product() {
        let product = sample_product(5);
        let tax_category = tax_category::Model {
            id: 2,
            name: "standard".into(),
            description: Some("standard rate".into()),
        };
        let product_ref = assemble_product_ref(&product, Some(tax_category));
        let uom = uom::Model {
            id: 4,
            name: "kg".into(),
            description: None,
        };

        let view = assemble_stock_line_view(sample_line(11, 5, 4), product_ref, uom);

        assert_eq!(view.product.id, 5);
        assert_eq!(view.product.name, "Arabica beans");
        assert_eq!(view.product.tax_category.as_ref().map(|t| t.id), Some(2));
        assert_eq!(view.uom.name, "kg");
        assert_eq!(view.units, dec!(12));
    }

    #[test]
    fn stock_view_preserves_line_order() {
        let stock = stock::Model {
            id: 1,
            reference: Some("STK-1".into()),
            delivery_note_ref: Some(77),
            date_of_stock_added: None,
            date_of_stock_updated: None,
            storage_cost: None,
            status_id: None,
        };

        let mk_line = |id: i64| {
            let product = sample_product(id * 10);
            let product_ref = assemble_product_ref(&product, None);
            let uom = uom::Model {
                id: 1,
                name: "pcs".into(),
                description: None,
            };
            assemble_stock_line_view(sample_line(id, id * 10, 1), product_ref, uom)
        };

        let view = assemble_stock_view(stock, None, vec![mk_line(3), mk_line(1), mk_line(2)]);

        let ids: Vec<i64> = view.stock_lines.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(view.status.is_none());
    }
}
