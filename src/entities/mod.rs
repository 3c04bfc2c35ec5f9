pub mod barcode;
pub mod category;
pub mod label;
pub mod note;
pub mod product;
pub mod product_label;
pub mod product_uom;
pub mod status;
pub mod stock;
pub mod stock_line;
pub mod stock_stock_line;
pub mod tax;
pub mod tax_category;
pub mod uom;
