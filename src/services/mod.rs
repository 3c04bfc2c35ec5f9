pub mod products;
pub mod reference_data;
pub mod stock_lines;
pub mod stocks;

pub use products::ProductService;
pub use reference_data::ReferenceDataService;
pub use stock_lines::{
    StockAdjustment, StockAdjustmentErrorKind, StockAdjustmentFailure, StockAdjustmentOutcome,
    StockLineService,
};
pub use stocks::StockService;
