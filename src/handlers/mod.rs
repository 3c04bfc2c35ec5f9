pub mod common;
pub mod lookups;
pub mod products;
pub mod stock_lines;
pub mod stocks;
