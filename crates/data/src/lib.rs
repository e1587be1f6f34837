//! Data ingestion for the flow-state monitor.
//!
//! This crate provides:
//! - Row and series models for aligned borrow-rate/price data
//! - CSV loaders for headered market files and bare price columns

pub mod csv_loader;
pub mod models;

// Re-export commonly used types for convenience
pub use csv_loader::{load_market_csv, load_price_csv, read_market_csv, read_price_csv, CsvColumns};
pub use models::{MarketRow, MarketSeries};
