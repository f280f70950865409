//! Data loading and feature engineering modules

pub mod csv_loader;
pub mod features;
pub mod schema;

// Re-export commonly used types
pub use csv_loader::RecordBatch;
pub use features::{FeatureEncoder, OneHotColumn, ONE_HOT_COLUMNS};
pub use schema::{FeatureVector, FEATURE_COLUMNS, SCALED_COLUMNS};
