//! Insurance Predictor - Health insurance cost estimation
//!
//! This library provides:
//! - Encoding of applicant records into the fixed feature schema the models were trained on
//! - Medical-history risk score normalization
//! - Age-cohort dispatch between the young and rest model/scaler pairs
//! - Loading of trained scaler and model artifacts (JSON, optionally ONNX)
//! - Risk factor summaries and recommendations
//!
//! # Example
//!
//! ```no_run
//! use insurance::artifacts::ArtifactConfig;
//! use insurance::models::InputRecord;
//! use insurance::predictor::InsurancePredictor;
//!
//! let predictor = InsurancePredictor::load(&ArtifactConfig::default()).unwrap();
//!
//! let record = InputRecord {
//!     age: Some(30),
//!     insurance_plan: Some("Silver".to_string()),
//!     ..Default::default()
//! };
//! let prediction = predictor.predict(&record).unwrap();
//! println!("Predicted cost: {}", prediction.cost);
//! ```

pub mod artifacts;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod predictor;

// Re-export commonly used types
pub use artifacts::ArtifactConfig;
pub use crate::core::risk::calculate_normalized_risk;
pub use data::{FeatureEncoder, FeatureVector, FEATURE_COLUMNS};
pub use error::{ArtifactError, CellError, PredictError};
pub use models::{CategoricalField, Cohort, InputRecord, PredictResponse};
pub use predictor::{InsurancePredictor, Prediction, Regressor, Scaler};
