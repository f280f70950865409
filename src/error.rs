use std::path::PathBuf;
use thiserror::Error;

use crate::models::InputRecord;

/// Errors raised while predicting a single record
#[derive(Debug, Error)]
pub enum PredictError {
    /// Age is the cohort dispatch key and has no default
    #[error("missing required field: Age")]
    MissingAge,

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("model returned a non-finite value: {0}")]
    NonFiniteOutput(f64),

    #[error("model inference failed: {0}")]
    Inference(String),
}

/// Errors raised while loading trained artifacts at startup
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {path:?}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error(transparent)]
    Schema(#[from] PredictError),
}

/// Form bound violation
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} must be between {min} and {max}, got {value}")]
pub struct ValidationError {
    pub field: &'static str,
    pub min: u32,
    pub max: u32,
    pub value: u32,
}

/// CSV cell that is present but not a non-negative whole number
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} must be a non-negative whole number, got '{value}'")]
pub struct CellError {
    pub field: &'static str,
    pub value: String,
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if !(min..=max).contains(&value) {
        return Err(ValidationError {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

/// Validation functions
pub fn validate_age(age: u32) -> Result<(), ValidationError> {
    check_range("Age", age, 18, 100)
}

pub fn validate_dependants(count: u32) -> Result<(), ValidationError> {
    check_range("Number of Dependants", count, 0, 20)
}

pub fn validate_income(income_lakhs: u32) -> Result<(), ValidationError> {
    check_range("Income in Lakhs", income_lakhs, 0, 200)
}

pub fn validate_genetical_risk(risk: u32) -> Result<(), ValidationError> {
    check_range("Genetical Risk", risk, 0, 5)
}

/// Check the numeric fields that are present against the form bounds
pub fn validate_record(record: &InputRecord) -> Result<(), ValidationError> {
    if let Some(age) = record.age {
        validate_age(age)?;
    }
    if let Some(count) = record.number_of_dependants {
        validate_dependants(count)?;
    }
    if let Some(income) = record.income_lakhs {
        validate_income(income)?;
    }
    if let Some(risk) = record.genetical_risk {
        validate_genetical_risk(risk)?;
    }
    Ok(())
}

#[cfg(feature = "api")]
pub use api::AppError;

#[cfg(feature = "api")]
mod api {
    use actix_web::{http::StatusCode, HttpResponse, ResponseError};
    use thiserror::Error;

    use super::{PredictError, ValidationError};
    use crate::models::ErrorResponse;

    /// Request failures surfaced by the HTTP API
    #[derive(Debug, Error)]
    pub enum AppError {
        /// Numeric field outside the form bounds
        #[error(transparent)]
        OutOfRange(#[from] ValidationError),
        /// Batch request rejected as a whole
        #[error("{0}")]
        InvalidBatch(String),
        /// Cohort dispatch or model failure
        #[error(transparent)]
        Predict(#[from] PredictError),
    }

    impl AppError {
        /// Machine-readable error code
        pub fn code(&self) -> &'static str {
            match self {
                AppError::OutOfRange(_) => "out_of_range",
                AppError::InvalidBatch(_) => "invalid_batch",
                AppError::Predict(PredictError::MissingAge) => "missing_field",
                AppError::Predict(PredictError::SchemaMismatch(_)) => "schema_mismatch",
                AppError::Predict(PredictError::NonFiniteOutput(_)) => "non_finite_output",
                AppError::Predict(PredictError::Inference(_)) => "inference_error",
            }
        }

        /// Form label of the offending field, if any
        pub fn field(&self) -> Option<&'static str> {
            match self {
                AppError::OutOfRange(err) => Some(err.field),
                AppError::Predict(PredictError::MissingAge) => Some("Age"),
                _ => None,
            }
        }
    }

    impl ResponseError for AppError {
        fn status_code(&self) -> StatusCode {
            match self {
                AppError::OutOfRange(_)
                | AppError::InvalidBatch(_)
                | AppError::Predict(PredictError::MissingAge) => StatusCode::BAD_REQUEST,
                AppError::Predict(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }

        fn error_response(&self) -> HttpResponse {
            HttpResponse::build(self.status_code()).json(ErrorResponse {
                error: self.code().to_string(),
                message: self.to_string(),
                field: self.field().map(str::to_string),
            })
        }
    }
}
