//! Affine column scalers fit at training time

use serde::{Deserialize, Serialize};

use super::check_lengths;
use crate::data::schema::schema_contains;
use crate::error::PredictError;
use crate::predictor::Scaler;

/// Scaler parameters exported from training
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    /// `(x - mean) / scale`
    Standard {
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// `x * scale + min`
    MinMax {
        columns: Vec<String>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl ScalerArtifact {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ScalerArtifact::Standard {
                columns,
                mean,
                scale,
            } => {
                check_lengths(columns, "mean", mean)?;
                check_lengths(columns, "scale", scale)?;
                if let Some(i) = scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
                    return Err(format!("scale for '{}' must be finite and non-zero", columns[i]));
                }
            }
            ScalerArtifact::MinMax {
                columns,
                min,
                scale,
            } => {
                check_lengths(columns, "min", min)?;
                check_lengths(columns, "scale", scale)?;
            }
        }
        schema_contains(self.columns()).map_err(|e| e.to_string())
    }
}

impl Scaler for ScalerArtifact {
    fn columns(&self) -> &[String] {
        match self {
            ScalerArtifact::Standard { columns, .. } | ScalerArtifact::MinMax { columns, .. } => {
                columns
            }
        }
    }

    fn scale(&self, values: &[f64]) -> Result<Vec<f64>, PredictError> {
        if values.len() != self.columns().len() {
            return Err(PredictError::SchemaMismatch(format!(
                "scaler fit on {} columns, got {} values",
                self.columns().len(),
                values.len()
            )));
        }

        let scaled = match self {
            ScalerArtifact::Standard { mean, scale, .. } => values
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            ScalerArtifact::MinMax { min, scale, .. } => values
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (lo, s))| x * s + lo)
                .collect(),
        };
        Ok(scaled)
    }
}
