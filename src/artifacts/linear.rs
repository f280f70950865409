//! Linear regression model

use serde::{Deserialize, Serialize};

use super::check_lengths;
use crate::error::PredictError;
use crate::predictor::Regressor;

/// `intercept + sum(coefficients[i] * x[i])`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub columns: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn new(columns: Vec<String>, coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            columns,
            coefficients,
            intercept,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        check_lengths(&self.columns, "coefficients", &self.coefficients)
    }
}

impl Regressor for LinearModel {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        if features.len() != self.coefficients.len() {
            return Err(PredictError::SchemaMismatch(format!(
                "linear model expects {} features, got {}",
                self.coefficients.len(),
                features.len()
            )));
        }

        let dot: f64 = features
            .iter()
            .zip(&self.coefficients)
            .map(|(x, w)| x * w)
            .sum();
        Ok(self.intercept + dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearModel {
        LinearModel::new(
            vec!["age".to_string(), "income_lakhs".to_string()],
            vec![100.0, -20.0],
            1_000.0,
        )
    }

    #[test]
    fn test_predict() {
        let value = model().predict(&[2.0, 5.0]).unwrap();
        assert!((value - 1_100.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_wrong_length() {
        assert!(model().predict(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(model().validate().is_ok());
        let bad = LinearModel::new(vec!["age".to_string()], vec![1.0, 2.0], 0.0);
        assert!(bad.validate().is_err());
    }
}
