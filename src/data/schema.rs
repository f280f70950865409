//! Feature schema and feature vectors
//!
//! The column order here is the order the models were trained with. Any
//! change to it must be matched by retrained artifacts.

use serde::Serialize;

use crate::error::PredictError;

/// Model input columns, in training order
pub const FEATURE_COLUMNS: [&str; 18] = [
    "age",
    "number_of_dependants",
    "income_lakhs",
    "insurance_plan",
    "genetical_risk",
    "normalized_risk_score",
    "gender_Male",
    "region_Northwest",
    "region_Southeast",
    "region_Southwest",
    "marital_status_Unmarried",
    "bmi_category_Obesity",
    "bmi_category_Overweight",
    "bmi_category_Underweight",
    "smoking_status_Occasional",
    "smoking_status_Regular",
    "employment_status_Salaried",
    "employment_status_Self-Employed",
];

/// Columns standardized by the cohort scalers
pub const SCALED_COLUMNS: [&str; 2] = ["age", "income_lakhs"];

/// Named, fixed-order feature values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    columns: &'static [&'static str],
    values: Vec<f64>,
}

impl FeatureVector {
    /// Zero-initialised vector over the given columns
    pub fn zeroed(columns: &'static [&'static str]) -> Self {
        Self {
            columns,
            values: vec![0.0; columns.len()],
        }
    }

    /// Zero-initialised vector over the model schema
    pub fn new() -> Self {
        Self::zeroed(&FEATURE_COLUMNS)
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.index_of(column).map(|i| self.values[i])
    }

    /// Set a column value; fails if the column is not part of this vector
    pub fn set(&mut self, column: &str, value: f64) -> Result<(), PredictError> {
        let idx = self.index_of(column).ok_or_else(|| {
            PredictError::SchemaMismatch(format!("feature vector has no column '{}'", column))
        })?;
        self.values[idx] = value;
        Ok(())
    }

    /// Fail unless this vector's columns equal `expected`, name for name and in order
    pub fn ensure_columns<S: AsRef<str>>(&self, expected: &[S]) -> Result<(), PredictError> {
        let matches = self.columns.len() == expected.len()
            && self
                .columns
                .iter()
                .zip(expected)
                .all(|(have, want)| *have == want.as_ref());

        if matches {
            return Ok(());
        }

        let missing: Vec<&str> = expected
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| self.index_of(c).is_none())
            .collect();
        let unexpected: Vec<&str> = self
            .columns
            .iter()
            .copied()
            .filter(|c| !expected.iter().any(|e| e.as_ref() == *c))
            .collect();

        Err(PredictError::SchemaMismatch(format!(
            "expected {} columns, vector has {} (missing: {:?}, unexpected: {:?})",
            expected.len(),
            self.columns.len(),
            missing,
            unexpected
        )))
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that every scaled column is part of the model schema
pub fn schema_contains(columns: &[String]) -> Result<(), PredictError> {
    for column in columns {
        if !FEATURE_COLUMNS.contains(&column.as_str()) {
            return Err(PredictError::SchemaMismatch(format!(
                "column '{}' is not part of the feature schema",
                column
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vector_is_zeroed() {
        let vector = FeatureVector::new();
        assert_eq!(vector.len(), 18);
        assert!(vector.values().iter().all(|&v| v == 0.0));
        assert_eq!(vector.columns()[0], "age");
        assert_eq!(vector.columns()[17], "employment_status_Self-Employed");
    }

    #[test]
    fn test_set_and_get() {
        let mut vector = FeatureVector::new();
        vector.set("income_lakhs", 12.0).unwrap();
        assert_eq!(vector.get("income_lakhs"), Some(12.0));
        assert_eq!(vector.values()[2], 12.0);
    }

    #[test]
    fn test_set_unknown_column() {
        let mut vector = FeatureVector::new();
        let err = vector.set("income_level", 1.0).unwrap_err();
        assert!(matches!(err, PredictError::SchemaMismatch(_)));
        assert_eq!(vector.get("income_level"), None);
    }

    #[test]
    fn test_ensure_columns_exact() {
        let vector = FeatureVector::new();
        assert!(vector.ensure_columns(&FEATURE_COLUMNS).is_ok());
    }

    #[test]
    fn test_ensure_columns_extra_column() {
        let vector = FeatureVector::new();
        let mut expected: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
        expected.insert(6, "income_level".to_string());

        let err = vector.ensure_columns(&expected).unwrap_err();
        assert!(err.to_string().contains("income_level"));
    }

    #[test]
    fn test_ensure_columns_order_matters() {
        let vector = FeatureVector::new();
        let mut expected: Vec<&str> = FEATURE_COLUMNS.to_vec();
        expected.swap(0, 1);
        assert!(vector.ensure_columns(&expected).is_err());
    }

    #[test]
    fn test_schema_contains() {
        assert!(schema_contains(&["age".to_string(), "income_lakhs".to_string()]).is_ok());
        assert!(schema_contains(&["income_level".to_string()]).is_err());
    }
}
