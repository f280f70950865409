use tracing::{debug, info};

use crate::artifacts::{self, ArtifactConfig};
use crate::data::schema::{FeatureVector, FEATURE_COLUMNS, SCALED_COLUMNS};
use crate::data::FeatureEncoder;
use crate::error::{ArtifactError, PredictError};
use crate::models::{Cohort, InputRecord};

/// Trained column scaler (affine per-column transform)
pub trait Scaler: Send + Sync {
    /// Columns the scaler was fit on, in fit order
    fn columns(&self) -> &[String];

    /// Transform values given in `columns()` order
    fn scale(&self, values: &[f64]) -> Result<Vec<f64>, PredictError>;

    /// Scale this scaler's columns of `vector` in place
    fn transform(&self, vector: &mut FeatureVector) -> Result<(), PredictError> {
        let mut values = Vec::with_capacity(self.columns().len());
        for column in self.columns() {
            let value = vector.get(column).ok_or_else(|| {
                PredictError::SchemaMismatch(format!(
                    "scaler expects column '{}' which the feature vector lacks",
                    column
                ))
            })?;
            values.push(value);
        }

        let scaled = self.scale(&values)?;
        if scaled.len() != values.len() {
            return Err(PredictError::SchemaMismatch(format!(
                "scaler returned {} values for {} columns",
                scaled.len(),
                values.len()
            )));
        }

        for (column, value) in self.columns().iter().zip(scaled) {
            vector.set(column, value)?;
        }
        Ok(())
    }
}

/// Trained regression model
pub trait Regressor: Send + Sync {
    /// Columns the model was trained on, in training order
    fn columns(&self) -> &[String];

    /// Predict a single value from features given in `columns()` order
    fn predict(&self, features: &[f64]) -> Result<f64, PredictError>;
}

/// Scaler and model trained on one age cohort
pub struct CohortModels {
    pub scaler: Box<dyn Scaler>,
    pub model: Box<dyn Regressor>,
}

impl CohortModels {
    pub fn new(scaler: Box<dyn Scaler>, model: Box<dyn Regressor>) -> Self {
        Self { scaler, model }
    }

    /// Check the artifacts against the feature schema
    fn validate(&self, cohort: Cohort) -> Result<(), PredictError> {
        let scaled: Vec<&str> = self.scaler.columns().iter().map(String::as_str).collect();
        if scaled != SCALED_COLUMNS {
            return Err(PredictError::SchemaMismatch(format!(
                "{} scaler columns {:?} differ from {:?}",
                cohort.as_str(),
                scaled,
                SCALED_COLUMNS
            )));
        }

        FeatureVector::new()
            .ensure_columns(self.model.columns())
            .map_err(|e| {
                PredictError::SchemaMismatch(format!("{} model: {}", cohort.as_str(), e))
            })
    }
}

/// Result of a single prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Estimated cost, truncated and floored at zero
    pub cost: u64,
    /// Cohort whose model produced the estimate
    pub cohort: Cohort,
    /// Raw model output
    pub raw: f64,
}

/// Insurance cost predictor dispatching on the applicant's age cohort
pub struct InsurancePredictor {
    young: CohortModels,
    rest: CohortModels,
}

impl InsurancePredictor {
    /// Create a predictor from already loaded artifacts
    pub fn new(young: CohortModels, rest: CohortModels) -> Result<Self, PredictError> {
        young.validate(Cohort::Young)?;
        rest.validate(Cohort::Rest)?;
        Ok(Self { young, rest })
    }

    /// Load the four cohort artifacts from disk
    pub fn load(config: &ArtifactConfig) -> Result<Self, ArtifactError> {
        info!("Loading artifacts from {:?}", config.model_dir);

        let young = CohortModels::new(
            artifacts::load_scaler(config.path(Cohort::Young, artifacts::ArtifactKind::Scaler))?,
            artifacts::load_model(config.path(Cohort::Young, artifacts::ArtifactKind::Model))?,
        );
        let rest = CohortModels::new(
            artifacts::load_scaler(config.path(Cohort::Rest, artifacts::ArtifactKind::Scaler))?,
            artifacts::load_model(config.path(Cohort::Rest, artifacts::ArtifactKind::Model))?,
        );

        let predictor = Self::new(young, rest)?;
        info!("Loaded young and rest cohort artifacts");
        Ok(predictor)
    }

    /// Artifacts for a cohort
    pub fn models(&self, cohort: Cohort) -> &CohortModels {
        match cohort {
            Cohort::Young => &self.young,
            Cohort::Rest => &self.rest,
        }
    }

    /// Encode a record and apply its cohort's scaler
    pub fn preprocess(&self, record: &InputRecord) -> Result<(Cohort, FeatureVector), PredictError> {
        let age = record.age.ok_or(PredictError::MissingAge)?;
        let cohort = Cohort::for_age(age);

        let mut features = FeatureEncoder::encode(record);
        self.models(cohort).scaler.transform(&mut features)?;

        Ok((cohort, features))
    }

    /// Predict the insurance cost for a record
    pub fn predict(&self, record: &InputRecord) -> Result<Prediction, PredictError> {
        let (cohort, features) = self.preprocess(record)?;
        let model = &self.models(cohort).model;

        features.ensure_columns(model.columns())?;
        let raw = model.predict(features.values())?;
        if !raw.is_finite() {
            return Err(PredictError::NonFiniteOutput(raw));
        }

        let cost = raw.trunc().max(0.0) as u64;
        debug!(cohort = cohort.as_str(), raw, cost, "prediction");

        Ok(Prediction { cost, cohort, raw })
    }

    /// Predict and return only the cost
    pub fn predict_cost(&self, record: &InputRecord) -> Result<u64, PredictError> {
        self.predict(record).map(|p| p.cost)
    }

    /// Number of model input columns
    pub fn feature_count(&self) -> usize {
        FEATURE_COLUMNS.len()
    }
}
