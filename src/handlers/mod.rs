pub mod health;
pub mod options;
pub mod predict;

use actix_web::web;

/// Register all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/options", web::get().to(options::list_options))
        .route("/risk-analysis", web::get().to(options::risk_analysis))
        .route("/predict", web::post().to(predict::predict_cost))
        .route("/predict/batch", web::post().to(predict::predict_batch));
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use insurance::artifacts::{LinearModel, ScalerArtifact};
    use insurance::data::{FEATURE_COLUMNS, SCALED_COLUMNS};
    use insurance::predictor::{CohortModels, InsurancePredictor};

    use crate::AppState;

    fn strings(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    /// Linear cohort model: `intercept + 1000 * insurance_plan`
    fn cohort(intercept: f64) -> CohortModels {
        let scaler = ScalerArtifact::Standard {
            columns: strings(&SCALED_COLUMNS),
            mean: vec![0.0, 0.0],
            scale: vec![1.0, 1.0],
        };
        let mut coefficients = vec![0.0; FEATURE_COLUMNS.len()];
        coefficients[3] = 1_000.0;
        let model = LinearModel::new(strings(&FEATURE_COLUMNS), coefficients, intercept);

        CohortModels::new(Box::new(scaler), Box::new(model))
    }

    /// Young intercept 4000, rest intercept 9000
    pub fn state() -> Arc<AppState> {
        let predictor = InsurancePredictor::new(cohort(4_000.0), cohort(9_000.0)).unwrap();
        Arc::new(AppState { predictor })
    }
}
