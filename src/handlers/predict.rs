use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::warn;

use insurance::core::risk::{recommendations, risk_factors};
use insurance::error::{validate_record, AppError, PredictError};
use insurance::models::{BatchItem, BatchPredictResponse, InputRecord, PredictResponse};

use crate::AppState;

/// Maximum records accepted by the batch endpoint
const MAX_BATCH_SIZE: usize = 1_000;

/// Predict insurance cost for one applicant
pub async fn predict_cost(
    state: web::Data<Arc<AppState>>,
    req: web::Json<InputRecord>,
) -> Result<HttpResponse, AppError> {
    validate_record(&req)?;

    let prediction = state.predictor.predict(&req).map_err(|e| {
        if !matches!(e, PredictError::MissingAge) {
            warn!("Prediction failed: {}", e);
        }
        AppError::from(e)
    })?;

    let response = PredictResponse {
        predicted_cost: prediction.cost,
        cohort: prediction.cohort,
        risk_factors: risk_factors(&req),
        recommendations: recommendations(&req),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Predict insurance cost for many applicants; failures are reported per record
pub async fn predict_batch(
    state: web::Data<Arc<AppState>>,
    req: web::Json<Vec<InputRecord>>,
) -> Result<HttpResponse, AppError> {
    if req.is_empty() {
        return Err(AppError::InvalidBatch(
            "At least one record required".to_string(),
        ));
    }
    if req.len() > MAX_BATCH_SIZE {
        return Err(AppError::InvalidBatch(format!(
            "At most {} records per batch, got {}",
            MAX_BATCH_SIZE,
            req.len()
        )));
    }

    let results = req
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let outcome = validate_record(record)
                .map_err(|e| e.to_string())
                .and_then(|_| state.predictor.predict(record).map_err(|e| e.to_string()));

            match outcome {
                Ok(prediction) => BatchItem {
                    index,
                    predicted_cost: Some(prediction.cost),
                    cohort: Some(prediction.cohort),
                    error: None,
                },
                Err(error) => BatchItem {
                    index,
                    predicted_cost: None,
                    cohort: None,
                    error: Some(error),
                },
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(BatchPredictResponse { results }))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::json;

    use super::*;
    use crate::handlers::{configure, test_support};
    use insurance::models::{Cohort, ErrorResponse};

    fn scenario() -> serde_json::Value {
        json!({
            "Age": 30,
            "Number of Dependants": 2,
            "Income in Lakhs": 10,
            "Genetical Risk": 2,
            "Insurance Plan": "Silver",
            "Employment Status": "Salaried",
            "Gender": "Male",
            "Marital Status": "Married",
            "BMI Category": "Normal",
            "Smoking Status": "No Smoking",
            "Region": "Southeast",
            "Medical History": "No Disease"
        })
    }

    #[actix_web::test]
    async fn test_predict_scenario() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_support::state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(scenario())
            .to_request();
        let resp: PredictResponse = test::call_and_read_body_json(&app, req).await;

        // rest intercept 9000 + 1000 * Silver(2)
        assert_eq!(resp.cohort, Cohort::Rest);
        assert_eq!(resp.predicted_cost, 11_000);
        assert!(resp.risk_factors.is_empty());
        assert!(resp.recommendations.is_empty());
    }

    #[actix_web::test]
    async fn test_predict_young_smoker() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_support::state()))
                .configure(configure),
        )
        .await;

        let mut body = scenario();
        body["Age"] = json!(25);
        body["Insurance Plan"] = json!("Gold");
        body["Smoking Status"] = json!("Occasional");

        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(body)
            .to_request();
        let resp: PredictResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.cohort, Cohort::Young);
        assert_eq!(resp.predicted_cost, 7_000);
        assert_eq!(resp.recommendations.len(), 1);
    }

    #[actix_web::test]
    async fn test_predict_missing_age() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_support::state()))
                .configure(configure),
        )
        .await;

        let mut body = scenario();
        body.as_object_mut().unwrap().remove("Age");

        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(error.error, "missing_field");
        assert_eq!(error.field.as_deref(), Some("Age"));
    }

    #[actix_web::test]
    async fn test_predict_out_of_range() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_support::state()))
                .configure(configure),
        )
        .await;

        let mut body = scenario();
        body["Age"] = json!(12);

        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(error.error, "out_of_range");
        assert_eq!(error.field.as_deref(), Some("Age"));
        assert!(error.message.contains("between 18 and 100"));
    }

    #[actix_web::test]
    async fn test_predict_batch() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_support::state()))
                .configure(configure),
        )
        .await;

        let mut no_age = scenario();
        no_age.as_object_mut().unwrap().remove("Age");

        let req = test::TestRequest::post()
            .uri("/predict/batch")
            .set_json(json!([scenario(), no_age]))
            .to_request();
        let resp: BatchPredictResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.results.len(), 2);
        assert_eq!(resp.results[0].predicted_cost, Some(11_000));
        assert_eq!(resp.results[0].cohort, Some(Cohort::Rest));
        assert!(resp.results[1].predicted_cost.is_none());
        assert!(resp.results[1].error.as_deref().unwrap().contains("Age"));
    }

    #[actix_web::test]
    async fn test_predict_batch_empty() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_support::state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/predict/batch")
            .set_json(json!([]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(error.error, "invalid_batch");
        assert_eq!(error.field, None);
    }
}
