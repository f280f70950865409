use actix_web::{HttpResponse, Responder};

use insurance::core::risk::factor_impacts;
use insurance::models::{CategoricalField, FieldOptions};

/// Categorical options offered by the form
pub async fn list_options() -> impl Responder {
    let options: Vec<FieldOptions> = CategoricalField::ALL
        .iter()
        .map(|field| FieldOptions {
            field: field.label().to_string(),
            options: field.options().iter().map(|o| o.to_string()).collect(),
        })
        .collect();

    HttpResponse::Ok().json(options)
}

/// Relative impact of each factor on cost
pub async fn risk_analysis() -> impl Responder {
    HttpResponse::Ok().json(factor_impacts())
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use insurance::core::risk::FactorImpact;

    use super::*;

    #[actix_web::test]
    async fn test_list_options() {
        let app =
            test::init_service(App::new().route("/options", web::get().to(list_options))).await;

        let req = test::TestRequest::get().uri("/options").to_request();
        let resp: Vec<FieldOptions> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.len(), 8);
        let region = resp.iter().find(|o| o.field == "Region").unwrap();
        assert_eq!(region.options.len(), 4);
        assert!(region.options.contains(&"Northeast".to_string()));
    }

    #[actix_web::test]
    async fn test_risk_analysis() {
        let app = test::init_service(
            App::new().route("/risk-analysis", web::get().to(risk_analysis)),
        )
        .await;

        let req = test::TestRequest::get().uri("/risk-analysis").to_request();
        let resp: Vec<FactorImpact> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.len(), 5);
        assert_eq!(resp[0].factor, "Age");
    }
}
