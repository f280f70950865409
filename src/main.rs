use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use insurance::config::Config;
use insurance::predictor::InsurancePredictor;

mod handlers;

/// Application state shared across handlers
pub struct AppState {
    pub predictor: InsurancePredictor,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    // Artifacts are required; there is no fallback model
    let predictor = InsurancePredictor::load(&config.artifacts).with_context(|| {
        format!(
            "Failed to load model artifacts from {:?}",
            config.artifacts.model_dir
        )
    })?;

    let app_state = Arc::new(AppState { predictor });
    let addr = config.bind_addr();

    info!("Starting insurance cost API at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind(&addr)?
    .run()
    .await?;

    Ok(())
}
