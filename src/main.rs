mod app;
mod db;
mod errors;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::logging::LoggingConfig;
use crate::services::generation_guard::GenerationGuard;
use crate::services::llm_service::{DisabledProvider, LlmConfig, LlmProvider, OpenAiProvider};
use crate::state::{AppState, EngineSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())?;

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let llm_config = LlmConfig::from_env();
    let llm: Arc<dyn LlmProvider> = match OpenAiProvider::new(llm_config) {
        Ok(provider) => {
            tracing::info!("AI narrative generation enabled");
            Arc::new(provider)
        }
        Err(_) => {
            tracing::warn!(
                "No AI service API key configured; narrative generation endpoints will return 503"
            );
            Arc::new(DisabledProvider)
        }
    };

    let state = AppState {
        pool,
        llm,
        generation_guard: GenerationGuard::new(),
        settings: EngineSettings::from_env(),
    };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Equity insight backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
