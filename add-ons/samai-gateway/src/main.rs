//! Sam.AI Gateway: HTTP front for the multi-model engine.
//! Loads `.env`, then `EngineConfig` (file + `SAMAI__*` env), and serves on `host:port`.

mod routes;

use samai_core::{EngineConfig, MultiAiEngine};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::load()?;
    let engine = Arc::new(MultiAiEngine::new(&config)?);

    let state = routes::AppState {
        engine,
        app_name: config.app_name.clone(),
    };
    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        target: "samai::gateway",
        addr = %addr,
        mode = ?config.llm_mode,
        "{} listening",
        config.app_name
    );

    axum::serve(listener, app).await?;
    Ok(())
}
