mod analysis;
mod config;
mod errors;
mod models;
mod routes;
mod state;
mod tone_client;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tone_client::{HttpToneAnalyzer, ToneAnalyzer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the optional tone collaborator
    let tone_analyzer = build_tone_analyzer(&config)?;

    let weights = &config.polish_weights;
    info!(
        "Polish weights: consistency={} tone={} match={}, collaborator timeout {:?}",
        weights.consistency, weights.tone, weights.job_match, config.analysis_timeout
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        tone_analyzer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_tone_analyzer(config: &Config) -> Result<Option<Arc<dyn ToneAnalyzer>>> {
    let Some(url) = config.tone_analyzer_url.as_deref() else {
        warn!("TONE_ANALYZER_URL not set; polish reports will omit tone");
        return Ok(None);
    };

    let analyzer = HttpToneAnalyzer::new(url, config.tone_analyzer_api_key.clone())?;
    info!("Tone analyzer client initialized ({url})");
    Ok(Some(Arc::new(analyzer)))
}
