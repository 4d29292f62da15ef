mod config;
mod errors;
mod extract;
mod models;
mod ollama;
mod providers;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::ollama::OllamaClient;
use crate::providers::ProviderRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Parser API v{}", env!("CARGO_PKG_VERSION"));

    // One HTTP client shared by every outbound call
    let http = reqwest::Client::new();

    let providers = ProviderRegistry::from_config(&config, http.clone());
    if providers.is_empty() {
        info!("No extraction provider configured; /parse-cv-external is disabled");
    } else {
        info!("Configured extraction providers: {}", providers.names().join(", "));
    }

    let ollama = OllamaClient::new(
        http,
        config.ollama_base_url.clone(),
        config.ollama_model.clone(),
    );
    info!("Ollama client initialized (model: {})", ollama.model());

    // Build app state
    let state = AppState { providers, ollama };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
