mod config;
mod db;
mod errors;
mod feedback;
mod interviews;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;
mod store;
#[cfg(test)]
mod testing;
mod voice;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::feedback::generator::LlmScoringModel;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::new_registry;
use crate::state::AppState;
use crate::store::pg::PgStore;
use crate::voice::HostedVoiceClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(pool));

    // Initialize LLM client and the scoring backend built on it
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    let scorer = Arc::new(LlmScoringModel(llm.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize voice transport
    let voice = Arc::new(HostedVoiceClient::new(
        config.voice_base_url.clone(),
        config.voice_api_key.clone(),
    ));
    info!("Voice transport initialized ({})", config.voice_base_url);

    // Build app state
    let state = AppState {
        store,
        llm,
        scorer,
        voice,
        sessions: new_registry(),
        config: config.clone(),
    };

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
