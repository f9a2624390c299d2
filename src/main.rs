//! Moodchat relay server
//!
//! Serves the mood and chat endpoints in front of the generation provider.

use moodchat::api::{create_router, AppState};
use moodchat::config::{load_dotenv, ServerConfig};
use moodchat::llm::build_service;
use moodchat::relay::{ConversationSession, PromptRelay};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = load_dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodchat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    match dotenv {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "Loaded .env"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to parse .env"),
    }

    // Configuration
    let config = ServerConfig::from_env();

    let Some(llm) = build_service(&config.llm) else {
        tracing::error!("No generation provider configured. Set GEMINI_API_KEY or LLM_GATEWAY.");
        return Err("no generation provider configured".into());
    };
    tracing::info!(
        model = %llm.model_id(),
        timeout_secs = config.llm.timeout.as_secs(),
        "Generation provider initialized"
    );

    // One active conversation per relay process
    let relay = PromptRelay::new(llm, Arc::new(ConversationSession::new()));
    let state = AppState::new(relay);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("Moodchat relay listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
