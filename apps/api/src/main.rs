mod config;
mod errors;
mod llm_client;
mod render;
mod resume;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::PdfFont;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; this also pulls RUST_LOG in from .env
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=info,tower_http=info", env!("CARGO_CRATE_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeCraft v{}", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {e:#}");
            return Err(e);
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm.clone())?;
    info!(
        "LLM client initialized (model: {}, temperature: {}, retries: {})",
        llm.model(),
        config.llm.temperature,
        config.llm.max_retries
    );

    // Build app state
    let mut state = AppState::new(Arc::new(llm));
    if let Some(path) = &config.pdf_font_path {
        let font = PdfFont::load(path)
            .with_context(|| format!("PDF_FONT_PATH {} is not a usable font", path.display()))?;
        info!("PDF font loaded from {}", path.display());
        state = state.with_pdf_font(font);
    }

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
