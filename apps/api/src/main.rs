mod analysis;
mod config;
mod errors;
mod extraction;
mod resume;
mod routes;
mod scoring;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::lexicon::Lexicon;
use crate::analysis::pipeline::{LanguagePipeline, RuleBasedPipeline};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Lexicon and language pipeline are loaded once and shared read-only
    let lexicon = Arc::new(load_lexicon(&config)?);
    info!(
        "Lexicon loaded: {} section headers, {} skills",
        lexicon.section_headers().len(),
        lexicon.skill_count()
    );

    let pipeline: Arc<dyn LanguagePipeline> = Arc::new(RuleBasedPipeline::new());
    info!("Language pipeline initialized ({})", pipeline.name());

    let state = AppState::new(config.clone(), lexicon, pipeline);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!(
        "Listening on {addr} (max upload {} bytes)",
        config.max_upload_bytes
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_lexicon(config: &Config) -> Result<Lexicon> {
    match &config.lexicon_path {
        Some(path) => Lexicon::from_json_file(path)
            .with_context(|| format!("Failed to load lexicon from {}", path.display())),
        None => Ok(Lexicon::builtin()),
    }
}
