use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};

use horselab_backend::config::Config;
use horselab_backend::llm::gemini_image_client::build_gemini_image_client;
use horselab_backend::llm::gemini_text_client::build_gemini_text_client;
use horselab_backend::logging::init_subscriber;
use horselab_backend::routes::build_router;
use horselab_backend::services::generation_service::GenerationService;
use horselab_backend::services::mint::{MintClient, build_crossmint_client};
use horselab_backend::state::AppState;
use horselab_backend::storage::gcs::build_gcs_blob_store;
use horselab_backend::telemetry::TracingTelemetrySink;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_subscriber();

    tracing::info!("Starting horselab backend server...");

    let config = Arc::new(Config::load().context("Failed to load configuration")?);
    // Missing required values are a fatal startup condition.
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    tracing::info!(config = ?config, "Configuration loaded");

    let ai_client = Arc::new(build_gemini_text_client(config.clone())?);
    let image_client = Arc::new(build_gemini_image_client(config.clone())?);
    let blob_store = Arc::new(build_gcs_blob_store(config.clone())?);

    let mint_client: Option<Arc<dyn MintClient>> = if config.mint_settings().is_some() {
        tracing::info!("Minting enabled");
        Some(Arc::new(build_crossmint_client(config.clone())?))
    } else {
        tracing::info!("Minting disabled (mint block not configured)");
        None
    };

    let generation = Arc::new(GenerationService::new(
        config.clone(),
        ai_client,
        image_client,
        blob_store,
        mint_client,
        Arc::new(TracingTelemetrySink),
    ));

    let app = build_router(AppState::new(config.clone(), generation));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port)
        .parse()
        .context("Invalid address format")?;

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
