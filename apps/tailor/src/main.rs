mod config;
mod errors;
mod extract;
mod flash;
mod llm_client;
mod render;
mod routes;
mod state;
mod tailoring;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extract::web::HttpJobPageFetcher;
use crate::flash::FlashSigner;
use crate::llm_client::{GeminiClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::tailoring::pipeline::Tailor;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing session secret)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Tailor v{}", env!("CARGO_PKG_VERSION"));

    std::fs::create_dir_all(&config.upload_dir).with_context(|| {
        format!(
            "Could not create upload directory {}",
            config.upload_dir.display()
        )
    })?;
    info!("Upload directory '{}' ensured", config.upload_dir.display());

    // AI client is optional: without a key every tailoring request stops at the AI step
    let generator: Option<Arc<dyn TextGenerator>> = match &config.google_api_key {
        Some(key) => {
            let client = GeminiClient::new(
                key.clone(),
                config.gemini_model.clone(),
                Duration::from_secs(config.ai_timeout_secs),
            )?;
            info!("Gemini client initialized (model: {})", client.model());
            Some(Arc::new(client))
        }
        None => {
            error!("GOOGLE_API_KEY not found; AI tailoring is disabled");
            None
        }
    };

    let job_pages = Arc::new(HttpJobPageFetcher::new()?);

    let flash = FlashSigner::new(&config.session_secret)
        .map_err(|_| anyhow!("SESSION_SECRET cannot key the notice signer"))?;

    let state = AppState {
        tailor: Arc::new(Tailor::new(
            config.upload_dir.clone(),
            job_pages,
            generator,
        )),
        flash,
        config: Arc::new(config.clone()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
