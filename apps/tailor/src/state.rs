use std::sync::Arc;

use crate::config::Config;
use crate::flash::FlashSigner;
use crate::tailoring::pipeline::Tailor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Request orchestrator. Owns the page fetcher and the optional AI client.
    pub tailor: Arc<Tailor>,
    pub flash: FlashSigner,
}
