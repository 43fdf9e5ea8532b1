use std::sync::Arc;

use crate::config::Config;
use crate::services::generation_service::GenerationService;

// --- Shared application state ---
//
// Service handles are constructed once at startup and injected here; tests
// swap in mock handles. Handlers only see the state, never ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generation: Arc<GenerationService>,
}

impl AppState {
    pub fn new(config: Arc<Config>, generation: Arc<GenerationService>) -> Self {
        Self { config, generation }
    }
}
