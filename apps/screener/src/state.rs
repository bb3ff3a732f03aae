use std::sync::Arc;

use crate::config::Config;
use crate::screening::MatchPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Collaborators are constructed once at startup and injected here.
    pub pipeline: Arc<MatchPipeline>,
}
