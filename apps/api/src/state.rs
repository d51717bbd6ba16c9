use std::sync::Arc;

use crate::config::Config;
use crate::tone_client::ToneAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable tone collaborator. `None` when TONE_ANALYZER_URL is unset.
    pub tone_analyzer: Option<Arc<dyn ToneAnalyzer>>,
}
