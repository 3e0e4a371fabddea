use std::sync::Arc;

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::generation::history::HistoryLog;
use crate::llm_client::LlmProvider;
use crate::profiles::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileStore,
    pub credentials: Arc<CredentialStore>,
    pub history: Arc<HistoryLog>,
    /// Pluggable completion provider. Default: `LlmClient` against the Anthropic API.
    pub llm: Arc<dyn LlmProvider>,
    pub config: Config,
}
