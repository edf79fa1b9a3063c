use std::sync::Arc;

use crate::config::Config;
use crate::feedback::generator::ScoringModel;
use crate::llm_client::LlmClient;
use crate::session::SessionRegistry;
use crate::store::InterviewStore;
use crate::voice::VoiceTransport;

/// Shared application state injected into all route handlers via Axum
/// extractors. Service handles are explicit trait objects so tests can
/// substitute fakes — no global clients anywhere.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InterviewStore>,
    /// Question generation goes through the shared LLM client directly.
    pub llm: LlmClient,
    /// Feedback scoring backend. Production: `LlmScoringModel`.
    pub scorer: Arc<dyn ScoringModel>,
    /// Voice provider transport. Production: `HostedVoiceClient`.
    pub voice: Arc<dyn VoiceTransport>,
    /// Live sessions (session id → session).
    pub sessions: SessionRegistry,
    pub config: Config,
}
