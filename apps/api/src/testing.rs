//! Shared fixtures for handler tests: a fake voice transport and an
//! `AppState` wired entirely from fakes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Config;
use crate::feedback::generator::ScoringModel;
use crate::llm_client::LlmClient;
use crate::session::new_registry;
use crate::state::AppState;
use crate::store::InterviewStore;
use crate::voice::{AssistantConfig, CallHandle, TransportError, VoiceTransport};

/// Records start/stop calls instead of talking to a provider.
#[derive(Default)]
pub struct FakeVoice {
    pub started: Mutex<Vec<AssistantConfig>>,
    pub stopped: Mutex<Vec<String>>,
    pub fail_start: AtomicBool,
}

impl FakeVoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_count(&self) -> usize {
        self.started.lock().unwrap().len()
    }
}

#[async_trait]
impl VoiceTransport for FakeVoice {
    async fn start(&self, config: &AssistantConfig) -> Result<CallHandle, TransportError> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(TransportError::Provider {
                status: 503,
                message: "simulated provider outage".to_string(),
            });
        }
        let mut started = self.started.lock().unwrap();
        started.push(config.clone());
        Ok(CallHandle {
            call_id: format!("call-{}", started.len()),
        })
    }

    async fn stop(&self, call: &CallHandle) {
        self.stopped.lock().unwrap().push(call.call_id.clone());
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        anthropic_api_key: "test-key".to_string(),
        voice_api_key: "test-key".to_string(),
        voice_base_url: "http://localhost:0".to_string(),
        use_fallback_data: false,
        port: 0,
        rust_log: "info".to_string(),
    }
}

pub fn test_state(
    store: Arc<dyn InterviewStore>,
    scorer: Arc<dyn ScoringModel>,
    voice: Arc<dyn VoiceTransport>,
) -> AppState {
    AppState {
        store,
        llm: LlmClient::new("test-key".to_string()),
        scorer,
        voice,
        sessions: new_registry(),
        config: test_config(),
    }
}
