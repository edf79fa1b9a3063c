//! Session Transport Adapter — starts and stops calls with the hosted
//! conversational-AI provider over its REST API. Lifecycle and transcript
//! events arrive back as webhooks and are dispatched into the session FSM
//! (see `session`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider rejected call (status {status}): {message}")]
    Provider { status: u16, message: String },
}

/// Opaque handle to a provider call. A handle is valid for exactly one
/// session; a new session requires a new start.
#[derive(Debug, Clone)]
pub struct CallHandle {
    pub call_id: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Provider wire format (camelCase on the wire)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    pub name: String,
    pub transcriber: TranscriberConfig,
    pub voice: VoiceConfig,
    pub first_message: String,
    pub model: ModelConfig,
    pub client_messages: Vec<String>,
    pub server_messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriberConfig {
    pub provider: String,
    pub model: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub provider: String,
    pub voice_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
    pub speed: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
    pub messages: Vec<ModelMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMessage {
    pub role: String,
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Transport trait + hosted implementation
// ────────────────────────────────────────────────────────────────────────────

/// The voice transport. Carried in `AppState` as `Arc<dyn VoiceTransport>`;
/// tests substitute a fake that records calls instead of making them.
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    async fn start(&self, config: &AssistantConfig) -> Result<CallHandle, TransportError>;

    /// Ends the call. Safe to invoke for a session that never reached active
    /// state; provider errors are logged, never propagated.
    async fn stop(&self, call: &CallHandle);
}

#[derive(Debug, Deserialize)]
struct CreateCallResponse {
    id: String,
}

/// Production transport over the hosted provider's REST API.
pub struct HostedVoiceClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HostedVoiceClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl VoiceTransport for HostedVoiceClient {
    async fn start(&self, config: &AssistantConfig) -> Result<CallHandle, TransportError> {
        let response = self
            .client
            .post(format!("{}/call", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({ "assistant": config }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let created: CreateCallResponse = response.json().await?;
        debug!("Voice call started: {}", created.id);

        Ok(CallHandle {
            call_id: created.id,
        })
    }

    async fn stop(&self, call: &CallHandle) {
        let result = self
            .client
            .delete(format!("{}/call/{}", self.base_url, call.call_id))
            .bearer_auth(&self.api_key)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!("Voice call stopped: {}", call.call_id);
            }
            Ok(response) => {
                warn!(
                    "Provider returned {} while stopping call {}",
                    response.status(),
                    call.call_id
                );
            }
            Err(e) => {
                warn!("Failed to stop call {}: {e}", call.call_id);
            }
        }
    }
}
