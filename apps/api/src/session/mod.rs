// Live interview sessions: a typed event enumeration dispatched into an
// explicit state machine, plus the prompt assembly that configures the
// voice agent. All transcript collection happens here; feedback generation
// only ever sees a finished session's transcript.

pub mod assistant;
pub mod handlers;
pub mod transcript;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error};
use uuid::Uuid;

use crate::voice::CallHandle;
use transcript::{Role, TranscriptAccumulator, TranscriptEntry};

/// Call lifecycle. One-way: a finished session never becomes active again;
/// a new session starts over at `Inactive` with a fresh handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    Inactive,
    Connecting,
    Active,
    Finished,
}

/// Whether the session generates a new interview or runs an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Generate,
    Interview,
}

/// Whether a transcript fragment is still being revised by the transcriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptType {
    Partial,
    Final,
}

/// Provider webhook events, as delivered to the event endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SessionEvent {
    CallStart,
    CallEnd,
    SpeechStart,
    SpeechEnd,
    #[serde(rename_all = "camelCase")]
    Message {
        role: Role,
        transcript_type: TranscriptType,
        content: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("session already started (status {0:?})")]
    AlreadyStarted(CallStatus),

    #[error("session has not finished (status {0:?})")]
    NotFinished(CallStatus),
}

impl From<SessionError> for crate::errors::AppError {
    fn from(e: SessionError) -> Self {
        crate::errors::AppError::Configuration(e.to_string())
    }
}

/// One live voice-interview interaction. Owned by the registry; every
/// mutation goes through `begin`/`apply`/`finish`.
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: SessionKind,
    /// Present for `Interview` sessions; `Generate` sessions have no
    /// interview yet.
    pub interview_id: Option<Uuid>,
    status: CallStatus,
    speaking: bool,
    last_error: Option<String>,
    call: Option<CallHandle>,
    transcript: TranscriptAccumulator,
}

impl Session {
    pub fn new(user_id: Uuid, kind: SessionKind, interview_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            interview_id,
            status: CallStatus::Inactive,
            speaking: false,
            last_error: None,
            call: None,
            transcript: TranscriptAccumulator::new(),
        }
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn speaking(&self) -> bool {
        self.speaking
    }

    pub fn call(&self) -> Option<&CallHandle> {
        self.call.as_ref()
    }

    pub fn latest_line(&self) -> Option<&TranscriptEntry> {
        self.transcript.latest()
    }

    /// The transcript collected so far, in arrival order.
    pub fn transcript(&self) -> &[TranscriptEntry] {
        self.transcript.entries()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Marks the session as connecting. Guarded: only an `Inactive` session
    /// may start; the transport call happens after this transition so a
    /// start failure leaves nothing registered.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        if self.status != CallStatus::Inactive {
            return Err(SessionError::AlreadyStarted(self.status));
        }
        self.status = CallStatus::Connecting;
        Ok(())
    }

    /// Records the provider call backing this session.
    pub fn attach_call(&mut self, call: CallHandle) {
        self.call = Some(call);
    }

    /// The single event dispatcher. Events arriving after the session has
    /// finished are dropped; interim transcript fragments are discarded.
    pub fn apply(&mut self, event: SessionEvent) {
        if self.status == CallStatus::Finished {
            debug!("Session {} is finished, dropping event", self.id);
            return;
        }

        match event {
            SessionEvent::CallStart => self.status = CallStatus::Active,
            SessionEvent::CallEnd => self.status = CallStatus::Finished,
            SessionEvent::SpeechStart => self.speaking = true,
            SessionEvent::SpeechEnd => self.speaking = false,
            SessionEvent::Message {
                role,
                transcript_type,
                content,
            } => {
                if transcript_type == TranscriptType::Final {
                    self.transcript.push(TranscriptEntry { role, content });
                }
            }
            SessionEvent::Error { message } => {
                error!("Session {} provider error: {message}", self.id);
                self.last_error = Some(message);
            }
        }
    }

    /// Explicit user-triggered stop. Safe from any state.
    pub fn finish(&mut self) {
        self.status = CallStatus::Finished;
        self.speaking = false;
    }

    /// Hands the transcript to the caller. Only a finished session's
    /// transcript may be read for feedback generation.
    pub fn take_transcript(&mut self) -> Result<Vec<TranscriptEntry>, SessionError> {
        if self.status != CallStatus::Finished {
            return Err(SessionError::NotFinished(self.status));
        }
        Ok(std::mem::take(&mut self.transcript).into_entries())
    }
}

/// Active sessions (session id → session), shared with the HTTP handlers.
pub type SessionRegistry = Arc<RwLock<HashMap<Uuid, Session>>>;

pub fn new_registry() -> SessionRegistry {
    Arc::new(RwLock::new(HashMap::new()))
}
