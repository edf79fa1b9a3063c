//! Axum route handlers for the Session API: start, webhook event ingest,
//! user-triggered stop, and status polling.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::generator::generate_feedback;
use crate::session::assistant::{assemble, SessionProfile};
use crate::session::transcript::TranscriptEntry;
use crate::session::{CallStatus, Session, SessionEvent, SessionKind};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub user_id: Uuid,
    pub user_name: String,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    /// Required for `interview` sessions; ignored for `generate`.
    pub interview_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub status: CallStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEventResponse {
    pub session_id: Uuid,
    pub status: CallStatus,
    /// Set when the event finished an interview session and feedback was
    /// generated and persisted.
    pub feedback_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub session_id: Uuid,
    pub status: CallStatus,
    pub speaking: bool,
    pub transcript: Vec<TranscriptEntry>,
    pub latest_message: Option<String>,
    pub last_error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Assembles the voice persona and starts the provider call. Configuration
/// failures (unknown interview, empty question set) abort before any
/// transport call; a transport failure leaves no session registered, the
/// Rust analog of resetting the UI to inactive.
pub async fn handle_start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>, AppError> {
    let (profile, interview_id) = match request.kind {
        SessionKind::Generate => (
            SessionProfile {
                user_name: request.user_name,
                role: "Full Stack Developer".to_string(),
                level: "Mid-level".to_string(),
                techstack: vec![
                    "React".to_string(),
                    "TypeScript".to_string(),
                    "Node.js".to_string(),
                ],
                questions: vec![],
            },
            None,
        ),
        SessionKind::Interview => {
            let interview_id = request.interview_id.ok_or_else(|| {
                AppError::Configuration(
                    "interviewId is required for interview sessions".to_string(),
                )
            })?;

            let interview = state
                .store
                .get_interview(interview_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Interview {interview_id} not found"))
                })?;

            (
                SessionProfile {
                    user_name: request.user_name,
                    role: interview.role,
                    level: interview.level,
                    techstack: interview.techstack,
                    questions: interview.questions,
                },
                Some(interview_id),
            )
        }
    };

    let config = assemble(request.kind, &profile)?;

    let mut session = Session::new(request.user_id, request.kind, interview_id);
    session.begin()?;

    let call = state
        .voice
        .start(&config)
        .await
        .map_err(|e| AppError::Transport(e.to_string()))?;
    session.attach_call(call);

    info!("Session {} connecting for user {}", session.id, session.user_id);

    let response = StartSessionResponse {
        session_id: session.id,
        status: session.status(),
    };
    state.sessions.write().await.insert(session.id, session);

    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/events
///
/// Ingests one provider webhook event. When the event finishes an interview
/// session, the transcript is scored and persisted before responding.
pub async fn handle_session_event(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(event): Json<SessionEvent>,
) -> Result<Json<SessionEventResponse>, AppError> {
    let (status, finished) = {
        let mut sessions = state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

        session.apply(event);

        let status = session.status();
        let finished = if status == CallStatus::Finished {
            sessions.remove(&session_id)
        } else {
            None
        };
        (status, finished)
    };

    let feedback_id = match finished {
        Some(session) => complete_session(&state, session).await?,
        None => None,
    };

    Ok(Json(SessionEventResponse {
        session_id,
        status,
        feedback_id,
    }))
}

/// POST /api/v1/sessions/:id/stop
///
/// User-triggered stop. The transport stop is best-effort: provider errors
/// are logged by the transport and never surface here.
pub async fn handle_stop_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionEventResponse>, AppError> {
    let session = {
        let mut sessions = state.sessions.write().await;
        let mut session = sessions
            .remove(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
        session.finish();
        session
    };

    if let Some(call) = session.call() {
        state.voice.stop(call).await;
    }

    let status = session.status();
    let feedback_id = complete_session(&state, session).await?;

    Ok(Json(SessionEventResponse {
        session_id,
        status,
        feedback_id,
    }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionStatusResponse>, AppError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    Ok(Json(SessionStatusResponse {
        session_id,
        status: session.status(),
        speaking: session.speaking(),
        transcript: session.transcript().to_vec(),
        latest_message: session.latest_line().map(|e| e.content.clone()),
        last_error: session.last_error().map(str::to_string),
    }))
}

/// Runs the end-of-session pipeline on a finished session: interview
/// sessions get their transcript scored and persisted; generate sessions
/// have nothing to score.
async fn complete_session(
    state: &AppState,
    mut session: Session,
) -> Result<Option<Uuid>, AppError> {
    let interview_id = match (session.kind, session.interview_id) {
        (SessionKind::Interview, Some(id)) => id,
        _ => return Ok(None),
    };

    let transcript = session.take_transcript()?;
    if transcript.is_empty() {
        warn!(
            "Session {} finished with an empty transcript, skipping feedback",
            session.id
        );
        return Ok(None);
    }

    let feedback = generate_feedback(state.scorer.as_ref(), &transcript).await?;
    let feedback_id = state
        .store
        .save_feedback(interview_id, session.user_id, feedback)
        .await?;

    info!(
        "Session {} produced feedback {} for interview {}",
        session.id, feedback_id, interview_id
    );

    Ok(Some(feedback_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;

    use crate::feedback::generator::test_support::{valid_draft, FixedScoringModel};
    use crate::models::interview::InterviewRow;
    use crate::session::transcript::Role;
    use crate::session::TranscriptType;
    use crate::store::memory::MemoryStore;
    use crate::store::InterviewStore;
    use crate::testing::{test_state, FakeVoice};

    fn interview(questions: Vec<&str>) -> InterviewRow {
        InterviewRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: "Frontend Developer".to_string(),
            level: "Junior".to_string(),
            techstack: vec!["React".to_string()],
            questions: questions.into_iter().map(|q| q.to_string()).collect(),
            finalized: true,
            created_at: Utc::now(),
        }
    }

    fn start_request(user_id: Uuid, interview_id: Uuid) -> StartSessionRequest {
        StartSessionRequest {
            user_id,
            user_name: "Ada".to_string(),
            kind: SessionKind::Interview,
            interview_id: Some(interview_id),
        }
    }

    fn final_message(content: &str) -> SessionEvent {
        SessionEvent::Message {
            role: Role::User,
            transcript_type: TranscriptType::Final,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_start_interview_session_uses_stored_questions() {
        let store = Arc::new(MemoryStore::new());
        let row = interview(vec!["What is a closure?"]);
        store.insert_interview(row.clone());
        let voice = Arc::new(FakeVoice::new());
        let state = test_state(
            store,
            Arc::new(FixedScoringModel(valid_draft())),
            voice.clone(),
        );

        let Json(response) = handle_start_session(
            State(state.clone()),
            Json(start_request(Uuid::new_v4(), row.id)),
        )
        .await
        .unwrap();

        assert_eq!(response.status, CallStatus::Connecting);
        assert_eq!(voice.start_count(), 1);
        let started = voice.started.lock().unwrap();
        assert!(started[0].model.messages[0]
            .content
            .contains("What is a closure?"));
        drop(started);
        assert!(state.sessions.read().await.contains_key(&response.session_id));
    }

    #[tokio::test]
    async fn test_start_with_unknown_interview_is_not_found() {
        let voice = Arc::new(FakeVoice::new());
        let state = test_state(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedScoringModel(valid_draft())),
            voice.clone(),
        );

        let result = handle_start_session(
            State(state),
            Json(start_request(Uuid::new_v4(), Uuid::new_v4())),
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(voice.start_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_question_set_fails_without_transport_start() {
        let store = Arc::new(MemoryStore::new());
        let row = interview(vec![]);
        store.insert_interview(row.clone());
        let voice = Arc::new(FakeVoice::new());
        let state = test_state(
            store,
            Arc::new(FixedScoringModel(valid_draft())),
            voice.clone(),
        );

        let result = handle_start_session(
            State(state.clone()),
            Json(start_request(Uuid::new_v4(), row.id)),
        )
        .await;

        assert!(matches!(result, Err(AppError::Configuration(_))));
        assert_eq!(voice.start_count(), 0);
        assert!(state.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_registers_no_session() {
        let store = Arc::new(MemoryStore::new());
        let row = interview(vec!["Q"]);
        store.insert_interview(row.clone());
        let voice = Arc::new(FakeVoice::new());
        voice
            .fail_start
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let state = test_state(
            store,
            Arc::new(FixedScoringModel(valid_draft())),
            voice.clone(),
        );

        let result = handle_start_session(
            State(state.clone()),
            Json(start_request(Uuid::new_v4(), row.id)),
        )
        .await;

        assert!(matches!(result, Err(AppError::Transport(_))));
        assert!(state.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_call_end_scores_transcript_and_persists_feedback() {
        let store = Arc::new(MemoryStore::new());
        let row = interview(vec!["Q"]);
        store.insert_interview(row.clone());
        let user_id = Uuid::new_v4();
        let state = test_state(
            store.clone(),
            Arc::new(FixedScoringModel(valid_draft())),
            Arc::new(FakeVoice::new()),
        );

        let Json(start) =
            handle_start_session(State(state.clone()), Json(start_request(user_id, row.id)))
                .await
                .unwrap();

        for event in [
            SessionEvent::CallStart,
            final_message("I have 3 years of React experience"),
            SessionEvent::Message {
                role: Role::Assistant,
                transcript_type: TranscriptType::Partial,
                content: "Th".to_string(),
            },
            SessionEvent::Message {
                role: Role::Assistant,
                transcript_type: TranscriptType::Final,
                content: "Thanks".to_string(),
            },
        ] {
            handle_session_event(State(state.clone()), Path(start.session_id), Json(event))
                .await
                .unwrap();
        }

        let Json(end) = handle_session_event(
            State(state.clone()),
            Path(start.session_id),
            Json(SessionEvent::CallEnd),
        )
        .await
        .unwrap();

        assert_eq!(end.status, CallStatus::Finished);
        let feedback_id = end.feedback_id.expect("feedback should be generated");

        let stored = store.get_feedback(row.id, user_id).await.unwrap().unwrap();
        assert_eq!(stored.id, feedback_id);
        assert_eq!(stored.total_score, 72);

        // Completed sessions leave the registry.
        assert!(state.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_stop_ends_call_and_generates_feedback() {
        let store = Arc::new(MemoryStore::new());
        let row = interview(vec!["Q"]);
        store.insert_interview(row.clone());
        let voice = Arc::new(FakeVoice::new());
        let state = test_state(
            store.clone(),
            Arc::new(FixedScoringModel(valid_draft())),
            voice.clone(),
        );

        let Json(start) = handle_start_session(
            State(state.clone()),
            Json(start_request(Uuid::new_v4(), row.id)),
        )
        .await
        .unwrap();

        handle_session_event(
            State(state.clone()),
            Path(start.session_id),
            Json(SessionEvent::CallStart),
        )
        .await
        .unwrap();
        handle_session_event(
            State(state.clone()),
            Path(start.session_id),
            Json(final_message("answer")),
        )
        .await
        .unwrap();

        let Json(stopped) = handle_stop_session(State(state.clone()), Path(start.session_id))
            .await
            .unwrap();

        assert_eq!(stopped.status, CallStatus::Finished);
        assert!(stopped.feedback_id.is_some());
        assert_eq!(voice.stopped.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_session_finishes_without_feedback() {
        let state = test_state(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedScoringModel(valid_draft())),
            Arc::new(FakeVoice::new()),
        );

        let Json(start) = handle_start_session(
            State(state.clone()),
            Json(StartSessionRequest {
                user_id: Uuid::new_v4(),
                user_name: "Ada".to_string(),
                kind: SessionKind::Generate,
                interview_id: None,
            }),
        )
        .await
        .unwrap();

        let Json(end) = handle_session_event(
            State(state.clone()),
            Path(start.session_id),
            Json(SessionEvent::CallEnd),
        )
        .await
        .unwrap();

        assert_eq!(end.status, CallStatus::Finished);
        assert!(end.feedback_id.is_none());
    }

    #[tokio::test]
    async fn test_status_reports_transcript_in_arrival_order() {
        let store = Arc::new(MemoryStore::new());
        let row = interview(vec!["Q"]);
        store.insert_interview(row.clone());
        let state = test_state(
            store,
            Arc::new(FixedScoringModel(valid_draft())),
            Arc::new(FakeVoice::new()),
        );

        let Json(start) = handle_start_session(
            State(state.clone()),
            Json(start_request(Uuid::new_v4(), row.id)),
        )
        .await
        .unwrap();

        for event in [
            SessionEvent::CallStart,
            final_message("A"),
            final_message("B"),
            final_message("C"),
        ] {
            handle_session_event(State(state.clone()), Path(start.session_id), Json(event))
                .await
                .unwrap();
        }

        let Json(status) = handle_get_session(State(state), Path(start.session_id))
            .await
            .unwrap();

        let contents: Vec<_> = status.transcript.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["A", "B", "C"]);
        assert_eq!(status.latest_message.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn test_event_for_unknown_session_is_not_found() {
        let state = test_state(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedScoringModel(valid_draft())),
            Arc::new(FakeVoice::new()),
        );

        let result = handle_session_event(
            State(state),
            Path(Uuid::new_v4()),
            Json(SessionEvent::CallStart),
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
