//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interviews::generator::{generate_questions, QuestionRequest};
use crate::interviews::sample::sample_interviews;
use crate::models::interview::{InterviewRow, NewInterview};
use crate::state::AppState;
use crate::store::empty_on_error;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInterviewRequest {
    pub user_id: Uuid,
    pub role: String,
    pub level: String,
    pub techstack: Vec<String>,
    pub focus: String,
    pub amount: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInterviewResponse {
    pub interview_id: Uuid,
    pub questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestQuery {
    pub user_id: Uuid,
    pub limit: Option<i64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews/generate
///
/// Generates a question set via the hosted model and stores a finalized
/// interview built from it.
pub async fn handle_generate_interview(
    State(state): State<AppState>,
    Json(request): Json<GenerateInterviewRequest>,
) -> Result<Json<GenerateInterviewResponse>, AppError> {
    if request.role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }

    let questions = generate_questions(
        &state.llm,
        &QuestionRequest {
            role: request.role.clone(),
            level: request.level.clone(),
            techstack: request.techstack.clone(),
            focus: request.focus,
            amount: request.amount,
        },
    )
    .await?;

    let interview = state
        .store
        .create_interview(NewInterview {
            user_id: request.user_id,
            role: request.role,
            level: request.level,
            techstack: request.techstack,
            questions: questions.clone(),
            finalized: true,
        })
        .await?;

    Ok(Json(GenerateInterviewResponse {
        interview_id: interview.id,
        questions,
    }))
}

/// GET /api/v1/interviews?userId=
///
/// Best-effort listing of the user's own interviews, newest first. With
/// `use_fallback_data` set, an empty result is replaced by the sample set —
/// an explicit flag, so "no data" keeps meaning no data by default.
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<InterviewRow>> {
    let rows = empty_on_error(
        state.store.list_interviews(query.user_id).await,
        "list_interviews",
    );

    if rows.is_empty() && state.config.use_fallback_data {
        return Json(sample_interviews());
    }
    Json(rows)
}

/// GET /api/v1/interviews/latest?userId=&limit=
///
/// Finalized interviews from other users — the "take an interview" list.
pub async fn handle_latest_interviews(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Json<Vec<InterviewRow>> {
    let limit = query.limit.unwrap_or(20);
    let rows = empty_on_error(
        state.store.list_other_finalized(query.user_id, limit).await,
        "list_other_finalized",
    );

    if rows.is_empty() && state.config.use_fallback_data {
        return Json(sample_interviews());
    }
    Json(rows)
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<InterviewRow>, AppError> {
    let interview = state
        .store
        .get_interview(interview_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))?;

    Ok(Json(interview))
}
