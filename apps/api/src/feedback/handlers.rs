//! Axum route handlers for the Feedback API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::generator::generate_feedback;
use crate::models::feedback::{CategoryScore, FeedbackRow};
use crate::session::transcript::TranscriptEntry;
use crate::state::AppState;
use crate::store::{absent_on_error, empty_on_error};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFeedbackRequest {
    pub interview_id: Uuid,
    pub user_id: Uuid,
    pub transcript: Vec<TranscriptEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFeedbackResponse {
    pub feedback_id: Uuid,
    pub total_score: u8,
    pub category_scores: Vec<CategoryScore>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Uuid,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/feedback/generate
///
/// Scores a completed transcript and persists the result. A schema
/// violation from the scoring model aborts the request — the store is
/// never written partially.
pub async fn handle_generate_feedback(
    State(state): State<AppState>,
    Json(request): Json<GenerateFeedbackRequest>,
) -> Result<Json<GenerateFeedbackResponse>, AppError> {
    if request.transcript.is_empty() {
        return Err(AppError::Validation("transcript cannot be empty".to_string()));
    }

    let feedback = generate_feedback(state.scorer.as_ref(), &request.transcript).await?;

    let feedback_id = state
        .store
        .save_feedback(request.interview_id, request.user_id, feedback.clone())
        .await?;

    Ok(Json(GenerateFeedbackResponse {
        feedback_id,
        total_score: feedback.total_score,
        category_scores: feedback.category_scores,
        strengths: feedback.strengths,
        areas_for_improvement: feedback.areas_for_improvement,
        final_assessment: feedback.final_assessment,
        created_at: feedback.created_at,
    }))
}

/// GET /api/v1/feedback/:interview_id?userId=
///
/// A miss is the "take the interview first" path on the client, not an
/// error page — hence a plain 404 with that message. The lookup is lenient:
/// a store failure degrades to absent and lands on the same 404.
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<Json<FeedbackRow>, AppError> {
    let feedback = absent_on_error(
        state.store.get_feedback(interview_id, query.user_id).await,
        "get_feedback",
    )
    .ok_or_else(|| {
        AppError::NotFound(
            "No feedback found for this interview. Take the interview first.".to_string(),
        )
    })?;

    Ok(Json(feedback))
}

/// GET /api/v1/feedback?userId=
///
/// Best-effort listing: a store failure degrades to an empty list.
pub async fn handle_list_feedback(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<Vec<FeedbackRow>> {
    let rows = empty_on_error(
        state.store.list_feedback(query.user_id).await,
        "list_feedback",
    );
    Json(rows)
}
