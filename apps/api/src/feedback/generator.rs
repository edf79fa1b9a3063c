//! Feedback Generator — renders a completed transcript, submits it to the
//! hosted scoring model, validates the structured reply, and stamps the
//! resulting feedback value. Persistence is the caller's job.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::feedback::prompts::{FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM};
use crate::feedback::validation::validate_draft;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::feedback::{CategoryScore, Feedback};
use crate::session::transcript::TranscriptEntry;

/// One scored category as returned by the model, before validation.
/// Scores stay wide here so an out-of-range value is reported as a schema
/// violation rather than a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftCategoryScore {
    pub name: String,
    pub score: i64,
    pub comment: String,
}

/// Raw structured output of the scoring model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDraft {
    pub total_score: i64,
    pub category_scores: Vec<DraftCategoryScore>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
}

/// The scoring model. Carried in `AppState` as `Arc<dyn ScoringModel>`;
/// tests substitute a fake returning a fixed draft.
#[async_trait]
pub trait ScoringModel: Send + Sync {
    async fn score_transcript(&self, prompt: &str, system: &str)
        -> Result<FeedbackDraft, AppError>;
}

/// Production scoring model backed by the shared LLM client.
pub struct LlmScoringModel(pub LlmClient);

#[async_trait]
impl ScoringModel for LlmScoringModel {
    async fn score_transcript(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<FeedbackDraft, AppError> {
        self.0
            .call_json::<FeedbackDraft>(prompt, system)
            .await
            .map_err(|e| match e {
                // A reply that doesn't parse into the draft shape is
                // malformed structured output, not an infrastructure fault.
                LlmError::Parse(e) => AppError::SchemaViolation(e.to_string()),
                other => AppError::Llm(format!("feedback scoring failed: {other}")),
            })
    }
}

/// Renders a transcript into the flat line-oriented block the evaluation
/// prompt expects: one `- role: content` line per entry, in order.
pub fn format_transcript(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("- {}: {}\n", entry.role, entry.content))
        .collect()
}

/// Scores a completed transcript. One outbound model call, no retry at this
/// level; a draft that fails validation aborts with a schema violation and
/// nothing is persisted.
pub async fn generate_feedback(
    model: &dyn ScoringModel,
    transcript: &[TranscriptEntry],
) -> Result<Feedback, AppError> {
    let formatted = format_transcript(transcript);
    let prompt = FEEDBACK_PROMPT_TEMPLATE.replace("{transcript}", &formatted);

    let draft = model.score_transcript(&prompt, FEEDBACK_SYSTEM).await?;

    validate_draft(&draft).map_err(|e| AppError::SchemaViolation(e.to_string()))?;

    Ok(Feedback {
        total_score: draft.total_score as u8,
        category_scores: draft
            .category_scores
            .into_iter()
            .map(|c| CategoryScore {
                name: c.name,
                score: c.score as u8,
                comment: c.comment,
            })
            .collect(),
        strengths: draft.strengths,
        areas_for_improvement: draft.areas_for_improvement,
        final_assessment: draft.final_assessment,
        created_at: Utc::now(),
    })
}
