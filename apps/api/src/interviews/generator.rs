//! Interview question generation via the hosted model.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interviews::prompts::{QUESTION_GEN_PROMPT_TEMPLATE, QUESTION_GEN_SYSTEM};
use crate::llm_client::LlmClient;

const MAX_QUESTIONS: u8 = 20;

/// Parameters for one question-generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    pub role: String,
    pub level: String,
    pub techstack: Vec<String>,
    /// "technical", "behavioural", or "mixed".
    pub focus: String,
    pub amount: u8,
}

pub fn build_question_prompt(request: &QuestionRequest) -> String {
    QUESTION_GEN_PROMPT_TEMPLATE
        .replace("{role}", &request.role)
        .replace("{level}", &request.level)
        .replace("{techstack}", &request.techstack.join(", "))
        .replace("{focus}", &request.focus)
        .replace("{amount}", &request.amount.to_string())
}

/// Generates a question set for a new interview. The model returns a bare
/// JSON array of question strings.
pub async fn generate_questions(
    llm: &LlmClient,
    request: &QuestionRequest,
) -> Result<Vec<String>, AppError> {
    if request.amount == 0 || request.amount > MAX_QUESTIONS {
        return Err(AppError::Validation(format!(
            "amount must be between 1 and {MAX_QUESTIONS}"
        )));
    }

    let prompt = build_question_prompt(request);
    let questions: Vec<String> = llm
        .call_json(&prompt, QUESTION_GEN_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("question generation failed: {e}")))?;

    if questions.is_empty() {
        return Err(AppError::Llm(
            "question generation returned an empty set".to_string(),
        ));
    }

    Ok(questions)
}
