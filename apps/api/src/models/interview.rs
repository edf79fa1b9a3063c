use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted interview definition.
///
/// Created when a user runs a question-generation session; `finalized` flips
/// once the question set is fixed, after which the record is immutable and
/// eligible to be shown to other users as a takeable interview.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub level: String,
    pub techstack: Vec<String>,
    pub questions: Vec<String>,
    pub finalized: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new interview. The store assigns id and created_at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInterview {
    pub user_id: Uuid,
    pub role: String,
    pub level: String,
    pub techstack: Vec<String>,
    pub questions: Vec<String>,
    pub finalized: bool,
}
