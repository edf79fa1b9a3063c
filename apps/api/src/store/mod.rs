//! Interview/Feedback store — document-style collections behind a trait so
//! handlers and tests receive an explicitly constructed handle instead of a
//! global client.
//!
//! Failure policy: every operation returns `Result<_, StoreError>`. Listing
//! and lookup paths that the presentation layer treats as best-effort go
//! through `empty_on_error` / `absent_on_error`, which log the failure and
//! degrade to an empty/absent value. A degraded read is indistinguishable
//! from genuinely having no data; the swallow is an explicit call so every
//! lenient path is visible at its call site.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::feedback::{Feedback, FeedbackRow};
use crate::models::interview::{InterviewRow, NewInterview};

pub mod pg;

#[cfg(test)]
pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The interview/feedback store. Carried in `AppState` as
/// `Arc<dyn InterviewStore>`; tests substitute `memory::MemoryStore`.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Inserts a new interview and returns the stored row.
    async fn create_interview(&self, new: NewInterview) -> Result<InterviewRow, StoreError>;

    /// Fixes an interview's question set, making it takeable by other users.
    async fn finalize_interview(&self, id: Uuid) -> Result<(), StoreError>;

    /// All interviews belonging to `user_id`, newest first.
    async fn list_interviews(&self, user_id: Uuid) -> Result<Vec<InterviewRow>, StoreError>;

    /// Finalized interviews belonging to other users, newest first, capped
    /// at `limit`.
    async fn list_other_finalized(
        &self,
        excluding_user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<InterviewRow>, StoreError>;

    async fn get_interview(&self, id: Uuid) -> Result<Option<InterviewRow>, StoreError>;

    /// Appends a feedback record. No upsert: a second write for the same
    /// (interview, user) pair creates a second record.
    async fn save_feedback(
        &self,
        interview_id: Uuid,
        user_id: Uuid,
        feedback: Feedback,
    ) -> Result<Uuid, StoreError>;

    /// First matching record if several exist.
    async fn get_feedback(
        &self,
        interview_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<FeedbackRow>, StoreError>;

    /// All feedback belonging to `user_id`, newest first.
    async fn list_feedback(&self, user_id: Uuid) -> Result<Vec<FeedbackRow>, StoreError>;
}

/// Degrades a failed collection read to an empty list, logging the cause.
pub fn empty_on_error<T>(result: Result<Vec<T>, StoreError>, what: &str) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Store read '{what}' failed, degrading to empty: {e}");
            Vec::new()
        }
    }
}

/// Degrades a failed single-entity read to absent, logging the cause.
pub fn absent_on_error<T>(result: Result<Option<T>, StoreError>, what: &str) -> Option<T> {
    match result {
        Ok(row) => row,
        Err(e) => {
            warn!("Store read '{what}' failed, degrading to absent: {e}");
            None
        }
    }
}
