//! PostgreSQL implementation of the interview/feedback store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::feedback::{Feedback, FeedbackRow};
use crate::models::interview::{InterviewRow, NewInterview};
use crate::store::{InterviewStore, StoreError};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewStore for PgStore {
    async fn create_interview(&self, new: NewInterview) -> Result<InterviewRow, StoreError> {
        let row = sqlx::query_as::<_, InterviewRow>(
            "INSERT INTO interviews (user_id, role, level, techstack, questions, finalized)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(new.user_id)
        .bind(&new.role)
        .bind(&new.level)
        .bind(&new.techstack)
        .bind(&new.questions)
        .bind(new.finalized)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn finalize_interview(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("UPDATE interviews SET finalized = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_interviews(&self, user_id: Uuid) -> Result<Vec<InterviewRow>, StoreError> {
        let rows = sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_other_finalized(
        &self,
        excluding_user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<InterviewRow>, StoreError> {
        let rows = sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews
             WHERE finalized = TRUE AND user_id <> $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(excluding_user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<InterviewRow>, StoreError> {
        let row = sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn save_feedback(
        &self,
        interview_id: Uuid,
        user_id: Uuid,
        feedback: Feedback,
    ) -> Result<Uuid, StoreError> {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO feedback
                 (interview_id, user_id, total_score, category_scores,
                  strengths, areas_for_improvement, final_assessment, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(interview_id)
        .bind(user_id)
        .bind(feedback.total_score as i16)
        .bind(sqlx::types::Json(&feedback.category_scores))
        .bind(&feedback.strengths)
        .bind(&feedback.areas_for_improvement)
        .bind(&feedback.final_assessment)
        .bind(feedback.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_feedback(
        &self,
        interview_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<FeedbackRow>, StoreError> {
        // No uniqueness constraint on (interview_id, user_id): reads take
        // the first matching record.
        let row = sqlx::query_as::<_, FeedbackRow>(
            "SELECT * FROM feedback WHERE interview_id = $1 AND user_id = $2 LIMIT 1",
        )
        .bind(interview_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_feedback(&self, user_id: Uuid) -> Result<Vec<FeedbackRow>, StoreError> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            "SELECT * FROM feedback WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
