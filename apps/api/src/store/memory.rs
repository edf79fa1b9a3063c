//! In-memory store used by tests in place of Postgres.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::feedback::{Feedback, FeedbackRow};
use crate::models::interview::{InterviewRow, NewInterview};
use crate::store::{InterviewStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    interviews: Mutex<Vec<InterviewRow>>,
    feedback: Mutex<Vec<FeedbackRow>>,
    /// When set, every operation fails — simulates an outage.
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn feedback_count(&self) -> usize {
        self.feedback.lock().unwrap().len()
    }

    pub fn insert_interview(&self, row: InterviewRow) {
        self.interviews.lock().unwrap().push(row);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn create_interview(&self, new: NewInterview) -> Result<InterviewRow, StoreError> {
        self.check_available()?;
        let row = InterviewRow {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            role: new.role,
            level: new.level,
            techstack: new.techstack,
            questions: new.questions,
            finalized: new.finalized,
            created_at: Utc::now(),
        };
        self.interviews.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn finalize_interview(&self, id: Uuid) -> Result<(), StoreError> {
        self.check_available()?;
        let mut interviews = self.interviews.lock().unwrap();
        if let Some(row) = interviews.iter_mut().find(|i| i.id == id) {
            row.finalized = true;
        }
        Ok(())
    }

    async fn list_interviews(&self, user_id: Uuid) -> Result<Vec<InterviewRow>, StoreError> {
        self.check_available()?;
        let mut rows: Vec<_> = self
            .interviews
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_other_finalized(
        &self,
        excluding_user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<InterviewRow>, StoreError> {
        self.check_available()?;
        let mut rows: Vec<_> = self
            .interviews
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.finalized && i.user_id != excluding_user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<InterviewRow>, StoreError> {
        self.check_available()?;
        Ok(self
            .interviews
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn save_feedback(
        &self,
        interview_id: Uuid,
        user_id: Uuid,
        feedback: Feedback,
    ) -> Result<Uuid, StoreError> {
        self.check_available()?;
        let row = FeedbackRow {
            id: Uuid::new_v4(),
            interview_id,
            user_id,
            total_score: feedback.total_score as i16,
            category_scores: feedback.category_scores,
            strengths: feedback.strengths,
            areas_for_improvement: feedback.areas_for_improvement,
            final_assessment: feedback.final_assessment,
            created_at: feedback.created_at,
        };
        let id = row.id;
        self.feedback.lock().unwrap().push(row);
        Ok(id)
    }

    async fn get_feedback(
        &self,
        interview_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<FeedbackRow>, StoreError> {
        self.check_available()?;
        Ok(self
            .feedback
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.interview_id == interview_id && f.user_id == user_id)
            .cloned())
    }

    async fn list_feedback(&self, user_id: Uuid) -> Result<Vec<FeedbackRow>, StoreError> {
        self.check_available()?;
        let mut rows: Vec<_> = self
            .feedback
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_interview(user_id: Uuid, finalized: bool, age_minutes: i64) -> InterviewRow {
        InterviewRow {
            id: Uuid::new_v4(),
            user_id,
            role: "Frontend Developer".to_string(),
            level: "Junior".to_string(),
            techstack: vec!["React".to_string()],
            questions: vec!["What is a closure?".to_string()],
            finalized,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn test_list_other_finalized_excludes_own_and_unfinalized() {
        let store = MemoryStore::new();
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        store.insert_interview(make_interview(me, true, 1));
        store.insert_interview(make_interview(other, false, 2));
        store.insert_interview(make_interview(other, true, 3));

        let rows = store.list_other_finalized(me, 20).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_ne!(rows[0].user_id, me);
        assert!(rows[0].finalized);
    }

    #[tokio::test]
    async fn test_list_other_finalized_caps_at_limit_newest_first() {
        let store = MemoryStore::new();
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        for age in 0..5 {
            store.insert_interview(make_interview(other, true, age));
        }

        let rows = store.list_other_finalized(me, 3).await.unwrap();
        assert_eq!(rows.len(), 3);
        for pair in rows.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_finalize_makes_interview_visible_to_others() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let created = store
            .create_interview(crate::models::interview::NewInterview {
                user_id: owner,
                role: "Backend Developer".to_string(),
                level: "Senior".to_string(),
                techstack: vec!["Rust".to_string()],
                questions: vec!["Q".to_string()],
                finalized: false,
            })
            .await
            .unwrap();

        let visible = store.list_other_finalized(Uuid::new_v4(), 20).await.unwrap();
        assert!(visible.is_empty());

        store.finalize_interview(created.id).await.unwrap();
        let visible = store.list_other_finalized(Uuid::new_v4(), 20).await.unwrap();
        assert_eq!(visible.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_reads_and_writes() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        assert!(store.list_interviews(Uuid::new_v4()).await.is_err());
        assert!(store.get_interview(Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn test_save_feedback_appends_without_upsert() {
        let store = MemoryStore::new();
        let interview_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let feedback = Feedback {
            total_score: 70,
            category_scores: vec![],
            strengths: vec![],
            areas_for_improvement: vec![],
            final_assessment: "Solid".to_string(),
            created_at: Utc::now(),
        };

        let first = store
            .save_feedback(interview_id, user_id, feedback.clone())
            .await
            .unwrap();
        let second = store
            .save_feedback(interview_id, user_id, feedback)
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(store.feedback_count(), 2);
    }
}
