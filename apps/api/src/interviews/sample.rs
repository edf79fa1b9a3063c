//! Built-in sample interviews, returned by listing endpoints when the store
//! is empty and `use_fallback_data` is set. Ids are fixed so detail links
//! stay stable across requests.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::models::interview::InterviewRow;

pub fn sample_interviews() -> Vec<InterviewRow> {
    vec![
        InterviewRow {
            id: Uuid::from_u128(1),
            user_id: Uuid::nil(),
            role: "Frontend Developer".to_string(),
            level: "Junior".to_string(),
            techstack: vec!["React".to_string(), "TypeScript".to_string()],
            questions: vec![
                "What is the difference between state and props in React?".to_string(),
                "How does the virtual DOM work?".to_string(),
                "When would you reach for useMemo?".to_string(),
            ],
            finalized: true,
            created_at: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
        },
        InterviewRow {
            id: Uuid::from_u128(2),
            user_id: Uuid::nil(),
            role: "Full Stack Developer".to_string(),
            level: "Mid-level".to_string(),
            techstack: vec![
                "Node.js".to_string(),
                "Express".to_string(),
                "MongoDB".to_string(),
            ],
            questions: vec![
                "How do you structure error handling in an Express API?".to_string(),
                "Describe a schema design decision you have had to make.".to_string(),
                "How would you debug a slow endpoint?".to_string(),
            ],
            finalized: true,
            created_at: Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap(),
        },
    ]
}
