pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers as feedback_handlers;
use crate::interviews::handlers as interview_handlers;
use crate::session::handlers as session_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route(
            "/api/v1/interviews",
            get(interview_handlers::handle_list_interviews),
        )
        .route(
            "/api/v1/interviews/generate",
            post(interview_handlers::handle_generate_interview),
        )
        .route(
            "/api/v1/interviews/latest",
            get(interview_handlers::handle_latest_interviews),
        )
        .route(
            "/api/v1/interviews/:id",
            get(interview_handlers::handle_get_interview),
        )
        // Session API
        .route(
            "/api/v1/sessions",
            post(session_handlers::handle_start_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(session_handlers::handle_get_session),
        )
        .route(
            "/api/v1/sessions/:id/events",
            post(session_handlers::handle_session_event),
        )
        .route(
            "/api/v1/sessions/:id/stop",
            post(session_handlers::handle_stop_session),
        )
        // Feedback API
        .route(
            "/api/v1/feedback",
            get(feedback_handlers::handle_list_feedback),
        )
        .route(
            "/api/v1/feedback/generate",
            post(feedback_handlers::handle_generate_feedback),
        )
        .route(
            "/api/v1/feedback/:interview_id",
            get(feedback_handlers::handle_get_feedback),
        )
        .with_state(state)
}
