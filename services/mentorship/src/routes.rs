use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::services::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(handlers::health_check))

        // Accounts and profiles
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/:id", put(handlers::update_user))
        .route("/api/login", post(handlers::login))
        .route("/api/signup", post(handlers::signup))

        // Mentor assignment
        .route("/api/assign-mentor", post(handlers::assign_mentor))
        .route("/api/assignments/:mentee_id", get(handlers::get_assignment))
        .route("/api/mentees/:mentor_id", get(handlers::list_mentees))

        // Roadmaps
        .route("/api/roadmap/:user_id", get(handlers::get_roadmap))
        .route("/api/roadmap/:user_id/task", put(handlers::update_task))
        .route("/api/ai-roadmap/:user_id", get(handlers::ai_roadmap))

        // Chat
        .route("/api/chat", get(handlers::get_chat).post(handlers::send_chat))

        // Feedback
        .route("/api/feedback", post(handlers::submit_feedback))
        .route("/api/feedback/received/:user_id", get(handlers::feedback_received))
        .route("/api/feedback/check", get(handlers::feedback_check))

        // Matching insights
        .route("/api/skill-gap/:mentee_id", get(handlers::skill_gap))
        .route("/api/demo-recommend/:mentee_id", get(handlers::demo_recommend))
}
