use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use mentorbridge_common::{AppError, FeedbackDirection, UserRole};

use crate::chat::ChatMessage;
use crate::directory::User;
use crate::extract::ApiJson;
use crate::feedback::{FeedbackEntry, FeedbackSubmission};
use crate::models::*;
use crate::services::{AccountService, AppState, MatchingService, RoadmapService};

// Health check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

// List users, by role or grouped
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let accounts = AccountService::new(&state);

    let body = match query.role.filter(|r| !r.is_empty()) {
        Some(role) => {
            let role: UserRole = role.parse()?;
            serde_json::to_value(accounts.list_by_role(role).await)
        }
        None => serde_json::to_value(UsersByRoleResponse {
            mentors: accounts.list_by_role(UserRole::Mentor).await,
            mentees: accounts.list_by_role(UserRole::Mentee).await,
        }),
    }
    .map_err(|e| AppError::Internal(format!("Failed to serialize users: {}", e)))?;

    Ok(Json(body))
}

// User Login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = AccountService::new(&state).login(request).await?;
    Ok(Json(UserResponse { user }))
}

// User Registration
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    request
        .validate()
        .map_err(|errors| AppError::InvalidArgument(format!("Validation error: {}", errors)))?;

    let user = AccountService::new(&state).signup(request).await?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

// Update profile
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let user = AccountService::new(&state)
        .update_profile(&user_id, request)
        .await?;
    Ok(Json(user))
}

// Assign mentor to mentee
pub async fn assign_mentor(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AssignMentorRequest>,
) -> Result<Json<AssignMentorResponse>, AppError> {
    let (Some(mentee_id), Some(mentor_id)) = (
        request.mentee_id.filter(|id| !id.is_empty()),
        request.mentor_id.filter(|id| !id.is_empty()),
    ) else {
        return Err(AppError::InvalidArgument(
            "menteeId and mentorId required".to_string(),
        ));
    };

    let response = MatchingService::new(&state)
        .assign(&mentee_id, &mentor_id)
        .await;
    Ok(Json(response))
}

// Assigned mentor of a mentee
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(mentee_id): Path<String>,
) -> Json<AssignmentResponse> {
    Json(MatchingService::new(&state).assignment(&mentee_id).await)
}

// Mentor's mentees with roadmap progress
pub async fn list_mentees(
    State(state): State<AppState>,
    Path(mentor_id): Path<String>,
) -> Json<Vec<MenteeWithProgress>> {
    Json(
        MatchingService::new(&state)
            .mentees_with_progress(&mentor_id)
            .await,
    )
}

// Roadmap with derived progress
pub async fn get_roadmap(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<RoadmapView>, AppError> {
    let view = RoadmapService::new(&state).view(&user_id).await?;
    Ok(Json(view))
}

// Toggle a single task
pub async fn update_task(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(request): ApiJson<TaskUpdateRequest>,
) -> Result<Json<TaskUpdateResponse>, AppError> {
    let response = RoadmapService::new(&state)
        .update_task(&user_id, request)
        .await?;
    Ok(Json(response))
}

// AI roadmap with template fallback
pub async fn ai_roadmap(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<AiRoadmapResponse>, AppError> {
    let response = RoadmapService::new(&state).ai_roadmap(&user_id).await?;
    Ok(Json(response))
}

// Chat history of a pair
pub async fn get_chat(
    State(state): State<AppState>,
    Query(query): Query<ChatQuery>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let (Some(user_id), Some(partner_id)) = (query.user_id, query.partner_id) else {
        return Err(AppError::InvalidArgument(
            "userId and partnerId required".to_string(),
        ));
    };

    Ok(Json(state.chat.list(&user_id, &partner_id)))
}

// Send a chat message
pub async fn send_chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SendChatRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), AppError> {
    let message = state
        .chat
        .append(&request.sender_id, &request.receiver_id, &request.text)?;
    Ok((StatusCode::CREATED, Json(message)))
}

// Submit feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<FeedbackSubmission>,
) -> Result<(StatusCode, Json<FeedbackEntry>), AppError> {
    let entry = state.feedback.write().await.submit(submission)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

// Feedback received by a user
pub async fn feedback_received(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<FeedbackEntry>> {
    Json(state.feedback.read().await.list_received_by(&user_id))
}

// Has this feedback already been given
pub async fn feedback_check(
    State(state): State<AppState>,
    Query(query): Query<FeedbackCheckQuery>,
) -> Json<ExistsResponse> {
    let direction = query
        .direction
        .and_then(|d| d.parse::<FeedbackDirection>().ok());

    // incomplete or unrecognized queries match nothing
    let exists = match (query.from_user_id, query.to_user_id, direction) {
        (Some(from_user_id), Some(to_user_id), Some(direction)) => state
            .feedback
            .read()
            .await
            .exists_given(&from_user_id, &to_user_id, direction),
        _ => false,
    };

    Json(ExistsResponse { exists })
}

// Skill gap between a mentee and the assigned mentor
pub async fn skill_gap(
    State(state): State<AppState>,
    Path(mentee_id): Path<String>,
) -> Result<Json<SkillGapResponse>, AppError> {
    let response = MatchingService::new(&state).skill_gap(&mentee_id).await?;
    Ok(Json(response))
}

// Mentor recommendations for a mentee
pub async fn demo_recommend(
    State(state): State<AppState>,
    Path(mentee_id): Path<String>,
) -> Result<Json<RecommendResponse>, AppError> {
    let response = MatchingService::new(&state).recommend(&mentee_id).await?;
    Ok(Json(response))
}
