use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::directory::{ProfileFields, User};
use crate::progress::ProgressSummary;
use crate::recommend::SkillGap;
use crate::roadmap::Roadmap;

// Request DTOs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email)]
    pub email: Option<String>,

    pub password: Option<String>,

    pub role: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[serde(flatten)]
    pub profile: ProfileFields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub password: Option<String>,

    #[serde(flatten)]
    pub profile: ProfileFields,
}

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignMentorRequest {
    pub mentee_id: Option<String>,
    pub mentor_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateRequest {
    pub task_id: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatQuery {
    pub user_id: Option<String>,
    pub partner_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendChatRequest {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub receiver_id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackCheckQuery {
    pub from_user_id: Option<String>,
    pub to_user_id: Option<String>,
    #[serde(rename = "type")]
    pub direction: Option<String>,
}

// Response DTOs
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UsersByRoleResponse {
    pub mentors: Vec<User>,
    pub mentees: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct AssignMentorResponse {
    pub success: bool,
    pub assignments: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub mentor_id: Option<String>,
    pub mentor: Option<User>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenteeWithProgress {
    #[serde(flatten)]
    pub mentee: User,
    pub roadmap_completion: String,
}

#[derive(Debug, Serialize)]
pub struct RoadmapView {
    #[serde(flatten)]
    pub roadmap: Roadmap,
    pub progress: ProgressSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateResponse {
    #[serde(flatten)]
    pub view: RoadmapView,
    pub just_completed: bool,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoadmapSource {
    Ai,
    Template,
}

#[derive(Debug, Serialize)]
pub struct AiRoadmapResponse {
    pub success: bool,
    pub roadmap: Roadmap,
    pub source: RoadmapSource,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapResponse {
    pub mentee_id: String,
    pub mentor_id: String,
    pub skills: Vec<SkillGap>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    pub mentee: User,
    pub recommended_mentors: Vec<User>,
}
