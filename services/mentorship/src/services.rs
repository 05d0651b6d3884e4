use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use mentorbridge_auth::PasswordService;
use mentorbridge_common::{AppError, UserRole};

use crate::ai_roadmap::{OpenAiRoadmapGenerator, RoadmapGenerator};
use crate::assignments::AssignmentRegistry;
use crate::chat::ChatRelay;
use crate::config::AppConfig;
use crate::directory::{User, UserDirectory};
use crate::feedback::FeedbackLedger;
use crate::models::*;
use crate::progress;
use crate::recommend;
use crate::roadmap::RoadmapStore;
use crate::seed;

/// Shared handler state. Every store is its own lock so unrelated entities never
/// contend; none of these locks is held across an `.await` on external I/O.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<RwLock<UserDirectory>>,
    pub roadmaps: Arc<RoadmapStore>,
    pub assignments: Arc<RwLock<AssignmentRegistry>>,
    pub feedback: Arc<RwLock<FeedbackLedger>>,
    pub chat: Arc<ChatRelay>,
    pub passwords: PasswordService,
    pub generator: Option<Arc<dyn RoadmapGenerator>>,
    pub config: AppConfig,
}

impl AppState {
    /// Seeded state with the generator taken from the AI settings.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let generator: Option<Arc<dyn RoadmapGenerator>> = if config.ai.is_enabled() {
            Some(Arc::new(OpenAiRoadmapGenerator::new(config.ai.clone())?))
        } else {
            tracing::info!("No AI API key configured, AI roadmaps will use the default template");
            None
        };

        Self::with_generator(config, generator)
    }

    pub fn with_generator(
        config: AppConfig,
        generator: Option<Arc<dyn RoadmapGenerator>>,
    ) -> Result<Self, AppError> {
        let passwords = PasswordService::with_cost(config.password_hash_cost);
        let users = seed::demo_users(&passwords)?;

        Ok(Self {
            users: Arc::new(RwLock::new(UserDirectory::new(users))),
            roadmaps: Arc::new(RoadmapStore::new()),
            assignments: Arc::new(RwLock::new(AssignmentRegistry::from_pairs(
                seed::DEMO_ASSIGNMENTS,
            ))),
            feedback: Arc::new(RwLock::new(FeedbackLedger::new())),
            chat: Arc::new(ChatRelay::new()),
            passwords,
            generator,
            config,
        })
    }

    pub async fn user(&self, id: &str) -> Result<User, AppError> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

pub struct AccountService {
    state: AppState,
}

impl AccountService {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    pub async fn list_by_role(&self, role: UserRole) -> Vec<User> {
        self.state
            .users
            .read()
            .await
            .list_by_role(role)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn login(&self, request: LoginRequest) -> Result<User, AppError> {
        let invalid = || AppError::Authentication("Invalid email or password".to_string());

        let user = self
            .state
            .users
            .read()
            .await
            .find_by_email(&request.email)
            .cloned()
            .ok_or_else(invalid)?;

        if !self
            .state
            .passwords
            .verify_password(&request.password, &user.password_hash)?
        {
            return Err(invalid());
        }

        tracing::info!("User logged in: {} ({})", user.id, user.email);
        Ok(user)
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<User, AppError> {
        let required = || {
            AppError::InvalidArgument("Email, password, and role are required".to_string())
        };
        let email = request.email.filter(|e| !e.is_empty()).ok_or_else(required)?;
        let password = request.password.filter(|p| !p.is_empty()).ok_or_else(required)?;
        let role: UserRole = request.role.ok_or_else(required)?.parse()?;

        // Hash before taking the write lock.
        let password_hash = self.state.passwords.hash_password(&password)?;

        let mut users = self.state.users.write().await;
        if users.find_by_email(&email).is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let mut user = User {
            id: users.next_id(role),
            email,
            password_hash,
            name: request.name.unwrap_or_else(|| "User".to_string()),
            role,
            skills: Vec::new(),
            title: None,
            experience: None,
            motto: None,
            learning_goals: None,
            availability: None,
            domains: Vec::new(),
            preferred_domains: Vec::new(),
        };
        request.profile.apply(&mut user);

        let user = users.insert(user)?.clone();
        tracing::info!("User registered: {} ({}, {})", user.id, user.email, user.role);
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<User, AppError> {
        let password_hash = match request.password.filter(|p| !p.is_empty()) {
            Some(password) => Some(self.state.passwords.hash_password(&password)?),
            None => None,
        };

        let mut users = self.state.users.write().await;
        let user = users
            .update_profile(user_id, request.profile, password_hash)?
            .clone();

        tracing::info!("Profile updated: {}", user.id);
        Ok(user)
    }
}

pub struct MatchingService {
    state: AppState,
}

impl MatchingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    pub async fn assign(&self, mentee_id: &str, mentor_id: &str) -> AssignMentorResponse {
        let mut assignments = self.state.assignments.write().await;
        match assignments.assign(mentee_id, mentor_id) {
            Some(previous) if previous != mentor_id => tracing::info!(
                "Mentee {} reassigned from {} to {}",
                mentee_id,
                previous,
                mentor_id
            ),
            Some(_) => {}
            None => tracing::info!("Mentee {} assigned to {}", mentee_id, mentor_id),
        }

        AssignMentorResponse {
            success: true,
            assignments: assignments.all().clone(),
        }
    }

    pub async fn assignment(&self, mentee_id: &str) -> AssignmentResponse {
        let mentor_id = self
            .state
            .assignments
            .read()
            .await
            .get(mentee_id)
            .map(str::to_string);

        let mentor = match &mentor_id {
            Some(id) => self.state.users.read().await.get(id).cloned(),
            None => None,
        };

        AssignmentResponse { mentor_id, mentor }
    }

    /// Mentees assigned to the mentor, each with its roadmap completion.
    pub async fn mentees_with_progress(&self, mentor_id: &str) -> Vec<MenteeWithProgress> {
        let mentee_ids = self.state.assignments.read().await.list_mentees(mentor_id);
        let users = self.state.users.read().await;

        mentee_ids
            .iter()
            .filter_map(|id| users.get(id))
            .map(|mentee| {
                let percent = progress::completion_percent(&self.state.roadmaps.get_or_create(&mentee.id));
                MenteeWithProgress {
                    mentee: mentee.clone(),
                    roadmap_completion: format!("{}%", percent),
                }
            })
            .collect()
    }

    pub async fn skill_gap(&self, mentee_id: &str) -> Result<SkillGapResponse, AppError> {
        let mentee = self.mentee(mentee_id).await?;
        let mentor_id = self
            .state
            .assignments
            .read()
            .await
            .get(mentee_id)
            .map(str::to_string)
            .ok_or_else(|| AppError::NotFound("No mentor assigned".to_string()))?;
        let mentor = self.state.user(&mentor_id).await?;

        Ok(SkillGapResponse {
            mentee_id: mentee.id.clone(),
            mentor_id,
            skills: recommend::skill_gap(&mentee, &mentor),
        })
    }

    pub async fn recommend(&self, mentee_id: &str) -> Result<RecommendResponse, AppError> {
        let users = self.state.users.read().await;
        let mentee = users
            .get(mentee_id)
            .filter(|u| u.role == UserRole::Mentee)
            .ok_or_else(|| AppError::NotFound("Mentee not found".to_string()))?;

        let mentors = users.list_by_role(UserRole::Mentor);
        let recommended_mentors = recommend::recommend(mentee, mentors)
            .into_iter()
            .cloned()
            .collect();

        Ok(RecommendResponse {
            mentee: mentee.clone(),
            recommended_mentors,
        })
    }

    async fn mentee(&self, mentee_id: &str) -> Result<User, AppError> {
        self.state
            .user(mentee_id)
            .await
            .ok()
            .filter(|u| u.role == UserRole::Mentee)
            .ok_or_else(|| AppError::NotFound("Mentee not found".to_string()))
    }
}

pub struct RoadmapService {
    state: AppState,
}

impl RoadmapService {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Roadmap with progress. Only directory users get a roadmap.
    pub async fn view(&self, user_id: &str) -> Result<RoadmapView, AppError> {
        self.state.user(user_id).await?;

        let roadmap = self.state.roadmaps.snapshot(user_id);
        let progress = progress::summarize(&roadmap);
        Ok(RoadmapView { roadmap, progress })
    }

    pub async fn update_task(
        &self,
        user_id: &str,
        request: TaskUpdateRequest,
    ) -> Result<TaskUpdateResponse, AppError> {
        let task_id = request
            .task_id
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::InvalidArgument("taskId is required".to_string()))?;
        let completed = request
            .completed
            .ok_or_else(|| AppError::InvalidArgument("completed is required".to_string()))?;
        self.state.user(user_id).await?;

        let (update, roadmap) = {
            let mut roadmap = self.state.roadmaps.get_or_create(user_id);
            let update = progress::update_task(&mut roadmap, &task_id, completed)?;
            (update, roadmap.clone())
        };

        if update.just_completed {
            tracing::info!("User {} completed their roadmap", user_id);
        }

        let progress = progress::summarize(&roadmap);
        Ok(TaskUpdateResponse {
            view: RoadmapView { roadmap, progress },
            just_completed: update.just_completed,
        })
    }

    /// Generated roadmap for the user, or the user's template roadmap when no
    /// generator is configured or the generator fails or times out.
    pub async fn ai_roadmap(&self, user_id: &str) -> Result<AiRoadmapResponse, AppError> {
        let user = self.state.user(user_id).await?;

        let Some(generator) = self.state.generator.clone() else {
            return Ok(self.template_response(user_id));
        };

        let timeout = Duration::from_secs(self.state.config.ai.timeout_seconds);
        let outcome = match tokio::time::timeout(timeout, generator.generate(&user)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Unavailable(format!(
                "AI roadmap generation timed out after {}s",
                timeout.as_secs()
            ))),
        };

        match outcome {
            Ok(roadmap) => {
                tracing::info!("Generated AI roadmap for {}", user_id);
                Ok(AiRoadmapResponse {
                    success: true,
                    roadmap,
                    source: RoadmapSource::Ai,
                })
            }
            Err(err) => {
                tracing::warn!("AI roadmap for {} fell back to template: {}", user_id, err);
                Ok(self.template_response(user_id))
            }
        }
    }

    fn template_response(&self, user_id: &str) -> AiRoadmapResponse {
        AiRoadmapResponse {
            success: true,
            roadmap: self.state.roadmaps.snapshot(user_id),
            source: RoadmapSource::Template,
        }
    }
}
