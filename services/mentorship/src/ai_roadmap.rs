use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use mentorbridge_common::{AiConfig, AppError};

use crate::directory::User;
use crate::roadmap::Roadmap;

/// External roadmap author. Implementations report transport problems as
/// `Unavailable` and unusable output as `InvalidArgument`.
#[async_trait]
pub trait RoadmapGenerator: Send + Sync {
    async fn generate(&self, user: &User) -> Result<Roadmap, AppError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<PromptMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct PromptMessage {
    role: &'static str,
    content: String,
}

const SYSTEM_PROMPT: &str = "You are an expert mentorship assistant.";

fn build_prompt(user: &User) -> Result<String, AppError> {
    let profile = serde_json::to_string_pretty(user)
        .map_err(|e| AppError::Internal(format!("Failed to serialize profile: {}", e)))?;

    Ok(format!(
        r#"Generate a 4-week personalized learning roadmap for the following mentee:

Mentee profile:
{profile}

Output format (JSON only):
{{
  "weeks": [
    {{
      "weekId": "w1",
      "title": "Week Title",
      "description": "One sentence summary",
      "tasks": [
        {{ "id": "w1t1", "title": "Task Title", "completed": false }}
      ]
    }}
  ]
}}"#
    ))
}

/// Pulls the JSON object out of a model reply, tolerating code fences and chatter.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parses and checks a model reply. Every task starts out incomplete.
pub fn parse_roadmap_reply(text: &str) -> Result<Roadmap, AppError> {
    let json = extract_json(text)
        .ok_or_else(|| AppError::InvalidArgument("reply contains no JSON object".to_string()))?;

    let mut roadmap: Roadmap = serde_json::from_str(json)
        .map_err(|e| AppError::InvalidArgument(format!("malformed roadmap: {}", e)))?;
    roadmap.validate()?;

    for week in &mut roadmap.weeks {
        for task in &mut week.tasks {
            task.completed = false;
        }
    }

    Ok(roadmap)
}

/// Content of the first choice of a chat-completions response. Handles both plain
/// string content and arrays of content parts.
fn reply_content(response: &Value) -> Option<String> {
    let content = response
        .get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?;

    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => Some(
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(""),
        ),
        _ => None,
    }
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiRoadmapGenerator {
    client: reqwest::Client,
    config: AiConfig,
}

impl OpenAiRoadmapGenerator {
    pub fn new(config: AiConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl RoadmapGenerator for OpenAiRoadmapGenerator {
    async fn generate(&self, user: &User) -> Result<Roadmap, AppError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Unavailable("AI generator has no API key".to_string()))?;

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                PromptMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                PromptMessage {
                    role: "user",
                    content: build_prompt(user)?,
                },
            ],
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Unavailable(format!("AI request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Unavailable(format!(
                "AI service returned {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::InvalidArgument(format!("AI response is not JSON: {}", e)))?;

        let content = reply_content(&body)
            .ok_or_else(|| AppError::InvalidArgument("AI response has no content".to_string()))?;

        parse_roadmap_reply(&content)
    }
}
