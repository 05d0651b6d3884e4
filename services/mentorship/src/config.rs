use mentorbridge_common::{AiConfig, ServerConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ai: AiConfig,
    pub password_hash_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origins: vec!["*".to_string()],
            },
            ai: AiConfig::default(),
            password_hash_cost: bcrypt_default_cost(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let defaults = Self::default();

        Ok(Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
                cors_origins: std::env::var("CORS_ORIGINS")
                    .unwrap_or_else(|_| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            ai: AiConfig {
                api_key: std::env::var("AI_API_KEY")
                    .or_else(|_| std::env::var("OPENAI_API_KEY"))
                    .ok()
                    .filter(|k| !k.is_empty()),
                base_url: std::env::var("AI_BASE_URL").unwrap_or(defaults.ai.base_url),
                model: std::env::var("AI_MODEL").unwrap_or(defaults.ai.model),
                timeout_seconds: std::env::var("AI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(defaults.ai.timeout_seconds),
                temperature: std::env::var("AI_TEMPERATURE")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(defaults.ai.temperature),
            },
            password_hash_cost: std::env::var("PASSWORD_HASH_COST")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(defaults.password_hash_cost),
        })
    }
}

fn bcrypt_default_cost() -> u32 {
    mentorbridge_auth::PasswordService::default().cost()
}
