use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Mentee,
    Mentor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Mentee => "mentee",
            UserRole::Mentor => "mentor",
        }
    }

    /// Prefix used when minting ids for new users of this role.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            UserRole::Mentee => "e",
            UserRole::Mentor => "m",
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mentee" => Ok(UserRole::Mentee),
            "mentor" => Ok(UserRole::Mentor),
            other => Err(AppError::InvalidArgument(format!(
                "role must be mentor or mentee, got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackDirection {
    MenteeToMentor,
    MentorToMentee,
}

impl FeedbackDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackDirection::MenteeToMentor => "mentee-to-mentor",
            FeedbackDirection::MentorToMentee => "mentor-to-mentee",
        }
    }
}

impl FromStr for FeedbackDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mentee-to-mentor" => Ok(FeedbackDirection::MenteeToMentor),
            "mentor-to-mentee" => Ok(FeedbackDirection::MentorToMentee),
            _ => Err(AppError::InvalidArgument(
                "type must be mentee-to-mentor or mentor-to-mentee".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackTrigger {
    Match,
    RoadmapComplete,
}

impl FromStr for FeedbackTrigger {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "match" => Ok(FeedbackTrigger::Match),
            "roadmap-complete" => Ok(FeedbackTrigger::RoadmapComplete),
            other => Err(AppError::InvalidArgument(format!("unknown feedback trigger {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WeekStatus {
    Completed,
    InProgress,
    Upcoming,
}

// Common response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!(
            "mentee-to-mentor".parse::<FeedbackDirection>().unwrap(),
            FeedbackDirection::MenteeToMentor
        );
        assert!(matches!(
            "sideways".parse::<FeedbackDirection>(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(serde_json::to_string(&WeekStatus::InProgress).unwrap(), "\"in-progress\"");
        assert_eq!(serde_json::to_string(&UserRole::Mentor).unwrap(), "\"mentor\"");
        assert_eq!(
            serde_json::to_string(&FeedbackTrigger::RoadmapComplete).unwrap(),
            "\"roadmap-complete\""
        );
    }
}
