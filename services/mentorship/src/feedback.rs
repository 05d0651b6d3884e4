use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use mentorbridge_common::{AppError, FeedbackDirection, FeedbackTrigger};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    #[serde(rename = "type")]
    pub direction: FeedbackDirection,
    pub rating: u8,
    pub comment: Option<String>,
    pub trigger: Option<FeedbackTrigger>,
    pub created_at: DateTime<Utc>,
}

/// Raw submission as it arrives from a client; every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub from_user_id: Option<String>,
    pub to_user_id: Option<String>,
    #[serde(rename = "type")]
    pub direction: Option<String>,
    pub rating: Option<Value>,
    pub comment: Option<String>,
    pub trigger: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Integer rating from a JSON number or numeric string, clamped into range.
/// Anything unreadable counts as 0 before clamping.
fn parse_rating(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => leading_integer(s.trim()),
        _ => 0,
    };
    raw.clamp(MIN_RATING as i64, MAX_RATING as i64) as u8
}

fn leading_integer(s: &str) -> i64 {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    // Digits only, so a parse failure is overflow.
    digits
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(sign * i64::MAX)
}

/// Append-only rating log. Entries are never edited or removed.
#[derive(Debug, Default)]
pub struct FeedbackLedger {
    entries: Vec<FeedbackEntry>,
}

impl FeedbackLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, submission: FeedbackSubmission) -> Result<FeedbackEntry, AppError> {
        let missing = || {
            AppError::InvalidArgument(
                "fromUserId, toUserId, type, and rating are required".to_string(),
            )
        };

        let from_user_id = required(submission.from_user_id).ok_or_else(missing)?;
        let to_user_id = required(submission.to_user_id).ok_or_else(missing)?;
        let direction = required(submission.direction).ok_or_else(missing)?;
        let rating = submission.rating.ok_or_else(missing)?;

        let direction: FeedbackDirection = direction.parse()?;
        let trigger = submission.trigger.and_then(|t| match t.parse::<FeedbackTrigger>() {
            Ok(trigger) => Some(trigger),
            Err(_) => {
                tracing::warn!("Ignoring unknown feedback trigger {:?}", t);
                None
            }
        });

        let entry = FeedbackEntry {
            id: format!("fb_{}", Uuid::new_v4().simple()),
            from_user_id,
            to_user_id,
            direction,
            rating: parse_rating(&rating),
            comment: submission
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            trigger,
            created_at: Utc::now(),
        };

        tracing::info!(
            "Feedback {} from {} to {} ({}), rating {}",
            entry.id,
            entry.from_user_id,
            entry.to_user_id,
            entry.direction.as_str(),
            entry.rating
        );

        self.entries.push(entry.clone());
        Ok(entry)
    }

    pub fn list_received_by(&self, user_id: &str) -> Vec<FeedbackEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.to_user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn exists_given(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        direction: FeedbackDirection,
    ) -> bool {
        self.entries.iter().any(|entry| {
            entry.from_user_id == from_user_id
                && entry.to_user_id == to_user_id
                && entry.direction == direction
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
