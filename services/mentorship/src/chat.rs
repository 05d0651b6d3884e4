use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mentorbridge_common::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender_id: String,
    pub receiver_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Thread key shared by both participants regardless of who sends.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}-{b}")
    } else {
        format!("{b}-{a}")
    }
}

/// Store-and-forward message log, one append-only thread per participant pair.
#[derive(Debug, Default)]
pub struct ChatRelay {
    threads: DashMap<String, Vec<ChatMessage>>,
}

impl ChatRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &self,
        sender_id: &str,
        receiver_id: &str,
        text: &str,
    ) -> Result<ChatMessage, AppError> {
        if sender_id.trim().is_empty() || receiver_id.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "senderId, receiverId, text required".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "Message content cannot be empty".to_string(),
            ));
        }

        let message = ChatMessage {
            id: Uuid::new_v4(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
        };

        self.threads
            .entry(pair_key(sender_id, receiver_id))
            .or_default()
            .push(message.clone());

        tracing::debug!("Message {} from {} to {}", message.id, sender_id, receiver_id);
        Ok(message)
    }

    pub fn list(&self, user_id: &str, partner_id: &str) -> Vec<ChatMessage> {
        self.threads
            .get(&pair_key(user_id, partner_id))
            .map(|thread| thread.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        assert_eq!(pair_key("m1", "e1"), "e1-m1");
        assert_eq!(pair_key("e1", "m1"), "e1-m1");
    }

    #[test]
    fn test_both_directions_share_a_thread() {
        let relay = ChatRelay::new();
        relay.append("e1", "m1", "Hi Sarah").unwrap();
        relay.append("m1", "e1", "Hi Alex").unwrap();
        relay.append("e2", "m3", "Hello").unwrap();

        let thread = relay.list("m1", "e1");
        let texts: Vec<_> = thread.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Hi Sarah", "Hi Alex"]);
        assert_eq!(relay.list("e1", "m1"), thread);
        assert!(relay.list("e1", "m3").is_empty());
    }

    #[test]
    fn test_blank_text_rejected() {
        let relay = ChatRelay::new();
        assert!(matches!(
            relay.append("e1", "m1", "   "),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(relay.append("", "m1", "hey").is_err());
        assert!(relay.list("e1", "m1").is_empty());
    }
}
