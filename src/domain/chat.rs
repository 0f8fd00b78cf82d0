use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    #[display(fmt = "user")]
    User,
    #[display(fmt = "assistant")]
    Assistant,
}

#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Conversation with the writing assistant. Append-only; never empty.
#[derive(Clone, Debug)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub const GREETING: &'static str = "Hi! I'm your AI email assistant. I can help you write better emails. How can I help you today?";

    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::new(ChatRole::Assistant, Self::GREETING)],
        }
    }

    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(role, content));
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> &ChatMessage {
        // seeded with the greeting and only ever appended to
        &self.messages[self.messages.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}
