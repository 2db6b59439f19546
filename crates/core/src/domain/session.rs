use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::filter::FilterPayload;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Conversation state owned by the external session store. The core only
/// ever sees it as an input to a turn and hands back the updated value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
    pub active_filters: FilterPayload,
}

impl ChatSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            messages: Vec::new(),
            active_filters: FilterPayload::default(),
        }
    }

    pub fn record(&mut self, role: MessageRole, text: impl Into<String>) {
        self.messages.push(ChatMessage { role, text: text.into(), sent_at: Utc::now() });
    }
}
