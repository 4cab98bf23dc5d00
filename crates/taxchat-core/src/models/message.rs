use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single message in a chat session.
///
/// Messages are immutable once stored: the store stamps the id and the
/// timestamp, and from then on messages are only appended, never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub role: ChatRole,
    pub timestamp: jiff::Timestamp,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sql_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub execution_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub related_documents: Option<Vec<Uuid>>,
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A message draft, before the store stamps an id and timestamp.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub content: String,
    pub role: ChatRole,
    pub sql_query: Option<String>,
    pub confidence: Option<f64>,
    pub execution_time_ms: Option<u64>,
    pub related_documents: Option<Vec<Uuid>>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(content, ChatRole::User)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(content, ChatRole::Assistant)
    }

    fn with_role(content: impl Into<String>, role: ChatRole) -> Self {
        Self {
            content: content.into(),
            role,
            sql_query: None,
            confidence: None,
            execution_time_ms: None,
            related_documents: None,
        }
    }

    pub fn sql_query(mut self, sql_query: Option<String>) -> Self {
        self.sql_query = sql_query;
        self
    }

    pub fn confidence(mut self, confidence: Option<f64>) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn execution_time_ms(mut self, execution_time_ms: Option<u64>) -> Self {
        self.execution_time_ms = execution_time_ms;
        self
    }

    pub fn related_documents(mut self, related_documents: Option<Vec<Uuid>>) -> Self {
        self.related_documents = related_documents;
        self
    }
}
