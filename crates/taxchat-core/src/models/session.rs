use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::ChatMessage;

/// One conversation thread between the user and the assistant.
///
/// The message list is append-only and insertion order is display order.
/// Sessions live only in memory; they do not survive a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}
