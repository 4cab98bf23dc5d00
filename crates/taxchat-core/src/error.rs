use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no session is current")]
    NoCurrentSession,

    #[error("session not found: {id}")]
    SessionNotFound { id: Uuid },

    #[error("document not found: {id}")]
    DocumentNotFound { id: Uuid },
}
