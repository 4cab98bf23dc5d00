//! In-memory application state.
//!
//! The single source of truth for chat sessions, the current session,
//! uploaded documents, and the global loading/error flags. All mutations are
//! synchronous command methods returning `Result`; async work (HTTP calls,
//! simulated processing) rejoins by calling back into the store when it
//! completes. The store itself is plain single-threaded Rust — the app wraps
//! it in `Arc<Mutex<_>>`.

use uuid::Uuid;

use crate::error::CoreError;
use crate::models::document::{NewDocument, TaxDocument};
use crate::models::message::{ChatMessage, NewMessage};
use crate::models::session::ChatSession;

#[derive(Debug, Default)]
pub struct AppStore {
    /// Newest session first.
    sessions: Vec<ChatSession>,
    current: Option<Uuid>,
    documents: Vec<TaxDocument>,
    loading: bool,
    error: Option<String>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Sessions ─────────────────────────────────────────────────────────────

    /// Create a session with an empty message list, put it at the front of
    /// the session list, and make it current.
    pub fn create_session(&mut self, title: impl Into<String>) -> Uuid {
        let now = jiff::Timestamp::now();
        let session = ChatSession {
            id: Uuid::new_v4(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let id = session.id;
        self.sessions.insert(0, session);
        self.current = Some(id);
        id
    }

    pub fn select_session(&mut self, id: Uuid) -> Result<(), CoreError> {
        if self.sessions.iter().any(|s| s.id == id) {
            self.current = Some(id);
            Ok(())
        } else {
            Err(CoreError::SessionNotFound { id })
        }
    }

    pub fn clear_current_session(&mut self) {
        self.current = None;
    }

    pub fn current_session(&self) -> Option<&ChatSession> {
        self.current.and_then(|id| self.session(id))
    }

    pub fn current_session_id(&self) -> Option<Uuid> {
        self.current
    }

    pub fn session(&self, id: Uuid) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    // ── Messages ─────────────────────────────────────────────────────────────

    /// Append a message to the current session.
    ///
    /// Silently dropping a message when no session is current is a data-loss
    /// risk, so that case is an explicit error rather than a no-op.
    pub fn push_message(&mut self, draft: NewMessage) -> Result<Uuid, CoreError> {
        let session_id = self.current.ok_or(CoreError::NoCurrentSession)?;
        self.push_message_to(session_id, draft)
    }

    /// Append a message to the session the caller captured at submission
    /// time. Async completions use this so a response that arrives after a
    /// session switch still lands in the session it was issued against,
    /// never in "whatever is current".
    pub fn push_message_to(
        &mut self,
        session_id: Uuid,
        draft: NewMessage,
    ) -> Result<Uuid, CoreError> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(CoreError::SessionNotFound { id: session_id })?;

        let now = jiff::Timestamp::now();
        let message = ChatMessage {
            id: Uuid::new_v4(),
            content: draft.content,
            role: draft.role,
            timestamp: now,
            sql_query: draft.sql_query,
            confidence: draft.confidence,
            execution_time_ms: draft.execution_time_ms,
            related_documents: draft.related_documents,
        };
        let id = message.id;
        session.messages.push(message);
        session.updated_at = now;
        Ok(id)
    }

    // ── Documents ────────────────────────────────────────────────────────────

    pub fn add_document(&mut self, draft: NewDocument) -> Uuid {
        let document = TaxDocument {
            id: Uuid::new_v4(),
            name: draft.name,
            year: draft.year,
            kind: draft.kind,
            status: draft.status,
            uploaded_at: jiff::Timestamp::now(),
            file_size: draft.file_size,
            preview_url: draft.preview_url,
        };
        let id = document.id;
        self.documents.push(document);
        id
    }

    pub fn remove_document(&mut self, id: Uuid) -> Result<(), CoreError> {
        let index = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or(CoreError::DocumentNotFound { id })?;
        self.documents.remove(index);
        Ok(())
    }

    pub fn update_document(
        &mut self,
        id: Uuid,
        apply: impl FnOnce(&mut TaxDocument),
    ) -> Result<(), CoreError> {
        let document = self
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(CoreError::DocumentNotFound { id })?;
        apply(document);
        Ok(())
    }

    pub fn document(&self, id: Uuid) -> Option<&TaxDocument> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn documents(&self) -> &[TaxDocument] {
        &self.documents
    }

    // ── Global flags ─────────────────────────────────────────────────────────

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
