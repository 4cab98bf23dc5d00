//! Query submission flow.
//!
//! One submission at a time: `idle → sending → (success | failure) → idle`.
//! The user message is appended optimistically before the backend call, and
//! the completion is bound to the session id captured at submit time, so a
//! response that arrives after a session switch lands in the session it was
//! issued against.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use uuid::Uuid;

use taxchat_api::ApiClient;
use taxchat_core::models::message::NewMessage;
use taxchat_core::models::query::{QueryRequest, QueryResponse};
use taxchat_core::models::taxpayer::Taxpayer;

use crate::events::AppEvent;
use crate::SharedStore;

/// Shown when the backend answered but the response text was empty.
pub const FALLBACK_ANSWER: &str = "I couldn't process your request. Please try again.";

/// Shown when the backend call failed. The underlying error goes to the log,
/// not the conversation.
pub const ERROR_ANSWER: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

/// Why a submission was rejected at the boundary. Blocked submissions never
/// touch the API or the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("input is empty")]
    EmptyInput,

    #[error("no taxpayer selected")]
    NoTaxpayer,

    #[error("a request is already in flight")]
    Busy,
}

pub struct ChatController {
    store: SharedStore,
    api: ApiClient,
    events: mpsc::UnboundedSender<AppEvent>,
    pending: Option<JoinHandle<()>>,
}

impl ChatController {
    pub fn new(
        store: SharedStore,
        api: ApiClient,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            store,
            api,
            events,
            pending: None,
        }
    }

    /// Whether a submission is in flight. New submissions are rejected (not
    /// queued) while this is true.
    pub fn is_busy(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Submit a query against the selected taxpayer.
    ///
    /// Appends the user message, sets the global loading flag, and spawns
    /// the backend call. Returns immediately; the completion writes the
    /// assistant message back into the issuing session.
    pub async fn submit(
        &mut self,
        input: &str,
        taxpayer: Option<&Taxpayer>,
    ) -> Result<(), SubmitBlocked> {
        let query = input.trim();
        if query.is_empty() {
            return Err(SubmitBlocked::EmptyInput);
        }
        let Some(taxpayer) = taxpayer else {
            return Err(SubmitBlocked::NoTaxpayer);
        };
        if self.is_busy() {
            return Err(SubmitBlocked::Busy);
        }

        let session_id = {
            let mut store = self.store.lock().await;
            let session_id = match store.current_session_id() {
                Some(id) => id,
                None => {
                    let title = format!("Chat {}", store.sessions().len() + 1);
                    store.create_session(title)
                }
            };
            if let Err(err) = store.push_message_to(session_id, NewMessage::user(query)) {
                // The session was created under this same lock, so this
                // only fires if the store invariants are broken.
                error!(%err, "failed to record user message");
                return Err(SubmitBlocked::Busy);
            }
            store.set_loading(true);
            session_id
        };

        let request = QueryRequest::new(query, taxpayer.id.clone(), Some(session_id.to_string()));
        let store = SharedStore::clone(&self.store);
        let api = self.api.clone();
        let events = self.events.clone();

        self.pending = Some(tokio::spawn(async move {
            let draft = match api.process_query(&request).await {
                Ok(answer) => assistant_draft(answer),
                Err(err) => {
                    error!(%err, "query processing failed");
                    NewMessage::assistant(ERROR_ANSWER)
                }
            };

            let mut store = store.lock().await;
            if let Err(err) = store.push_message_to(session_id, draft) {
                // The issuing session is gone; drop the response rather than
                // leak it into whatever session is current now.
                warn!(%err, "discarding response for vanished session");
            }
            // The one guaranteed side effect on every branch.
            store.set_loading(false);
            drop(store);

            let _ = events.send(AppEvent::QueryFinished { session_id });
        }));

        Ok(())
    }

    /// Abort the in-flight request, if any, and return the UI to idle.
    pub async fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            self.store.lock().await.set_loading(false);
            debug!("cancelled in-flight query");
        }
    }

    /// Wait for the in-flight request to finish. Used by tests and shutdown.
    pub async fn join(&mut self) {
        if let Some(handle) = self.pending.take() {
            let _ = handle.await;
        }
    }
}

fn assistant_draft(answer: QueryResponse) -> NewMessage {
    if let Some(message) = &answer.error_message {
        debug!(%message, "backend reported a query error");
    }
    let content = if answer.response.is_empty() {
        FALLBACK_ANSWER.to_string()
    } else {
        answer.response
    };
    NewMessage::assistant(content)
        .sql_query(answer.sql_query)
        .confidence(answer.confidence)
        .execution_time_ms(answer.execution_time_ms)
}
