use uuid::Uuid;

use taxchat_api::ApiError;
use taxchat_core::models::taxpayer::Taxpayer;

use crate::poller::StatusEvent;

/// Events delivered to the UI loop by background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// Result of the one-shot taxpayer list fetch.
    Taxpayers(Result<Vec<Taxpayer>, ApiError>),
    /// A status poll completed (successfully or not).
    Status(StatusEvent),
    /// A query submission finished; the store already holds the outcome.
    QueryFinished { session_id: Uuid },
}
