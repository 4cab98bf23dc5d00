//! Background status polling.
//!
//! A single task with an explicit start/stop contract: it polls once
//! immediately, then on a fixed interval, and can be nudged off-schedule by
//! the manual retry action. Stopping the poller tears the timer down so no
//! orphaned task outlives the panel that owns it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use taxchat_api::ApiClient;
use taxchat_core::models::status::SystemStatus;

use crate::events::AppEvent;

/// Fixed polling interval.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Outcome of one poll.
///
/// A degraded or critical payload is still `Updated` — the backend answered
/// with a structured body. `FetchFailed` is reserved for transport errors
/// and unexpected statuses, rendered as a distinct inline error with retry.
#[derive(Debug)]
pub enum StatusEvent {
    Updated(SystemStatus),
    FetchFailed(String),
}

pub struct StatusPoller {
    handle: JoinHandle<()>,
    refresh: Arc<Notify>,
}

impl StatusPoller {
    pub fn start(api: ApiClient, events: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self::with_interval(api, events, POLL_INTERVAL)
    }

    pub fn with_interval(
        api: ApiClient,
        events: mpsc::UnboundedSender<AppEvent>,
        interval: Duration,
    ) -> Self {
        let refresh = Arc::new(Notify::new());
        let nudge = Arc::clone(&refresh);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // The first tick completes immediately, giving the poll on
                // startup before the interval kicks in.
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = nudge.notified() => {
                        ticker.reset();
                    }
                }

                let event = match api.get_status().await {
                    Ok(status) => StatusEvent::Updated(status),
                    Err(err) => {
                        warn!(%err, "status poll failed");
                        StatusEvent::FetchFailed(err.to_string())
                    }
                };

                if events.send(AppEvent::Status(event)).is_err() {
                    // Receiver gone; the owning panel has shut down.
                    break;
                }
            }
        });

        Self { handle, refresh }
    }

    /// Trigger an off-schedule poll. This is the manual retry action.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Tear the polling task down.
    pub fn stop(self) {
        self.handle.abort();
    }
}
