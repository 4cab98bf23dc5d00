//! Taxpayer list fetch and selection.
//!
//! The list is fetched once at startup; the first entry is auto-selected.
//! A missing selection gates query submission.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::error;

use taxchat_api::ApiClient;
use taxchat_core::models::taxpayer::Taxpayer;

use crate::events::AppEvent;

/// Fetch the taxpayer list in the background and report back over the app
/// event channel.
pub fn spawn_fetch(api: ApiClient, events: mpsc::UnboundedSender<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = api.get_taxpayers().await;
        if let Err(err) = &result {
            error!(%err, "failed to fetch taxpayers");
        }
        let _ = events.send(AppEvent::Taxpayers(result));
    })
}

/// Selection state behind the taxpayer dropdown.
#[derive(Debug)]
pub struct TaxpayerSelector {
    taxpayers: Vec<Taxpayer>,
    selected: Option<usize>,
    highlighted: usize,
    loading: bool,
    pub dropdown_open: bool,
}

impl TaxpayerSelector {
    pub fn new() -> Self {
        Self {
            taxpayers: Vec::new(),
            selected: None,
            highlighted: 0,
            loading: true,
            dropdown_open: false,
        }
    }

    /// Install the fetched list, auto-selecting the first entry if any.
    pub fn set_taxpayers(&mut self, taxpayers: Vec<Taxpayer>) {
        self.loading = false;
        self.selected = if taxpayers.is_empty() { None } else { Some(0) };
        self.highlighted = 0;
        self.taxpayers = taxpayers;
    }

    pub fn fetch_failed(&mut self) {
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn taxpayers(&self) -> &[Taxpayer] {
        &self.taxpayers
    }

    pub fn selected(&self) -> Option<&Taxpayer> {
        self.selected.and_then(|i| self.taxpayers.get(i))
    }

    pub fn highlighted_index(&self) -> usize {
        self.highlighted
    }

    pub fn toggle_dropdown(&mut self) {
        if !self.taxpayers.is_empty() {
            self.dropdown_open = !self.dropdown_open;
            self.highlighted = self.selected.unwrap_or(0);
        }
    }

    pub fn highlight_next(&mut self) {
        if !self.taxpayers.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.taxpayers.len();
        }
    }

    pub fn highlight_prev(&mut self) {
        if !self.taxpayers.is_empty() {
            self.highlighted =
                (self.highlighted + self.taxpayers.len() - 1) % self.taxpayers.len();
        }
    }

    /// Commit the highlighted entry and close the dropdown.
    pub fn choose_highlighted(&mut self) {
        if !self.taxpayers.is_empty() {
            self.selected = Some(self.highlighted);
        }
        self.dropdown_open = false;
    }
}

impl Default for TaxpayerSelector {
    fn default() -> Self {
        Self::new()
    }
}
