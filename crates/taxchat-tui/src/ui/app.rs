//! Application state and the main event loop.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use eyre::Result;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::debug;

use taxchat_api::ApiClient;
use taxchat_core::models::status::SystemStatus;

use crate::chat::ChatController;
use crate::events::AppEvent;
use crate::poller::{StatusEvent, StatusPoller};
use crate::taxpayers::{self, TaxpayerSelector};
use crate::{documents, SharedStore};

use super::render;

/// Quick-start questions offered next to the conversation.
pub const SAMPLE_QUESTIONS: &[&str] = &[
    "How much did I make last year vs this year?",
    "What's my total income from all sources?",
    "Show me my tax deductions",
    "Compare my W-2 income between years",
    "What are my business expenses?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Chat,
    Status,
    Documents,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Self::Chat => Self::Status,
            Self::Status => Self::Documents,
            Self::Documents => Self::Chat,
        }
    }

    pub fn prev(self) -> Self {
        self.next().next()
    }

    pub fn index(self) -> usize {
        match self {
            Self::Chat => 0,
            Self::Status => 1,
            Self::Documents => 2,
        }
    }
}

pub struct App {
    pub(crate) store: SharedStore,
    pub(crate) chat: ChatController,
    pub(crate) selector: TaxpayerSelector,
    poller: Option<StatusPoller>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    pub(crate) input: String,
    pub(crate) tab: Tab,
    pub(crate) system_status: Option<SystemStatus>,
    pub(crate) status_error: Option<String>,
    pub(crate) detail_open: bool,
    pub(crate) prompts_open: bool,
    pub(crate) prompt_index: usize,
    pub(crate) doc_index: usize,
    upload_counter: u32,
    should_quit: bool,
}

impl App {
    /// Wire up the controller, the one-shot taxpayer fetch, and the status
    /// poller. Background tasks report back over a single event channel.
    pub fn new(store: SharedStore, api: ApiClient) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        taxpayers::spawn_fetch(api.clone(), events_tx.clone());
        let poller = StatusPoller::start(api.clone(), events_tx.clone());
        let chat = ChatController::new(SharedStore::clone(&store), api, events_tx);

        Self {
            store,
            chat,
            selector: TaxpayerSelector::new(),
            poller: Some(poller),
            events_rx,
            input: String::new(),
            tab: Tab::Chat,
            system_status: None,
            status_error: None,
            detail_open: false,
            prompts_open: true,
            prompt_index: 0,
            doc_index: 0,
            upload_counter: 0,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        let mut cleanup = TerminalCleanup { enabled: true };

        let result = self.event_loop(&mut terminal).await;

        cleanup.restore();
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        loop {
            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_app_event(event).await;
            }

            {
                let store = self.store.lock().await;
                terminal.draw(|frame| render::draw(frame, self, &store))?;
            }

            if crossterm::event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key).await;
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        // Defined teardown: no orphaned poll timer, no half-finished query
        // holding the loading flag.
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        self.chat.cancel().await;

        Ok(())
    }

    async fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Taxpayers(Ok(taxpayers)) => {
                self.selector.set_taxpayers(taxpayers);
                self.store.lock().await.set_error(None);
            }
            AppEvent::Taxpayers(Err(err)) => {
                self.selector.fetch_failed();
                self.store
                    .lock()
                    .await
                    .set_error(Some(format!("Failed to load taxpayers: {err}")));
            }
            AppEvent::Status(StatusEvent::Updated(status)) => {
                self.status_error = None;
                if status.degraded_services().count() == 0 {
                    self.detail_open = false;
                }
                self.system_status = Some(status);
            }
            AppEvent::Status(StatusEvent::FetchFailed(message)) => {
                self.status_error = Some(message);
            }
            AppEvent::QueryFinished { session_id } => {
                debug!(%session_id, "query finished");
            }
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.selector.dropdown_open = false;
                self.tab = self.tab.next();
                return;
            }
            KeyCode::BackTab => {
                self.selector.dropdown_open = false;
                self.tab = self.tab.prev();
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Chat => self.handle_chat_key(key).await,
            Tab::Status => self.handle_status_key(key),
            Tab::Documents => self.handle_documents_key(key).await,
        }
    }

    async fn handle_chat_key(&mut self, key: KeyEvent) {
        if self.selector.dropdown_open {
            match key.code {
                KeyCode::Up => self.selector.highlight_prev(),
                KeyCode::Down => self.selector.highlight_next(),
                KeyCode::Enter => self.selector.choose_highlighted(),
                KeyCode::Esc => self.selector.dropdown_open = false,
                _ => {}
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('t') => self.selector.toggle_dropdown(),
                KeyCode::Char('p') => self.prompts_open = !self.prompts_open,
                KeyCode::Char('n') => {
                    let mut store = self.store.lock().await;
                    let title = format!("Chat {}", store.sessions().len() + 1);
                    store.create_session(title);
                }
                KeyCode::Char('x') => self.chat.cancel().await,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Enter => {
                if !self.input.trim().is_empty() {
                    self.submit_input().await;
                } else if self.prompts_open {
                    self.submit_prompt().await;
                }
            }
            KeyCode::Up if self.prompts_open => {
                self.prompt_index =
                    (self.prompt_index + SAMPLE_QUESTIONS.len() - 1) % SAMPLE_QUESTIONS.len();
            }
            KeyCode::Down if self.prompts_open => {
                self.prompt_index = (self.prompt_index + 1) % SAMPLE_QUESTIONS.len();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    async fn submit_input(&mut self) {
        let input = self.input.clone();
        match self.chat.submit(&input, self.selector.selected()).await {
            Ok(()) => self.input.clear(),
            // Blocked at the boundary: no message appended, no error shown.
            Err(blocked) => debug!(%blocked, "submission blocked"),
        }
    }

    async fn submit_prompt(&mut self) {
        let prompt = SAMPLE_QUESTIONS[self.prompt_index];
        if let Err(blocked) = self.chat.submit(prompt, self.selector.selected()).await {
            debug!(%blocked, "sample prompt blocked");
        }
    }

    fn handle_status_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => {
                if let Some(poller) = &self.poller {
                    poller.refresh();
                }
            }
            KeyCode::Char('d') => {
                let has_issues = self
                    .system_status
                    .as_ref()
                    .is_some_and(|s| s.degraded_services().count() > 0);
                if has_issues {
                    self.detail_open = !self.detail_open;
                }
            }
            KeyCode::Esc => {
                if self.detail_open {
                    self.detail_open = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    async fn handle_documents_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.doc_index = self.doc_index.saturating_sub(1),
            KeyCode::Down => {
                let count = self.store.lock().await.documents().len();
                if count > 0 && self.doc_index + 1 < count {
                    self.doc_index += 1;
                }
            }
            KeyCode::Char('u') => {
                self.upload_counter += 1;
                let name = format!("Scanned Document {}.pdf", self.upload_counter);
                let size = 128_000 + u64::from(self.upload_counter) * 37_500;
                documents::upload(&self.store, name, size).await;
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                let mut store = self.store.lock().await;
                if let Some(doc) = store.documents().get(self.doc_index) {
                    let id = doc.id;
                    // Ok to ignore: the row was looked up under this lock.
                    let _ = store.remove_document(id);
                    self.doc_index = self.doc_index.min(store.documents().len().saturating_sub(1));
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }
}

/// Restores the terminal on drop so a panic inside the loop does not leave
/// the shell in raw mode.
struct TerminalCleanup {
    enabled: bool,
}

impl TerminalCleanup {
    fn restore(&mut self) {
        if self.enabled {
            self.enabled = false;
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

impl Drop for TerminalCleanup {
    fn drop(&mut self) {
        self.restore();
    }
}
