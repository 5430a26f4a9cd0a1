//! Client runtime.
//!
//! Owns the [`AppState`], runs the reducer and executes its effects.
//!
//! The runtime uses an "inbox" pattern for async results:
//! - every effect runs as a spawned task that sends its `UiEvent` to
//!   `inbox_tx`
//! - session transitions published by the [`SessionManager`] are forwarded
//!   to the same inbox
//! - the embedder pulls events with [`LibrisRuntime::next`] (or
//!   [`LibrisRuntime::drain`]) and each one goes through the reducer
//!
//! All methods that execute effects must be called inside a tokio runtime.

mod handlers;

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use libris_core::api::ApiClient;
use libris_core::config::Config;
use libris_core::credential::FileCredentialStore;
use libris_core::logging;
use libris_core::session::SessionManager;
use tokio::sync::mpsc;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::update;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

pub struct LibrisRuntime {
    state: AppState,
    session: Arc<SessionManager>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    _log_guard: Option<WorkerGuard>,
}

impl LibrisRuntime {
    pub fn new(config: &Config, session: Arc<SessionManager>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(config),
            session,
            inbox_tx,
            inbox_rx,
            _log_guard: None,
        }
    }

    /// Builds the full stack from configuration: logging, the API client and
    /// the on-disk credential store.
    ///
    /// # Errors
    /// Returns an error if logging cannot be set up, the base URL is invalid
    /// or the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let log_guard = logging::init(&config.log)?;
        let api = ApiClient::from_config(config)?;
        let store = Arc::new(FileCredentialStore::default_location());
        let session = Arc::new(SessionManager::new(api, store));

        let mut runtime = Self::new(config, session);
        runtime._log_guard = log_guard;
        Ok(runtime)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Handle for feeding user intents from another task.
    pub fn sender(&self) -> UiEventSender {
        self.inbox_tx.clone()
    }

    /// Starts forwarding session transitions and resolves the stored
    /// credential in the background.
    pub fn start(&mut self) {
        self.forward_session();
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            let state = session.initialize().await;
            debug!(session = state.label(), "session resolved");
        });
    }

    /// Runs one event through the reducer and executes the resulting effects.
    pub fn dispatch(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Dispatches every event already waiting in the inbox.
    ///
    /// Returns how many were processed.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.dispatch(event);
            count += 1;
        }
        count
    }

    /// Waits for the next inbox event and dispatches it.
    ///
    /// Returns `false` once the inbox is closed.
    pub async fn next(&mut self) -> bool {
        match self.inbox_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Dispatches inbox events until `done` holds for the state.
    pub async fn run_until(&mut self, mut done: impl FnMut(&AppState) -> bool) {
        while !done(&self.state) {
            if !self.next().await {
                break;
            }
        }
    }

    fn forward_session(&self) {
        let mut rx = self.session.subscribe();
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let current = rx.borrow_and_update().clone();
            if tx.send(UiEvent::SessionChanged(current)).is_err() {
                return;
            }
            while rx.changed().await.is_ok() {
                let next = rx.borrow_and_update().clone();
                if tx.send(UiEvent::SessionChanged(next)).is_err() {
                    break;
                }
            }
        });
    }

    /// Spawns an async handler and delivers its event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        let api = self.session.api().clone();
        match effect {
            UiEffect::FetchCatalog(request) => {
                self.spawn_effect(move || handlers::fetch_catalog(api, request));
            }
            UiEffect::FetchCategories => {
                self.spawn_effect(move || handlers::fetch_categories(api));
            }
            UiEffect::FetchDashboard { epoch, limit } => {
                self.spawn_effect(move || handlers::fetch_dashboard(api, epoch, limit));
            }
            UiEffect::FetchBook { epoch, id } => {
                self.spawn_effect(move || handlers::fetch_book(api, epoch, id));
            }
            UiEffect::DeleteBook { id } => {
                self.spawn_effect(move || handlers::delete_book(api, id));
            }
            UiEffect::SaveBook { id, payload } => {
                self.spawn_effect(move || handlers::save_book(api, id, payload));
            }
            UiEffect::Login(credentials) => {
                let session = Arc::clone(&self.session);
                self.spawn_effect(move || handlers::login(session, credentials));
            }
            UiEffect::Register(profile) => {
                let session = Arc::clone(&self.session);
                self.spawn_effect(move || handlers::register(session, profile));
            }
            UiEffect::Logout => {
                let session = Arc::clone(&self.session);
                self.spawn_effect(move || handlers::logout(session));
            }
            // The resulting transition arrives through the session forwarder.
            UiEffect::ExpireSession { sent_with } => {
                self.session.expire(sent_with.as_ref());
            }
        }
    }
}
