//! Application state.
//!
//! Owned by the runtime and mutated only by [`crate::update::update`].

use libris_core::config::Config;
use libris_core::gate;
use libris_core::owner::OwnerSummary;
use libris_types::SessionState;

use crate::features::book::BookState;
use crate::features::catalog::CatalogState;
use crate::features::dashboard::DashboardState;
use crate::features::session::AuthFormState;
use crate::route::{self, Route, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient message for the user (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug)]
pub struct AppState {
    /// Latest snapshot published by the session manager.
    pub session: SessionState,
    pub route: Route,
    /// Protected route the user was sent away from; restored after sign-in.
    pub return_to: Option<Route>,
    pub auth: AuthFormState,
    pub catalog: CatalogState,
    pub dashboard: DashboardState,
    pub book: BookState,
    pub notices: Vec<Notice>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            session: SessionState::Unknown,
            route: Route::default(),
            return_to: None,
            auth: AuthFormState::default(),
            catalog: CatalogState::new(config.effective_page_size()),
            dashboard: DashboardState::new(config.dashboard_limit),
            book: BookState::default(),
            notices: Vec::new(),
        }
    }

    /// What to draw right now.
    pub fn view(&self) -> View {
        route::resolve(&self.route, &self.session)
    }

    /// Whether "add book" affordances are shown.
    pub fn can_add_books(&self) -> bool {
        gate::can_contribute(&self.session)
    }

    /// Edit/delete affordances for the book on the detail page.
    pub fn can_modify_current(&self) -> bool {
        self.book
            .detail
            .as_ref()
            .is_some_and(|detail| gate::can_modify(self.session.identity(), detail))
    }

    /// Dashboard view, derived from the last fetch and the current session.
    pub fn dashboard_summary(&self) -> OwnerSummary {
        OwnerSummary::derive(&self.dashboard.items, &self.session)
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            text: text.into(),
        });
    }
}
