//! Client routes and gate-driven view selection.

use std::fmt;

use libris_core::gate::{self, GateDecision};
use libris_types::SessionState;

/// Addressable screens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Home,
    Books,
    BookDetail(String),
    Dashboard,
    AddBook,
    EditBook(String),
    Login,
    Register,
}

impl Route {
    /// Routes that require an authenticated session.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::AddBook | Route::EditBook(_))
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Books => "/books".to_string(),
            Route::BookDetail(id) => format!("/books/{id}"),
            Route::Dashboard => "/dashboard".to_string(),
            Route::AddBook => "/add-book".to_string(),
            Route::EditBook(id) => format!("/edit-book/{id}"),
            Route::Login => gate::SIGN_IN_PATH.to_string(),
            Route::Register => "/register".to_string(),
        }
    }

    /// Parses a client path back into a route. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        let route = match segments.as_slice() {
            [] | [""] => Route::Home,
            ["books"] => Route::Books,
            ["books", id] if !id.is_empty() => Route::BookDetail((*id).to_string()),
            ["dashboard"] => Route::Dashboard,
            ["add-book"] => Route::AddBook,
            ["edit-book", id] if !id.is_empty() => Route::EditBook((*id).to_string()),
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            _ => return None,
        };
        Some(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What the embedder should draw for the current route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Session still resolving; neutral indicator.
    Pending,
    Redirect(Route),
    Page(Route),
}

/// Resolves `route` against the session through the authorization gate.
///
/// Public routes always render.
pub fn resolve(route: &Route, session: &SessionState) -> View {
    if !route.is_protected() {
        return View::Page(route.clone());
    }
    match gate::decide(session) {
        GateDecision::Render => View::Page(route.clone()),
        GateDecision::Redirect => View::Redirect(Route::Login),
        GateDecision::Wait => View::Pending,
    }
}
