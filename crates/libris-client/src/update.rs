//! Client reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use libris_core::api::ApiError;
use libris_types::SessionState;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::{book, catalog, dashboard, session};
use crate::route::Route;
use crate::state::AppState;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Navigate(route) => navigate(app, route),
        UiEvent::SearchChanged(term) => catalog::update::handle_search(&mut app.catalog, term),
        UiEvent::CategorySelected(category) => {
            catalog::update::handle_category(&mut app.catalog, category)
        }
        UiEvent::PageRequested(page) => catalog::update::handle_page(&mut app.catalog, page),
        UiEvent::NextPage => catalog::update::handle_next(&mut app.catalog),
        UiEvent::PrevPage => catalog::update::handle_prev(&mut app.catalog),
        UiEvent::RetryCatalog => catalog::update::handle_retry(&mut app.catalog),
        UiEvent::LoginSubmitted(credentials) => {
            session::update::handle_login_submitted(&mut app.auth, credentials)
        }
        UiEvent::RegisterSubmitted(profile) => {
            session::update::handle_register_submitted(&mut app.auth, profile)
        }
        UiEvent::LogoutRequested => session::update::handle_logout_requested(app),
        UiEvent::DeleteRequested => book::update::handle_delete_requested(app),
        UiEvent::FormSubmitted(draft) => book::update::handle_form_submitted(app, draft),
        UiEvent::DismissNotice(index) => {
            if index < app.notices.len() {
                app.notices.remove(index);
            }
            vec![]
        }
        UiEvent::ClearNotices => {
            app.notices.clear();
            vec![]
        }

        UiEvent::SessionChanged(state) => session::update::handle_session_changed(app, state),
        UiEvent::CatalogLoaded { epoch, result } => {
            catalog::update::handle_catalog_loaded(&mut app.catalog, epoch, result)
        }
        UiEvent::CategoriesLoaded(categories) => {
            catalog::update::handle_categories_loaded(&mut app.catalog, categories)
        }
        UiEvent::DashboardLoaded { epoch, result } => {
            dashboard::update::handle_dashboard_loaded(&mut app.dashboard, epoch, result)
        }
        UiEvent::BookLoaded { epoch, result } => {
            book::update::handle_book_loaded(app, epoch, result)
        }
        UiEvent::BookDeleted { id, result } => book::update::handle_book_deleted(app, &id, result),
        UiEvent::BookSaved { editing, result } => {
            book::update::handle_book_saved(app, editing, result)
        }
        UiEvent::LoginFinished(result) => {
            session::update::handle_auth_finished(app, result, "Welcome back")
        }
        UiEvent::RegisterFinished(result) => {
            session::update::handle_auth_finished(app, result, "Welcome")
        }
        UiEvent::LogoutFinished => session::update::handle_logout_finished(app),
    }
}

/// Moves to `route` and issues the loads it needs.
///
/// A protected route under an anonymous session lands on sign-in instead and
/// is remembered for after sign-in.
pub(crate) fn navigate(app: &mut AppState, route: Route) -> Vec<UiEffect> {
    if !matches!(route, Route::BookDetail(_) | Route::EditBook(_)) {
        app.book.leave();
    }
    if route.is_protected() && app.session == SessionState::Anonymous {
        app.return_to = Some(route);
        app.route = Route::Login;
        return vec![];
    }
    app.route = route;
    enter(app)
}

/// Loads for the current route. Protected routes wait until the session is
/// authenticated.
pub(crate) fn enter(app: &mut AppState) -> Vec<UiEffect> {
    if app.route.is_protected() && !app.session.is_authenticated() {
        return vec![];
    }

    match app.route.clone() {
        Route::Books => catalog::update::on_enter(&mut app.catalog),
        Route::BookDetail(id) => vec![app.book.load(&id)],
        Route::Dashboard => vec![app.dashboard.begin()],
        Route::AddBook => {
            app.book.form.start(None);
            categories_if_missing(app)
        }
        Route::EditBook(id) => {
            app.book.form.start(Some(id.clone()));
            let mut effects = vec![app.book.load(&id)];
            effects.extend(categories_if_missing(app));
            effects
        }
        Route::Home | Route::Login | Route::Register => vec![],
    }
}

fn categories_if_missing(app: &AppState) -> Vec<UiEffect> {
    if app.catalog.categories_loaded {
        vec![]
    } else {
        vec![UiEffect::FetchCategories]
    }
}

/// An `Unauthorized` completion means the credential it carried is no
/// longer valid. Callers only pass results that are still current.
pub(crate) fn expire_if_unauthorized(error: &ApiError) -> Option<UiEffect> {
    error.is_unauthorized().then(|| UiEffect::ExpireSession {
        sent_with: error.sent_with.clone(),
    })
}
