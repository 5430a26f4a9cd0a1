//! Session reducer.
//!
//! Views follow the session, never the other way round: every published
//! transition re-evaluates the current route.

use libris_core::session::{LoginCredentials, RegistrationProfile, SessionError};
use libris_types::{Identity, SessionState};

use super::AuthFormState;
use crate::effects::UiEffect;
use crate::route::Route;
use crate::state::{AppState, NoticeLevel};
use crate::update::{enter, navigate};

pub fn handle_session_changed(app: &mut AppState, next: SessionState) -> Vec<UiEffect> {
    let previous = std::mem::replace(&mut app.session, next);
    if previous == app.session {
        return vec![];
    }

    match &app.session {
        SessionState::Unknown => vec![],
        SessionState::Anonymous => {
            app.dashboard.reset();
            if app.route.is_protected() {
                app.return_to = Some(std::mem::replace(&mut app.route, Route::Login));
            }
            vec![]
        }
        SessionState::Authenticated(identity) => {
            let same_identity = previous.identity().map(|i| &i.id) == Some(&identity.id);
            if matches!(app.route, Route::Login | Route::Register) {
                let target = app.return_to.take().unwrap_or(Route::Dashboard);
                return navigate(app, target);
            }
            if app.route.is_protected() && !same_identity {
                return enter(app);
            }
            vec![]
        }
    }
}

pub fn handle_login_submitted(auth: &mut AuthFormState, credentials: LoginCredentials) -> Vec<UiEffect> {
    if auth.submitting {
        return vec![];
    }
    auth.submitting = true;
    auth.error = None;
    vec![UiEffect::Login(credentials)]
}

pub fn handle_register_submitted(
    auth: &mut AuthFormState,
    profile: RegistrationProfile,
) -> Vec<UiEffect> {
    if auth.submitting {
        return vec![];
    }
    auth.submitting = true;
    auth.error = None;
    vec![UiEffect::Register(profile)]
}

/// Login and registration share one outcome path; navigation happens when
/// the session manager publishes the new state.
pub fn handle_auth_finished(
    app: &mut AppState,
    result: Result<Identity, SessionError>,
    greeting: &str,
) -> Vec<UiEffect> {
    app.auth.submitting = false;
    match result {
        Ok(identity) => {
            app.auth.error = None;
            app.notify(NoticeLevel::Success, format!("{greeting}, {}!", identity.name));
        }
        Err(e) => {
            let text = e.to_string();
            app.auth.error = Some(text.clone());
            app.notify(NoticeLevel::Error, text);
        }
    }
    vec![]
}

pub fn handle_logout_requested(app: &mut AppState) -> Vec<UiEffect> {
    app.return_to = None;
    let mut effects = vec![UiEffect::Logout];
    effects.extend(navigate(app, Route::Home));
    effects
}

pub fn handle_logout_finished(app: &mut AppState) -> Vec<UiEffect> {
    app.notify(NoticeLevel::Success, "Logged out successfully");
    vec![]
}
