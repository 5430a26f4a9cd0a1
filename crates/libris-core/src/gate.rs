//! Authorization gate.
//!
//! Pure decisions over session state. Nothing here holds state; callers
//! re-evaluate on every session transition and every render.

use libris_types::{BookSummary, Identity, SessionState};

/// Sign-in entry point used for redirects.
pub const SIGN_IN_PATH: &str = "/login";

/// What a protected view should do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    /// Go to the sign-in entry point.
    Redirect,
    /// Session not resolved yet: show a neutral pending indicator, do not
    /// redirect.
    Wait,
}

pub fn decide(state: &SessionState) -> GateDecision {
    match state {
        SessionState::Unknown => GateDecision::Wait,
        SessionState::Anonymous => GateDecision::Redirect,
        SessionState::Authenticated(_) => GateDecision::Render,
    }
}

/// Anything with an owning account.
pub trait Owned {
    fn owner_id(&self) -> Option<&str>;
}

impl Owned for BookSummary {
    fn owner_id(&self) -> Option<&str> {
        BookSummary::owner_id(self)
    }
}

impl Owned for libris_types::BookDetail {
    fn owner_id(&self) -> Option<&str> {
        self.summary.owner_id()
    }
}

/// Edit/delete affordance check.
///
/// True for privileged identities, or when the identity owns the resource.
/// Always false without an identity.
pub fn can_modify<R: Owned + ?Sized>(identity: Option<&Identity>, resource: &R) -> bool {
    let Some(identity) = identity else {
        return false;
    };
    identity.is_privileged() || resource.owner_id() == Some(identity.id.as_str())
}

/// Whether "add book" affordances apply.
pub fn can_contribute(state: &SessionState) -> bool {
    state.is_authenticated()
}
