//! Session state as observed by readers.

use crate::identity::Identity;

/// Exactly one of these holds at any time.
///
/// `Unknown` is the start-up state before the persisted credential has been
/// resolved. It is distinct from `Anonymous`: no claim about the user can be
/// made yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unknown,
    Anonymous,
    Authenticated(Identity),
}

impl SessionState {
    /// Returns the identity when authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, SessionState::Unknown)
    }

    /// Short label for logs. Never includes identity details.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Unknown => "unknown",
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}
