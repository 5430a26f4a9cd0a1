//! Sign-in, registration and session transitions.

pub mod update;

/// Login/register form status.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthFormState {
    pub submitting: bool,
    pub error: Option<String>,
}
