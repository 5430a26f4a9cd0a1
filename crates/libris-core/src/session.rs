//! Session manager.
//!
//! Owns the authenticated-identity lifecycle. The current [`SessionState`] is
//! published through a `watch` channel; readers subscribe instead of polling.
//!
//! ## Transitions
//!
//! ```text
//! Unknown ──initialize──▶ Authenticated(id) | Anonymous
//! Anonymous ──login/register──▶ Authenticated(id)
//! Authenticated ──login/register──▶ Authenticated(new id)
//! Authenticated ──logout/expire──▶ Anonymous
//! ```
//!
//! The bearer credential attached to the API client and the identity in the
//! published state are always changed together, in one synchronous step.

use std::fmt;
use std::sync::Arc;

use libris_types::{Identity, SessionState};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, ApiErrorKind, ApiResult};
use crate::credential::{Credential, CredentialStore};

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const ME_PATH: &str = "/auth/me";
const LOGOUT_PATH: &str = "/auth/logout";

/// Email/password pair submitted by the sign-in form.
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// New-account details submitted by the registration form.
#[derive(Clone, Serialize)]
pub struct RegistrationProfile {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegistrationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationProfile")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: Credential,
    #[serde(alias = "data")]
    user: Identity,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(alias = "user")]
    data: Identity,
}

/// Why a login or registration did not establish a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    InvalidCredentials,
    DuplicateAccount,
    /// Rejected input; the message is shown verbatim.
    ValidationFailed(String),
    NetworkFailure(String),
    ServerError(String),
}

impl SessionError {
    fn from_api(error: ApiError) -> Self {
        match error.kind {
            ApiErrorKind::Unauthorized => SessionError::InvalidCredentials,
            ApiErrorKind::ValidationFailed | ApiErrorKind::Conflict => {
                SessionError::ValidationFailed(error.message)
            }
            ApiErrorKind::NetworkFailure => SessionError::NetworkFailure(error.message),
            ApiErrorKind::NotFound | ApiErrorKind::ServerError => {
                SessionError::ServerError(error.message)
            }
        }
    }

    fn from_register_api(error: ApiError) -> Self {
        let duplicate = error.kind == ApiErrorKind::Conflict
            || (error.kind == ApiErrorKind::ValidationFailed
                && error.message.to_lowercase().contains("already exist"));
        if duplicate {
            SessionError::DuplicateAccount
        } else {
            Self::from_api(error)
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidCredentials => write!(f, "Invalid email or password"),
            SessionError::DuplicateAccount => {
                write!(f, "An account with this email already exists")
            }
            SessionError::ValidationFailed(msg) => write!(f, "{msg}"),
            SessionError::NetworkFailure(msg) => write!(f, "Network error: {msg}"),
            SessionError::ServerError(msg) => write!(f, "Server error: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Process-wide authority over the session.
pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
    state: watch::Sender<SessionState>,
    init_lock: Mutex<()>,
}

impl SessionManager {
    /// Creates a manager in the `Unknown` state. Call [`Self::initialize`]
    /// before trusting any authorization decision.
    pub fn new(api: ApiClient, store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self {
            api,
            store,
            state,
            init_lock: Mutex::new(()),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Resolves the persisted credential into a session.
    ///
    /// Runs at most once: once the state has left `Unknown`, further calls
    /// return the current state without touching storage or the network.
    /// A stored credential the service rejects is deleted. A transient
    /// failure resolves to `Anonymous` but keeps the stored credential so the
    /// next start can try again.
    pub async fn initialize(&self) -> SessionState {
        let _guard = self.init_lock.lock().await;
        if self.state.borrow().is_resolved() {
            return self.state();
        }

        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "failed to read stored session; starting anonymous");
                None
            }
        };

        let Some(credential) = stored else {
            self.publish(SessionState::Anonymous);
            return self.state();
        };

        // The shared slot stays empty until the identity is known.
        let resolved = self.api.get_as::<MeResponse>(ME_PATH, &credential).await;

        // A login may have completed while we were waiting.
        if self.state.borrow().is_resolved() {
            return self.state();
        }

        match resolved {
            Ok(me) => {
                self.api.set_credential(Some(credential));
                self.publish(SessionState::Authenticated(me.data));
            }
            Err(e) if e.is_unauthorized() => {
                info!("stored credential rejected");
                self.teardown();
            }
            Err(e) => {
                warn!(kind = %e.kind, error = %e, "could not resolve stored credential");
                self.publish(SessionState::Anonymous);
            }
        }
        self.state()
    }

    /// Signs in and replaces any previous identity.
    ///
    /// On failure the current state is left untouched and nothing is
    /// persisted.
    ///
    /// # Errors
    /// `InvalidCredentials` when the service rejects the pair, otherwise the
    /// transport or validation failure.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Identity, SessionError> {
        let response = self
            .api
            .post::<_, AuthResponse>(LOGIN_PATH, credentials)
            .await
            .map_err(SessionError::from_api)?;
        Ok(self.establish(response))
    }

    /// Creates an account and signs in as it.
    ///
    /// # Errors
    /// Same as [`Self::login`], plus `DuplicateAccount`.
    pub async fn register(&self, profile: &RegistrationProfile) -> Result<Identity, SessionError> {
        let response = self
            .api
            .post::<_, AuthResponse>(REGISTER_PATH, profile)
            .await
            .map_err(SessionError::from_register_api)?;
        Ok(self.establish(response))
    }

    /// Ends the session.
    ///
    /// Local state and the stored credential are cleared before the remote
    /// revocation is attempted; its outcome does not matter.
    pub async fn logout(&self) {
        let previous = self.api.credential();
        self.teardown();

        if let Some(credential) = previous
            && let Err(e) = self.api.post_as(LOGOUT_PATH, &credential).await
        {
            debug!(kind = %e.kind, "remote logout failed; local session already cleared");
        }
    }

    /// Forced teardown after the service rejected `sent_with`.
    ///
    /// Only the session that owns that credential is ended: a rejection of a
    /// credential that has since been replaced (or of an anonymous request)
    /// leaves the current session alone. Returns whether a teardown happened.
    pub fn expire(&self, sent_with: Option<&Credential>) -> bool {
        let current = self.api.credential();
        if sent_with.is_none() || sent_with != current.as_ref() {
            debug!("ignoring rejection of a credential that is no longer current");
            return false;
        }
        info!("credential expired");
        self.teardown();
        true
    }

    /// Passes `result` through, expiring the session when the service
    /// rejected the credential that is still current.
    ///
    /// # Errors
    /// Returns the error unchanged.
    pub fn guard<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(e) = &result
            && e.is_unauthorized()
        {
            self.expire(e.sent_with.as_ref());
        }
        result
    }

    fn establish(&self, response: AuthResponse) -> Identity {
        let AuthResponse { token, user } = response;
        if let Err(e) = self.store.save(&token) {
            warn!(error = %e, "failed to persist session; it will not survive a restart");
        }
        self.api.set_credential(Some(token));
        self.publish(SessionState::Authenticated(user.clone()));
        user
    }

    fn teardown(&self) {
        self.api.set_credential(None);
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to remove stored session");
        }
        self.publish(SessionState::Anonymous);
    }

    fn publish(&self, next: SessionState) {
        let previous = self.state.send_replace(next);
        let current = self.state.borrow();
        if previous.label() != current.label() {
            info!(from = previous.label(), to = current.label(), "session transition");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(kind: ApiErrorKind, message: &str) -> ApiError {
        ApiError::new(kind, message)
    }

    #[test]
    fn test_login_error_mapping() {
        assert_eq!(
            SessionError::from_api(api_error(ApiErrorKind::Unauthorized, "nope")),
            SessionError::InvalidCredentials
        );
        assert_eq!(
            SessionError::from_api(api_error(ApiErrorKind::NetworkFailure, "down")),
            SessionError::NetworkFailure("down".to_string())
        );
        assert_eq!(
            SessionError::from_api(api_error(ApiErrorKind::ValidationFailed, "email required")),
            SessionError::ValidationFailed("email required".to_string())
        );
    }

    #[test]
    fn test_register_duplicate_detection() {
        assert_eq!(
            SessionError::from_register_api(api_error(ApiErrorKind::Conflict, "taken")),
            SessionError::DuplicateAccount
        );
        assert_eq!(
            SessionError::from_register_api(api_error(
                ApiErrorKind::ValidationFailed,
                "User already exists"
            )),
            SessionError::DuplicateAccount
        );
        assert_eq!(
            SessionError::from_register_api(api_error(
                ApiErrorKind::ValidationFailed,
                "Password too short"
            )),
            SessionError::ValidationFailed("Password too short".to_string())
        );
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let rendered = format!("{:?}", LoginCredentials::new("a@b.c", "hunter2"));
        assert!(!rendered.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_initialize_without_credential_is_anonymous_and_idempotent() {
        let api = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        let store = Arc::new(crate::credential::MemoryCredentialStore::default());
        let manager = SessionManager::new(api, store);

        assert_eq!(manager.state(), SessionState::Unknown);
        assert_eq!(manager.initialize().await, SessionState::Anonymous);
        assert_eq!(manager.initialize().await, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_expire_clears_credential() {
        let api = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        let store = Arc::new(crate::credential::MemoryCredentialStore::with_credential(
            Credential::new("tok"),
        ));
        let manager = SessionManager::new(api, Arc::clone(&store) as Arc<dyn CredentialStore>);
        manager.api().set_credential(Some(Credential::new("tok")));

        let result: ApiResult<()> = Err(api_error(ApiErrorKind::Unauthorized, "expired")
            .with_credential(Some(Credential::new("tok"))));
        assert!(manager.guard(result).is_err());

        assert_eq!(manager.state(), SessionState::Anonymous);
        assert!(manager.api().credential().is_none());
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_expire_ignores_replaced_credential() {
        let api = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        let store = Arc::new(crate::credential::MemoryCredentialStore::with_credential(
            Credential::new("new"),
        ));
        let manager = SessionManager::new(api, Arc::clone(&store) as Arc<dyn CredentialStore>);
        manager.api().set_credential(Some(Credential::new("new")));

        assert!(!manager.expire(Some(&Credential::new("old"))));
        assert!(!manager.expire(None));
        assert_eq!(manager.api().credential(), Some(Credential::new("new")));
        assert_eq!(store.load().unwrap(), Some(Credential::new("new")));
    }
}
