//! HTTP client for the catalog service.
//!
//! Every call yields an [`ApiResult`]; the error kind is the only thing the
//! rest of the core branches on. `Unauthorized` is kept distinct from every
//! other kind because it drives forced session teardown.

use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Context;
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::credential::Credential;

/// Standard User-Agent header for libris API requests.
pub const USER_AGENT: &str = concat!("libris/", env!("CARGO_PKG_VERSION"));

/// Categories of API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 401/403: the credential is missing, expired or rejected.
    Unauthorized,
    /// 404
    NotFound,
    /// 400/422: input rejected; message is meant for the user.
    ValidationFailed,
    /// 409
    Conflict,
    /// 5xx or an unreadable success body.
    ServerError,
    /// Transport error, connect failure or timeout.
    NetworkFailure,
}

impl ApiErrorKind {
    /// Transient failures keep previous state and are retried by the user.
    pub fn is_transient(self) -> bool {
        matches!(self, ApiErrorKind::ServerError | ApiErrorKind::NetworkFailure)
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::NotFound => write!(f, "not_found"),
            ApiErrorKind::ValidationFailed => write!(f, "validation_failed"),
            ApiErrorKind::Conflict => write!(f, "conflict"),
            ApiErrorKind::ServerError => write!(f, "server_error"),
            ApiErrorKind::NetworkFailure => write!(f, "network_failure"),
        }
    }
}

/// Structured error from the catalog service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display.
    pub message: String,
    /// Raw response body, when there was one.
    pub details: Option<String>,
    /// Bearer credential the failed request carried. An `Unauthorized`
    /// verdict only applies to this credential.
    pub sent_with: Option<Credential>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            sent_with: None,
        }
    }

    /// Records the credential the failed request was sent with.
    #[must_use]
    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.sent_with = credential;
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NetworkFailure, message)
    }

    /// Builds an error from a non-success HTTP status.
    ///
    /// Prefers the service's `{"message": ..}` text over the bare status.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => ApiErrorKind::Unauthorized,
            404 => ApiErrorKind::NotFound,
            400 | 422 => ApiErrorKind::ValidationFailed,
            409 => ApiErrorKind::Conflict,
            _ => ApiErrorKind::ServerError,
        };

        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .or_else(|| json.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP {status}"));

        Self {
            kind,
            message,
            details: (!body.is_empty()).then(|| body.to_string()),
            sent_with: None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Catalog service client.
///
/// Cheap to clone; clones share the bearer credential slot so a login or
/// logout is visible to every in-flight caller's next request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer: Arc<RwLock<Option<Credential>>>,
}

impl ApiClient {
    /// Creates a client for `base_url` (no trailing slash needed).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer: Arc::new(RwLock::new(None)),
        })
    }

    /// Creates a client from the resolved configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(&config.resolved_api_base_url()?, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replaces the bearer credential attached to subsequent requests.
    pub fn set_credential(&self, credential: Option<Credential>) {
        match self.bearer.write() {
            Ok(mut slot) => *slot = credential,
            Err(poisoned) => *poisoned.into_inner() = credential,
        }
    }

    pub fn credential(&self) -> Option<Credential> {
        match self.bearer.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on transport, status or decode failure.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let body = self
            .execute(self.http.get(self.url(path)).query(query), None)
            .await?;
        decode(&body)
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on transport, status or decode failure.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = self
            .execute(self.http.post(self.url(path)).json(body), None)
            .await?;
        decode(&body)
    }

    /// # Errors
    /// Returns a classified [`ApiError`] on transport, status or decode failure.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = self
            .execute(self.http.put(self.url(path)).json(body), None)
            .await?;
        decode(&body)
    }

    /// Sends a DELETE; the response body is ignored.
    ///
    /// # Errors
    /// Returns a classified [`ApiError`] on transport or status failure.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute(self.http.delete(self.url(path)), None)
            .await
            .map(|_| ())
    }

    /// GETs with an explicit credential instead of the shared slot.
    ///
    /// Used to validate a stored credential before it is installed.
    ///
    /// # Errors
    /// Returns a classified [`ApiError`] on transport, status or decode failure.
    pub async fn get_as<T: DeserializeOwned>(
        &self,
        path: &str,
        credential: &Credential,
    ) -> ApiResult<T> {
        let body = self
            .execute(self.http.get(self.url(path)), Some(credential))
            .await?;
        decode(&body)
    }

    /// POSTs with an explicit credential instead of the shared slot.
    ///
    /// Used to revoke a session after it has already been cleared locally.
    ///
    /// # Errors
    /// Returns a classified [`ApiError`] on transport or status failure.
    pub async fn post_as(&self, path: &str, credential: &Credential) -> ApiResult<()> {
        self.execute(self.http.post(self.url(path)), Some(credential))
            .await
            .map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        credential: Option<&Credential>,
    ) -> ApiResult<String> {
        let bearer = match credential {
            Some(credential) => Some(credential.clone()),
            None => self.credential(),
        };
        let request = match &bearer {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e).with_credential(bearer.clone()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(e).with_credential(bearer.clone()))?;

        if !status.is_success() {
            let error = ApiError::from_status(status.as_u16(), &body).with_credential(bearer);
            debug!(status = status.as_u16(), kind = %error.kind, "request failed");
            return Err(error);
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(String::new());
        }
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|e| ApiError {
        kind: ApiErrorKind::ServerError,
        message: format!("Invalid response body: {e}"),
        details: Some(body.to_string()),
        sent_with: None,
    })
}

fn classify_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::network(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ApiError::network(format!("Connection failed: {e}"))
    } else {
        ApiError::network(format!("Network error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiError::from_status(401, "").kind, ApiErrorKind::Unauthorized);
        assert_eq!(ApiError::from_status(403, "").kind, ApiErrorKind::Unauthorized);
        assert_eq!(ApiError::from_status(404, "").kind, ApiErrorKind::NotFound);
        assert_eq!(
            ApiError::from_status(422, "").kind,
            ApiErrorKind::ValidationFailed
        );
        assert_eq!(ApiError::from_status(409, "").kind, ApiErrorKind::Conflict);
        assert_eq!(ApiError::from_status(502, "").kind, ApiErrorKind::ServerError);
    }

    #[test]
    fn test_message_extracted_from_json_body() {
        let err = ApiError::from_status(400, r#"{"success":false,"message":"ISBN required"}"#);
        assert_eq!(err.message, "ISBN required");
        assert!(err.details.is_some());
    }

    #[test]
    fn test_message_falls_back_to_status() {
        let err = ApiError::from_status(500, "<html>oops</html>");
        assert_eq!(err.message, "HTTP 500");
        assert_eq!(err.details.as_deref(), Some("<html>oops</html>"));
    }

    #[test]
    fn test_transient_kinds() {
        assert!(ApiErrorKind::NetworkFailure.is_transient());
        assert!(ApiErrorKind::ServerError.is_transient());
        assert!(!ApiErrorKind::Unauthorized.is_transient());
        assert!(!ApiErrorKind::ValidationFailed.is_transient());
    }

    #[test]
    fn test_url_join() {
        let client = ApiClient::new("http://api.test/api/", None).unwrap();
        assert_eq!(client.url("/books"), "http://api.test/api/books");
        assert_eq!(client.url("books/1"), "http://api.test/api/books/1");
    }

    #[test]
    fn test_undecodable_body_is_server_error() {
        let err = decode::<Value>("not json").unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::ServerError);
    }
}
