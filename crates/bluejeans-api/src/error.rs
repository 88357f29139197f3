//! Error types for BlueJeans API calls.
//!
//! Every step of the meeting lookup returns an [`ApiError`]. The
//! [`ApiErrorCode`] tells the caller which kind of failure happened so it
//! can pick its own wording; this crate never produces user-facing text.

use std::fmt;
use thiserror::Error;

/// The category of an API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    /// The request never produced a response (DNS, refused connection,
    /// timeout, truncated body).
    Transport,
    /// The provider answered with a status code of 300 or above.
    Provider,
    /// The response body did not match the expected JSON shape.
    Decode,
    /// The user directory returned no match.
    NotFound,
    /// The request could not be built (unserializable body, bad header).
    InvalidRequest,
    /// Invalid base URL or HTTP transport settings.
    Configuration,
}

impl ApiErrorCode {
    /// Returns a stable machine-readable name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport_error",
            Self::Provider => "provider_error",
            Self::Decode => "decode_error",
            Self::NotFound => "not_found",
            Self::InvalidRequest => "invalid_request",
            Self::Configuration => "configuration_error",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error raised while talking to the BlueJeans API.
#[derive(Debug, Error)]
pub struct ApiError {
    code: ApiErrorCode,
    message: String,
    /// Target URL or path of the failed request.
    path: Option<String>,
    /// HTTP status, only for [`ApiErrorCode::Provider`].
    status: Option<u16>,
    /// Raw response body, only for [`ApiErrorCode::Provider`].
    body: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            status: None,
            body: None,
            source: None,
        }
    }

    /// Creates a transport error for a request to `path`.
    pub fn transport(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Transport, message).with_path(path)
    }

    /// Creates an error for a non-success status, keeping the raw body.
    pub fn provider(status: u16, body: impl Into<String>) -> Self {
        let mut err = Self::new(
            ApiErrorCode::Provider,
            format!("provider returned HTTP {}", status),
        );
        err.status = Some(status);
        err.body = Some(body.into());
        err
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Decode, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotFound, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidRequest, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Configuration, message)
    }

    /// Sets the request target.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ApiErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ApiErrorCode::NotFound
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(ref path) = self.path {
            write!(f, " ({})", path)?;
        }
        match self.body.as_deref() {
            Some(body) if !body.is_empty() => write!(f, ": {}", body),
            _ => Ok(()),
        }
    }
}

/// A specialized Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_names() {
        assert_eq!(ApiErrorCode::Transport.as_str(), "transport_error");
        assert_eq!(ApiErrorCode::NotFound.to_string(), "not_found");
    }

    #[test]
    fn transport_carries_path() {
        let err = ApiError::transport("https://api.bluejeans.com/oauth2/token?client", "refused");
        assert_eq!(err.code(), ApiErrorCode::Transport);
        assert_eq!(
            err.path(),
            Some("https://api.bluejeans.com/oauth2/token?client")
        );
        assert!(err.status().is_none());
    }

    #[test]
    fn provider_carries_status_and_body() {
        let err = ApiError::provider(401, r#"{"error":"invalid_client"}"#);
        assert_eq!(err.code(), ApiErrorCode::Provider);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.body(), Some(r#"{"error":"invalid_client"}"#));
    }

    #[test]
    fn display_includes_context() {
        let err = ApiError::provider(500, "boom").with_path("/v1/user/1/personal_meeting");
        let display = err.to_string();
        assert!(display.starts_with("provider_error: provider returned HTTP 500"));
        assert!(display.contains("(/v1/user/1/personal_meeting)"));
        assert!(display.ends_with(": boom"));
    }

    #[test]
    fn display_skips_empty_body() {
        let err = ApiError::provider(404, "");
        assert_eq!(err.to_string(), "provider_error: provider returned HTTP 404");
    }

    #[test]
    fn not_found_predicate() {
        assert!(ApiError::not_found("no user").is_not_found());
        assert!(!ApiError::decode("bad json").is_not_found());
    }

    #[test]
    fn with_source_is_exposed() {
        use std::error::Error;
        let io_err = std::io::Error::other("reset by peer");
        let err = ApiError::transport("/x", "read failed").with_source(io_err);
        assert!(err.source().is_some());
    }
}
