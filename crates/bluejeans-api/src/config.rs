//! BlueJeans client configuration.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use url::Url;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.bluejeans.com";

/// The only grant type the token endpoint is called with.
pub const GRANT_TYPE: &str = "client_credentials";

/// Client identity sent to the token endpoint.
///
/// Serializes to the exact token request body:
/// `{"grant_type":"client_credentials","client_id":...,"client_secret":...}`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    grant_type: &'static str,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            grant_type: GRANT_TYPE,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn grant_type(&self) -> &str {
        self.grant_type
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Configuration for [`BlueJeansClient`](crate::BlueJeansClient).
#[derive(Debug, Clone)]
pub struct BlueJeansConfig {
    /// API root, without trailing slash.
    base_url: String,

    pub credentials: Credentials,

    /// Per-request timeout, applied to each call of the lookup chain.
    pub timeout: Duration,

    pub user_agent: String,
}

impl BlueJeansConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration for the given API root and credentials.
    ///
    /// An empty (or blank) `base_url` selects [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(
        base_url: impl AsRef<str>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        let raw = base_url.as_ref().trim();
        let raw = if raw.is_empty() { DEFAULT_BASE_URL } else { raw };
        Url::parse(raw)?;

        Ok(Self {
            base_url: raw.trim_end_matches('/').to_string(),
            credentials: Credentials::new(client_id, client_secret),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("bluejeans-bridge/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the API root.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
