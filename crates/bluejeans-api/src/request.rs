//! JSON request helper shared by every BlueJeans call.
//!
//! Each request:
//! - serializes the optional body as JSON
//! - sends `Content-Type: application/json` and, with a token,
//!   `Authorization: BEARER <token>`
//! - opens a fresh connection and asks the server to close it afterwards
//! - reads the whole body before looking at the status code

use reqwest::header::{AUTHORIZATION, CONNECTION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::config::BlueJeansConfig;
use crate::error::{ApiError, ApiResult};

/// Thin wrapper around a [`reqwest::Client`] bound to an API root.
#[derive(Debug, Clone)]
pub struct JsonTransport {
    client: Client,
    base_url: String,
}

impl JsonTransport {
    /// Builds the transport from the client configuration.
    ///
    /// Idle connections are never pooled, so every call gets its own
    /// connection.
    pub fn new(config: &BlueJeansConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| {
                ApiError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    /// Resolves `path` against the API root.
    ///
    /// Absolute `http(s)://` URLs are used as given.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Sends a request and returns the raw response body.
    ///
    /// # Errors
    ///
    /// - [`Transport`](crate::ApiErrorCode::Transport) if no complete
    ///   response was received
    /// - [`Provider`](crate::ApiErrorCode::Provider) for any status >= 300,
    ///   with the status and body attached
    /// - [`InvalidRequest`](crate::ApiErrorCode::InvalidRequest) if the body
    ///   or headers cannot be encoded
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> ApiResult<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONNECTION, "close");

        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("BEARER {}", token));
        }

        if let Some(body) = body {
            let encoded = serde_json::to_vec(body).map_err(|e| {
                ApiError::invalid_request(format!("failed to encode request body: {}", e))
                    .with_path(&url)
                    .with_source(e)
            })?;
            request = request.body(encoded);
        }

        trace!(method = %method, url = %url, "sending request");

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                ApiError::invalid_request(format!("failed to build request: {}", e))
                    .with_path(&url)
                    .with_source(e)
            } else if e.is_timeout() {
                ApiError::transport(&url, "request timeout").with_source(e)
            } else if e.is_connect() {
                ApiError::transport(&url, format!("connection failed: {}", e)).with_source(e)
            } else {
                ApiError::transport(&url, format!("unable to make request: {}", e)).with_source(e)
            }
        })?;

        let status = response.status();

        // Consuming the body releases the connection on every path below.
        let bytes = response.bytes().await.map_err(|e| {
            ApiError::transport(&url, format!("failed to read response: {}", e)).with_source(e)
        })?;

        trace!(status = %status, len = bytes.len(), "received response");

        if status.as_u16() >= 300 {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            warn!(status = %status, url = %url, "provider rejected request");
            return Err(ApiError::provider(status.as_u16(), body).with_path(url));
        }

        Ok(bytes.to_vec())
    }

    /// Sends a request and decodes the JSON response as `T`.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.send(method, path, body, token).await?;
        decode(&bytes).map_err(|e| e.with_path(self.url_for(path)))
    }
}

/// Decodes a JSON response body.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        ApiError::decode(format!(
            "failed to parse {}: {}",
            std::any::type_name::<T>().rsplit("::").next().unwrap_or("response"),
            e
        ))
        .with_source(e)
    })
}
