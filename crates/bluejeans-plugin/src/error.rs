//! Plugin error types.

use std::fmt;

use bluejeans_api::ApiError;

use crate::chat::ChatError;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur in the plugin.
#[derive(Debug)]
pub enum PluginError {
    /// Configuration error.
    Config(String),
    /// BlueJeans API error.
    Api(ApiError),
    /// Chat platform error.
    Chat(ChatError),
    /// IO error.
    Io(std::io::Error),
    /// JSON encoding error.
    Serialization(serde_json::Error),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Api(err) => write!(f, "BlueJeans API error: {}", err),
            Self::Chat(err) => write!(f, "chat error: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Serialization(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for PluginError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(err) => Some(err),
            Self::Chat(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<ApiError> for PluginError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<ChatError> for PluginError {
    fn from(err: ChatError) -> Self {
        Self::Chat(err)
    }
}

impl From<std::io::Error> for PluginError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}
