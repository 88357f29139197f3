//! Plugin configuration.
//!
//! Settings live in `~/.config/bluejeans-bridge/config.toml` by default:
//!
//! ```toml
//! bot_user_id = "bluejeans"
//!
//! [bluejeans]
//! url = ""                          # empty -> https://api.bluejeans.com
//! client_id = "env::BLUEJEANS_CLIENT_ID"
//! client_secret = "pass::bluejeans/client-secret"
//! timeout = 30
//!
//! [meeting]
//! join_url = "https://bluejeans.com"
//! duplicate_window_secs = 30
//! ```
//!
//! Credentials accept secret references, see [`crate::secret`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use bluejeans_api::BlueJeansConfig;
use bluejeans_core::links::DEFAULT_JOIN_URL;

use crate::error::{PluginError, PluginResult};
use crate::handler::HandlerSettings;

/// Longest accepted duplicate window.
const MAX_DUPLICATE_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Chat user the meeting posts are attributed to.
    pub bot_user_id: String,

    pub bluejeans: BlueJeansSettings,

    pub meeting: MeetingSettings,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            bot_user_id: "bluejeans".to_string(),
            bluejeans: BlueJeansSettings::default(),
            meeting: MeetingSettings::default(),
        }
    }
}

/// BlueJeans API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueJeansSettings {
    /// API root; empty selects the production host.
    pub url: String,

    /// OAuth client id (supports `pass::` and `env::` prefixes).
    pub client_id: Option<String>,

    /// OAuth client secret (supports `pass::` and `env::` prefixes).
    pub client_secret: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout: u64,
}

impl Default for BlueJeansSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            client_id: None,
            client_secret: None,
            timeout: BlueJeansConfig::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Meeting post settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingSettings {
    /// Base of the join links.
    pub join_url: String,

    /// A meeting started this recently in the channel is reused.
    pub duplicate_window_secs: u64,
}

impl Default for MeetingSettings {
    fn default() -> Self {
        Self {
            join_url: DEFAULT_JOIN_URL.to_string(),
            duplicate_window_secs: 30,
        }
    }
}

impl PluginConfig {
    /// Loads the default file, or defaults when it does not exist.
    pub fn load() -> PluginResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads a specific file.
    pub fn load_from(path: &Path) -> PluginResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PluginError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            PluginError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bluejeans-bridge")
    }

    /// Settings for the command handler.
    pub fn handler_settings(&self) -> HandlerSettings {
        let secs = self.meeting.duplicate_window_secs.min(MAX_DUPLICATE_WINDOW_SECS);
        HandlerSettings {
            bot_user_id: self.bot_user_id.clone(),
            join_url: self.meeting.join_url.clone(),
            duplicate_window: TimeDelta::seconds(secs as i64),
        }
    }
}

impl BlueJeansSettings {
    /// Resolves `(client_id, client_secret)`, expanding secret references.
    pub fn resolve_credentials(&self) -> PluginResult<(String, String)> {
        let raw_id = self.client_id.as_deref().ok_or_else(|| {
            PluginError::Config(format!(
                "BlueJeans credentials not found. Add to {}:\n  \
                 [bluejeans]\n  \
                 client_id = \"YOUR_CLIENT_ID\"\n  \
                 client_secret = \"YOUR_CLIENT_SECRET\"",
                PluginConfig::default_path().display()
            ))
        })?;
        let raw_secret = self.client_secret.as_deref().ok_or_else(|| {
            PluginError::Config(
                "client_secret is missing from [bluejeans] section in config.toml".to_string(),
            )
        })?;

        let client_id = crate::secret::resolve(raw_id)
            .map_err(|e| PluginError::Config(format!("failed to resolve client_id: {}", e)))?;
        let client_secret = crate::secret::resolve(raw_secret)
            .map_err(|e| PluginError::Config(format!("failed to resolve client_secret: {}", e)))?;

        if client_id.is_empty() || client_secret.is_empty() {
            return Err(PluginError::Config(
                "client_id and client_secret must not be empty".to_string(),
            ));
        }

        Ok((client_id, client_secret))
    }

    /// Builds the API client configuration.
    pub fn to_api_config(&self) -> PluginResult<BlueJeansConfig> {
        let (client_id, client_secret) = self.resolve_credentials()?;
        let config = BlueJeansConfig::new(&self.url, client_id, client_secret).map_err(|e| {
            PluginError::Config(format!("invalid BlueJeans url '{}': {}", self.url, e))
        })?;
        Ok(config.with_timeout(Duration::from_secs(self.timeout)))
    }
}
