//! Configuration commands.

use crate::config::PluginConfig;
use crate::error::{PluginError, PluginResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &PluginConfig) -> PluginResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| PluginError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", PluginConfig::default_path().display());
    println!("{}", toml_str);
    Ok(())
}

/// Validate the configuration: credentials resolve and the URL parses.
pub fn validate(config: &PluginConfig) -> PluginResult<()> {
    config.bluejeans.to_api_config()?;
    println!("BlueJeans credentials are valid.");

    if config.bot_user_id.trim().is_empty() {
        return Err(PluginError::Config("bot_user_id must not be empty".to_string()));
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> PluginResult<()> {
    println!("config: {}", PluginConfig::default_path().display());
    Ok(())
}
