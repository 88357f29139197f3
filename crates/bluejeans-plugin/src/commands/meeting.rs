//! `meeting` command: resolve a personal meeting directly.

use tracing::debug;

use bluejeans_api::{BlueJeansClient, PersonalMeeting};
use bluejeans_core::links::meeting_link;

use crate::config::PluginConfig;
use crate::error::PluginResult;

/// Resolves the personal meeting of `email` with the configured client.
pub async fn lookup(config: &PluginConfig, email: &str) -> PluginResult<PersonalMeeting> {
    let client = BlueJeansClient::new(config.bluejeans.to_api_config()?)?;
    debug!(base_url = %client.base_url(), email = %email, "looking up personal meeting");
    Ok(client.resolve_personal_meeting(email).await?)
}

/// Renders a meeting for the terminal.
pub fn render(meeting: &PersonalMeeting, json: bool, join_url: &str) -> PluginResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(meeting)?);
    }

    let mut out = format!(
        "{}\n{}",
        meeting.numeric_meeting_id,
        meeting_link(join_url, &meeting.numeric_meeting_id)
    );
    if let Some(passcode) = meeting.passcode() {
        out.push_str(&format!("\npasscode: {}", passcode));
    }
    if !meeting.is_open() {
        out.push_str("\n(meeting is locked or expired)");
    }
    Ok(out)
}

/// Prints the personal meeting of `email`.
pub async fn run(config: &PluginConfig, email: &str, json: bool) -> PluginResult<()> {
    let meeting = lookup(config, email).await?;
    println!("{}", render(&meeting, json, &config.meeting.join_url)?);
    Ok(())
}
