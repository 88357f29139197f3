//! `/bluejeans` command execution.
//!
//! [`CommandHandler::execute`] is what the host calls for every
//! `/bluejeans` invocation, [`CommandHandler::start_meeting`] what the
//! channel header button calls. Failures never escape either: they turn
//! into a private reply to the caller, and internal errors are logged.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use tracing::{debug, warn};

use bluejeans_api::MeetingResolver;
use bluejeans_core::links::DEFAULT_JOIN_URL;

use crate::chat::{ChatPlatform, ChatUser};
use crate::command::{self, Action, COMMAND_HELP};
use crate::error::PluginResult;
use crate::post::{self, ChatPost};

pub const REPLY_USER_LOOKUP_FAILED: &str = "We could not retrieve user";
pub const REPLY_CHANNEL_MEMBER_FAILED: &str = "We could not get channel members";
pub const REPLY_HISTORY_FAILED: &str = "Error checking previous messages";
pub const REPLY_ACCOUNT_MISMATCH: &str = "We could not verify your Mattermost account in BlueJeans. Please ensure that your Mattermost email address matches your BlueJeans login email address.";
pub const REPLY_POST_FAILED: &str = "Failed to post message. Please try again.";

/// The invocation context handed over by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    /// Full command line, e.g. `/bluejeans start`.
    pub command: String,
    pub user_id: String,
    pub channel_id: String,
}

impl CommandArgs {
    pub fn new(
        command: impl Into<String>,
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            user_id: user_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

/// Settings for [`CommandHandler`].
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    /// Author of the meeting posts and replies.
    pub bot_user_id: String,
    /// Base of the join links.
    pub join_url: String,
    /// How far back to look for a meeting already started in the channel.
    pub duplicate_window: TimeDelta,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            bot_user_id: "bluejeans".to_string(),
            join_url: DEFAULT_JOIN_URL.to_string(),
            duplicate_window: TimeDelta::seconds(30),
        }
    }
}

/// Runs `/bluejeans` commands against a chat platform and a resolver.
pub struct CommandHandler {
    chat: Arc<dyn ChatPlatform>,
    resolver: Arc<dyn MeetingResolver>,
    settings: HandlerSettings,
}

impl CommandHandler {
    pub fn new(
        chat: Arc<dyn ChatPlatform>,
        resolver: Arc<dyn MeetingResolver>,
        settings: HandlerSettings,
    ) -> Self {
        Self {
            chat,
            resolver,
            settings,
        }
    }

    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    /// Executes a command and shows any reply to the caller.
    ///
    /// Returns the reply text that was sent, if any.
    pub async fn execute(&self, args: &CommandArgs) -> Option<String> {
        let result = self.execute_command(args).await;
        self.deliver(&args.user_id, &args.channel_id, result).await
    }

    /// Starts the caller's personal meeting without going through command
    /// parsing, as the channel header button does.
    ///
    /// Returns the reply text that was sent, if any.
    pub async fn start_meeting(&self, user_id: &str, channel_id: &str) -> Option<String> {
        let result = match self.lookup_user(user_id).await {
            Ok(user) => {
                self.start(user_id, channel_id, &user.username, &user.email)
                    .await
            }
            Err(reply) => Ok(reply),
        };
        self.deliver(user_id, channel_id, result).await
    }

    /// Executes a command and returns the reply text.
    ///
    /// An empty reply means the outcome was already posted to the channel.
    pub async fn execute_command(&self, args: &CommandArgs) -> PluginResult<String> {
        let action = match command::parse(&args.command) {
            Ok(action) => action,
            Err(e) => return Ok(e.to_string()),
        };

        let user = match self.lookup_user(&args.user_id).await {
            Ok(user) => user,
            Err(reply) => return Ok(reply),
        };

        match action {
            Action::Start => {
                self.start(&args.user_id, &args.channel_id, &user.username, &user.email)
                    .await
            }
            Action::Help => Ok(COMMAND_HELP.to_string()),
            Action::Unknown(other) => Ok(format!("Unknown action {}", other)),
        }
    }

    async fn deliver(
        &self,
        user_id: &str,
        channel_id: &str,
        result: PluginResult<String>,
    ) -> Option<String> {
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, user = %user_id, channel = %channel_id, "failed to handle request");
                String::new()
            }
        };

        if reply.is_empty() {
            return None;
        }

        let post = ChatPost::new(&self.settings.bot_user_id, channel_id, &reply);
        if let Err(e) = self.chat.send_ephemeral_post(user_id, post).await {
            warn!(error = %e, user = %user_id, "failed to send command response");
        }
        Some(reply)
    }

    /// Looks up the caller, or returns the reply explaining the failure.
    async fn lookup_user(&self, user_id: &str) -> Result<ChatUser, String> {
        self.chat.get_user(user_id).await.map_err(|e| {
            debug!(error = %e, "user lookup failed");
            format!("{} (userId: {})", REPLY_USER_LOOKUP_FAILED, user_id)
        })
    }

    async fn start(
        &self,
        user_id: &str,
        channel_id: &str,
        username: &str,
        email: &str,
    ) -> PluginResult<String> {
        if let Err(e) = self.chat.get_channel_member(channel_id, user_id).await {
            debug!(error = %e, "channel membership check failed");
            return Ok(format!(
                "{} (channelId: {})",
                REPLY_CHANNEL_MEMBER_FAILED, channel_id
            ));
        }

        let now = Utc::now();
        let window = self.settings.duplicate_window;
        let recent = match self.chat.posts_since(channel_id, now - window).await {
            Ok(posts) => {
                post::find_recent_meeting(&posts, now, window, &self.settings.join_url)
            }
            Err(e) => {
                debug!(error = %e, "reading channel history failed");
                return Ok(REPLY_HISTORY_FAILED.to_string());
            }
        };

        if let Some(recent) = recent {
            debug!(meeting = %recent.meeting_id, creator = %recent.creator_username, "meeting already started");
            let notice =
                post::recent_meeting_notice(&self.settings.bot_user_id, channel_id, &recent);
            self.chat.send_ephemeral_post(user_id, notice).await?;
            return Ok(String::new());
        }

        let meeting_id = match self.resolver.resolve_meeting_id(email).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, resolver = self.resolver.name(), "meeting lookup failed");
                return Ok(REPLY_ACCOUNT_MISMATCH.to_string());
            }
        };

        let meeting_post = post::meeting_post(
            &self.settings.bot_user_id,
            channel_id,
            username,
            &meeting_id,
            &self.settings.join_url,
        );
        if let Err(e) = self.chat.create_post(meeting_post).await {
            warn!(error = %e, "failed to post meeting");
            return Ok(REPLY_POST_FAILED.to_string());
        }

        debug!(meeting = %meeting_id, channel = %channel_id, "meeting posted");
        Ok(String::new())
    }
}
