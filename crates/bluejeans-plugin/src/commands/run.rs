//! `run` and `start` commands: drive the handler against an in-memory channel.

use std::sync::Arc;

use tracing::debug;

use bluejeans_api::{BlueJeansClient, MeetingResolver};

use crate::chat::{ChatUser, MemoryChat};
use crate::config::PluginConfig;
use crate::error::PluginResult;
use crate::handler::{CommandArgs, CommandHandler};
use crate::post::ChatPost;

/// The invoking chat user and the channel the command runs in.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub user: ChatUser,
    pub channel_id: String,
}

/// What to run on behalf of the invoking user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// A slash command line, e.g. `/bluejeans start`.
    Command(String),
    /// The channel header button.
    StartButton,
}

/// Everything the command produced.
#[derive(Debug, Default)]
pub struct Transcript {
    pub channel: Vec<ChatPost>,
    pub ephemeral: Vec<ChatPost>,
}

impl Transcript {
    /// Renders the posts, channel posts first.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for post in &self.channel {
            lines.push(format!("[#{}] {}: {}", post.channel_id, post.user_id, post.message));
        }
        for post in &self.ephemeral {
            lines.push(format!("[private] {}: {}", post.user_id, post.message));
        }
        lines.join("\n")
    }
}

/// Seeds a channel with the invoking user and runs the request through it.
pub async fn execute(
    config: &PluginConfig,
    resolver: Arc<dyn MeetingResolver>,
    invocation: &Invocation,
    request: &Request,
) -> Transcript {
    let chat = Arc::new(MemoryChat::new());
    chat.add_user(invocation.user.clone());
    chat.add_member(&invocation.channel_id, &invocation.user.id);

    debug!(resolver = resolver.name(), channel = %invocation.channel_id, ?request, "running request");
    let handler = CommandHandler::new(chat.clone(), resolver, config.handler_settings());
    match request {
        Request::Command(text) => {
            handler
                .execute(&CommandArgs::new(
                    text,
                    &invocation.user.id,
                    &invocation.channel_id,
                ))
                .await;
        }
        Request::StartButton => {
            handler
                .start_meeting(&invocation.user.id, &invocation.channel_id)
                .await;
        }
    }

    Transcript {
        channel: chat.channel_posts(&invocation.channel_id),
        ephemeral: chat.ephemeral_posts(&invocation.user.id),
    }
}

/// Runs the request with the configured BlueJeans client and prints the outcome.
pub async fn run(config: &PluginConfig, invocation: Invocation, request: Request) -> PluginResult<()> {
    let client = BlueJeansClient::new(config.bluejeans.to_api_config()?)?;
    let transcript = execute(config, Arc::new(client), &invocation, &request).await;
    println!("{}", transcript.render());
    Ok(())
}
