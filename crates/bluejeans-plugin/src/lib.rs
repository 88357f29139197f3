//! Chat slash-command glue for BlueJeans personal meetings
//!
//! This crate provides the `/bluejeans` command handler and the
//! `bluejeans-bridge` command-line interface.

pub mod chat;
pub mod cli;
pub mod command;
pub mod commands;
pub mod config;
pub mod error;
pub mod handler;
pub mod post;
pub mod secret;

pub use chat::{ChatError, ChatPlatform, ChatResult, ChatUser, MemoryChat};
pub use cli::Cli;
pub use command::{Action, CommandDefinition, ParseError};
pub use config::PluginConfig;
pub use error::{PluginError, PluginResult};
pub use handler::{CommandArgs, CommandHandler, HandlerSettings};
pub use post::ChatPost;
