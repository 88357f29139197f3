//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// bluejeans-bridge - BlueJeans personal meetings from chat
#[derive(Debug, Parser)]
#[command(name = "bluejeans-bridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "BLUEJEANS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up the personal meeting of a BlueJeans user
    Meeting {
        /// Email address of the BlueJeans user
        email: String,

        /// Print the whole meeting as JSON instead of the numeric id
        #[arg(long)]
        json: bool,
    },

    /// Run a slash command against an in-memory chat channel
    Run {
        /// The command line, e.g. "/bluejeans start"
        text: String,

        /// Email of the invoking chat user
        #[arg(long)]
        email: String,

        /// Chat user id
        #[arg(long, default_value = "me")]
        user_id: String,

        /// Chat username
        #[arg(long, default_value = "me")]
        username: String,

        /// Channel the command is run in
        #[arg(long, default_value = "town-square")]
        channel_id: String,
    },

    /// Start a meeting the way the channel header button does
    Start {
        /// Email of the invoking chat user
        #[arg(long)]
        email: String,

        /// Chat user id
        #[arg(long, default_value = "me")]
        user_id: String,

        /// Chat username
        #[arg(long, default_value = "me")]
        username: String,

        /// Channel to start the meeting in
        #[arg(long, default_value = "town-square")]
        channel_id: String,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
