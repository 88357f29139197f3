//! bluejeans-bridge CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use bluejeans_core::{TracingConfig, init_tracing};
use bluejeans_plugin::chat::ChatUser;
use bluejeans_plugin::cli::{Cli, Command, ConfigAction};
use bluejeans_plugin::commands::run::{Invocation, Request};
use bluejeans_plugin::config::PluginConfig;
use bluejeans_plugin::error::PluginResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> PluginResult<()> {
    let config = match cli.config {
        Some(ref path) => PluginConfig::load_from(path)?,
        None => PluginConfig::load()?,
    };

    match cli.command {
        Command::Meeting { email, json } => {
            bluejeans_plugin::commands::meeting::run(&config, &email, json).await
        }
        Command::Run {
            text,
            email,
            user_id,
            username,
            channel_id,
        } => {
            let invocation = Invocation {
                user: ChatUser::new(user_id, username, email),
                channel_id,
            };
            bluejeans_plugin::commands::run::run(&config, invocation, Request::Command(text)).await
        }
        Command::Start {
            email,
            user_id,
            username,
            channel_id,
        } => {
            let invocation = Invocation {
                user: ChatUser::new(user_id, username, email),
                channel_id,
            };
            bluejeans_plugin::commands::run::run(&config, invocation, Request::StartButton).await
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => bluejeans_plugin::commands::config::dump(&config),
            ConfigAction::Validate => bluejeans_plugin::commands::config::validate(&config),
            ConfigAction::Path => bluejeans_plugin::commands::config::path(),
        },
    }
}
