//! CLI subcommand implementations.

pub mod config;
pub mod meeting;
pub mod run;
