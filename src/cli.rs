//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use prebuilt_cache::output::OutputConfig;

/// Prebuilt Cache - Resolve and publish build artifacts against a Maven-layout repository
#[derive(Parser, Debug)]
#[command(name = "prebuilt-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve an artifact version and download its files into the local cache
    Download(commands::download::DownloadArgs),

    /// Publish locally built artifact files to the remote repository
    Publish(commands::publish::PublishArgs),

    /// Manage the local artifact cache
    Cache(commands::cache::CacheArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Download(args) => commands::download::execute(args, &output),
            Commands::Publish(args) => commands::publish::execute(args, &output),
            Commands::Cache(args) => commands::cache::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
