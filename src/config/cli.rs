//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Volt engine: request execution and webhook mock service
///
/// Executes stored API requests against third-party servers and serves
/// configurable webhook endpoints.
#[derive(Debug, Parser)]
#[command(name = "volt-engine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub listen: Option<String>,

    /// Maximum accepted inbound request body, in bytes
    #[arg(long = "max-body-bytes")]
    pub max_body_bytes: Option<usize>,

    /// Bound on one outbound request execution, in seconds
    #[arg(long = "execute-timeout")]
    pub execute_timeout: Option<u64>,

    /// Request logs kept per webhook before the oldest are dropped
    #[arg(long = "max-logs-per-webhook")]
    pub max_logs_per_webhook: Option<usize>,

    /// JSON fixture file seeding the in-memory store
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for volt-engine
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "volt-engine.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
