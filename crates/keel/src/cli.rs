use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

/// Keel: an application lifecycle kernel
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Configuration file (JSON, TOML, or YAML by extension)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Shutdown budget shared by all component stops, e.g. "30s" or "2m"
    #[arg(long, value_parser = parse_duration)]
    pub shutdown_timeout: Option<Duration>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize and start all components, then run until a stop signal
    Run,
    /// Resolve and print the initialization order, then exit
    Plan,
    /// Load and validate the configuration file, then exit
    CheckConfig,
}

fn parse_duration(raw: &str) -> Result<Duration, String> {
    humantime::parse_duration(raw).map_err(|e| e.to_string())
}
