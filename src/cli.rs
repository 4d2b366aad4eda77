//! Command-line interface parsing for the `animechan` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::ClientOptions;

/// Animechan quote collector
#[derive(Parser, Debug)]
#[command(name = "animechan")]
#[command(about = "Collect anime quotes from the Animechan API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch quotes for characters and shows and write them to a JSON file
    Collect(CollectArgs),
}

#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Characters to query
    #[arg(long, num_args = 0..)]
    pub characters: Option<Vec<String>>,

    /// Anime titles to query
    #[arg(long, num_args = 0..)]
    pub shows: Option<Vec<String>>,

    /// Limit per API call
    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    /// Path to write collected JSON data
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,

    /// Use sample data instead of the live API
    #[arg(long)]
    pub offline: bool,

    /// Sample data file used offline or as fallback (defaults to the bundled sample)
    #[arg(long, value_name = "PATH")]
    pub sample: Option<PathBuf>,

    /// Load the response cache from this file and flush it back on exit
    #[arg(long, value_name = "PATH")]
    pub cache_file: Option<PathBuf>,

    /// API root (overrides ANIMECHAN_BASE_URL)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Attempts per request, including the first
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Base retry backoff in milliseconds
    #[arg(long)]
    pub backoff_ms: Option<u64>,

    /// Per-attempt timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl CollectArgs {
    /// Client options with any command-line overrides applied.
    pub fn client_options(&self) -> ClientOptions {
        let defaults = ClientOptions::default();
        ClientOptions {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            retry_backoff_ms: self.backoff_ms.unwrap_or(defaults.retry_backoff_ms),
            timeout_ms: self.timeout_ms.unwrap_or(defaults.timeout_ms),
            ..defaults
        }
    }
}
