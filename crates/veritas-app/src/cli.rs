//! CLI argument definitions for the Veritas demo binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Veritas: check a claim's credibility and ask questions about the verdict.
#[derive(Parser, Debug)]
#[command(name = "veritas", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Seed for reproducible scores and replies.
    #[arg(short = 's', long = "seed", global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Analyze a piece of text and print the verdict.
    Analyze {
        /// Text to analyze.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Print the record as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List previously analyzed records.
    History,
    /// Analyze text, then chat about the verdict on stdin.
    Chat {
        /// Text to analyze.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

impl Command {
    /// Words given on the command line joined back into one string.
    pub fn text(&self) -> Option<String> {
        match self {
            Command::Analyze { text, .. } | Command::Chat { text } => Some(text.join(" ")),
            Command::History => None,
        }
    }
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > VERITAS_CONFIG env var > ~/.veritas/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("VERITAS_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level. Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Resolve the random seed. Priority: --seed flag > config file value.
    pub fn resolve_seed(&self, config_seed: Option<u64>) -> Option<u64> {
        self.seed.or(config_seed)
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".veritas").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".veritas").join("config.toml");
    }
    PathBuf::from("config.toml")
}
