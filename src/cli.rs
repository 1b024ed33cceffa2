//! Command-line interface for voxbox
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Voice-assistant client pipeline
#[derive(Parser, Debug)]
#[command(name = "voxbox", version, about = "Voice-assistant client pipeline")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Inference-server base URL override (e.g. http://192.168.71.83:5000)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one answer cycle for a captured utterance file
    Ask {
        /// Captured audio file (WAV from the capture stage)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Inspect configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the default configuration file path
    Path,
}
