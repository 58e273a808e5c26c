//! Command-line argument definitions for the trellis CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the focal
//! identifier, policy overrides, configuration file selection, and logging
//! verbosity.

use clap::Parser;

/// Command-line arguments for the trellis network tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing CSV association matrices
    #[arg(help = "Directory containing CSV association matrices")]
    pub input: String,

    /// Focal identifier to filter and center on
    #[arg(short, long)]
    pub select: Option<String>,

    /// Path to the output JSON file
    #[arg(short, long, default_value = "network.json")]
    pub output: String,

    /// Drop policy override (higher, lower)
    #[arg(long)]
    pub drop: Option<String>,

    /// Keep policy override (higher, lower, both)
    #[arg(long)]
    pub keep: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
