//! Command-line interface for intakeline
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Streaming voice intake for service call lines
#[derive(Parser, Debug)]
#[command(
    name = "intakeline",
    version,
    about = "Streaming voice intake for service call lines"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress live transcript output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Audio input device (e.g., "BlackHole 2ch")
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Window duration in seconds for transcription
    #[arg(long, short = 'w', value_name = "SECONDS")]
    pub window: Option<u32>,

    /// Consecutive quiet windows before arming finalization
    #[arg(long, value_name = "COUNT")]
    pub silence_segments: Option<u32>,

    /// Grace delay before finalizing (default: 4s). Examples: 4s, 1500ms
    #[arg(long, value_name = "DURATION", value_parser = parse_delay)]
    pub finalize_delay: Option<Duration>,
}

/// Parse a grace-delay string into a duration.
///
/// Supports any format accepted by `humantime`: bare numbers (seconds),
/// single-unit (`4s`, `1500ms`), and compound (`1m30s`).
fn parse_delay(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available audio input devices
    Devices,
}
