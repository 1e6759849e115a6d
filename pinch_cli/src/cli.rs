//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pinch", version, about = "Pinch gesture detector replay harness")]
pub struct Cli {
    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a CSV frame stream through the detector, printing events as JSON lines
    Replay {
        /// Path to config TOML (balanced preset used if omitted)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Path to a JSON template bundle
        #[arg(long, value_name = "FILE")]
        templates: PathBuf,
        /// Path to a CSV of frames: header `t,ax,ay,az,gx,gy,gz`
        #[arg(long, value_name = "FILE")]
        frames: PathBuf,
    },
    /// Print the expanded template bank's size and window length for a bundle
    InspectTemplates {
        #[arg(long, value_name = "FILE")]
        templates: PathBuf,
    },
}
