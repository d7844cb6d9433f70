//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "pressmon", version, about = "Pressure monitor CLI")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/pressmon.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides the config
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monitor loop until interrupted
    Run {
        /// Use simulated sensors instead of real hardware
        #[arg(long, action = ArgAction::SetTrue)]
        sim: bool,
        /// Stop after this many cycles instead of running until Ctrl-C
        #[arg(long, value_name = "N")]
        cycles: Option<u64>,
        /// Serial port override (takes precedence over the config)
        #[arg(long, value_name = "PORT")]
        port: Option<String>,
        /// Log directory override (takes precedence over the config)
        #[arg(long, value_name = "DIR")]
        log_dir: Option<PathBuf>,
    },
    /// Sample all channels once and print the DATA line
    Snapshot,
    /// Quick health check (config, storage, sim sensors)
    SelfCheck,
}
