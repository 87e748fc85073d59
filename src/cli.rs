// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `gowatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gowatch",
    version,
    about = "Watch a Go project, rebuilding and restarting it on changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Application name.
    ///
    /// Defaults to the name of the current working directory.
    pub appname: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GOWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
