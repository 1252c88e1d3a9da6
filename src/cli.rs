// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The surface is intentionally small: a single positional task name plus
//! a handful of ambient flags (config path, log level, dry-run).

use clap::{Parser, ValueEnum};

use crate::tasks::TaskName;

/// Command-line arguments for `sasspipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sasspipe",
    version,
    about = "Compile Sass, serve the project and live-reload on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Task to run. Defaults to `dev` (compile, serve, watch).
    #[arg(value_enum, value_name = "TASK")]
    pub task: Option<TaskArg>,

    /// Path to the config file (TOML).
    ///
    /// A missing file is not an error; built-in defaults apply.
    #[arg(long, value_name = "PATH", default_value = "Sasspipe.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SASSPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the task plan and effective paths, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Task name as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum TaskArg {
    Dev,
    Build,
    Compile,
    Watch,
    Serve,
}

impl TaskArg {
    pub fn into_task_name(self) -> TaskName {
        match self {
            TaskArg::Dev => TaskName::Dev,
            TaskArg::Build => TaskName::Build,
            TaskArg::Compile => TaskName::Compile,
            TaskArg::Watch => TaskName::Watch,
            TaskArg::Serve => TaskName::Serve,
        }
    }
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
