// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::{FailurePolicy, Lifecycle};

/// Command-line arguments for `program-starter`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "program-starter",
    version,
    about = "Start/stop a group of programs in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// `start` or `stop`.
    #[arg(value_enum)]
    pub command: Lifecycle,

    /// Programs to start/stop. Empty means all of them.
    #[arg(value_name = "PROGRAM")]
    pub program: Vec<String>,

    /// Path to the config file (YAML, JSON or TOML by extension).
    #[arg(
        short = 'f',
        long = "config_file",
        value_name = "PATH",
        default_value = "program-starter.yml"
    )]
    pub config_file: PathBuf,

    /// Also run the scripts of programs pulled in through dependencies.
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// `KEY=VALUE` file merged into the environment before the config loads.
    #[arg(short = 'e', long = "env_file", value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Append log output to this file instead of stderr.
    #[arg(long = "log_file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROGRAM_STARTER_LOG` or a default level will be used.
    #[arg(long = "log_level", value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// What to do with the rest of the plan after a program fails.
    #[arg(long = "on_failure", value_enum, default_value = "continue")]
    pub on_failure: FailurePolicy,

    /// Print the plan without executing any script.
    #[arg(long = "dry_run")]
    pub dry_run: bool,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_flags_and_programs() {
        let args = CliArgs::try_parse_from([
            "program-starter",
            "start",
            "web",
            "api",
            "-f",
            "demo.json",
            "-r",
            "-e",
            "local.env",
        ])
        .unwrap();

        assert_eq!(args.command, Lifecycle::Start);
        assert_eq!(args.program, vec!["web", "api"]);
        assert_eq!(args.config_file, PathBuf::from("demo.json"));
        assert!(args.recursive);
        assert_eq!(args.env_file, Some(PathBuf::from("local.env")));
        assert_eq!(args.on_failure, FailurePolicy::Continue);
    }

    #[test]
    fn defaults_apply_without_flags() {
        let args = CliArgs::try_parse_from(["program-starter", "stop"]).unwrap();
        assert_eq!(args.command, Lifecycle::Stop);
        assert!(args.program.is_empty());
        assert_eq!(args.config_file, PathBuf::from("program-starter.yml"));
        assert!(!args.recursive);
        assert!(!args.dry_run);
    }

    #[test]
    fn long_flags_use_underscores() {
        let args = CliArgs::try_parse_from([
            "program-starter",
            "start",
            "--config_file",
            "x.yaml",
            "--on_failure",
            "skip-dependents",
            "--dry_run",
        ])
        .unwrap();
        assert_eq!(args.on_failure, FailurePolicy::SkipDependents);
        assert!(args.dry_run);
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(CliArgs::try_parse_from(["program-starter", "restart"]).is_err());
    }
}
