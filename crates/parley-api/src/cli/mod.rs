//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod demo;
pub mod render;
pub mod replay;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Exercise the in-memory direct-messaging core.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the built-in demonstration conversation.
    Demo {
        /// Identity the demonstration acts as.
        #[arg(long, default_value = "user1")]
        user: String,
    },

    /// Execute a JSON script of message operations against a fresh registry.
    Replay {
        /// Path to the script file.
        file: PathBuf,
    },
}

impl Cli {
    /// Tracing filter directive derived from `--quiet` / `-v`.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,parley=debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_demo_with_default_user() {
        let cli = Cli::try_parse_from(["parley", "demo"]).unwrap();
        assert_eq!(cli.log_directive(), "warn");
        match cli.command {
            Commands::Demo { user } => assert_eq!(user, "user1"),
            Commands::Replay { .. } => panic!("expected demo"),
        }
    }

    #[test]
    fn parses_replay_with_global_flags() {
        let cli = Cli::try_parse_from(["parley", "replay", "script.json", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.log_directive(), "trace");
        match cli.command {
            Commands::Replay { file } => assert_eq!(file, PathBuf::from("script.json")),
            Commands::Demo { .. } => panic!("expected replay"),
        }
    }

    #[test]
    fn quiet_lowers_log_level() {
        let cli = Cli::try_parse_from(["parley", "--quiet", "demo"]).unwrap();
        assert_eq!(cli.log_directive(), "error");
    }
}
