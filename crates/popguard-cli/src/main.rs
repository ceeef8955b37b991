//! Popguard CLI - popup and redirect provenance checks.
//!
//! Replays recorded page interaction traces through the decision engine and
//! inspects the layered configuration that drives it.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use popguard_core::Confirmation;

mod commands;
mod config_bridge;
mod theme;

use commands::{config, replay};

/// Popguard - popup and redirect provenance checks
#[derive(Parser)]
#[command(name = "popguard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file layered over ~/.popguard/config.toml
    #[arg(short, long, global = true, env = "POPGUARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded interaction trace and print each decision
    Replay {
        /// Path to a JSON trace
        trace: PathBuf,

        /// URL of the page the trace starts on
        #[arg(long, default_value = "https://localhost/")]
        page: String,

        /// How the simulated user answers confirmation prompts
        #[arg(long, value_enum, default_value = "reject")]
        answer: Answer,

        /// Print decisions as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and validate configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved configuration with source annotations
    Show {
        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
    /// Validate the current configuration
    Validate,
}

/// Simulated answer to confirmation prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Answer {
    /// Say yes.
    Accept,
    /// Say no.
    Reject,
    /// Leave prompts outstanding until a `resolve` step.
    Pending,
}

impl From<Answer> for Confirmation {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Accept => Self::Accepted,
            Answer::Reject => Self::Rejected,
            Answer::Pending => Self::Pending,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load unified config for logging setup.
    let loaded = popguard_config::Config::load(cli.config.as_deref());

    // Set up logging from config, with --verbose override.
    let log_config = if let Ok(resolved) = &loaded {
        let mut lc = config_bridge::to_log_config(&resolved.config.logging);
        if cli.verbose {
            "debug".clone_into(&mut lc.level);
        }
        lc
    } else {
        // Fallback if config loading fails.
        let level = if cli.verbose { "debug" } else { "warn" };
        popguard_telemetry::LogConfig::new(level)
    };
    if let Err(e) = popguard_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Replay {
            trace,
            page,
            answer,
            json,
        } => {
            let policy = config_bridge::to_policy_config(&loaded?.config)?;
            replay::run_replay(&trace, policy, &page, answer.into(), json)?;
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { format } => {
                config::show_config(cli.config.as_deref(), &format)?;
            },
            ConfigCommands::Validate => config::validate_config(cli.config.as_deref())?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_replay() {
        let cli = Cli::try_parse_from([
            "popguard",
            "replay",
            "trace.json",
            "--answer",
            "pending",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Replay {
                trace,
                page,
                answer,
                json,
            } => {
                assert_eq!(trace, PathBuf::from("trace.json"));
                assert_eq!(page, "https://localhost/");
                assert_eq!(Confirmation::from(answer), Confirmation::Pending);
                assert!(json);
            },
            Commands::Config { .. } => panic!("expected replay"),
        }
    }

    #[test]
    fn test_parse_config_show_with_file() {
        let cli = Cli::try_parse_from([
            "popguard", "config", "show", "--format", "json", "--config", "p.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Show { .. }
            }
        ));
    }
}
