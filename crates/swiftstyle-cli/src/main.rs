//! swiftstyle CLI tool.
//!
//! Usage:
//! ```bash
//! swiftstyle lint [OPTIONS] [PATH]
//! swiftstyle fix [OPTIONS] [PATH]
//! swiftstyle list-rules
//! swiftstyle init
//! ```
//!
//! Exit codes: 0 when clean, 1 when violations meet the fail-on
//! threshold, 2 on configuration or internal errors.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Mechanical style checker for Swift sources
#[derive(Parser)]
#[command(name = "swiftstyle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report style violations
    Lint {
        /// Path to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Lowest severity that causes exit code 1
        #[arg(long)]
        fail_on: Option<String>,
    },

    /// Apply available fixes, then report what remains
    Fix {
        /// Path to fix (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format for the remaining violations
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Lowest severity that causes exit code 1
        #[arg(long)]
        fail_on: Option<String>,
    },

    /// List available rules
    ListRules,

    /// Initialize a configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Lint {
            path,
            format,
            rules,
            exclude,
            fail_on,
        } => commands::lint::run(&path, format, rules, exclude, fail_on, cli.config.as_deref()),
        Commands::Fix {
            path,
            format,
            rules,
            exclude,
            fail_on,
        } => commands::fix::run(&path, format, rules, exclude, fail_on, cli.config.as_deref()),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force } => {
            commands::init::run(force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
