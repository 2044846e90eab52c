//! CLI argument definitions for the vcast-si command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use vcast_si_cli::config::Locations;
use vcast_si_cli::logging::DEFAULT_LOG_FILE;

/// vcast-si - VectorCAST SI report and test script generator
#[derive(Parser)]
#[command(name = "vcast-si")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Show debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Append log output to this file (default: vcast_si.log)
    #[arg(long, global = true, conflicts_with = "no_log_file")]
    pub log_file: Option<String>,

    /// Do not write a log file
    #[arg(long, global = true)]
    pub no_log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log file to write, if any.
    pub fn log_file(&self) -> Option<PathBuf> {
        if self.no_log_file {
            return None;
        }
        Some(PathBuf::from(
            self.log_file.as_deref().unwrap_or(DEFAULT_LOG_FILE),
        ))
    }
}

/// Where the unit lives and how to reach VectorCAST.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct LocationArgs {
    /// Unit directory (default: current directory)
    #[arg(short, long)]
    pub dir: Option<String>,

    /// Unit name (default: name of the unit directory)
    #[arg(short, long)]
    pub unit: Option<String>,

    /// Environment file (default: <UNIT>.env in the unit directory)
    #[arg(short, long)]
    pub env_file: Option<String>,

    /// VectorCAST installation directory (default: $VECTORCAST_DIR)
    #[arg(long)]
    pub vectorcast_dir: Option<String>,

    /// Path to a JSON config file
    #[arg(short, long)]
    pub config: Option<String>,
}

impl LocationArgs {
    pub fn locations(&self) -> Locations {
        Locations {
            dir: self.dir.as_ref().map(PathBuf::from),
            unit: self.unit.clone(),
            env_file: self.env_file.as_ref().map(PathBuf::from),
            vectorcast_dir: self.vectorcast_dir.as_ref().map(PathBuf::from),
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate reports and test scripts for a unit
    Generate {
        #[command(flatten)]
        location: LocationArgs,

        /// Include compound test cases (skips the interactive menu)
        #[arg(long, conflicts_with = "no_compound")]
        compound: bool,

        /// Skip compound test cases (skips the interactive menu)
        #[arg(long)]
        no_compound: bool,

        /// Timeout for each clicast invocation, in seconds (default: 300)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Stop after the first artifact that fails
        #[arg(long)]
        fail_fast: bool,

        /// Print the clicast invocations without running them
        #[arg(long)]
        dry_run: bool,

        /// Write the run report as JSON to this path
        #[arg(long)]
        report: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the stubbed functions declared in the environment file
    Stubs {
        #[command(flatten)]
        location: LocationArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check the VectorCAST installation and unit directory
    Doctor {
        #[command(flatten)]
        location: LocationArgs,
    },
}

/// Maps the `--compound` / `--no-compound` pair to an optional choice.
pub(crate) fn compound_flag(compound: bool, no_compound: bool) -> Option<bool> {
    match (compound, no_compound) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
