//! Generate command implementation
//!
//! Runs clicast for every report and test script of a unit.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use vcast_si_core::{ArtifactStatus, Orchestrator, PlannedArtifact, RunReport, SUMMARY_FILE_NAME};

use crate::config::{self, FileConfig, GenerateOverrides, Locations};
use crate::prompt;

/// Options of the generate command beyond the run configuration.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions<'a> {
    /// Optional JSON config file.
    pub config_path: Option<&'a Path>,
    /// Print the plan without running anything.
    pub dry_run: bool,
    /// Write the run report as JSON to this path.
    pub report_path: Option<&'a Path>,
    /// Machine-readable output on stdout.
    pub json: bool,
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 if every artifact was produced, 1 otherwise
pub fn run(
    locations: &Locations,
    overrides: &GenerateOverrides,
    options: &GenerateOptions<'_>,
) -> Result<ExitCode> {
    let file = FileConfig::load_optional(options.config_path)?;
    let base = config::base_run_config(locations, &file, config::vectorcast_dir_from_env())?;
    let run_config =
        config::apply_generate_overrides(base, overrides, &file, prompt::ask_compound_stdio)?;

    let orchestrator = Orchestrator::new(run_config);

    if options.dry_run {
        let planned = orchestrator.dry_run()?;
        print_plan(&planned, options.json)?;
        return Ok(ExitCode::SUCCESS);
    }

    if !options.json {
        println!(
            "{} {} ({})",
            "Generating SI artifacts for".cyan().bold(),
            orchestrator.config().unit_name,
            orchestrator.config().env_id()
        );
    }

    let report = orchestrator.run()?;

    if let Some(path) = options.report_path {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    if options.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        print_report(&report);
    }

    if report.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn print_plan(planned: &[PlannedArtifact], json: bool) -> Result<()> {
    if json {
        let entries: Vec<_> = planned
            .iter()
            .map(|p| {
                serde_json::json!({
                    "kind": p.kind,
                    "path": p.path,
                    "command": p.command,
                    "rejection": p.rejection,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "Planned clicast invocations:".bold());
    for (i, artifact) in planned.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, artifact.kind.label());
        match artifact.rejection {
            Some(ref reason) => println!("      {} {}", "rejected:".yellow(), reason),
            None => println!("      {}", artifact.command.dimmed()),
        }
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    println!();
    for outcome in &report.artifacts {
        let marker = match outcome.status {
            ArtifactStatus::Succeeded => "ok".green(),
            ArtifactStatus::Failed => "!!".red(),
            ArtifactStatus::TimedOut => "!!".yellow(),
            ArtifactStatus::SpawnFailed => "!!".red(),
            ArtifactStatus::Rejected => "--".yellow(),
        };
        println!("  {} {}", marker, outcome.path.display());

        if !outcome.status.is_success() {
            let detail = match (outcome.status, outcome.exit_code) {
                (ArtifactStatus::Failed, Some(code)) => format!("clicast exited with {}", code),
                (ArtifactStatus::Failed, None) => "clicast was terminated".to_string(),
                (ArtifactStatus::TimedOut, _) => "clicast timed out".to_string(),
                (ArtifactStatus::Rejected, _) => "stub identifier rejected".to_string(),
                _ => "clicast could not be started".to_string(),
            };
            println!("     {}", detail.dimmed());
            if let Some(ref message) = outcome.message {
                for line in message.lines().take(5) {
                    println!("     {}", line.dimmed());
                }
            }
        }
    }

    let summary = &report.summary;
    println!();
    println!(
        "Output directory: {}",
        report.results_dir.display().to_string().bold()
    );
    println!("Summary: {}", report.results_dir.join(SUMMARY_FILE_NAME).display());
    let counts = format!(
        "{}/{} succeeded ({:.1}%)",
        summary.succeeded, summary.attempted, summary.success_rate
    );
    if report.all_succeeded() {
        println!("{} {}", "SUCCESS".green().bold(), counts);
    } else {
        let skipped = if summary.skipped > 0 {
            format!(", {} skipped", summary.skipped)
        } else {
            String::new()
        };
        println!(
            "{} {}{}. Some artifacts were not generated.",
            "WARNING".yellow().bold(),
            counts,
            skipped
        );
    }
}
