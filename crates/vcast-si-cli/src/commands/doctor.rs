//! Doctor command implementation
//!
//! Checks the VectorCAST installation and the unit's working directory.

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use vcast_si_core::{extract_identifiers, SiError};

use crate::config::{self, FileConfig, Locations, VECTORCAST_DIR_ENV};

/// Run the doctor command
///
/// Checks:
/// - VectorCAST directory and clicast executable
/// - Environment file presence and stub count
/// - Working directory permissions
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run(locations: &Locations, config_path: Option<&Path>) -> Result<ExitCode> {
    println!("{}", "vcast-si Doctor".cyan().bold());
    println!("{}", "===============".cyan());
    println!();

    let file = FileConfig::load_optional(config_path)?;
    let env_value = config::vectorcast_dir_from_env();
    let mut all_ok = true;

    println!("{}", "VectorCAST:".bold());
    let vectorcast_dir = config::vectorcast_dir(locations, &file, env_value);
    match &vectorcast_dir {
        Some(dir) if dir.is_dir() => {
            println!("  {} Installation directory {}", "ok".green(), dir.display());
        }
        Some(dir) => {
            println!(
                "  {} Installation directory does not exist: {}",
                "!!".red(),
                dir.display()
            );
            all_ok = false;
        }
        None => {
            println!("  {} {} is not set", "!!".yellow(), VECTORCAST_DIR_ENV);
            println!("     {}", "Falling back to clicast on PATH.".dimmed());
        }
    }

    let clicast = config::resolve_clicast(vectorcast_dir.as_deref());
    match check_clicast(&clicast) {
        ClicastStatus::Found(path) => {
            println!("  {} clicast {}", "ok".green(), path.display());
        }
        ClicastStatus::NotFound(path) => {
            println!("  {} clicast not found at {}", "!!".red(), path.display());
            all_ok = false;
        }
    }

    println!();

    println!("{}", "Unit:".bold());
    match config::base_run_config(locations, &file, vectorcast_dir.clone()) {
        Ok(run_config) => {
            println!(
                "  {} {} (environment {})",
                "->".green(),
                run_config.unit_name,
                run_config.env_id()
            );
            let env_file = run_config.env_file_path();
            match extract_identifiers(&env_file) {
                Ok(stubs) => {
                    println!(
                        "  {} {} ({} stubbed function(s))",
                        "ok".green(),
                        env_file.display(),
                        stubs.len()
                    );
                }
                Err(SiError::EnvFileNotFound { path }) => {
                    println!("  {} Environment file missing: {}", "!!".red(), path.display());
                    all_ok = false;
                }
                Err(e) => {
                    println!("  {} {}", "!!".red(), e);
                    all_ok = false;
                }
            }

            println!();
            println!("{}", "Permissions:".bold());
            if check_writable(&run_config.working_dir) {
                println!(
                    "  {} Working directory is writable ({})",
                    "ok".green(),
                    run_config.working_dir.display()
                );
            } else {
                println!(
                    "  {} Cannot write to working directory {}",
                    "!!".red(),
                    run_config.working_dir.display()
                );
                all_ok = false;
            }
        }
        Err(e) => {
            println!("  {} {:#}", "!!".red(), e);
            all_ok = false;
        }
    }

    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

enum ClicastStatus {
    Found(PathBuf),
    NotFound(PathBuf),
}

fn check_clicast(path: &Path) -> ClicastStatus {
    if path.is_file() {
        return ClicastStatus::Found(path.to_path_buf());
    }
    // A bare name means the PATH lookup already failed.
    match which::which(path) {
        Ok(found) => ClicastStatus::Found(found),
        Err(_) => ClicastStatus::NotFound(path.to_path_buf()),
    }
}

fn check_writable(dir: &Path) -> bool {
    let probe = dir.join(".vcast_si_write_test");
    match std::fs::write(&probe, "test") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_writable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_writable(dir.path()));
        assert!(!dir.path().join(".vcast_si_write_test").exists());
        assert!(!check_writable(&dir.path().join("missing")));
    }

    #[test]
    fn test_check_clicast_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clicast");
        assert!(matches!(check_clicast(&path), ClicastStatus::NotFound(_)));

        std::fs::write(&path, "").unwrap();
        assert!(matches!(check_clicast(&path), ClicastStatus::Found(_)));
    }
}
