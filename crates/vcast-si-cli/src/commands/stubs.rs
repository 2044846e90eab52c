//! Stubs command implementation
//!
//! Lists the stub identifiers declared in an environment file.

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use vcast_si_core::{check_name, extract_identifiers};

use crate::config::{self, FileConfig, Locations};

/// Run the stubs command
pub fn run(locations: &Locations, config_path: Option<&Path>, json: bool) -> Result<ExitCode> {
    let (env_file, stubs) = collect(locations, config_path)?;

    if json {
        println!("{}", to_json(&stubs)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Stubbed functions in".bold(), env_file.display());
    if stubs.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for stub in &stubs {
        match check_name(stub) {
            Ok(()) => println!("  {} {}", "->".green(), stub),
            Err(reason) => println!("  {} {} ({})", "--".yellow(), stub, reason.dimmed()),
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolves the environment file and parses its stub identifiers.
pub fn collect(
    locations: &Locations,
    config_path: Option<&Path>,
) -> Result<(PathBuf, Vec<String>)> {
    let file = FileConfig::load_optional(config_path)?;
    let run_config = config::base_run_config(locations, &file, None)?;
    let env_file = run_config.env_file_path();
    let stubs = extract_identifiers(&env_file)?;
    Ok((env_file, stubs))
}

/// Renders the identifiers as a pretty JSON array.
pub fn to_json(stubs: &[String]) -> Result<String> {
    Ok(serde_json::to_string_pretty(stubs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit_dir(env: &str) -> (tempfile::TempDir, Locations) {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Engine");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("ENGINE.env"), env).unwrap();
        let locations = Locations {
            dir: Some(dir),
            ..Default::default()
        };
        (root, locations)
    }

    #[test]
    fn test_collect_reads_default_env_file() {
        let (root, locations) = unit_dir(
            "ENVIRO.NEW\nENVIRO.STUB_BY_FUNCTION: alpha\nENVIRO.STUB_BY_FUNCTION: beta\n",
        );

        let (env_file, stubs) = collect(&locations, None).unwrap();

        assert_eq!(env_file, root.path().join("Engine").join("ENGINE.env"));
        assert_eq!(stubs, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_json_output() {
        let stubs = vec!["alpha".to_string(), "ns::Widget (overload 2)".to_string()];
        let parsed: Vec<String> = serde_json::from_str(&to_json(&stubs).unwrap()).unwrap();
        assert_eq!(parsed, stubs);
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_run_succeeds_with_json() {
        let (_root, locations) = unit_dir("ENVIRO.STUB_BY_FUNCTION: alpha\n");
        let code = run(&locations, None, true).unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::SUCCESS));
    }

    #[test]
    fn test_run_missing_env_file_errors() {
        let root = tempfile::tempdir().unwrap();
        let locations = Locations {
            dir: Some(root.path().to_path_buf()),
            unit: Some("Engine".to_string()),
            ..Default::default()
        };
        let err = run(&locations, None, false).unwrap_err();
        assert!(format!("{:#}", err).contains("Environment file not found"));
    }
}
