//! vcast-si - Command-line interface for VectorCAST SI artifact generation
//!
//! This binary drives clicast to produce the reports and test scripts of a
//! unit and collects them in `<unit>_VCAST_SI_Results`.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

use vcast_si_cli::commands;
use vcast_si_cli::commands::generate::GenerateOptions;
use vcast_si_cli::config::GenerateOverrides;
use vcast_si_cli::logging;

mod cli_args;

use cli_args::{compound_flag, Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log_file().as_deref());

    let result = match cli.command {
        Commands::Generate {
            location,
            compound,
            no_compound,
            timeout_secs,
            fail_fast,
            dry_run,
            report,
            json,
        } => {
            let overrides = GenerateOverrides {
                compound: compound_flag(compound, no_compound),
                timeout_secs,
                fail_fast,
            };
            let options = GenerateOptions {
                config_path: location.config.as_deref().map(Path::new),
                dry_run,
                report_path: report.as_deref().map(Path::new),
                json,
            };
            commands::generate::run(&location.locations(), &overrides, &options)
        }
        Commands::Stubs { location, json } => commands::stubs::run(
            &location.locations(),
            location.config.as_deref().map(Path::new),
            json,
        ),
        Commands::Doctor { location } => commands::doctor::run(
            &location.locations(),
            location.config.as_deref().map(Path::new),
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parses_generate_defaults() {
        let cli = Cli::try_parse_from(["vcast-si", "generate"]).unwrap();
        match cli.command {
            Commands::Generate {
                location,
                compound,
                no_compound,
                timeout_secs,
                fail_fast,
                dry_run,
                report,
                json,
            } => {
                assert!(location.dir.is_none());
                assert!(location.unit.is_none());
                assert!(!compound);
                assert!(!no_compound);
                assert!(timeout_secs.is_none());
                assert!(!fail_fast);
                assert!(!dry_run);
                assert!(report.is_none());
                assert!(!json);
            }
            _ => panic!("expected generate command"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parses_generate_with_options() {
        let cli = Cli::try_parse_from([
            "vcast-si",
            "generate",
            "--dir",
            "/src/Engine",
            "--unit",
            "Engine",
            "--vectorcast-dir",
            "/opt/vcast",
            "--compound",
            "--timeout-secs",
            "60",
            "--fail-fast",
            "--report",
            "run.json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate {
                location,
                compound,
                no_compound,
                timeout_secs,
                fail_fast,
                report,
                ..
            } => {
                let locations = location.locations();
                assert_eq!(locations.dir, Some(PathBuf::from("/src/Engine")));
                assert_eq!(locations.unit.as_deref(), Some("Engine"));
                assert_eq!(locations.vectorcast_dir, Some(PathBuf::from("/opt/vcast")));
                assert_eq!(compound_flag(compound, no_compound), Some(true));
                assert_eq!(timeout_secs, Some(60));
                assert!(fail_fast);
                assert_eq!(report.as_deref(), Some("run.json"));
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_rejects_conflicting_compound_flags() {
        let result =
            Cli::try_parse_from(["vcast-si", "generate", "--compound", "--no-compound"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_stubs() {
        let cli = Cli::try_parse_from([
            "vcast-si",
            "stubs",
            "--env-file",
            "ENGINE.env",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Stubs { location, json } => {
                assert_eq!(location.env_file.as_deref(), Some("ENGINE.env"));
                assert!(json);
            }
            _ => panic!("expected stubs command"),
        }
    }

    #[test]
    fn test_cli_parses_doctor_with_config() {
        let cli =
            Cli::try_parse_from(["vcast-si", "doctor", "--config", "vcast-si.json"]).unwrap();
        match cli.command {
            Commands::Doctor { location } => {
                assert_eq!(location.config.as_deref(), Some("vcast-si.json"));
            }
            _ => panic!("expected doctor command"),
        }
    }

    #[test]
    fn test_log_file_selection() {
        let cli = Cli::try_parse_from(["vcast-si", "stubs"]).unwrap();
        assert_eq!(cli.log_file(), Some(PathBuf::from("vcast_si.log")));

        let cli =
            Cli::try_parse_from(["vcast-si", "stubs", "--log-file", "/tmp/run.log"]).unwrap();
        assert_eq!(cli.log_file(), Some(PathBuf::from("/tmp/run.log")));

        let cli = Cli::try_parse_from(["vcast-si", "doctor", "--no-log-file"]).unwrap();
        assert_eq!(cli.log_file(), None);

        assert!(Cli::try_parse_from([
            "vcast-si",
            "doctor",
            "--log-file",
            "x.log",
            "--no-log-file"
        ])
        .is_err());
    }

    #[test]
    fn test_compound_flag_mapping() {
        assert_eq!(compound_flag(false, false), None);
        assert_eq!(compound_flag(true, false), Some(true));
        assert_eq!(compound_flag(false, true), Some(false));
    }
}
