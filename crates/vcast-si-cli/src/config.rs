//! Run configuration assembly.
//!
//! Values are taken from command-line flags first, then the optional JSON
//! config file, then the `VECTORCAST_DIR` environment variable, then
//! defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use vcast_si_core::{unit_name_from_dir, CompoundSelection, FailurePolicy, RunConfig};

/// Environment variable pointing at the VectorCAST installation.
pub const VECTORCAST_DIR_ENV: &str = "VECTORCAST_DIR";

/// Name of the clicast executable.
pub const CLICAST_BIN: &str = if cfg!(windows) { "clicast.exe" } else { "clicast" };

/// Optional settings file (`--config <path>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// VectorCAST installation directory.
    pub vectorcast_dir: Option<PathBuf>,
    /// Per-invocation timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Include compound test cases without prompting.
    pub compound: Option<bool>,
    /// Stop after the first failed artifact.
    pub fail_fast: Option<bool>,
}

impl FileConfig {
    /// Loads a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads `path` if given, otherwise returns an empty config.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Location-related settings shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Locations {
    /// Working directory (default: current directory).
    pub dir: Option<PathBuf>,
    /// Unit name override (default: working directory name).
    pub unit: Option<String>,
    /// Environment file override.
    pub env_file: Option<PathBuf>,
    /// VectorCAST directory override.
    pub vectorcast_dir: Option<PathBuf>,
}

/// Generation-specific overrides from the command line.
#[derive(Debug, Clone, Default)]
pub struct GenerateOverrides {
    pub compound: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub fail_fast: bool,
}

/// Resolves the working directory, defaulting to the current directory.
pub fn working_dir(locations: &Locations) -> Result<PathBuf> {
    match &locations.dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

/// Resolves the VectorCAST directory: flag, config file, then environment.
pub fn vectorcast_dir(
    locations: &Locations,
    file: &FileConfig,
    env_value: Option<PathBuf>,
) -> Option<PathBuf> {
    locations
        .vectorcast_dir
        .clone()
        .or_else(|| file.vectorcast_dir.clone())
        .or(env_value)
}

/// Reads `VECTORCAST_DIR`, treating an empty value as unset.
pub fn vectorcast_dir_from_env() -> Option<PathBuf> {
    std::env::var_os(VECTORCAST_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Resolves the clicast executable.
///
/// Uses `<vectorcast_dir>/clicast` when a directory is known, otherwise
/// searches `PATH`, otherwise falls back to the bare name and lets the
/// invocation fail.
pub fn resolve_clicast(vectorcast_dir: Option<&Path>) -> PathBuf {
    match vectorcast_dir {
        Some(dir) => dir.join(CLICAST_BIN),
        None => which::which("clicast").unwrap_or_else(|_| PathBuf::from(CLICAST_BIN)),
    }
}

/// Builds the base run configuration (unit, folders, clicast).
pub fn base_run_config(
    locations: &Locations,
    file: &FileConfig,
    env_value: Option<PathBuf>,
) -> Result<RunConfig> {
    let dir = working_dir(locations)?;
    let unit = match &locations.unit {
        Some(unit) => unit.clone(),
        None => unit_name_from_dir(&dir)
            .with_context(|| format!("Cannot derive unit name from {}", dir.display()))?,
    };

    let clicast = resolve_clicast(vectorcast_dir(locations, file, env_value).as_deref());
    let mut config = RunConfig::new(unit, dir)?.clicast(clicast);
    if let Some(env_file) = &locations.env_file {
        config = config.env_file(env_file.clone());
    }
    Ok(config)
}

/// Applies generation overrides on top of `config`.
///
/// `prompt` is only called when neither the flags nor the config file
/// decide the compound selection.
pub fn apply_generate_overrides(
    config: RunConfig,
    overrides: &GenerateOverrides,
    file: &FileConfig,
    prompt: impl FnOnce() -> Result<CompoundSelection>,
) -> Result<RunConfig> {
    let compound = match overrides.compound.or(file.compound) {
        Some(include) => CompoundSelection::from_flag(include),
        None => prompt()?,
    };

    let mut config = config.compound(compound);
    if let Some(secs) = overrides.timeout_secs.or(file.timeout_secs) {
        config = config.timeout(Duration::from_secs(secs));
    }
    if overrides.fail_fast || file.fail_fast.unwrap_or(false) {
        config = config.failure_policy(FailurePolicy::FailFast);
    }
    Ok(config)
}
