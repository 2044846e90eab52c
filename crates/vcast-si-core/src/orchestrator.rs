//! SI generation orchestrator.
//!
//! Provisions the output tree, reads the environment file, and invokes
//! clicast once per artifact, strictly one after another.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::clicast::{check_name, ClicastCommand, ReportKind, ScriptScope};
use crate::env_file::extract_identifiers;
use crate::error::{SiError, SiResult};
use crate::folders::OutputTree;
use crate::paths::{
    build_path, unquote, COMPOUND_SCRIPT_STEM, FULL_REPORT_SUFFIX, MANAGEMENT_REPORT_SUFFIX,
    METRICS_REPORT_SUFFIX, TEST_SCRIPT_SUFFIX,
};
use crate::report::{ArtifactKind, ArtifactOutcome, ArtifactStatus, RunReport, RunSummary};
use crate::runner::{CommandRunner, ShellRunner, DEFAULT_TIMEOUT_SECS};

/// Whether compound test cases get their own script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundSelection {
    Include,
    Skip,
}

impl CompoundSelection {
    /// Parses a menu answer: `1` includes compound test cases, `2` skips them.
    pub fn parse(input: &str) -> SiResult<Self> {
        match input.trim() {
            "1" => Ok(CompoundSelection::Include),
            "2" => Ok(CompoundSelection::Skip),
            other => Err(SiError::invalid_selection(other)),
        }
    }

    pub fn from_flag(include: bool) -> Self {
        if include {
            CompoundSelection::Include
        } else {
            CompoundSelection::Skip
        }
    }

    pub fn includes(&self) -> bool {
        matches!(self, CompoundSelection::Include)
    }
}

/// What to do after an artifact fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep invoking clicast for the remaining artifacts.
    #[default]
    Continue,
    /// Stop after the first failed artifact.
    FailFast,
}

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Unit under test, used verbatim in file names.
    pub unit_name: String,
    /// Directory holding the environment file and receiving the results tree.
    pub working_dir: PathBuf,
    /// Environment file override; defaults to `<working_dir>/<ENV_ID>.env`.
    pub env_file: Option<PathBuf>,
    /// clicast executable.
    pub clicast: PathBuf,
    pub compound: CompoundSelection,
    /// Per-invocation timeout.
    pub timeout: Duration,
    pub failure_policy: FailurePolicy,
}

impl RunConfig {
    /// Creates a config for `unit_name` rooted at `working_dir`.
    pub fn new(unit_name: impl Into<String>, working_dir: impl Into<PathBuf>) -> SiResult<Self> {
        let unit_name = unit_name.into();
        if unit_name.trim().is_empty() {
            return Err(SiError::EmptyUnitName);
        }
        if let Err(reason) = check_name(&unit_name) {
            return Err(SiError::UnsafeUnitName {
                name: unit_name,
                reason,
            });
        }
        Ok(Self {
            unit_name,
            working_dir: working_dir.into(),
            env_file: None,
            clicast: PathBuf::from("clicast"),
            compound: CompoundSelection::Skip,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            failure_policy: FailurePolicy::Continue,
        })
    }

    /// Sets the clicast executable path.
    pub fn clicast(mut self, path: impl Into<PathBuf>) -> Self {
        self.clicast = path.into();
        self
    }

    /// Sets the environment file path.
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Sets the compound test case selection.
    pub fn compound(mut self, selection: CompoundSelection) -> Self {
        self.compound = selection;
        self
    }

    /// Sets the per-invocation timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the failure policy.
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Environment identifier: the upper-cased unit name.
    pub fn env_id(&self) -> String {
        self.unit_name.to_uppercase()
    }

    /// Resolved environment file path.
    pub fn env_file_path(&self) -> PathBuf {
        self.env_file
            .clone()
            .unwrap_or_else(|| self.working_dir.join(format!("{}.env", self.env_id())))
    }
}

/// One artifact scheduled for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedArtifact {
    pub kind: ArtifactKind,
    /// Destination file (unquoted).
    pub path: PathBuf,
    /// Command line handed to the shell, empty when rejected.
    pub command: String,
    /// Why the artifact will not be attempted.
    pub rejection: Option<String>,
}

/// Drives a generation run.
pub struct Orchestrator<R: CommandRunner = ShellRunner> {
    config: RunConfig,
    runner: R,
}

impl Orchestrator<ShellRunner> {
    /// Creates an orchestrator running clicast through the host shell.
    pub fn new(config: RunConfig) -> Self {
        let runner = ShellRunner::new()
            .timeout(config.timeout)
            .working_dir(config.working_dir.clone());
        Self { config, runner }
    }
}

impl<R: CommandRunner> Orchestrator<R> {
    /// Creates an orchestrator with a custom runner.
    pub fn with_runner(config: RunConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Computes the artifact list for `tree` and the given stub identifiers.
    ///
    /// Order: full, management and metrics reports, the environment script,
    /// the compound script when selected, then one script per stub.
    pub fn plan(&self, tree: &OutputTree, stubs: &[String]) -> Vec<PlannedArtifact> {
        let unit = &self.config.unit_name;
        let env_id = self.config.env_id();
        let mut planned = Vec::with_capacity(5 + stubs.len());

        for kind in ReportKind::ALL {
            let suffix = match kind {
                ReportKind::Full => FULL_REPORT_SUFFIX,
                ReportKind::Management => MANAGEMENT_REPORT_SUFFIX,
                ReportKind::Metrics => METRICS_REPORT_SUFFIX,
            };
            let path = build_path(&tree.html_dir, unit, suffix);
            planned.push(self.planned(
                ArtifactKind::Report(kind),
                PathBuf::from(unquote(&path)),
                ClicastCommand::Report { kind, path },
            ));
        }

        planned.push(self.script(
            ScriptScope::Environment,
            build_path(&tree.html_dir, &env_id, TEST_SCRIPT_SUFFIX),
        ));

        if self.config.compound.includes() {
            planned.push(self.script(
                ScriptScope::Compound,
                build_path(&tree.unit_tests_dir, COMPOUND_SCRIPT_STEM, TEST_SCRIPT_SUFFIX),
            ));
        }

        for (i, stub) in stubs.iter().enumerate() {
            if stubs[..i].contains(stub) {
                tracing::warn!(
                    stub = %stub,
                    "duplicate stub identifier, script will be regenerated"
                );
            }
            let path = build_path(&tree.unit_tests_dir, stub, TEST_SCRIPT_SUFFIX);
            match check_name(stub) {
                Ok(()) => planned.push(self.script(ScriptScope::Unit(stub.clone()), path)),
                Err(reason) => {
                    tracing::warn!(stub = %stub, reason = %reason, "rejecting stub identifier");
                    planned.push(PlannedArtifact {
                        kind: ArtifactKind::TestScript(ScriptScope::Unit(stub.clone())),
                        path: PathBuf::from(path),
                        command: String::new(),
                        rejection: Some(reason),
                    });
                }
            }
        }

        planned
    }

    /// Computes the plan without creating folders or invoking clicast.
    pub fn dry_run(&self) -> SiResult<Vec<PlannedArtifact>> {
        let tree = OutputTree::layout(&self.config.working_dir, &self.config.unit_name);
        let stubs = extract_identifiers(&self.config.env_file_path())?;
        Ok(self.plan(&tree, &stubs))
    }

    /// Runs the full generation.
    ///
    /// Folder and environment file errors abort the run. clicast failures
    /// are recorded in the report and, under [`FailurePolicy::Continue`],
    /// do not stop the remaining invocations.
    pub fn run(&self) -> SiResult<RunReport> {
        let unit = &self.config.unit_name;
        tracing::info!(unit = %unit, "starting SI generation");

        let tree = OutputTree::provision(&self.config.working_dir, unit)?;
        let stubs = extract_identifiers(&self.config.env_file_path())?;
        let planned = self.plan(&tree, &stubs);

        let mut outcomes = Vec::with_capacity(planned.len());
        for artifact in &planned {
            let outcome = self.invoke(artifact);
            let failed = !outcome.status.is_success();
            outcomes.push(outcome);

            if failed && self.config.failure_policy == FailurePolicy::FailFast {
                tracing::warn!(
                    remaining = planned.len() - outcomes.len(),
                    "stopping after first failure"
                );
                break;
            }
        }

        let summary = RunSummary::from_outcomes(planned.len(), &outcomes);
        tracing::info!(
            succeeded = summary.succeeded,
            attempted = summary.attempted,
            success_rate = summary.success_rate,
            "SI generation finished"
        );

        let report = RunReport {
            unit_name: unit.clone(),
            env_id: self.config.env_id(),
            results_dir: tree.results_dir,
            env_file: self.config.env_file_path(),
            clicast: self.config.clicast.clone(),
            compound: self.config.compound.includes(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            artifacts: outcomes,
            summary,
        };

        // A summary that cannot be written does not invalidate the run.
        match report.write_summary() {
            Ok(path) => tracing::info!(path = %path.display(), "summary written"),
            Err(e) => tracing::error!(error = %e, "failed to write summary"),
        }

        Ok(report)
    }

    fn invoke(&self, artifact: &PlannedArtifact) -> ArtifactOutcome {
        if let Some(ref reason) = artifact.rejection {
            return ArtifactOutcome {
                kind: artifact.kind.clone(),
                path: artifact.path.clone(),
                command: String::new(),
                status: ArtifactStatus::Rejected,
                exit_code: None,
                duration_ms: 0,
                message: Some(reason.clone()),
            };
        }

        let label = artifact.kind.label();
        tracing::debug!(command = %artifact.command, "invoking clicast");

        let (status, exit_code, duration_ms, message) = match self.runner.run(&artifact.command) {
            Ok(output) => {
                let status = if output.success {
                    ArtifactStatus::Succeeded
                } else {
                    ArtifactStatus::Failed
                };
                let stderr = output.stderr.trim();
                let message = (!stderr.is_empty()).then(|| stderr.to_string());
                (
                    status,
                    output.exit_code,
                    output.duration.as_millis() as u64,
                    message,
                )
            }
            Err(e @ SiError::Timeout { .. }) => (
                ArtifactStatus::TimedOut,
                None,
                self.config.timeout.as_millis() as u64,
                Some(e.to_string()),
            ),
            Err(e) => (ArtifactStatus::SpawnFailed, None, 0, Some(e.to_string())),
        };

        match status {
            ArtifactStatus::Succeeded => {
                tracing::info!(artifact = %label, exit_code = ?exit_code, "clicast finished");
            }
            _ => {
                tracing::warn!(
                    artifact = %label,
                    status = ?status,
                    exit_code = ?exit_code,
                    "clicast did not produce artifact"
                );
            }
        }

        ArtifactOutcome {
            kind: artifact.kind.clone(),
            path: artifact.path.clone(),
            command: artifact.command.clone(),
            status,
            exit_code,
            duration_ms,
            message,
        }
    }

    fn script(&self, scope: ScriptScope, path: String) -> PlannedArtifact {
        let path = PathBuf::from(path);
        self.planned(
            ArtifactKind::TestScript(scope.clone()),
            path.clone(),
            ClicastCommand::TestScript { scope, path },
        )
    }

    fn planned(
        &self,
        kind: ArtifactKind,
        path: PathBuf,
        command: ClicastCommand,
    ) -> PlannedArtifact {
        PlannedArtifact {
            kind,
            path,
            command: command.render(&self.config.clicast, &self.config.env_id()),
            rejection: None,
        }
    }
}

/// Resolves the unit name from a directory's final component.
pub fn unit_name_from_dir(dir: &Path) -> SiResult<String> {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.trim().is_empty())
        .ok_or(SiError::EmptyUnitName)
}
