//! Per-artifact outcome records and the run report.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clicast::{ReportKind, ScriptScope};
use crate::error::{SiError, SiResult};

/// An artifact the run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum ArtifactKind {
    /// A custom HTML report.
    Report(ReportKind),
    /// A `.tst` test script.
    TestScript(ScriptScope),
}

impl ArtifactKind {
    /// Short human-readable label.
    pub fn label(&self) -> String {
        match self {
            ArtifactKind::Report(ReportKind::Full) => "full report".to_string(),
            ArtifactKind::Report(ReportKind::Management) => "management report".to_string(),
            ArtifactKind::Report(ReportKind::Metrics) => "metrics report".to_string(),
            ArtifactKind::TestScript(ScriptScope::Environment) => "test script".to_string(),
            ArtifactKind::TestScript(ScriptScope::Compound) => "compound test script".to_string(),
            ArtifactKind::TestScript(ScriptScope::Unit(name)) => format!("test script ({})", name),
        }
    }
}

/// How one invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    /// clicast exited with status zero.
    Succeeded,
    /// clicast exited non-zero or was killed by a signal.
    Failed,
    /// clicast was killed after the timeout.
    TimedOut,
    /// The shell could not be started.
    SpawnFailed,
    /// The stub identifier cannot be passed to clicast; nothing was invoked.
    Rejected,
}

impl ArtifactStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ArtifactStatus::Succeeded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactStatus::Succeeded => "succeeded",
            ArtifactStatus::Failed => "failed",
            ArtifactStatus::TimedOut => "timed out",
            ArtifactStatus::SpawnFailed => "spawn failed",
            ArtifactStatus::Rejected => "rejected",
        }
    }
}

/// Outcome of one clicast invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactOutcome {
    pub kind: ArtifactKind,
    /// Destination file (unquoted).
    pub path: PathBuf,
    /// Command line as handed to the shell, empty when rejected.
    pub command: String,
    pub status: ArtifactStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
    /// Captured stderr, or the runner error when the command never finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub planned: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Artifacts never attempted because the run stopped early.
    pub skipped: usize,
    /// Percentage of attempted artifacts that succeeded.
    pub success_rate: f64,
}

impl RunSummary {
    /// Computes the summary for `planned` artifacts and their outcomes.
    pub fn from_outcomes(planned: usize, outcomes: &[ArtifactOutcome]) -> Self {
        let attempted = outcomes.len();
        let succeeded = outcomes.iter().filter(|o| o.status.is_success()).count();
        let success_rate = if attempted == 0 {
            0.0
        } else {
            succeeded as f64 / attempted as f64 * 100.0
        };
        Self {
            planned,
            attempted,
            succeeded,
            failed: attempted - succeeded,
            skipped: planned.saturating_sub(attempted),
            success_rate,
        }
    }
}

/// File name of the summary written into the results directory.
pub const SUMMARY_FILE_NAME: &str = "generation_summary.md";

/// Result of a full generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub unit_name: String,
    pub env_id: String,
    pub results_dir: PathBuf,
    pub env_file: PathBuf,
    pub clicast: PathBuf,
    pub compound: bool,
    /// RFC 3339 timestamp of when the run finished.
    pub generated_at: String,
    pub artifacts: Vec<ArtifactOutcome>,
    pub summary: RunSummary,
}

impl RunReport {
    /// Returns true if every attempted artifact succeeded and none were skipped.
    pub fn all_succeeded(&self) -> bool {
        self.summary.failed == 0 && self.summary.skipped == 0
    }

    /// Outcomes that did not succeed.
    pub fn failures(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.artifacts.iter().filter(|o| !o.status.is_success())
    }

    /// Serializes the report as pretty JSON.
    pub fn to_json_pretty(&self) -> SiResult<String> {
        serde_json::to_string_pretty(self).map_err(SiError::SerializeFailed)
    }

    /// Renders the human-readable Markdown summary.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("# VectorCAST SI Generation Summary\n\n");
        md.push_str(&format!("- Generated on: {}\n", self.generated_at));
        md.push_str(&format!("- Unit Name: {}\n", self.unit_name));
        md.push_str(&format!(
            "- Environment: {} (`{}`)\n",
            self.env_id,
            self.env_file.display()
        ));
        md.push_str(&format!(
            "- Compound Test Cases: {}\n",
            if self.compound { "Yes" } else { "No" }
        ));

        md.push_str("\n## Artifacts\n\n");
        for outcome in &self.artifacts {
            md.push_str(&format!(
                "- **{}** ({}): `{}`\n",
                outcome.kind.label(),
                outcome.status.as_str(),
                outcome.path.display()
            ));
        }
        if self.summary.skipped > 0 {
            md.push_str(&format!(
                "- {} artifact(s) skipped after the first failure\n",
                self.summary.skipped
            ));
        }

        md.push_str("\n## Configuration\n\n");
        md.push_str(&format!("- clicast: `{}`\n", self.clicast.display()));
        md.push_str(&format!(
            "- Output Directory: `{}`\n",
            self.results_dir.display()
        ));

        md.push_str(&format!(
            "\n{}/{} succeeded ({:.1}%)\n",
            self.summary.succeeded, self.summary.attempted, self.summary.success_rate
        ));
        md
    }

    /// Writes [`to_markdown`](Self::to_markdown) to
    /// `<results_dir>/generation_summary.md` and returns its path.
    pub fn write_summary(&self) -> SiResult<PathBuf> {
        let path = self.results_dir.join(SUMMARY_FILE_NAME);
        std::fs::write(&path, self.to_markdown()).map_err(|e| SiError::WriteReportFailed {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    /// Writes the report as pretty JSON to `path`.
    pub fn write_json(&self, path: &Path) -> SiResult<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|e| SiError::WriteReportFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn outcome(status: ArtifactStatus) -> ArtifactOutcome {
        ArtifactOutcome {
            kind: ArtifactKind::Report(ReportKind::Full),
            path: PathBuf::from("Engine_Full_Report.html"),
            command: "clicast".to_string(),
            status,
            exit_code: Some(0),
            duration_ms: 5,
            message: None,
        }
    }

    #[test]
    fn test_summary_counts() {
        let outcomes = vec![
            outcome(ArtifactStatus::Succeeded),
            outcome(ArtifactStatus::Failed),
            outcome(ArtifactStatus::TimedOut),
            outcome(ArtifactStatus::Succeeded),
        ];
        let summary = RunSummary::from_outcomes(5, &outcomes);

        assert_eq!(summary.attempted, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.success_rate, 50.0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::from_outcomes(0, &[]);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn test_artifact_kind_json_shape() {
        let kind = ArtifactKind::TestScript(ScriptScope::Unit("alpha".to_string()));
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "test_script", "detail": {"scope": "unit", "name": "alpha"}})
        );

        let kind = ArtifactKind::Report(ReportKind::Metrics);
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json, serde_json::json!({"type": "report", "detail": "metrics"}));
    }

    #[test]
    fn test_labels() {
        assert_eq!(ArtifactKind::Report(ReportKind::Full).label(), "full report");
        assert_eq!(
            ArtifactKind::TestScript(ScriptScope::Unit("beta".to_string())).label(),
            "test script (beta)"
        );
    }

    fn report_in(dir: &Path, outcomes: Vec<ArtifactOutcome>, planned: usize) -> RunReport {
        RunReport {
            unit_name: "Engine".to_string(),
            env_id: "ENGINE".to_string(),
            results_dir: dir.to_path_buf(),
            env_file: dir.join("ENGINE.env"),
            clicast: PathBuf::from("/opt/vcast/clicast"),
            compound: false,
            generated_at: "2024-01-01T00:00:00Z".to_string(),
            summary: RunSummary::from_outcomes(planned, &outcomes),
            artifacts: outcomes,
        }
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let report = report_in(
            dir.path(),
            vec![
                outcome(ArtifactStatus::Succeeded),
                outcome(ArtifactStatus::Failed),
            ],
            3,
        );

        let path = report.write_summary().unwrap();
        assert_eq!(path, dir.path().join(SUMMARY_FILE_NAME));

        let md = std::fs::read_to_string(path).unwrap();
        assert!(md.starts_with("# VectorCAST SI Generation Summary"));
        assert!(md.contains("- Unit Name: Engine"));
        assert!(md.contains("- Compound Test Cases: No"));
        assert!(md.contains("- **full report** (failed): `Engine_Full_Report.html`"));
        assert!(md.contains("1 artifact(s) skipped"));
        assert!(md.contains("- clicast: `/opt/vcast/clicast`"));
        assert!(md.contains("1/2 succeeded (50.0%)"));
    }

    #[test]
    fn test_write_summary_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let report = report_in(&dir.path().join("gone"), vec![], 0);
        assert!(matches!(
            report.write_summary(),
            Err(SiError::WriteReportFailed { .. })
        ));
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let report = report_in(dir.path(), vec![outcome(ArtifactStatus::Succeeded)], 1);

        let path = dir.path().join("run.json");
        report.write_json(&path).unwrap();

        let parsed: RunReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, report);
        assert!(parsed.all_succeeded());
    }
}
