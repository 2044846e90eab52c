//! VectorCAST SI artifact generation.
//!
//! This crate drives VectorCAST's `clicast` to produce the coverage,
//! management and metrics reports plus the test scripts of one unit, and
//! lays the results out in a fixed folder tree:
//!
//! ```text
//! <unit>_VCAST_SI_Results/
//!   Html&Tst's/
//!     <unit>_Full_Report.html
//!     <unit>_Testcase_Management_Report.html
//!     <unit>_Metrics_Report.html
//!     <UNIT>.tst
//!     Unit_Tst's/
//!       __COMPOUND__.tst      (when compound test cases are selected)
//!       <stub>.tst            (one per ENVIRO.STUB_BY_FUNCTION entry)
//!   generation_summary.md
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vcast_si_core::{CompoundSelection, Orchestrator, RunConfig};
//!
//! let config = RunConfig::new("Engine", "/src/Engine")?
//!     .clicast("/opt/vcast/clicast")
//!     .compound(CompoundSelection::Include);
//! let report = Orchestrator::new(config).run()?;
//!
//! for failure in report.failures() {
//!     println!("{} failed: {:?}", failure.kind.label(), failure.exit_code);
//! }
//! ```
//!
//! # Crate Structure
//!
//! - [`env_file`] - Stub identifier extraction from `.env` files
//! - [`paths`] - Artifact path derivation
//! - [`folders`] - Output tree provisioning
//! - [`clicast`] - clicast command grammar
//! - [`runner`] - Shell execution with timeout
//! - [`orchestrator`] - Run planning and execution
//! - [`report`] - Per-artifact outcomes and run report
//! - [`error`] - Error types

pub mod clicast;
pub mod env_file;
pub mod error;
pub mod folders;
pub mod orchestrator;
pub mod paths;
pub mod report;
pub mod runner;

// Re-export main types at crate root
pub use clicast::{check_name, ClicastCommand, ReportKind, ScriptScope};
pub use env_file::{extract_identifiers, extract_identifiers_from_str};
pub use error::{SiError, SiResult};
pub use folders::{ensure_folder, OutputTree};
pub use orchestrator::{
    unit_name_from_dir, CompoundSelection, FailurePolicy, Orchestrator, PlannedArtifact, RunConfig,
};
pub use paths::build_path;
pub use report::{
    ArtifactKind, ArtifactOutcome, ArtifactStatus, RunReport, RunSummary, SUMMARY_FILE_NAME,
};
pub use runner::{CommandOutput, CommandRunner, ShellRunner, DEFAULT_TIMEOUT_SECS};
