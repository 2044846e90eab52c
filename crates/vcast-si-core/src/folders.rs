//! Output folder provisioning.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{SiError, SiResult};

/// Name of the intermediate folder holding reports and the top-level script.
pub const HTML_AND_TESTS_DIR: &str = "Html&Tst's";
/// Name of the folder holding per-function test scripts.
pub const UNIT_TESTS_DIR: &str = "Unit_Tst's";

/// Creates `parent/folder_name` unless it already exists.
///
/// Returns the folder path either way. The parent must exist; a regular
/// file at the target path is reported as [`SiError::NotADirectory`].
pub fn ensure_folder(parent: &Path, folder_name: &str) -> SiResult<PathBuf> {
    let path = parent.join(folder_name);

    match std::fs::create_dir(&path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "created folder");
            Ok(path)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            if path.is_dir() {
                tracing::debug!(path = %path.display(), "folder already present");
                Ok(path)
            } else {
                Err(SiError::NotADirectory { path })
            }
        }
        Err(e) => Err(SiError::CreateFolderFailed { path, source: e }),
    }
}

/// The three nested result folders of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTree {
    /// `<unit>_VCAST_SI_Results`
    pub results_dir: PathBuf,
    /// `<results_dir>/Html&Tst's`
    pub html_dir: PathBuf,
    /// `<html_dir>/Unit_Tst's`
    pub unit_tests_dir: PathBuf,
}

impl OutputTree {
    /// Folder name of the results root for `unit_name`.
    pub fn results_dir_name(unit_name: &str) -> String {
        format!("{}_VCAST_SI_Results", unit_name)
    }

    /// Computes the tree under `base` without touching the filesystem.
    pub fn layout(base: &Path, unit_name: &str) -> Self {
        let results_dir = base.join(Self::results_dir_name(unit_name));
        let html_dir = results_dir.join(HTML_AND_TESTS_DIR);
        let unit_tests_dir = html_dir.join(UNIT_TESTS_DIR);
        Self {
            results_dir,
            html_dir,
            unit_tests_dir,
        }
    }

    /// Creates the tree under `base`, leaving existing folders and files alone.
    pub fn provision(base: &Path, unit_name: &str) -> SiResult<Self> {
        let results_dir = ensure_folder(base, &Self::results_dir_name(unit_name))?;
        let html_dir = ensure_folder(&results_dir, HTML_AND_TESTS_DIR)?;
        let unit_tests_dir = ensure_folder(&html_dir, UNIT_TESTS_DIR)?;
        Ok(Self {
            results_dir,
            html_dir,
            unit_tests_dir,
        })
    }
}
