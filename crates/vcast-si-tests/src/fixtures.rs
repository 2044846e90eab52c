//! Test fixture utilities for unit directories and a fake clicast.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Behaviour of the fake clicast script.
#[derive(Debug, Clone, Default)]
pub struct FakeClicast {
    /// Exit with status 3 when the command line contains this text.
    pub fail_on: Option<String>,
    /// Sleep for the given seconds when the command line contains the pattern.
    pub hang_on: Option<(String, u32)>,
}

impl FakeClicast {
    /// A clicast that creates every requested file.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Fails invocations whose arguments contain `pattern`.
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            fail_on: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    /// Hangs for `secs` seconds on invocations whose arguments contain `pattern`.
    pub fn hanging_on(pattern: &str, secs: u32) -> Self {
        Self {
            hang_on: Some((pattern.to_string(), secs)),
            ..Default::default()
        }
    }

    /// Renders the POSIX shell script.
    ///
    /// Every invocation appends its arguments to `clicast.log` next to the
    /// script, then touches the last argument (the output path).
    pub fn script(&self) -> String {
        let mut script = String::from(
            "#!/bin/sh\nfor last; do :; done\nprintf '%s\\n' \"$*\" >> \"$(dirname \"$0\")/clicast.log\"\n",
        );
        if let Some(ref pattern) = self.fail_on {
            script.push_str(&format!(
                "case \"$*\" in *\"{}\"*) echo \"simulated failure\" 1>&2; exit 3;; esac\n",
                pattern
            ));
        }
        if let Some((ref pattern, secs)) = self.hang_on {
            script.push_str(&format!(
                "case \"$*\" in *\"{}\"*) exec sleep {};; esac\n",
                pattern, secs
            ));
        }
        script.push_str("touch \"$last\"\n");
        script
    }
}

/// A unit directory with an environment file and a fake VectorCAST install.
pub struct UnitFixture {
    pub root: TempDir,
    /// `<root>/<unit>`
    pub unit_dir: PathBuf,
    /// `<root>/vcast`
    pub vectorcast_dir: PathBuf,
    pub unit_name: String,
}

impl UnitFixture {
    /// Create a fixture for `unit_name` with no environment file yet.
    pub fn new(unit_name: &str) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let unit_dir = root.path().join(unit_name);
        let vectorcast_dir = root.path().join("vcast");
        fs::create_dir(&unit_dir).expect("Failed to create unit dir");
        fs::create_dir(&vectorcast_dir).expect("Failed to create vcast dir");
        Self {
            root,
            unit_dir,
            vectorcast_dir,
            unit_name: unit_name.to_string(),
        }
    }

    /// Writes `<UNIT>.env` declaring the given stubs.
    pub fn with_stubs(self, stubs: &[&str]) -> Self {
        let mut content = format!(
            "ENVIRO.NEW\nENVIRO.NAME: {}\nENVIRO.COVERAGE_TYPE: Statement+Branch\n",
            self.unit_name.to_uppercase()
        );
        for stub in stubs {
            content.push_str(&format!("ENVIRO.STUB_BY_FUNCTION: {}\n", stub));
        }
        content.push_str("ENVIRO.END\n");
        fs::write(self.env_file(), content).expect("Failed to write env file");
        self
    }

    /// Installs a fake clicast and returns its path.
    #[cfg(unix)]
    pub fn install_clicast(&self, fake: &FakeClicast) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.vectorcast_dir.join("clicast");
        fs::write(&path, fake.script()).expect("Failed to write clicast script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make clicast executable");
        path
    }

    /// Path of the default environment file.
    pub fn env_file(&self) -> PathBuf {
        self.unit_dir.join(format!("{}.env", self.unit_name.to_uppercase()))
    }

    /// Path of the results root.
    pub fn results_dir(&self) -> PathBuf {
        self.unit_dir.join(format!("{}_VCAST_SI_Results", self.unit_name))
    }

    /// Lines the fake clicast logged, one per invocation.
    pub fn clicast_log(&self) -> Vec<String> {
        fs::read_to_string(self.vectorcast_dir.join("clicast.log"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// All files below `dir`, relative to it, sorted.
pub fn files_under(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .strip_prefix(dir)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    files.sort();
    files
}
