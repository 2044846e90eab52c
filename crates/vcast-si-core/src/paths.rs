//! Output path derivation.

use std::path::Path;

/// Suffix of the full report.
pub const FULL_REPORT_SUFFIX: &str = "_Full_Report.html";
/// Suffix of the test case management report.
pub const MANAGEMENT_REPORT_SUFFIX: &str = "_Testcase_Management_Report.html";
/// Suffix of the metrics report.
pub const METRICS_REPORT_SUFFIX: &str = "_Metrics_Report.html";
/// Suffix of every test script.
pub const TEST_SCRIPT_SUFFIX: &str = ".tst";
/// File stem of the compound test script.
pub const COMPOUND_SCRIPT_STEM: &str = "__COMPOUND__";

/// Builds `base_dir/<unit_name><suffix>`.
///
/// When the resulting path ends in `.html` it is wrapped in literal double
/// quotes so it survives word splitting in the shell that runs clicast.
/// Other paths are returned bare; callers quote those themselves.
pub fn build_path(base_dir: &Path, unit_name: &str, suffix: &str) -> String {
    let path = base_dir.join(format!("{}{}", unit_name, suffix));
    let rendered = path.to_string_lossy().into_owned();

    if path.extension().and_then(|e| e.to_str()) == Some("html") {
        format!("\"{}\"", rendered)
    } else {
        rendered
    }
}

/// Removes the quoting added by [`build_path`], if any.
pub fn unquote(path: &str) -> &str {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
}
