//! Environment file parsing.
//!
//! A VectorCAST environment file (`<ENV_ID>.env`) lists one
//! `ENVIRO.STUB_BY_FUNCTION: <name>` line per function stubbed in the
//! environment. Each of those names gets its own test script.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{SiError, SiResult};

/// Marker preceding every stubbed function name.
pub const STUB_MARKER: &str = "ENVIRO.STUB_BY_FUNCTION:";

/// Marker, exactly one separating blank, then a token that does not start
/// with whitespace and runs to the end of the line.
const STUB_PATTERN: &str = r"(?im)ENVIRO\.STUB_BY_FUNCTION:[ \t](\S.*)$";

static STUB_REGEX: OnceLock<Regex> = OnceLock::new();

fn stub_regex() -> &'static Regex {
    STUB_REGEX.get_or_init(|| Regex::new(STUB_PATTERN).expect("invalid regex pattern"))
}

/// Reads `path` and returns every stub identifier it declares, in file order.
///
/// Duplicates are kept. A file without markers yields an empty vector.
pub fn extract_identifiers(path: &Path) -> SiResult<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SiError::EnvFileNotFound {
            path: path.to_path_buf(),
        },
        _ => SiError::ReadEnvFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let content = String::from_utf8(bytes).map_err(|_| SiError::EnvFileEncoding {
        path: path.to_path_buf(),
    })?;

    let identifiers = extract_identifiers_from_str(&content);
    tracing::debug!(
        path = %path.display(),
        count = identifiers.len(),
        "parsed environment file"
    );
    Ok(identifiers)
}

/// Extracts stub identifiers from environment file content.
///
/// Trailing whitespace (including the `\r` of CRLF files) is trimmed from
/// each identifier; nothing else about the token is altered.
pub fn extract_identifiers_from_str(content: &str) -> Vec<String> {
    stub_regex()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end().to_string())
        .collect()
}
