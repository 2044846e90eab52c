//! clicast command-line grammar.
//!
//! Commands are rendered as a single shell line:
//!
//! ```text
//! "<tool>" -lc -e "<ENV_ID>" Reports Custom <Kind> <path>
//! "<tool>" -lc -e "<ENV_ID>" [-s "<<COMPOUND>>"] [-u "<name>"] TESt Script CReate "<path>"
//! ```
//!
//! Names are double-quoted, so they may hold spaces and punctuation, but not
//! the characters a shell still expands inside double quotes. See
//! [`check_name`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Subsystem selector addressing compound test cases.
pub const COMPOUND_SELECTOR: &str = "<<COMPOUND>>";

/// Characters that stay special inside double quotes (`sh` and `cmd`) or
/// would turn a name into a path.
const UNSAFE_NAME_CHARS: &[char] = &['"', '$', '`', '\\', '%', '/'];

/// Checks that `name` can be embedded in a quoted clicast argument and used
/// as a file stem.
///
/// Returns the reason when it cannot.
pub fn check_name(name: &str) -> Result<(), String> {
    if name == "." || name == ".." {
        return Err(format!("'{}' is not a valid file name", name));
    }
    if let Some(c) = name
        .chars()
        .find(|c| UNSAFE_NAME_CHARS.contains(c) || c.is_control())
    {
        return Err(format!("character {:?} is not allowed", c));
    }
    Ok(())
}

/// Custom report produced by clicast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Full report.
    Full,
    /// Test case management report.
    Management,
    /// Metrics report.
    Metrics,
}

impl ReportKind {
    /// All report kinds, in generation order.
    pub const ALL: [ReportKind; 3] = [
        ReportKind::Full,
        ReportKind::Management,
        ReportKind::Metrics,
    ];

    /// Returns the clicast keyword for this report.
    pub fn keyword(&self) -> &'static str {
        match self {
            ReportKind::Full => "Full",
            ReportKind::Management => "Management",
            ReportKind::Metrics => "Metrics",
        }
    }
}

/// Which test script a `TESt Script CReate` call produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "name", rename_all = "snake_case")]
pub enum ScriptScope {
    /// Every test case in the environment.
    Environment,
    /// Compound test cases only.
    Compound,
    /// Test cases of one stubbed function.
    Unit(String),
}

/// One clicast invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClicastCommand {
    /// `Reports Custom <Kind> <path>`
    Report {
        kind: ReportKind,
        /// Destination as returned by [`build_path`](crate::paths::build_path).
        path: String,
    },
    /// `TESt Script CReate "<path>"`
    TestScript { scope: ScriptScope, path: PathBuf },
}

impl ClicastCommand {
    /// Renders the command for `tool` operating on environment `env_id`.
    pub fn render(&self, tool: &Path, env_id: &str) -> String {
        let mut line = format!("\"{}\" -lc -e \"{}\"", tool.display(), env_id);

        match self {
            ClicastCommand::Report { kind, path } => {
                line.push_str(&format!(" Reports Custom {} {}", kind.keyword(), path));
            }
            ClicastCommand::TestScript { scope, path } => {
                match scope {
                    ScriptScope::Environment => {}
                    ScriptScope::Compound => {
                        line.push_str(&format!(" -s \"{}\"", COMPOUND_SELECTOR));
                    }
                    ScriptScope::Unit(name) => {
                        line.push_str(&format!(" -u \"{}\"", name));
                    }
                }
                line.push_str(&format!(" TESt Script CReate \"{}\"", path.display()));
            }
        }

        line
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_keywords() {
        assert_eq!(ReportKind::Full.keyword(), "Full");
        assert_eq!(ReportKind::Management.keyword(), "Management");
        assert_eq!(ReportKind::Metrics.keyword(), "Metrics");
    }

    #[test]
    fn test_render_report() {
        let cmd = ClicastCommand::Report {
            kind: ReportKind::Full,
            path: "\"out/Engine_Full_Report.html\"".to_string(),
        };
        assert_eq!(
            cmd.render(Path::new("/opt/vcast/clicast"), "ENGINE"),
            "\"/opt/vcast/clicast\" -lc -e \"ENGINE\" Reports Custom Full \"out/Engine_Full_Report.html\""
        );
    }

    #[test]
    fn test_render_environment_script() {
        let cmd = ClicastCommand::TestScript {
            scope: ScriptScope::Environment,
            path: PathBuf::from("out/ENGINE.tst"),
        };
        assert_eq!(
            cmd.render(Path::new("clicast"), "ENGINE"),
            "\"clicast\" -lc -e \"ENGINE\" TESt Script CReate \"out/ENGINE.tst\""
        );
    }

    #[test]
    fn test_render_compound_script() {
        let cmd = ClicastCommand::TestScript {
            scope: ScriptScope::Compound,
            path: PathBuf::from("out/__COMPOUND__.tst"),
        };
        assert_eq!(
            cmd.render(Path::new("clicast"), "ENGINE"),
            "\"clicast\" -lc -e \"ENGINE\" -s \"<<COMPOUND>>\" TESt Script CReate \"out/__COMPOUND__.tst\""
        );
    }

    #[test]
    fn test_render_unit_script() {
        let cmd = ClicastCommand::TestScript {
            scope: ScriptScope::Unit("alpha".to_string()),
            path: PathBuf::from("out/alpha.tst"),
        };
        assert_eq!(
            cmd.render(Path::new("clicast"), "ENGINE"),
            "\"clicast\" -lc -e \"ENGINE\" -u \"alpha\" TESt Script CReate \"out/alpha.tst\""
        );
    }

    #[test]
    fn test_render_unit_script_with_spaces() {
        let cmd = ClicastCommand::TestScript {
            scope: ScriptScope::Unit("ns::Widget (overload 2)".to_string()),
            path: PathBuf::from("out/ns::Widget (overload 2).tst"),
        };
        assert!(cmd
            .render(Path::new("clicast"), "ENGINE")
            .contains(" -u \"ns::Widget (overload 2)\" "));
    }

    #[test]
    fn test_check_name() {
        assert!(check_name("alpha").is_ok());
        assert!(check_name("ns::Widget (overload 2)").is_ok());
        assert!(check_name("operator<").is_ok());

        assert!(check_name("..").is_err());
        assert!(check_name("../escape").is_err());
        assert!(check_name("dir\\name").is_err());
        assert!(check_name("$(touch pwned)").is_err());
        assert!(check_name("`id`").is_err());
        assert!(check_name("say \"hi\"").is_err());
        assert!(check_name("%PATH%").is_err());
        assert!(check_name("tab\there").is_err());
    }
}
