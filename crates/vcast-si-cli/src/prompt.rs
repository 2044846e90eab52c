//! Interactive compound test case menu.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use vcast_si_core::CompoundSelection;

/// Asks whether compound test cases should be included.
///
/// Accepts `1` (include) or `2` (skip); any other answer is an error.
pub fn ask_compound<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<CompoundSelection> {
    writeln!(output, "Generate compound test cases?")?;
    writeln!(output, "  1) Include compound test cases")?;
    writeln!(output, "  2) Skip compound test cases")?;
    write!(output, "Selection: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read selection")?;

    Ok(CompoundSelection::parse(&line)?)
}

/// Asks on the process's stdin/stdout.
pub fn ask_compound_stdio() -> Result<CompoundSelection> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    ask_compound(&mut stdin.lock(), &mut stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_include() {
        let mut out: Vec<u8> = Vec::new();
        let selection = ask_compound(&mut Cursor::new("1\n"), &mut out).unwrap();
        assert_eq!(selection, CompoundSelection::Include);
        assert!(String::from_utf8(out).unwrap().contains("Selection:"));
    }

    #[test]
    fn test_skip() {
        let mut out: Vec<u8> = Vec::new();
        let selection = ask_compound(&mut Cursor::new("2\r\n"), &mut out).unwrap();
        assert_eq!(selection, CompoundSelection::Skip);
    }

    #[test]
    fn test_rejects_other_input() {
        let mut out: Vec<u8> = Vec::new();
        let err = ask_compound(&mut Cursor::new("y\n"), &mut out).unwrap_err();
        assert!(err.to_string().contains("Invalid selection"));

        let err = ask_compound(&mut Cursor::new(""), &mut out).unwrap_err();
        assert!(err.to_string().contains("Invalid selection"));
    }
}
