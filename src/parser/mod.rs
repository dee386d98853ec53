//! Tool Output Parser
//!
//! Turns the text that compilers and linters print into diagnostics.
//! The same parser serves every tool; only the stream, working directory
//! and severity change between callers.

pub mod prelude;

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::core::{Diagnostic, OutputSink, Severity};

pub use prelude::package_name;

/// `[label: ]path:line[:col]:[ tag:] message`
static DIAGNOSTIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:]*: )?((.:)?[^:]*):(\d+)(:(\d+)?)?:(?:\w+:)? (.*)$")
        .expect("diagnostic line pattern is valid")
});

/// A diagnostic line split into its parts, before path resolution
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticLine<'a> {
    pub file: &'a str,
    pub line: usize,
    pub column: Option<usize>,
    pub message: &'a str,
}

/// Match a single output line against the diagnostic pattern
pub fn parse_diagnostic_line(line: &str) -> Option<DiagnosticLine<'_>> {
    let caps = DIAGNOSTIC_LINE.captures(line)?;

    let file = caps.get(2)?.as_str();
    let line_number = caps.get(4)?.as_str().parse().ok()?;
    let column = caps.get(6).and_then(|m| m.as_str().parse().ok());
    let message = caps.get(7)?.as_str();

    Some(DiagnosticLine {
        file,
        line: line_number,
        column,
        message,
    })
}

/// Parse a tool's output into diagnostics
///
/// Lines starting with a tab continue the message of the previous
/// diagnostic. Lines that are neither continuations nor diagnostics are
/// dropped. Every accepted line is echoed to `output`.
pub fn parse_tool_output(
    text: &str,
    cwd: &Path,
    severity: Severity,
    output: &dyn OutputSink,
) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for line in text.lines() {
        if let Some(continuation) = line.strip_prefix('\t') {
            if let Some(last) = diagnostics.last_mut() {
                last.message.push('\n');
                last.message.push_str(continuation);
                output.append_line(line);
            }
            continue;
        }

        let Some(parsed) = parse_diagnostic_line(line) else {
            continue;
        };

        let file = resolve_path(cwd, parsed.file);
        output.append_line(&format!(
            "{}:{}: {}",
            file.display(),
            parsed.line,
            parsed.message
        ));
        diagnostics.push(Diagnostic {
            file,
            line: parsed.line,
            column: parsed.column,
            message: parsed.message.to_string(),
            severity,
        });
    }

    diagnostics
}

/// Resolve `file` against `cwd` and normalize `.` and `..` lexically
pub fn resolve_path(cwd: &Path, file: &str) -> PathBuf {
    let joined = cwd.join(file);
    let mut resolved = PathBuf::new();

    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never climb above the root
                if !matches!(
                    resolved.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    resolved.pop();
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }

    resolved
}
