//! Properties of the shared tool output parser
use std::path::{Path, PathBuf};

use go_check::core::{MemoryOutput, Severity};
use go_check::parse_tool_output;

fn parse(text: &str, cwd: &str) -> Vec<go_check::Diagnostic> {
    parse_tool_output(text, Path::new(cwd), Severity::Warning, &MemoryOutput::new())
}

#[test]
fn test_compiler_error_with_continuation() {
    let output = MemoryOutput::new();
    let diagnostics = parse_tool_output(
        "main.go:10:5: undefined: foo\n\tmore detail\n",
        Path::new("/proj"),
        Severity::Error,
        &output,
    );

    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.file, PathBuf::from("/proj/main.go"));
    assert_eq!(diagnostic.line, 10);
    assert_eq!(diagnostic.column, Some(5));
    assert_eq!(diagnostic.message, "undefined: foo\nmore detail");
    assert_eq!(diagnostic.severity, Severity::Error);
}

#[test]
fn test_well_formed_lines_extract_file_line_and_message() {
    let cases = [
        ("a.go:1: first", "/w/a.go", 1, "first"),
        ("sub/b.go:22: second: with colon", "/w/sub/b.go", 22, "second: with colon"),
        ("../c.go:333:4: third", "/c.go", 333, "third"),
        ("/abs/d.go:9:1: fourth", "/abs/d.go", 9, "fourth"),
    ];

    for (line, file, number, message) in cases {
        let diagnostics = parse(line, "/w");
        assert_eq!(diagnostics.len(), 1, "line: {}", line);
        assert_eq!(diagnostics[0].file, PathBuf::from(file), "line: {}", line);
        assert_eq!(diagnostics[0].line, number, "line: {}", line);
        assert_eq!(diagnostics[0].message, message, "line: {}", line);
    }
}

#[test]
fn test_multiple_continuations_attach_to_latest_diagnostic() {
    let diagnostics = parse(
        "a.go:1: first\na.go:2: cannot use x\n\thave int\n\twant string\n",
        "/w",
    );

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].message, "first");
    assert_eq!(diagnostics[1].message, "cannot use x\nhave int\nwant string");
}

#[test]
fn test_continuation_without_prior_diagnostic_is_dropped() {
    assert!(parse("\tdangling detail\n", "/w").is_empty());
}

#[test]
fn test_unmatched_lines_do_not_disturb_neighbours() {
    let diagnostics = parse(
        "# example.com/w\na.go:1: first\nnot a diagnostic\na.go:2: second\nFAIL\n",
        "/w",
    );

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].message, "first");
    assert_eq!(diagnostics[1].message, "second");
}

#[test]
fn test_windows_line_endings() {
    let diagnostics = parse("a.go:4:2: bad thing\r\n\tdetail\r\n", "/w");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "bad thing\ndetail");
}

#[test]
fn test_empty_output() {
    assert!(parse("", "/w").is_empty());
}
