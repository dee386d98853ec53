//! Subprocess runner
//!
//! Launches one tool, waits for it, and parses the stream that carries its
//! diagnostics. Exit status is ignored: whatever the tool printed is parsed.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::core::{Diagnostic, Notifier, OutputSink, Severity};
use crate::parser::parse_tool_output;

/// Which standard stream a tool writes its diagnostics to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Recovery when the tool binary does not exist
#[derive(Debug, Clone, PartialEq)]
pub enum MissingTool {
    /// Prompt the user to install the named tool
    Prompt(String),
    /// Show this message
    Message(String),
}

/// One tool invocation
#[derive(Debug, Clone)]
pub struct ToolRun {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub severity: Severity,
    pub stream: OutputStream,
    pub missing: MissingTool,
}

impl ToolRun {
    /// Run `program` in `cwd`, reading diagnostics from stderr
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        cwd: &Path,
        severity: Severity,
    ) -> Self {
        let program = program.into();
        let missing = MissingTool::Message(format!("Cannot find \"{}\"", program.display()));
        Self {
            program,
            args,
            cwd: cwd.to_path_buf(),
            severity,
            stream: OutputStream::Stderr,
            missing,
        }
    }

    pub fn reading(mut self, stream: OutputStream) -> Self {
        self.stream = stream;
        self
    }

    pub fn when_missing(mut self, missing: MissingTool) -> Self {
        self.missing = missing;
        self
    }

    /// The command line as echoed to the output log
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Run a tool and parse its diagnostics
///
/// A missing binary triggers the run's recovery prompt and yields no
/// diagnostics. Any other launch failure is logged and yields none either.
pub async fn run_tool(
    run: &ToolRun,
    notifier: &dyn Notifier,
    output: &dyn OutputSink,
) -> Vec<Diagnostic> {
    log::debug!("Running {} in {}", run.command_line(), run.cwd.display());

    let result = Command::new(&run.program)
        .args(&run.args)
        .current_dir(&run.cwd)
        .kill_on_drop(true)
        .output()
        .await;

    let captured = match result {
        Ok(captured) => captured,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("{} not found", run.program.display());
            match &run.missing {
                MissingTool::Prompt(tool) => notifier.prompt_install(tool).await,
                MissingTool::Message(message) => notifier.info(message).await,
            }
            return Vec::new();
        }
        Err(e) => {
            log::warn!("Failed to run {}: {}", run.command_line(), e);
            return Vec::new();
        }
    };

    if !captured.status.success() {
        log::debug!("{} exited with {}", run.program.display(), captured.status);
    }

    let text = match run.stream {
        OutputStream::Stdout => String::from_utf8_lossy(&captured.stdout),
        OutputStream::Stderr => String::from_utf8_lossy(&captured.stderr),
    };

    output.append_line(&format!("Finished running tool: {}", run.command_line()));
    let diagnostics = parse_tool_output(&text, &run.cwd, run.severity, output);
    output.append_line("");

    diagnostics
}
