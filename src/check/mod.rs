//! Check Orchestrator
//!
//! Runs the enabled save-time checks for one file and merges their
//! diagnostics. Build, lint, vet and coverage start together and are
//! joined at the end; the result keeps that order.

pub mod coverage;
pub mod runner;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{CheckSettings, DEFAULT_LINT_TOOL};
use crate::core::{Diagnostic, Notifier, OutputSink, Severity};
use crate::parser::prelude::is_main_package;
use crate::toolchain::Toolchain;

pub use coverage::{CoverageProvider, CoverageRequest, GoTestCoverage};
pub use runner::{MissingTool, OutputStream, ToolRun, run_tool};

/// Shown when the `go` binary cannot be resolved
pub const GO_NOT_FOUND: &str = "Cannot find \"go\" binary. Update PATH or GOROOT appropriately";

/// Default location of the throwaway build output
pub fn default_build_output() -> PathBuf {
    std::env::temp_dir().join("go-code-check")
}

/// True for files named like Go test files (`*_test.go`, any case)
pub fn is_test_file(file: &Path) -> bool {
    file.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with("_test.go"))
        .unwrap_or(false)
}

/// Arguments for `go build`, or `go test -c` when `file` is a test file
///
/// Library packages are built with `-i` so their dependencies get
/// installed; `package main` is not.
pub fn build_args(
    file: &Path,
    settings: &CheckSettings,
    is_main: bool,
    output: &Path,
) -> Vec<String> {
    let tags = format!("\"{}\"", settings.build_tags);
    let output = output.display().to_string();

    let mut args: Vec<String> = if is_test_file(file) {
        vec!["test".into(), "-copybinary".into(), "-o".into(), output, "-c".into()]
    } else {
        let mut args = vec!["build".to_string()];
        if !is_main {
            args.push("-i".into());
        }
        args.push("-o".into());
        args.push(output);
        args
    };

    args.push("-tags".into());
    args.push(tags);
    args.extend(settings.build_flags.iter().cloned());
    args.push(".".into());
    args
}

/// Arguments for the lint tool; only golint is given the file
pub fn lint_args(file: &Path, settings: &CheckSettings) -> Vec<String> {
    let mut args = settings.lint_flags.clone();
    if settings.lint_tool() == DEFAULT_LINT_TOOL {
        args.push(file.to_string_lossy().into_owned());
    }
    args
}

/// Arguments for `go tool vet`
pub fn vet_args(file: &Path, settings: &CheckSettings) -> Vec<String> {
    let mut args = vec!["tool".to_string(), "vet".to_string()];
    args.extend(settings.vet_flags.iter().cloned());
    args.push(file.to_string_lossy().into_owned());
    args
}

/// Runs the save-time checks against a resolved toolchain
pub struct Checker {
    toolchain: Toolchain,
    notifier: Arc<dyn Notifier>,
    output: Arc<dyn OutputSink>,
    coverage: Arc<dyn CoverageProvider>,
    build_output: PathBuf,
}

impl Checker {
    pub fn new(
        toolchain: Toolchain,
        notifier: Arc<dyn Notifier>,
        output: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            toolchain,
            notifier,
            output,
            coverage: Arc::new(GoTestCoverage::default()),
            build_output: default_build_output(),
        }
    }

    /// Replace the coverage collaborator
    pub fn with_coverage(mut self, coverage: Arc<dyn CoverageProvider>) -> Self {
        self.coverage = coverage;
        self
    }

    /// Write build output somewhere other than the temp directory
    pub fn with_build_output(mut self, path: PathBuf) -> Self {
        self.build_output = path;
        self
    }

    /// Run every enabled check on `file` and merge the results
    ///
    /// Fails when any single check fails; a check that merely finds
    /// nothing contributes an empty list.
    pub async fn check(&self, file: &Path, settings: &CheckSettings) -> Result<Vec<Diagnostic>> {
        let Some(go) = self.toolchain.go_runtime.as_deref() else {
            self.notifier.info(GO_NOT_FOUND).await;
            return Ok(Vec::new());
        };

        if !settings.any_enabled() {
            log::debug!("Every check is disabled; skipping {}", file.display());
            return Ok(Vec::new());
        }

        let file = std::path::absolute(file)
            .with_context(|| format!("Failed to resolve {}", file.display()))?;
        let cwd = match file.parent() {
            Some(dir) => dir.to_path_buf(),
            None => anyhow::bail!("{} has no parent directory", file.display()),
        };

        log::info!("Checking {}", file.display());

        let build = async {
            if settings.build_on_save {
                self.build_check(&file, &cwd, go, settings).await
            } else {
                Ok(Vec::new())
            }
        };

        let lint = async {
            if settings.lint_on_save {
                anyhow::Ok(self.lint_check(&file, &cwd, settings).await)
            } else {
                anyhow::Ok(Vec::new())
            }
        };

        let vet = async {
            if settings.vet_on_save {
                anyhow::Ok(self.vet_check(&file, &cwd, go, settings).await)
            } else {
                anyhow::Ok(Vec::new())
            }
        };

        let coverage = async {
            if settings.cover_on_save {
                let request = CoverageRequest {
                    file: &file,
                    go_runtime: go,
                    settings,
                    notifier: self.notifier.as_ref(),
                    output: self.output.as_ref(),
                };
                self.coverage.coverage(&request).await
            } else {
                Ok(Vec::new())
            }
        };

        let (build, lint, vet, coverage) = tokio::try_join!(build, lint, vet, coverage)?;

        let mut diagnostics = build;
        diagnostics.extend(lint);
        diagnostics.extend(vet);
        diagnostics.extend(coverage);

        log::info!(
            "Finished checking {}: {} diagnostics",
            file.display(),
            diagnostics.len()
        );
        Ok(diagnostics)
    }

    async fn build_check(
        &self,
        file: &Path,
        cwd: &Path,
        go: &Path,
        settings: &CheckSettings,
    ) -> Result<Vec<Diagnostic>> {
        // Only the package clause matters here; the compiler reports bad encodings
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let is_main = is_main_package(&String::from_utf8_lossy(&bytes));

        let args = build_args(file, settings, is_main, &self.build_output);
        let run = ToolRun::new(go, args, cwd, Severity::Error)
            .when_missing(MissingTool::Message(GO_NOT_FOUND.to_string()));

        Ok(run_tool(&run, self.notifier.as_ref(), self.output.as_ref()).await)
    }

    async fn lint_check(
        &self,
        file: &Path,
        cwd: &Path,
        settings: &CheckSettings,
    ) -> Vec<Diagnostic> {
        let tool = settings.lint_tool();
        let is_default = tool == DEFAULT_LINT_TOOL;

        let run = ToolRun::new(
            self.toolchain.tool_path(tool),
            lint_args(file, settings),
            cwd,
            Severity::Warning,
        );
        let run = if is_default {
            run.reading(OutputStream::Stderr)
                .when_missing(MissingTool::Prompt(tool.to_string()))
        } else {
            run.reading(OutputStream::Stdout)
                .when_missing(MissingTool::Message(format!(
                    "No \"{}\" could be found. Install {} to use this option.",
                    tool, tool
                )))
        };

        run_tool(&run, self.notifier.as_ref(), self.output.as_ref()).await
    }

    async fn vet_check(
        &self,
        file: &Path,
        cwd: &Path,
        go: &Path,
        settings: &CheckSettings,
    ) -> Vec<Diagnostic> {
        let run = ToolRun::new(go, vet_args(file, settings), cwd, Severity::Warning)
            .when_missing(MissingTool::Message(GO_NOT_FOUND.to_string()));

        run_tool(&run, self.notifier.as_ref(), self.output.as_ref()).await
    }
}
