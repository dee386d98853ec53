//! Coverage check
//!
//! Coverage is computed by an external collaborator behind
//! [`CoverageProvider`]. The default provider runs `go test -coverprofile`
//! and reports what the profile says about the saved file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::process::Command;

use crate::check::GO_NOT_FOUND;
use crate::config::CheckSettings;
use crate::core::{Diagnostic, Notifier, OutputSink};

/// Everything a coverage provider may need for one check cycle
pub struct CoverageRequest<'a> {
    pub file: &'a Path,
    pub go_runtime: &'a Path,
    pub settings: &'a CheckSettings,
    pub notifier: &'a dyn Notifier,
    pub output: &'a dyn OutputSink,
}

/// Computes coverage for the package of a saved file
#[tower_lsp::async_trait]
pub trait CoverageProvider: Send + Sync {
    async fn coverage(&self, request: &CoverageRequest<'_>) -> Result<Vec<Diagnostic>>;
}

/// One block of a Go cover profile
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageBlock {
    pub file: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub statements: usize,
    pub count: u64,
}

/// Parsed Go cover profile
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageProfile {
    pub mode: String,
    pub blocks: Vec<CoverageBlock>,
}

impl CoverageProfile {
    /// Parse the text of a profile written by `go test -coverprofile`
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines().filter(|line| !line.trim().is_empty());

        let mode = match lines.next().and_then(|header| header.strip_prefix("mode:")) {
            Some(mode) => mode.trim().to_string(),
            None => bail!("Cover profile does not start with a mode line"),
        };

        let blocks = lines
            .enumerate()
            .map(|(idx, line)| {
                parse_block(line).with_context(|| {
                    format!("Malformed cover profile line {}: {}", idx + 2, line)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { mode, blocks })
    }

    /// Blocks that belong to a file with the given base name
    pub fn blocks_for<'a>(&'a self, file_name: &'a str) -> impl Iterator<Item = &'a CoverageBlock> {
        self.blocks
            .iter()
            .filter(move |block| block.file.rsplit('/').next() == Some(file_name))
    }

    /// Covered and total statement counts for a file
    pub fn statement_counts(&self, file_name: &str) -> (usize, usize) {
        self.blocks_for(file_name)
            .fold((0, 0), |(covered, total), block| {
                let hit = if block.count > 0 { block.statements } else { 0 };
                (covered + hit, total + block.statements)
            })
    }
}

/// `file:startLine.startCol,endLine.endCol numStmt count`
fn parse_block(line: &str) -> Option<CoverageBlock> {
    let (location, counts) = line.rsplit_once(':').and_then(|(file, rest)| {
        let mut fields = rest.split_whitespace();
        let range = fields.next()?;
        let statements = fields.next()?.parse().ok()?;
        let count = fields.next()?.parse().ok()?;
        Some(((file, range), (statements, count)))
    })?;

    let (file, range) = location;
    let (start, end) = range.split_once(',')?;
    let (start_line, start_column) = parse_position(start)?;
    let (end_line, end_column) = parse_position(end)?;

    Some(CoverageBlock {
        file: file.to_string(),
        start_line,
        start_column,
        end_line,
        end_column,
        statements: counts.0,
        count: counts.1,
    })
}

fn parse_position(text: &str) -> Option<(usize, usize)> {
    let (line, column) = text.split_once('.')?;
    Some((line.parse().ok()?, column.parse().ok()?))
}

/// Coverage through `go test -coverprofile`
#[derive(Debug, Clone)]
pub struct GoTestCoverage {
    profile_path: PathBuf,
}

impl Default for GoTestCoverage {
    fn default() -> Self {
        Self {
            profile_path: std::env::temp_dir().join("go-code-cover"),
        }
    }
}

impl GoTestCoverage {
    pub fn new(profile_path: PathBuf) -> Self {
        Self { profile_path }
    }

    fn args(&self, settings: &CheckSettings) -> Vec<String> {
        let mut args = vec![
            "test".to_string(),
            format!("-coverprofile={}", self.profile_path.display()),
        ];
        if !settings.build_tags.is_empty() {
            args.push("-tags".to_string());
            args.push(settings.build_tags.clone());
        }
        args
    }
}

#[tower_lsp::async_trait]
impl CoverageProvider for GoTestCoverage {
    async fn coverage(&self, request: &CoverageRequest<'_>) -> Result<Vec<Diagnostic>> {
        let Some(cwd) = request.file.parent() else {
            return Ok(Vec::new());
        };
        let file_name = request
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        // A stale profile from an earlier run must not be reported
        let _ = tokio::fs::remove_file(&self.profile_path).await;

        let result = Command::new(request.go_runtime)
            .args(self.args(request.settings))
            .current_dir(cwd)
            .kill_on_drop(true)
            .output()
            .await;

        let captured = match result {
            Ok(captured) => captured,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                request.notifier.info(GO_NOT_FOUND).await;
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e).context(format!(
                    "Failed to run go test for coverage in {}",
                    cwd.display()
                )));
            }
        };

        if !captured.status.success() {
            for line in String::from_utf8_lossy(&captured.stdout).lines() {
                request.output.append_line(line);
            }
            for line in String::from_utf8_lossy(&captured.stderr).lines() {
                request.output.append_line(line);
            }
        }

        let content = match tokio::fs::read_to_string(&self.profile_path).await {
            Ok(content) => content,
            Err(_) => {
                request
                    .output
                    .append_line(&format!("No coverage profile was written for {}", cwd.display()));
                return Ok(Vec::new());
            }
        };

        let profile = CoverageProfile::parse(&content)?;
        let (covered, total) = profile.statement_counts(&file_name);
        let percent = if total == 0 {
            0.0
        } else {
            covered as f64 * 100.0 / total as f64
        };

        request.output.append_line(&format!(
            "{}: {:.1}% of statements ({}/{})",
            request.file.display(),
            percent,
            covered,
            total
        ));
        for block in profile.blocks_for(&file_name).filter(|block| block.count == 0) {
            request.output.append_line(&format!(
                "{}:{}.{},{}.{} not covered",
                request.file.display(),
                block.start_line,
                block.start_column,
                block.end_line,
                block.end_column
            ));
        }

        Ok(Vec::new())
    }
}
