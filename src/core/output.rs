//! Output sinks
//!
//! Append-only line log of what the tools reported, kept apart from the
//! process's own diagnostic logging.

use std::sync::Mutex;

/// Receives the echo of every tool run, one line at a time
pub trait OutputSink: Send + Sync {
    fn append_line(&self, line: &str);
}

/// Forwards output lines to the `log` facade
#[derive(Debug, Default)]
pub struct LogOutput;

impl OutputSink for LogOutput {
    fn append_line(&self, line: &str) {
        log::info!(target: "go_check::output", "{}", line);
    }
}

/// Buffers output lines in memory until they are drained
#[derive(Debug, Default)]
pub struct MemoryOutput {
    lines: Mutex<Vec<String>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the buffered lines
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Take all buffered lines, leaving the buffer empty
    pub fn drain(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(mut lines) => std::mem::take(&mut *lines),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl OutputSink for MemoryOutput {
    fn append_line(&self, line: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}
