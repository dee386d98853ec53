//! go-check
//!
//! Save-time checks for Go sources: runs the Go toolchain's build, lint,
//! vet and coverage tools and turns their output into diagnostics.
//!
//! This library provides:
//! - Tool output parsing into uniform diagnostics
//! - The check orchestrator and its subprocess runner
//! - Toolchain resolution and configuration management
//! - A language server and a directory watcher that check on save

pub mod check;
pub mod config;
pub mod core;
pub mod lsp;
pub mod parser;
pub mod toolchain;
pub mod watch;

// Re-exports for clean public API
pub use check::Checker;
pub use config::{CheckSettings, Config};
pub use core::{Diagnostic, Severity};
pub use parser::{package_name, parse_tool_output};
pub use toolchain::Toolchain;
