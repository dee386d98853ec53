//! Core types
//!
//! Diagnostics plus the interfaces checks use to reach the host.

pub mod diagnostics;
pub mod notifier;
pub mod output;

pub use diagnostics::{Diagnostic, Severity, has_errors};
pub use notifier::{LogNotifier, Notifier};
pub use output::{LogOutput, MemoryOutput, OutputSink};
