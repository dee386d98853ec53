//! User notifications
//!
//! The narrow surface through which checks talk to the person at the
//! keyboard: plain information messages and missing-tool prompts.

use crate::toolchain::install_hint;

/// Delivers user-visible messages from the checks
#[tower_lsp::async_trait]
pub trait Notifier: Send + Sync {
    /// Show an informational message
    async fn info(&self, message: &str);

    /// Ask the user to install a tool that could not be found
    async fn prompt_install(&self, tool: &str);
}

/// Notifier for terminal front ends, reports through the log
#[derive(Debug, Default)]
pub struct LogNotifier;

#[tower_lsp::async_trait]
impl Notifier for LogNotifier {
    async fn info(&self, message: &str) {
        log::warn!("{}", message);
    }

    async fn prompt_install(&self, tool: &str) {
        log::warn!("{}", install_hint(tool));
    }
}
