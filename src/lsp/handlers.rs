use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tower_lsp::lsp_types::*;

use crate::check::Checker;
use crate::config::CheckSettings;
use crate::core::{MemoryOutput, Severity};
use crate::lsp::backend::Backend;
use crate::lsp::notifier::ClientNotifier;
use crate::toolchain::Toolchain;

/// Trait for handling save notifications
#[tower_lsp::async_trait]
pub trait HandleSave {
    async fn handle_did_save(&self, params: DidSaveTextDocumentParams);
    async fn settings_for(&self, file: &Path) -> anyhow::Result<CheckSettings>;
    async fn publish_check_results(
        &self,
        saved: Url,
        by_file: BTreeMap<PathBuf, Vec<Diagnostic>>,
    );
}

/// Trait for handling settings pushed by the editor
#[tower_lsp::async_trait]
pub trait HandleConfiguration {
    async fn update_settings(&self, value: &serde_json::Value);
}

#[tower_lsp::async_trait]
impl HandleSave for Backend {
    async fn handle_did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        let Ok(file) = uri.to_file_path() else {
            log::debug!("Ignoring save of non-file document {}", uri);
            return;
        };
        if file.extension().and_then(|ext| ext.to_str()) != Some("go") {
            return;
        }

        let settings = match self.settings_for(&file).await {
            Ok(settings) => settings,
            Err(e) => {
                self.client
                    .show_message(MessageType::ERROR, format!("{:#}", e))
                    .await;
                return;
            }
        };

        let toolchain =
            Toolchain::detect(settings.go_root.as_deref(), settings.go_path.as_deref());
        let output = Arc::new(MemoryOutput::new());
        let checker = Checker::new(
            toolchain,
            Arc::new(ClientNotifier::new(self.client.clone())),
            output.clone(),
        );

        let result = checker.check(&file, &settings).await;

        let lines = output.drain();
        if !lines.is_empty() {
            self.client
                .log_message(MessageType::INFO, lines.join("\n"))
                .await;
        }

        match result {
            Ok(diagnostics) => {
                let by_file = group_by_file(diagnostics);
                self.publish_check_results(uri, by_file).await;
            }
            Err(e) => {
                log::error!("Check of {} failed: {:#}", file.display(), e);
                self.client
                    .show_message(MessageType::ERROR, format!("go-check failed: {:#}", e))
                    .await;
            }
        }
    }

    async fn settings_for(&self, file: &Path) -> anyhow::Result<CheckSettings> {
        if let Some(settings) = self.settings.read().await.as_ref() {
            let mut settings = settings.clone();
            if let Some(go_root) = &self.config.go_root {
                settings.go_root = Some(go_root.clone());
            }
            return Ok(settings);
        }
        self.config.settings_for(file)
    }

    async fn publish_check_results(
        &self,
        saved: Url,
        by_file: BTreeMap<PathBuf, Vec<Diagnostic>>,
    ) {
        let mut current = HashSet::new();

        for (path, diagnostics) in by_file {
            match Url::from_file_path(&path) {
                Ok(url) => {
                    self.client
                        .publish_diagnostics(url.clone(), diagnostics, None)
                        .await;
                    current.insert(url);
                }
                Err(()) => log::warn!("Cannot publish diagnostics for {}", path.display()),
            }
        }

        let stale = self.published.lock().await.record(saved, current);

        for file in stale {
            self.client.publish_diagnostics(file, Vec::new(), None).await;
        }
    }
}

#[tower_lsp::async_trait]
impl HandleConfiguration for Backend {
    async fn update_settings(&self, value: &serde_json::Value) {
        match CheckSettings::from_json(value) {
            Ok(settings) => {
                log::info!("Editor settings updated");
                *self.settings.write().await = Some(settings);
            }
            Err(e) => log::warn!("Ignoring editor settings: {:#}", e),
        }
    }
}

/// Convert check diagnostics into LSP diagnostics keyed by file
pub fn group_by_file(
    diagnostics: Vec<crate::core::Diagnostic>,
) -> BTreeMap<PathBuf, Vec<Diagnostic>> {
    let mut by_file: BTreeMap<PathBuf, Vec<Diagnostic>> = BTreeMap::new();
    for diagnostic in diagnostics {
        let file = diagnostic.file.clone();
        by_file
            .entry(file)
            .or_default()
            .push(create_lsp_diagnostic(diagnostic));
    }
    by_file
}

/// LSP diagnostic spanning from the reported column to the end of the line
pub fn create_lsp_diagnostic(diagnostic: crate::core::Diagnostic) -> Diagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    let line = diagnostic.line.saturating_sub(1) as u32;
    let character = diagnostic.column.map(|c| c.saturating_sub(1)).unwrap_or(0) as u32;

    Diagnostic::new(
        Range::new(
            Position::new(line, character),
            // Clients clamp past-the-end positions to the line length
            Position::new(line, u32::MAX),
        ),
        Some(severity),
        None,
        Some("go-check".to_string()),
        diagnostic.message,
        None,
        None,
    )
}
