use std::collections::{HashMap, HashSet};

use tower_lsp::lsp_types::Url;

/// Files that received diagnostics from the last check of each saved document
///
/// A check of one document can report problems in sibling files of the same
/// package, so a file is only cleared once no saved document claims it.
#[derive(Debug, Default)]
pub struct PublishedDiagnostics {
    by_saved: HashMap<Url, HashSet<Url>>,
}

impl PublishedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the files a check of `saved` reported on and return the files
    /// that no saved document reports on any more
    pub fn record(&mut self, saved: Url, current: HashSet<Url>) -> Vec<Url> {
        let previous = self.by_saved.insert(saved, current).unwrap_or_default();

        let mut stale: Vec<Url> = previous
            .into_iter()
            .filter(|file| !self.by_saved.values().any(|files| files.contains(file)))
            .collect();
        stale.sort();
        stale
    }
}
