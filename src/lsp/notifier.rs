use tower_lsp::Client;
use tower_lsp::lsp_types::MessageType;

use crate::core::Notifier;
use crate::toolchain::install_hint;

/// Shows check notifications in the editor
#[derive(Clone)]
pub struct ClientNotifier {
    client: Client,
}

impl ClientNotifier {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[tower_lsp::async_trait]
impl Notifier for ClientNotifier {
    async fn info(&self, message: &str) {
        self.client
            .show_message(MessageType::INFO, message.to_string())
            .await;
    }

    async fn prompt_install(&self, tool: &str) {
        self.client
            .show_message(MessageType::WARNING, install_hint(tool))
            .await;
    }
}
