use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_SOURCE: &str = "emoji-lsp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Whether the client renders `Diagnostic::related_information`.
    /// Recorded once during initialization and never written again.
    pub related_information: bool,
    /// Label placed in `Diagnostic::source`.
    pub source: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            related_information: false,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

impl Config {
    pub fn new(capabilities: &lsp_types::ClientCapabilities) -> Self {
        let related_information = capabilities
            .text_document
            .as_ref()
            .and_then(|text_document| text_document.publish_diagnostics.as_ref())
            .and_then(|publish| publish.related_information)
            .unwrap_or(false);

        Self {
            related_information,
            ..Self::default()
        }
    }

    pub fn update(&mut self, json: serde_json::Value) -> Result<()> {
        // Anything that is not an options object is ignored, e.g. "[]" is sent by
        // nvim-lspconfig when no initialization options are specified in Lua.
        if let Ok(options) = serde_json::from_value::<EmojiLspOptions>(json) {
            if let Some(source) = options.diagnostic_source {
                self.source = source;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiLspOptions {
    pub diagnostic_source: Option<String>,
}
