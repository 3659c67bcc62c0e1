use thiserror::Error;

/// Runtime errors for the LSP server.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A notification or request referred to a document that is not open.
    #[error("document not open: {uri:?}")]
    DocumentNotFound {
        /// The URI of the requested document.
        uri: lsp_types::Uri,
    },

    /// An edit addressed a line past the end of the document.
    #[error("position {line}:{character} is outside the document")]
    PositionOutOfRange { line: u32, character: u32 },
}
