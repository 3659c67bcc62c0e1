/// Provider definitions for LSP `textDocument/completion` and `completionItem/resolve`.
pub mod completion;
/// Provider definitions for LSP `textDocument/publishDiagnostics`.
pub mod diagnostics;
