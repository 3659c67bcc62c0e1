pub(crate) mod text_document {
    use crate::document::Document;
    use crate::error::Error;
    use crate::providers::completion;
    use crate::providers::diagnostics;
    use crate::server::LspServerState;
    use anyhow::Result;
    use tracing::debug;

    /// handler for `textDocument/didOpen`.
    pub(crate) fn did_open(
        state: &mut LspServerState,
        params: lsp_types::DidOpenTextDocumentParams,
    ) -> Result<()> {
        debug!("handlers::did_open");
        let uri = params.text_document.uri.clone();

        let document = Document::open(params);
        debug!("handlers::did_open - adding {:?}", uri);
        state.open_docs.insert(uri.clone(), document);

        publish_diagnostics(state, uri)
    }

    /// handler for `textDocument/didChange`.
    pub(crate) fn did_change(
        state: &mut LspServerState,
        params: lsp_types::DidChangeTextDocumentParams,
    ) -> Result<()> {
        debug!("handlers::did_change");
        let uri = params.text_document.uri;
        debug!("handlers::did_change - requesting {:?}", uri);
        let Some(doc) = state.open_docs.get_mut(&uri) else {
            tracing::warn!("{}", Error::DocumentNotFound { uri });
            return Ok(());
        };

        debug!("handlers::did_change - apply edits");
        for change in &params.content_changes {
            if let Err(err) = doc.apply_change(change) {
                tracing::warn!("handlers::did_change - skipping edit: {}", err);
            }
        }
        doc.version = params.text_document.version;

        publish_diagnostics(state, uri)
    }

    /// handler for `textDocument/didClose`.
    pub(crate) fn did_close(
        state: &mut LspServerState,
        params: lsp_types::DidCloseTextDocumentParams,
    ) -> Result<()> {
        debug!("handlers::did_close");
        let uri = params.text_document.uri;
        if state.open_docs.remove(&uri).is_none() {
            tracing::warn!("{}", Error::DocumentNotFound { uri: uri.clone() });
        }

        state.send_notification::<lsp_types::notification::PublishDiagnostics>(
            lsp_types::PublishDiagnosticsParams {
                uri,
                diagnostics: Vec::new(),
                version: None,
            },
        );
        Ok(())
    }

    /// handler for `textDocument/completion`.
    pub(crate) fn completion(
        state: &mut LspServerState,
        params: lsp_types::CompletionParams,
    ) -> Result<Option<lsp_types::CompletionResponse>> {
        debug!("handlers::completion");
        let items = completion::completion(&state.open_docs, params.text_document_position);
        Ok(Some(lsp_types::CompletionResponse::Array(items)))
    }

    /// handler for `completionItem/resolve`.
    pub(crate) fn completion_resolve(
        _state: &mut LspServerState,
        item: lsp_types::CompletionItem,
    ) -> Result<lsp_types::CompletionItem> {
        debug!("handlers::completion_resolve");
        Ok(completion::resolve(item))
    }

    // Validates the whole document and replaces its published diagnostics.
    fn publish_diagnostics(state: &mut LspServerState, uri: lsp_types::Uri) -> Result<()> {
        let doc = state
            .open_docs
            .get(&uri)
            .ok_or_else(|| Error::DocumentNotFound { uri: uri.clone() })?;

        let diagnostics = diagnostics::diagnostics(&uri, &doc.text_string(), &state.config);
        let version = Some(doc.version);
        debug!(
            "handlers::publish_diagnostics - {} diagnostics for {:?}",
            diagnostics.len(),
            uri
        );

        state.send_notification::<lsp_types::notification::PublishDiagnostics>(
            lsp_types::PublishDiagnosticsParams {
                uri,
                diagnostics,
                version,
            },
        );
        Ok(())
    }
}
