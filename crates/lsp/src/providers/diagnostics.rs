use crate::config::Config;
use crate::document::split_lines;
use crate::emoji::starts_with_emoji;
use tracing::debug;

pub const EMPTY_LINE_MESSAGE: &str = "sentence is empty.";
pub const MISSING_EMOJI_MESSAGE: &str = "sentence is not started with emoji!!!😵";
pub const RELATED_INFORMATION_MESSAGE: &str = "sentence syntax error";

/// Provider function for LSP `textDocument/publishDiagnostics`.
///
/// Every line of `text` must start with an emoji. Each offending line yields
/// exactly one diagnostic, in line order:
/// * blank lines get a warning,
/// * lines that do not start with an emoji get an error, plus a related
///   information entry when the client supports it.
///
/// The returned list is the complete set for `uri` and replaces whatever was
/// published for it before.
pub fn diagnostics(
    uri: &lsp_types::Uri,
    text: &str,
    config: &Config,
) -> Vec<lsp_types::Diagnostic> {
    debug!("providers::diagnostics - {:?}", uri);

    let diagnostics: Vec<_> = split_lines(text)
        .enumerate()
        .filter_map(|(line_idx, line)| check_line(uri, line_idx as u32, line, config))
        .collect();

    debug!(
        "providers::diagnostics - {} diagnostics for {:?}",
        diagnostics.len(),
        uri
    );
    diagnostics
}

fn check_line(
    uri: &lsp_types::Uri,
    line_idx: u32,
    line: &str,
    config: &Config,
) -> Option<lsp_types::Diagnostic> {
    let range = line_range(line_idx, line);

    if line.trim().is_empty() {
        return Some(lsp_types::Diagnostic {
            range,
            severity: Some(lsp_types::DiagnosticSeverity::WARNING),
            source: Some(config.source.clone()),
            message: EMPTY_LINE_MESSAGE.to_string(),
            ..lsp_types::Diagnostic::default()
        });
    }

    if starts_with_emoji(line) {
        return None;
    }

    let related_information = config.related_information.then(|| {
        vec![lsp_types::DiagnosticRelatedInformation {
            location: lsp_types::Location {
                uri: uri.clone(),
                range,
            },
            message: RELATED_INFORMATION_MESSAGE.to_string(),
        }]
    });

    Some(lsp_types::Diagnostic {
        range,
        severity: Some(lsp_types::DiagnosticSeverity::ERROR),
        source: Some(config.source.clone()),
        message: MISSING_EMOJI_MESSAGE.to_string(),
        related_information,
        ..lsp_types::Diagnostic::default()
    })
}

/// Range covering the whole untrimmed line, measured in UTF-16 code units.
fn line_range(line_idx: u32, line: &str) -> lsp_types::Range {
    let end = line.encode_utf16().count() as u32;
    lsp_types::Range::new(
        lsp_types::Position::new(line_idx, 0),
        lsp_types::Position::new(line_idx, end),
    )
}
