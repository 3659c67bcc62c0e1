use crate::error::Error;
use ropey::{Rope, RopeSlice};

#[derive(Clone, Debug)]
pub struct Document {
    /// The textual content of the document.
    pub content: Rope,
    /// The document version from the LSP client.
    /// Published back alongside diagnostics so stale results can be discarded.
    pub version: i32,
}

impl Document {
    pub fn open(params: lsp_types::DidOpenTextDocumentParams) -> Self {
        let content = Rope::from(params.text_document.text);
        let version = params.text_document.version;
        Self { content, version }
    }

    /// Get the document text as a single string.
    /// This allocates - use sparingly.
    pub fn text_string(&self) -> String {
        self.content.to_string()
    }

    /// The line at `idx` without its line terminator, or `None` past the last line.
    pub fn line(&self, idx: usize) -> Option<RopeSlice<'_>> {
        if idx >= self.content.len_lines() {
            return None;
        }
        Some(trim_line_ending(self.content.line(idx)))
    }

    /// Applies one `textDocument/didChange` content change.
    ///
    /// A change without a range replaces the whole document. Columns are
    /// UTF-16 code units and are clamped to the length of their line.
    pub fn apply_change(
        &mut self,
        change: &lsp_types::TextDocumentContentChangeEvent,
    ) -> Result<(), Error> {
        let Some(range) = change.range else {
            self.content = Rope::from_str(&change.text);
            return Ok(());
        };

        let start_char_idx = self.position_to_char(range.start)?;
        let end_char_idx = self.position_to_char(range.end)?.max(start_char_idx);
        self.content.remove(start_char_idx..end_char_idx);

        if !change.text.is_empty() {
            self.content.insert(start_char_idx, &change.text);
        }
        Ok(())
    }

    fn position_to_char(&self, position: lsp_types::Position) -> Result<usize, Error> {
        let line_idx = position.line as usize;
        let line = self.line(line_idx).ok_or(Error::PositionOutOfRange {
            line: position.line,
            character: position.character,
        })?;
        let column = (position.character as usize).min(line.len_utf16_cu());
        Ok(self.content.line_to_char(line_idx) + line.utf16_cu_to_char(column))
    }
}

/// Splits `text` into lines the way LSP positions count them.
///
/// `\n`, `\r\n` and a lone `\r` end a line. Other Unicode separators such
/// as U+2028 stay part of the line, matching the rope built without
/// `unicode_lines`. A trailing terminator yields a final empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(|c: char| c == '\n' || c == '\r') {
            Some(idx) => {
                let next = if current[idx..].starts_with("\r\n") {
                    idx + 2
                } else {
                    idx + 1
                };
                rest = Some(&current[next..]);
                Some(&current[..idx])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

fn trim_line_ending(line: RopeSlice<'_>) -> RopeSlice<'_> {
    let mut end = line.len_chars();
    if end > 0 && line.char(end - 1) == '\n' {
        end -= 1;
    }
    if end > 0 && line.char(end - 1) == '\r' {
        end -= 1;
    }
    line.slice(..end)
}
