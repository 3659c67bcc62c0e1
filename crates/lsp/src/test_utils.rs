use crate::document::Document;
use anyhow::Result;
use std::collections::HashMap;
use std::str::FromStr;

/// One or more documents, each introduced by a `%! <path>` header line.
#[derive(Debug)]
pub struct Fixture {
    pub documents: Vec<TestDocument>,
}
impl Fixture {
    pub fn parse(input: &str) -> Self {
        let mut documents = Vec::new();
        let mut start = 0;
        if !input.is_empty() {
            for end in input
                .match_indices("%!")
                .skip(1)
                .map(|(i, _)| i)
                .chain(std::iter::once(input.len()))
            {
                documents.push(TestDocument::parse(&input[start..end]));
                start = end;
            }
        }
        Self { documents }
    }
}

/// A fixture document. A line made of spaces and a single `|` is not part of
/// the text; it marks the cursor on the line above it.
#[derive(Debug)]
pub struct TestDocument {
    pub path: String,
    pub text: String,
    pub cursor: Option<lsp_types::Position>,
}
impl TestDocument {
    pub fn parse(input: &str) -> Self {
        let mut lines = Vec::new();

        let (path, input) = input
            .trim_start()
            .strip_prefix("%! ")
            .map(|input| input.split_once('\n').unwrap_or((input, "")))
            .unwrap();

        let mut cursor = None;

        for line in input.lines() {
            if line.contains('|') && line.chars().all(|c| matches!(c, ' ' | '|')) {
                let index = lines.len().saturating_sub(1) as u32;

                cursor = cursor.or_else(|| {
                    let character = line.find('|')?;
                    Some(lsp_types::Position::new(index, character as u32))
                });
            } else {
                lines.push(line);
            }
        }

        Self {
            path: path.trim().to_string(),
            text: lines.join("\n"),
            cursor,
        }
    }

    pub fn uri(&self) -> Result<lsp_types::Uri> {
        let uri_str = format!("file://{}", self.path);
        lsp_types::Uri::from_str(&uri_str).map_err(|e| anyhow::anyhow!("Invalid URI: {}", e))
    }
}

pub struct TestState {
    pub open_docs: HashMap<lsp_types::Uri, Document>,
    pub fixture: Fixture,
}

impl TestState {
    pub fn new(fixture: &str) -> Result<Self> {
        let fixture = Fixture::parse(fixture);
        let open_docs = fixture
            .documents
            .iter()
            .map(|document| {
                let k = document.uri()?;
                let v = Document {
                    content: ropey::Rope::from(document.text.clone()),
                    version: 0,
                };
                Ok((k, v))
            })
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(TestState { fixture, open_docs })
    }

    pub fn cursor(&self) -> Option<lsp_types::TextDocumentPositionParams> {
        let (document, cursor) = self
            .fixture
            .documents
            .iter()
            .find_map(|document| document.cursor.map(|cursor| (document, cursor)))?;

        let uri = document.uri().ok()?;
        let id = lsp_types::TextDocumentIdentifier::new(uri);
        Some(lsp_types::TextDocumentPositionParams::new(id, cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_marks_previous_line() {
        let fixture = Fixture::parse("%! /notes.txt\n📌 one\ntwo\n  |\nthree\n");
        let document = &fixture.documents[0];
        assert_eq!(document.path, "/notes.txt");
        assert_eq!(document.text, "📌 one\ntwo\nthree");
        assert_eq!(document.cursor, Some(lsp_types::Position::new(1, 2)));
    }

    #[test]
    fn test_multiple_documents() {
        let fixture = Fixture::parse("%! /a.txt\na\n%! /b.txt\nb\n|\n");
        assert_eq!(fixture.documents.len(), 2);
        assert_eq!(fixture.documents[0].cursor, None);
        assert_eq!(fixture.documents[1].text, "b");

        let state = TestState::new("%! /a.txt\na\n%! /b.txt\nb\n|\n").unwrap();
        assert_eq!(state.open_docs.len(), 2);
        let cursor = state.cursor().unwrap();
        assert_eq!(cursor.text_document.uri.as_str(), "file:///b.txt");
    }
}
