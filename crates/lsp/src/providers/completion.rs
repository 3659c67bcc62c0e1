use crate::document::Document;
use crate::emoji::starts_with_emoji;
use lsp_types::CompletionItem;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use tracing::debug;

/// The canned completion labels, in the order they are offered.
///
/// The discriminant is the tag stored in `CompletionItem::data` and read back
/// by `completionItem/resolve`.
#[repr(u8)]
#[derive(strum_macros::EnumIter, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Candidate {
    Notice = 1,
    History = 2,
    Hot = 3,
}

impl Candidate {
    pub fn from_tag(tag: u64) -> Option<Self> {
        Self::iter().find(|candidate| candidate.tag() == tag)
    }

    pub fn tag(self) -> u64 {
        self as u64
    }

    pub fn label(self) -> &'static str {
        match self {
            Candidate::Notice => "📌 Notice",
            Candidate::History => "👣 History",
            Candidate::Hot => "🔥 Hot",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            Candidate::Notice => "Notice",
            Candidate::History => "History",
            Candidate::Hot => "Hot",
        }
    }

    pub fn documentation(self) -> &'static str {
        match self {
            Candidate::Notice => "notification or warning of something.",
            Candidate::History => {
                "the whole series of past events connected with someone or something."
            }
            Candidate::Hot => "new and exciting things.",
        }
    }

    /// Lowercased last word of the label, e.g. `notice`.
    fn keyword(self) -> String {
        self.label()
            .to_lowercase()
            .split(' ')
            .next_back()
            .unwrap_or_default()
            .to_string()
    }

    fn completion_item(self) -> CompletionItem {
        CompletionItem {
            label: self.label().to_string(),
            kind: Some(lsp_types::CompletionItemKind::TEXT),
            data: Some(serde_json::Value::from(self.tag())),
            ..Default::default()
        }
    }
}

/// Provider function for LSP `textDocument/completion`.
///
/// Offers every candidate while the cursor line is blank, already starts with
/// an emoji, or is a substring of one of the candidate keywords. Anything
/// else, including a cursor outside any open document, yields no items.
pub fn completion(
    open_docs: &HashMap<lsp_types::Uri, Document>,
    cursor: lsp_types::TextDocumentPositionParams,
) -> Vec<CompletionItem> {
    debug!("providers::completion");

    let uri = &cursor.text_document.uri;
    let line_idx = cursor.position.line as usize;
    debug!(
        "providers::completion - line {} char {}",
        cursor.position.line, cursor.position.character
    );

    let Some(line) = open_docs.get(uri).and_then(|doc| doc.line(line_idx)) else {
        debug!("providers::completion - no line {} in {:?}", line_idx, uri);
        return Vec::new();
    };

    let typed = line.to_string().trim().to_lowercase();
    debug!("providers::completion - text {:?}", typed);

    if offers_candidates(&typed) {
        complete_candidates()
    } else {
        Vec::new()
    }
}

fn offers_candidates(typed: &str) -> bool {
    typed.is_empty()
        || starts_with_emoji(typed)
        || Candidate::iter().any(|candidate| candidate.keyword().contains(typed))
}

fn complete_candidates() -> Vec<CompletionItem> {
    debug!("providers::completion::candidates");
    Candidate::iter().map(Candidate::completion_item).collect()
}

/// Provider function for LSP `completionItem/resolve`.
///
/// Items whose data tag is missing or unknown are returned untouched.
pub fn resolve(mut item: CompletionItem) -> CompletionItem {
    let candidate = item
        .data
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .and_then(Candidate::from_tag);
    debug!("providers::completion::resolve - {:?}", candidate);

    if let Some(candidate) = candidate {
        item.detail = Some(candidate.detail().to_string());
        item.documentation = Some(lsp_types::Documentation::String(
            candidate.documentation().to_string(),
        ));
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestState;
    use anyhow::Result;
    use std::str::FromStr;

    fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(|item| item.label.as_str()).collect()
    }

    fn complete(fixture: &str) -> Result<Vec<CompletionItem>> {
        let test_state = TestState::new(fixture)?;
        let cursor = test_state.cursor().expect("fixture has a cursor");
        Ok(completion(&test_state.open_docs, cursor))
    }

    #[test]
    fn candidate_tags_follow_declaration_order() {
        for (idx, candidate) in Candidate::iter().enumerate() {
            assert_eq!(candidate.tag(), idx as u64 + 1);
            assert_eq!(Candidate::from_tag(candidate.tag()), Some(candidate));
        }
        assert_eq!(Candidate::from_tag(0), None);
        assert_eq!(Candidate::from_tag(4), None);
    }

    #[test]
    fn candidate_keywords() {
        let keywords: Vec<String> = Candidate::iter().map(Candidate::keyword).collect();
        assert_eq!(keywords, vec!["notice", "history", "hot"]);
    }

    #[test_log::test]
    fn handle_empty_line() -> Result<()> {
        let fixture = "%! /notes.txt\n📌 first\n\n|\n";
        let items = complete(fixture)?;

        assert_eq!(labels(&items), vec!["📌 Notice", "👣 History", "🔥 Hot"]);
        let data: Vec<_> = items.iter().map(|item| item.data.clone()).collect();
        assert_eq!(
            data,
            vec![
                Some(serde_json::json!(1)),
                Some(serde_json::json!(2)),
                Some(serde_json::json!(3))
            ]
        );
        assert!(items
            .iter()
            .all(|item| item.kind == Some(lsp_types::CompletionItemKind::TEXT)));
        assert!(items
            .iter()
            .all(|item| item.detail.is_none() && item.documentation.is_none()));
        Ok(())
    }

    #[test]
    fn handle_unrelated_text() -> Result<()> {
        for typed in ["hey", "world", "notices"] {
            let fixture = format!("%! /notes.txt\n{typed}\n  |\n");
            assert!(complete(&fixture)?.is_empty(), "typed {typed:?}");
        }
        Ok(())
    }

    #[test]
    fn handle_hi_matches_history() -> Result<()> {
        // "hi" is the first two letters of "history".
        let fixture = "%! /notes.txt\nhi\n  |\n";
        assert_eq!(complete(fixture)?.len(), 3);
        Ok(())
    }

    #[test]
    fn handle_full_keyword() -> Result<()> {
        let fixture = "%! /notes.txt\nhot\n   |\n";
        assert_eq!(labels(&complete(fixture)?), vec!["📌 Notice", "👣 History", "🔥 Hot"]);
        Ok(())
    }

    #[test]
    fn handle_partial_keyword_any_case() -> Result<()> {
        for typed in ["No", "ISTOR", "  tic  ", "h"] {
            let fixture = format!("%! /notes.txt\n{typed}\n|\n");
            assert_eq!(complete(&fixture)?.len(), 3, "typed {typed:?}");
        }
        Ok(())
    }

    #[test]
    fn handle_substring_not_prefix_only() -> Result<()> {
        // "ory" is inside "history" without being a prefix of it.
        let fixture = "%! /notes.txt\nory\n   |\n";
        assert_eq!(complete(fixture)?.len(), 3);
        Ok(())
    }

    #[test]
    fn handle_text_longer_than_keyword() -> Result<()> {
        let fixture = "%! /notes.txt\nhotter\n|\n";
        assert!(complete(fixture)?.is_empty());
        Ok(())
    }

    #[test]
    fn handle_line_starting_with_emoji() -> Result<()> {
        let fixture = "%! /notes.txt\n🤖 anything at all\n   |\n";
        assert_eq!(complete(fixture)?.len(), 3);
        Ok(())
    }

    #[test]
    fn handle_line_with_line_separator() -> Result<()> {
        // U+2028 is not a line break, so the whole "hot\u{2028}hey" is one line.
        let fixture = "%! /notes.txt\nhot\u{2028}hey\n|\n";
        assert!(complete(fixture)?.is_empty());
        Ok(())
    }

    #[test]
    fn handle_line_out_of_range() -> Result<()> {
        let test_state = TestState::new("%! /notes.txt\nhot\n|\n")?;
        let mut cursor = test_state.cursor().expect("fixture has a cursor");
        cursor.position.line = 42;
        assert!(completion(&test_state.open_docs, cursor).is_empty());
        Ok(())
    }

    #[test]
    fn handle_unknown_document() -> Result<()> {
        let test_state = TestState::new("%! /notes.txt\n\n|\n")?;
        let mut cursor = test_state.cursor().expect("fixture has a cursor");
        cursor.text_document.uri = lsp_types::Uri::from_str("file:///other.txt").unwrap();
        assert!(completion(&test_state.open_docs, cursor).is_empty());
        Ok(())
    }

    #[test]
    fn resolve_known_tag() {
        let item = resolve(Candidate::History.completion_item());
        assert_eq!(item.label, "👣 History");
        assert_eq!(item.detail, Some("History".to_string()));
        assert_eq!(
            item.documentation,
            Some(lsp_types::Documentation::String(
                "the whole series of past events connected with someone or something."
                    .to_string()
            ))
        );
    }

    #[test]
    fn resolve_every_candidate() {
        for candidate in Candidate::iter() {
            let item = resolve(candidate.completion_item());
            assert_eq!(item.detail.as_deref(), Some(candidate.detail()));
        }
    }

    #[test]
    fn resolve_unknown_tag() {
        let item = CompletionItem {
            label: "🔥 Hot".to_string(),
            data: Some(serde_json::json!(99)),
            ..Default::default()
        };
        assert_eq!(resolve(item.clone()), item);
    }

    #[test]
    fn resolve_without_data() {
        let item = CompletionItem {
            label: "plain".to_string(),
            ..Default::default()
        };
        assert_eq!(resolve(item.clone()), item);

        let item = CompletionItem {
            label: "string tag".to_string(),
            data: Some(serde_json::json!("1")),
            ..Default::default()
        };
        assert_eq!(resolve(item.clone()), item);
    }
}
