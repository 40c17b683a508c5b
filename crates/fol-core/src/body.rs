//! # Article Bodies
//!
//! Article bodies are stored as an opaque string tagged with a schema
//! version. Version 1 is either Draft.js raw JSON (`{"blocks": [...]}`) or
//! plain text. Text extraction lives here so list previews never depend on
//! the editor runtime.

use serde::{Deserialize, Serialize};

/// Schema version written alongside every new body.
pub const BODY_SCHEMA_VERSION: i32 = 1;

/// Body as submitted by the author: a string, or a structured editor document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BodyInput {
    Text(String),
    Document(serde_json::Value),
}

impl BodyInput {
    pub fn is_blank(&self) -> bool {
        match self {
            BodyInput::Text(text) => text.trim().is_empty(),
            BodyInput::Document(value) => value.is_null(),
        }
    }

    /// Serialized form persisted by the store.
    pub fn into_stored(self) -> String {
        match self {
            BodyInput::Text(text) => text,
            BodyInput::Document(value) => value.to_string(),
        }
    }
}

impl From<String> for BodyInput {
    fn from(text: String) -> Self {
        BodyInput::Text(text)
    }
}

#[derive(Deserialize)]
struct RawDocument {
    blocks: Vec<RawBlock>,
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    text: String,
}

/// Plain text of a stored body: Draft.js blocks joined by newlines, or the
/// stored string itself when it is not a raw document.
pub fn plain_text(stored: &str) -> String {
    match serde_json::from_str::<RawDocument>(stored) {
        Ok(doc) => doc
            .blocks
            .into_iter()
            .map(|b| b.text)
            .collect::<Vec<_>>()
            .join("\n"),
        Err(_) => stored.to_string(),
    }
}

/// First `max_chars` characters of the plain text, with `...` appended when cut.
pub fn snippet(stored: &str, max_chars: usize) -> String {
    let text = plain_text(stored);
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_blocks_are_joined_with_newlines() {
        let stored = json!({
            "blocks": [
                { "key": "a1", "text": "Hail Mary, full of grace", "type": "unstyled" },
                { "key": "b2", "text": "the Lord is with thee", "type": "unstyled" }
            ],
            "entityMap": {}
        })
        .to_string();

        assert_eq!(plain_text(&stored), "Hail Mary, full of grace\nthe Lord is with thee");
    }

    #[test]
    fn non_document_bodies_pass_through() {
        assert_eq!(plain_text("just words"), "just words");
        assert_eq!(plain_text("{\"not\":\"draft\"}"), "{\"not\":\"draft\"}");
    }

    #[test]
    fn snippet_marks_truncation_only_when_cut() {
        assert_eq!(snippet("short", 100), "short");
        assert_eq!(snippet("abcdef", 3), "abc...");
        // multi-byte characters are counted, not bytes
        assert_eq!(snippet("ÀÉÎÕÜ", 2), "ÀÉ...");
    }

    #[test]
    fn structured_input_is_serialized() {
        let body = BodyInput::Document(json!({ "blocks": [] }));
        assert!(!body.is_blank());
        assert_eq!(body.into_stored(), "{\"blocks\":[]}");
    }

    #[test]
    fn whitespace_text_is_blank() {
        assert!(BodyInput::Text("  \n ".into()).is_blank());
        assert!(BodyInput::Document(serde_json::Value::Null).is_blank());
    }
}
