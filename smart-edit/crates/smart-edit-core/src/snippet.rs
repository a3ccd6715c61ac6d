//! Snippet builder for interactive templates with linked editable fields.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnippetPart {
    Text { value: String },
    /// An editable field. Fields sharing an index are edited together.
    Placeholder { index: u32, default: String },
    /// A cursor stop without content; index 0 is the final cursor position.
    Tabstop { index: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snippet {
    parts: Vec<SnippetPart>,
}

impl Snippet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.parts.push(SnippetPart::Text { value: text.into() });
        self
    }

    pub fn append_placeholder(&mut self, index: u32, default: impl Into<String>) -> &mut Self {
        self.parts.push(SnippetPart::Placeholder {
            index,
            default: default.into(),
        });
        self
    }

    pub fn append_tabstop(&mut self, index: u32) -> &mut Self {
        self.parts.push(SnippetPart::Tabstop { index });
        self
    }

    /// Render in the `$1` / `${1:default}` snippet syntax.
    pub fn to_snippet_string(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                SnippetPart::Text { value } => out.push_str(&escape(value)),
                SnippetPart::Placeholder { index, default } if default.is_empty() => {
                    out.push_str(&format!("${index}"));
                }
                SnippetPart::Placeholder { index, default } => {
                    out.push_str(&format!("${{{index}:{}}}", escape(default)));
                }
                SnippetPart::Tabstop { index } => out.push_str(&format!("${index}")),
            }
        }
        out
    }

    /// The text a host without snippet support inserts: every field shows
    /// its default.
    pub fn plain_text(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                SnippetPart::Text { value } => value.as_str(),
                SnippetPart::Placeholder { default, .. } => default.as_str(),
                SnippetPart::Tabstop { .. } => "",
            })
            .collect()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '$' | '}' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
