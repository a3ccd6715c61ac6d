//! The editor the commands drive.
//!
//! Commands only see an [`EditorHost`]: a document snapshot, the cursors,
//! and a handful of editor primitives. [`MemoryHost`] implements it over a
//! plain string for the stdio transport and for tests.

use serde::{Deserialize, Serialize};
use smart_edit_core::{text, EditSet, IndentStyle, Snippet};
use thiserror::Error;

/// A cursor: `anchor` is where the selection started, `active` where the
/// caret is. Both are byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub active: usize,
}

impl Selection {
    pub fn new(anchor: usize, active: usize) -> Self {
        Self { anchor, active }
    }

    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// True when the caret sits before the anchor.
    pub fn is_reversed(&self) -> bool {
        self.active < self.anchor
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.active)
    }

    /// Clamp both ends into `text`, on character boundaries.
    pub fn clamp_to(&self, text: &str) -> Self {
        Self::new(char_boundary(text, self.anchor), char_boundary(text, self.active))
    }
}

fn char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorOptions {
    pub tab_size: u8,
    pub insert_spaces: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            insert_spaces: true,
        }
    }
}

impl EditorOptions {
    pub fn indent_style(&self) -> IndentStyle {
        IndentStyle::from_options(self.tab_size, self.insert_spaces)
    }
}

/// Built-in editor actions a command can fall back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostCommand {
    CopyLinesDown { selection: Selection },
    DuplicateSelection { selection: Selection },
    FormatSelection { selection: Selection },
    FormatDocument,
}

#[derive(Debug, Clone, Error)]
pub enum HostError {
    #[error("Edit range [{start}..{end}) is not valid in a document of {len} bytes")]
    InvalidRange { start: usize, end: usize, len: usize },
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}

#[async_trait::async_trait]
pub trait EditorHost: Send {
    /// Current document text.
    fn text(&self) -> &str;

    fn language_id(&self) -> &str;

    fn file_name(&self) -> &str;

    fn selections(&self) -> Vec<Selection>;

    fn options(&self) -> EditorOptions;

    async fn read_clipboard(&mut self) -> Result<String, HostError>;

    /// Apply every edit of the set as one undoable change.
    async fn apply_edits(&mut self, edits: &EditSet) -> Result<(), HostError>;

    /// Replace `at` with an interactive snippet.
    async fn insert_snippet(&mut self, snippet: &Snippet, at: Selection) -> Result<(), HostError>;

    async fn execute(&mut self, command: HostCommand) -> Result<(), HostError>;
}

/// An editor whose document is a string in memory.
///
/// Snippets are inserted as their plain text, formatting is a no-op and
/// every executed [`HostCommand`] is recorded.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    text: String,
    language_id: String,
    file_name: String,
    selections: Vec<Selection>,
    options: EditorOptions,
    clipboard: String,
    executed: Vec<HostCommand>,
}

impl MemoryHost {
    pub fn new(
        text: impl Into<String>,
        language_id: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            language_id: language_id.into(),
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn with_selections(mut self, selections: Vec<Selection>) -> Self {
        self.selections = selections;
        self
    }

    pub fn with_options(mut self, options: EditorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl Into<String>) -> Self {
        self.clipboard = clipboard.into();
        self
    }

    pub fn executed(&self) -> &[HostCommand] {
        &self.executed
    }

    pub fn into_parts(self) -> (String, Vec<HostCommand>) {
        (self.text, self.executed)
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), HostError> {
        let valid = start <= end
            && end <= self.text.len()
            && self.text.is_char_boundary(start)
            && self.text.is_char_boundary(end);
        if valid {
            Ok(())
        } else {
            Err(HostError::InvalidRange {
                start,
                end,
                len: self.text.len(),
            })
        }
    }

    fn copy_lines_down(&mut self, selection: Selection) {
        let selection = selection.clamp_to(&self.text);
        let first = text::line_start(&self.text, selection.start());
        let last = text::line_end(&self.text, selection.end());
        let lines = format!("\n{}", &self.text[first..last]);
        self.text.insert_str(last, &lines);
    }
}

#[async_trait::async_trait]
impl EditorHost for MemoryHost {
    fn text(&self) -> &str {
        &self.text
    }

    fn language_id(&self) -> &str {
        &self.language_id
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn options(&self) -> EditorOptions {
        self.options
    }

    async fn read_clipboard(&mut self) -> Result<String, HostError> {
        Ok(self.clipboard.clone())
    }

    async fn apply_edits(&mut self, edits: &EditSet) -> Result<(), HostError> {
        for edit in edits.iter() {
            self.check_range(edit.start, edit.end)?;
        }
        self.text = edits.apply(&self.text);
        Ok(())
    }

    async fn insert_snippet(&mut self, snippet: &Snippet, at: Selection) -> Result<(), HostError> {
        self.check_range(at.start(), at.end())?;
        self.text
            .replace_range(at.start()..at.end(), &snippet.plain_text());
        Ok(())
    }

    async fn execute(&mut self, command: HostCommand) -> Result<(), HostError> {
        tracing::debug!(?command, "host command");
        match command {
            HostCommand::CopyLinesDown { selection } => self.copy_lines_down(selection),
            HostCommand::DuplicateSelection { selection } if selection.is_empty() => {
                self.copy_lines_down(selection)
            }
            HostCommand::DuplicateSelection { selection } => {
                let selection = selection.clamp_to(&self.text);
                let copy = self.text[selection.start()..selection.end()].to_string();
                self.text.insert_str(selection.end(), &copy);
            }
            HostCommand::FormatSelection { .. } | HostCommand::FormatDocument => {}
        }
        self.executed.push(command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_edit_core::TextEdit;

    #[test]
    fn test_selection_bounds() {
        let forward = Selection::new(2, 5);
        let backward = Selection::new(5, 2);
        assert!(!forward.is_reversed());
        assert!(backward.is_reversed());
        assert_eq!((backward.start(), backward.end()), (2, 5));
        assert!(Selection::caret(3).is_empty());
    }

    #[test]
    fn test_clamp_respects_char_boundaries() {
        let text = "a»b";
        // `»` is two bytes wide, starting at 1
        assert_eq!(Selection::caret(2).clamp_to(text), Selection::caret(1));
        assert_eq!(Selection::new(0, 99).clamp_to(text).end(), text.len());
    }

    #[test]
    fn test_options_deserialize_camel_case() {
        let options: EditorOptions =
            serde_json::from_str(r#"{"tabSize": 2, "insertSpaces": false}"#).unwrap();
        assert_eq!(options.indent_style(), IndentStyle::Tabs);
    }

    #[tokio::test]
    async fn test_apply_edits() {
        let mut host = MemoryHost::new("ab", "typescript", "a.ts");
        let edits = EditSet::new(vec![TextEdit::insert(1, "X", "x")], 2).unwrap();
        host.apply_edits(&edits).await.unwrap();
        assert_eq!(host.text(), "aXb");
    }

    #[tokio::test]
    async fn test_apply_edits_rejects_out_of_range() {
        let mut host = MemoryHost::new("ab", "typescript", "a.ts");
        let edits = EditSet::new(vec![TextEdit::insert(5, "X", "x")], 10).unwrap();
        assert!(matches!(
            host.apply_edits(&edits).await,
            Err(HostError::InvalidRange { .. })
        ));
        assert_eq!(host.text(), "ab");
    }

    #[tokio::test]
    async fn test_copy_lines_down() {
        let mut host = MemoryHost::new("one\ntwo\nthree", "plaintext", "a.txt");
        host.execute(HostCommand::CopyLinesDown {
            selection: Selection::caret(5),
        })
        .await
        .unwrap();
        assert_eq!(host.text(), "one\ntwo\ntwo\nthree");
        assert_eq!(host.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_selection() {
        let mut host = MemoryHost::new("ab", "plaintext", "a.txt");
        host.execute(HostCommand::DuplicateSelection {
            selection: Selection::new(2, 1),
        })
        .await
        .unwrap();
        assert_eq!(host.text(), "abb");
    }

    #[tokio::test]
    async fn test_snippet_is_inserted_as_plain_text() {
        let mut host = MemoryHost::new("f()", "typescript", "a.ts");
        let mut snippet = Snippet::new();
        snippet.append_text("x").append_placeholder(1, "y").append_tabstop(0);
        host.insert_snippet(&snippet, Selection::caret(2)).await.unwrap();
        assert_eq!(host.text(), "f(xy)");
    }
}
