use super::{Command, CommandError, CommandOutcome};
use crate::host::{EditorHost, HostCommand, Selection};
use crate::protocol::CommandDefinition;
use smart_edit_core::duplicate::duplicate_edits;
use smart_edit_core::resolve::find_matching_nodes;
use smart_edit_core::{text, EditSet};
use smart_edit_lang::{detect_language, parse, SupportedLanguage};
use std::cmp::Reverse;

/// Syntax-aware duplicate line/selection.
pub struct DuplicateCommand;

#[async_trait::async_trait]
impl Command for DuplicateCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition {
            name: "sparrowKeys.duplicate".into(),
            title: "Duplicate".into(),
            description: "Duplicate the node under each cursor with the separator its \
                position needs (comma, operator, `.`, `else`, statement delimiter). \
                Falls back to copying lines down or duplicating the selection."
                .into(),
        }
    }

    async fn run(&self, host: &mut dyn EditorHost) -> Result<CommandOutcome, CommandError> {
        let language = match detect_language(host.language_id(), host.file_name()) {
            Ok(language) => Some(language),
            Err(e) => {
                tracing::debug!("{e}, duplicating lines only");
                None
            }
        };

        let mut cursors = host.selections();
        cursors.sort_by_key(|cursor| Reverse(cursor.active));

        let mut outcome = CommandOutcome::default();
        for cursor in cursors {
            if duplicate_cursor(host, language, cursor).await? {
                outcome.syntax_edits += 1;
            } else {
                outcome.fallbacks += 1;
            }
        }
        Ok(outcome)
    }
}

/// Duplicate at one cursor. Returns false if a built-in action was used.
async fn duplicate_cursor(
    host: &mut dyn EditorHost,
    language: Option<SupportedLanguage>,
    cursor: Selection,
) -> Result<bool, CommandError> {
    // earlier cursors may have edited the document, so read it afresh
    let source = host.text().to_string();
    let cursor = cursor.clamp_to(&source);

    if cursor.is_empty() && text::is_blank_line(&source, cursor.active) {
        host.execute(HostCommand::CopyLinesDown { selection: cursor }).await?;
        return Ok(false);
    }

    if !cursor.is_empty() && source[cursor.start()..cursor.end()].trim().is_empty() {
        host.execute(HostCommand::DuplicateSelection { selection: cursor }).await?;
        return Ok(false);
    }

    if let Some(language) = language {
        let (start, end) = if cursor.is_empty() {
            let at = snap_caret(&source, cursor.active);
            (at, at)
        } else {
            (cursor.start(), cursor.end())
        };

        match parse(host.file_name(), &source, language) {
            Ok(tree) => {
                let edits = duplicate_edits(&tree, start, end);
                if !edits.is_empty() {
                    tracing::debug!(edits = edits.len(), start, end, "duplicating nodes");
                    let edits = EditSet::new(edits, source.len())?;
                    host.apply_edits(&edits).await?;
                    host.execute(HostCommand::FormatSelection { selection: cursor })
                        .await?;
                    return Ok(true);
                }

                if start != end && find_matching_nodes(&tree, start, end).is_empty() {
                    host.execute(HostCommand::DuplicateSelection { selection: cursor })
                        .await?;
                    return Ok(false);
                }
            }
            Err(e) => tracing::warn!("{e}, falling back to line duplication"),
        }
    }

    host.execute(HostCommand::CopyLinesDown { selection: cursor }).await?;
    Ok(false)
}

/// Move a caret onto the node the user most likely means.
///
/// A caret right after a list comma moves onto the element before it; a
/// caret in front of whitespace moves past the whitespace.
fn snap_caret(source: &str, at: usize) -> usize {
    let line_start = text::line_start(source, at);
    let line_end = text::line_end(source, at).max(at);
    let left = &source[line_start..at];
    let right = &source[at..line_end];

    let right_is_space = right.starts_with(char::is_whitespace);
    if left.ends_with(',') && (right.is_empty() || right_is_space) {
        return at - 1;
    }
    if right_is_space {
        return at + (right.len() - right.trim_start().len());
    }
    at
}
