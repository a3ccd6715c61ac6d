use super::{Command, CommandError, CommandOutcome};
use crate::host::{EditorHost, HostCommand};
use crate::protocol::CommandDefinition;
use smart_edit_core::insert_log::{log_edit, log_snippet};
use smart_edit_core::{text, EditSet};
use smart_edit_lang::{detect_language, parse};
use std::cmp::Reverse;

/// Insert a `console.debug` statement for the expression under each cursor.
pub struct InsertLogCommand;

#[async_trait::async_trait]
impl Command for InsertLogCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition {
            name: "sparrowKeys.insertLog".into(),
            title: "Insert Debug Log".into(),
            description: "Log the expression under each cursor at the nearest place a \
                statement can go, wrapping bare statement bodies in a block. On a blank \
                line, insert a log template filled from the clipboard."
                .into(),
        }
    }

    async fn run(&self, host: &mut dyn EditorHost) -> Result<CommandOutcome, CommandError> {
        let mut outcome = CommandOutcome::default();

        let language = match detect_language(host.language_id(), host.file_name()) {
            Ok(language) if !language.is_json() => language,
            Ok(_) => return Ok(outcome),
            Err(e) => {
                tracing::debug!("{e}, nothing to log");
                return Ok(outcome);
            }
        };

        let source = host.text().to_string();
        let tree = match parse(host.file_name(), &source, language) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!("{e}");
                return Ok(outcome);
            }
        };

        let clipboard = match host.read_clipboard().await {
            Ok(clip) => clip,
            Err(e) => {
                tracing::warn!("{e}");
                String::new()
            }
        };
        let style = host.options().indent_style();

        // bottom-first, so edits never shift a cursor still to be handled
        let mut cursors = host.selections();
        cursors.sort_by_key(|cursor| Reverse(cursor.start()));

        for cursor in cursors {
            let cursor = cursor.clamp_to(&source);
            let blank = if cursor.is_empty() {
                text::is_blank_line(&source, cursor.active)
            } else {
                source[cursor.start()..cursor.end()].trim().is_empty()
            };

            if blank {
                host.insert_snippet(&log_snippet(Some(&clipboard)), cursor).await?;
                outcome.fallbacks += 1;
                continue;
            }

            let Some(edit) = log_edit(&tree, cursor.start(), cursor.end(), style) else {
                tracing::debug!(?cursor, "no loggable expression");
                continue;
            };
            let edits = EditSet::new(vec![edit], host.text().len())?;
            host.apply_edits(&edits).await?;
            outcome.syntax_edits += 1;
        }

        if outcome.syntax_edits + outcome.fallbacks > 0 {
            host.execute(HostCommand::FormatDocument).await?;
        }
        Ok(outcome)
    }
}
