use super::{Command, CommandError, CommandOutcome};
use crate::host::EditorHost;
use crate::protocol::CommandDefinition;
use smart_edit_core::{EditSet, TextCase, TextEdit};

/// Rewrite every selection in one identifier case.
pub struct TransformCaseCommand {
    case: TextCase,
}

impl TransformCaseCommand {
    pub fn new(case: TextCase) -> Self {
        Self { case }
    }
}

#[async_trait::async_trait]
impl Command for TransformCaseCommand {
    fn definition(&self) -> CommandDefinition {
        let name = self.case.name();
        CommandDefinition {
            name: format!("sparrowKeys.transformTo{name}Case"),
            title: format!("Transform to {name} Case"),
            description: format!(
                "Replace the text of each selection with its {} form.",
                self.case.convert(&format!("{name} case"))
            ),
        }
    }

    async fn run(&self, host: &mut dyn EditorHost) -> Result<CommandOutcome, CommandError> {
        let source = host.text();
        let edits: Vec<TextEdit> = host
            .selections()
            .into_iter()
            .map(|selection| selection.clamp_to(source))
            .filter(|selection| !selection.is_empty())
            .filter_map(|selection| {
                let before = &source[selection.start()..selection.end()];
                let after = self.case.convert(before);
                (after != before).then(|| {
                    TextEdit::replace(selection.start(), selection.end(), after, "transform case")
                })
            })
            .collect();

        let mut outcome = CommandOutcome::default();
        if edits.is_empty() {
            tracing::debug!(case = ?self.case, "no selected text to transform");
            return Ok(outcome);
        }

        outcome.transformed = edits.len();
        let edits = EditSet::new(edits, source.len())?;
        host.apply_edits(&edits).await?;
        Ok(outcome)
    }
}
