pub mod duplicate;
pub mod insert_log;
pub mod transform_case;

use crate::host::{EditorHost, HostError};
use crate::protocol::CommandDefinition;
use smart_edit_core::{EditConflict, TextCase};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Edit(#[from] EditConflict),
}

/// What a command did to the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Cursors handled by the syntax-aware path.
    pub syntax_edits: usize,
    /// Cursors handed to a built-in editor action instead.
    pub fallbacks: usize,
    /// Selections rewritten as plain text.
    pub transformed: usize,
}

/// Trait that every editor command implements.
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    fn definition(&self) -> CommandDefinition;

    async fn run(&self, host: &mut dyn EditorHost) -> Result<CommandOutcome, CommandError>;
}

/// Registry of all available commands.
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut commands: Vec<Box<dyn Command>> = vec![
            Box::new(duplicate::DuplicateCommand),
            Box::new(insert_log::InsertLogCommand),
        ];
        for case in TextCase::ALL {
            commands.push(Box::new(transform_case::TransformCaseCommand::new(case)));
        }
        Self { commands }
    }

    pub fn definitions(&self) -> Vec<CommandDefinition> {
        self.commands.iter().map(|c| c.definition()).collect()
    }

    pub async fn run(
        &self,
        name: &str,
        host: &mut dyn EditorHost,
    ) -> Result<CommandOutcome, CommandError> {
        for command in &self.commands {
            if command.definition().name == name {
                let outcome = command.run(host).await?;
                tracing::info!(command = name, ?outcome, "command finished");
                return Ok(outcome);
            }
        }
        Err(CommandError::UnknownCommand(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    #[test]
    fn test_registry_lists_all_commands() {
        let names: Vec<String> = CommandRegistry::new()
            .definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "sparrowKeys.duplicate",
                "sparrowKeys.insertLog",
                "sparrowKeys.transformToCamelCase",
                "sparrowKeys.transformToPascalCase",
                "sparrowKeys.transformToSnakeCase",
                "sparrowKeys.transformToDashCase",
            ]
        );
    }

    #[tokio::test]
    async fn test_run_dispatches_by_name() {
        let mut host = MemoryHost::new("max_width", "css", "a.css")
            .with_selections(vec![crate::host::Selection::new(0, 9)]);
        let outcome = CommandRegistry::new()
            .run("sparrowKeys.transformToCamelCase", &mut host)
            .await
            .unwrap();
        assert_eq!(outcome.transformed, 1);
        assert_eq!(host.text(), "maxWidth");
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mut host = MemoryHost::new("", "typescript", "a.ts");
        let result = CommandRegistry::new().run("sparrowKeys.nope", &mut host).await;
        assert!(matches!(result, Err(CommandError::UnknownCommand(_))));
    }
}
