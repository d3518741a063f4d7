use super::{
    CommandContext, CommandInvocation, CommandOutcome,
    handler::{
        CommandHandler, CreateCommand, EditCommand, HELP_LINE, HelpCommand, QuitCommand,
        ReviewCommand, SaveCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::CarltonError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    /// Routes one line. Blank lines are a no-op.
    pub async fn dispatch(
        &self,
        line: &str,
        ctx: &mut CommandContext<'_>,
    ) -> Result<CommandOutcome, CarltonError> {
        let Some(invocation) = CommandInvocation::parse(line) else {
            return Ok(CommandOutcome::Continue);
        };

        let handler = self
            .registry
            .get(&invocation.verb)
            .ok_or_else(|| CarltonError::UnknownCommand(invocation.verb.clone()))?;

        tracing::debug!(verb = %invocation.verb, "dispatching");
        handler.execute(ctx, &invocation.argument).await
    }

    /// Like [`dispatch`](Self::dispatch), but reports errors on the terminal
    /// instead of returning them. Only closed input ends the session.
    pub async fn handle_line(&self, line: &str, ctx: &mut CommandContext<'_>) -> CommandOutcome {
        match self.dispatch(line, ctx).await {
            Ok(outcome) => outcome,
            Err(CarltonError::InputClosed) => {
                ctx.terminal.say("Alright, see ya");
                CommandOutcome::Exit
            }
            Err(err) => {
                tracing::debug!(error = ?err, "command failed");
                ctx.terminal.show_error(&err.to_string());
                CommandOutcome::Continue
            }
        }
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

/// Builds the dispatcher with every verb except those in `disabled`
/// (names without the leading slash, e.g. `edit`).
pub fn create_command_registry(disabled: &[String]) -> CommandDispatcher {
    let mut registry = CommandRegistry::new();
    let is_disabled = |name: &str| {
        disabled
            .iter()
            .any(|d| d.trim_start_matches('/').eq_ignore_ascii_case(name))
    };

    let optional: [(&str, Arc<dyn CommandHandler>); 4] = [
        ("create", Arc::new(CreateCommand)),
        ("review", Arc::new(ReviewCommand)),
        ("edit", Arc::new(EditCommand)),
        ("save", Arc::new(SaveCommand)),
    ];
    for (name, handler) in optional {
        if is_disabled(name) {
            tracing::info!(command = name, "command disabled by configuration");
            continue;
        }
        registry.register(&format!("/{}", name), handler);
    }

    registry.register_aliases(
        &["/quit", "/exit", "quit", "exit", "bye"],
        Arc::new(QuitCommand),
    );

    let mut help_lines = registry.help_lines();
    help_lines.push(HELP_LINE);
    registry.register_aliases(&["/help", "/?"], Arc::new(HelpCommand::new(&help_lines)));

    CommandDispatcher::new(Arc::new(registry))
}
