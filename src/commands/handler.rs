use super::edit::EditWorkflow;
use super::{CommandContext, CommandOutcome};
use crate::context::{build_context, ensure_text_file};
use crate::core::error::CarltonError;

use async_trait::async_trait;

#[async_trait(?Send)]
pub trait CommandHandler {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        argument: &str,
    ) -> Result<CommandOutcome, CarltonError>;

    fn help(&self) -> &'static str;
}

pub struct CreateCommand;
pub struct ReviewCommand;
pub struct EditCommand;
pub struct SaveCommand;
pub struct QuitCommand;

pub const HELP_LINE: &str = "/help, /? - Show available commands";

pub struct HelpCommand {
    text: String,
}

impl HelpCommand {
    pub fn new(lines: &[&str]) -> Self {
        let mut text = String::from("Available commands:");
        for line in lines {
            text.push_str("\n  ");
            text.push_str(line);
        }
        Self { text }
    }
}

fn require<'a>(argument: &'a str, usage: &str) -> Result<&'a str, CarltonError> {
    if argument.is_empty() {
        Err(CarltonError::MissingArgument(format!("Usage: {}", usage)))
    } else {
        Ok(argument)
    }
}

#[async_trait(?Send)]
impl CommandHandler for CreateCommand {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        argument: &str,
    ) -> Result<CommandOutcome, CarltonError> {
        let instruction = require(argument, "/create <what you are looking for>")?;

        let prompt = format!("{}\n\n{}", CREATE_PROMPT, instruction);
        let code = ctx.client.generate(&prompt).await?;

        ctx.terminal.show_text(&code);
        ctx.session.last_response = Some(code.clone());

        offer_save(ctx, &code)?;
        Ok(CommandOutcome::Continue)
    }

    fn help(&self) -> &'static str {
        "/create <instruction> - Generate new code from a description"
    }
}

/// Asks whether to keep freshly generated code, re-asking on anything
/// other than yes/no.
fn offer_save(ctx: &mut CommandContext<'_>, code: &str) -> Result<(), CarltonError> {
    loop {
        let answer = ctx.terminal.ask("Do you want to save this file? (y/n): ")?;
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => {
                let name = loop {
                    let name = ctx.terminal.ask("Please enter a file name: ")?;
                    let name = name.trim();
                    if !name.is_empty() {
                        break name.to_string();
                    }
                };
                ctx.session.write_file(&name, code)?;
                ctx.terminal.say(&format!("Text saved to {}.", name));
                return Ok(());
            }
            "n" | "no" => {
                ctx.terminal.say("Pft, fine");
                return Ok(());
            }
            _ => ctx.terminal.say("What? Try that again."),
        }
    }
}

#[async_trait(?Send)]
impl CommandHandler for ReviewCommand {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        argument: &str,
    ) -> Result<CommandOutcome, CarltonError> {
        let target = require(argument, "/review <path>")?;
        let path = ctx.session.resolve(target)?;
        ensure_text_file(&path)?;

        let context = build_context(ctx.session.working_directory(), &[target]);
        if context.is_empty() {
            return Err(CarltonError::FileRead { path });
        }

        let prompt = format!("{}\n\n{}", REVIEW_PROMPT, context);
        let review = ctx.client.generate(&prompt).await?;

        ctx.terminal.show_markdown(&review);
        ctx.session.last_response = Some(review);
        Ok(CommandOutcome::Continue)
    }

    fn help(&self) -> &'static str {
        "/review <path> - Review a file and suggest improvements"
    }
}

#[async_trait(?Send)]
impl CommandHandler for EditCommand {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        argument: &str,
    ) -> Result<CommandOutcome, CarltonError> {
        let target = require(argument, "/edit <path>")?;
        EditWorkflow::run(ctx, target).await?;
        Ok(CommandOutcome::Continue)
    }

    fn help(&self) -> &'static str {
        "/edit <path> - Propose changes to a file and apply them on confirmation"
    }
}

#[async_trait(?Send)]
impl CommandHandler for SaveCommand {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        argument: &str,
    ) -> Result<CommandOutcome, CarltonError> {
        let name = require(argument, "/save <name>")?;
        let text = ctx.session.last_response.as_deref().ok_or_else(|| {
            CarltonError::MissingArgument("Nothing to save yet, generate something first".to_string())
        })?;

        ctx.session.write_file(name, text)?;
        ctx.terminal.say(&format!("Text saved to {}.", name));
        Ok(CommandOutcome::Continue)
    }

    fn help(&self) -> &'static str {
        "/save <name> - Save the last response to a file"
    }
}

#[async_trait(?Send)]
impl CommandHandler for HelpCommand {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        _argument: &str,
    ) -> Result<CommandOutcome, CarltonError> {
        ctx.terminal.show_text(&self.text);
        Ok(CommandOutcome::Continue)
    }

    fn help(&self) -> &'static str {
        HELP_LINE
    }
}

#[async_trait(?Send)]
impl CommandHandler for QuitCommand {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        _argument: &str,
    ) -> Result<CommandOutcome, CarltonError> {
        ctx.terminal.say("Later on!");
        Ok(CommandOutcome::Exit)
    }

    fn help(&self) -> &'static str {
        "/quit, /exit, bye - Leave the session"
    }
}

const CREATE_PROMPT: &str = "You are an expert software engineer. Write the code described below. \
Respond with the complete source only: no explanations, no surrounding prose, and no markdown \
code fences, so the answer can be saved directly to a file.";
const REVIEW_PROMPT: &str = "You are a senior software engineer doing a code review. Review the \
file below. Point out bugs, unclear naming, missing error handling and security problems, and \
suggest concrete improvements. Format the review as markdown, quoting the relevant lines.";
