//! The `/edit` state machine.
//!
//! `Idle -> AwaitingInstruction -> AwaitingApplyConfirmation -> Idle`. The
//! target is validated before leaving `Idle`, and every exit path, including
//! errors, lands back in `Idle`.

use super::CommandContext;
use crate::context::{build_context, ensure_text_file};
use crate::core::error::CarltonError;
use crate::session::{EditPhase, write_whole_file};
use crate::terminal::Terminal;
use std::path::Path;

pub struct EditWorkflow;

impl EditWorkflow {
    pub async fn run(ctx: &mut CommandContext<'_>, target: &str) -> Result<(), CarltonError> {
        let path = ctx.session.resolve(target)?;
        ensure_text_file(&path)?;

        let result = Self::drive(ctx, target, &path).await;
        ctx.session.edit_phase = EditPhase::Idle;
        result
    }

    async fn drive(
        ctx: &mut CommandContext<'_>,
        target: &str,
        path: &Path,
    ) -> Result<(), CarltonError> {
        ctx.session.edit_phase = EditPhase::AwaitingInstruction;
        tracing::debug!(target, "edit: awaiting instruction");

        let context = build_context(ctx.session.working_directory(), &[target]);
        if context.is_empty() {
            return Err(CarltonError::FileRead {
                path: path.to_path_buf(),
            });
        }

        let instruction = loop {
            let line = ctx.terminal.ask("What changes would you like to make? ")?;
            let line = line.trim();
            if !line.is_empty() {
                break line.to_string();
            }
        };

        let proposal = ctx
            .client
            .generate(&propose_prompt(&instruction, &context))
            .await?;
        ctx.terminal.show_markdown(&proposal);

        ctx.session.edit_phase = EditPhase::AwaitingApplyConfirmation;
        tracing::debug!(target, "edit: awaiting apply confirmation");

        if !confirm_apply(&mut *ctx.terminal)? {
            ctx.terminal.say(&format!("Okay, {} stays as it is.", target));
            return Ok(());
        }

        let updated = ctx
            .client
            .generate(&apply_prompt(&proposal, &context))
            .await?;
        ctx.session.last_response = Some(updated.clone());
        write_whole_file(path, &updated)?;
        ctx.terminal.say(&format!("Updated {}.", target));
        Ok(())
    }
}

/// `Some(true)` for yes (including an empty answer), `Some(false)` for no.
pub fn parse_confirmation(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn confirm_apply(terminal: &mut dyn Terminal) -> Result<bool, CarltonError> {
    loop {
        let answer = terminal.ask("Apply these changes? [Y/n]: ")?;
        match parse_confirmation(&answer) {
            Some(decision) => return Ok(decision),
            None => terminal.say("Please answer y or n."),
        }
    }
}

fn propose_prompt(instruction: &str, context: &str) -> String {
    format!(
        "{}\n\nRequested changes: {}\n\n{}",
        PROPOSE_EDIT_PROMPT, instruction, context
    )
}

fn apply_prompt(proposal: &str, context: &str) -> String {
    format!(
        "{}\n\nProposed changes:\n{}\n\nOriginal file:\n{}",
        APPLY_EDIT_PROMPT, proposal, context
    )
}

const PROPOSE_EDIT_PROMPT: &str = "You are an expert software engineer. Propose the edits needed \
to carry out the requested changes on the file below. Describe each change and show the affected \
code as markdown. Do not rewrite parts of the file that do not need to change.";
const APPLY_EDIT_PROMPT: &str = "Apply the proposed changes to the original file below. Respond \
with the complete updated file content only: no explanations and no markdown code fences. The \
response will replace the file as-is.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_answer_means_yes() {
        assert_eq!(parse_confirmation(""), Some(true));
        assert_eq!(parse_confirmation("   "), parse_confirmation("y"));
        assert_eq!(parse_confirmation("YES"), Some(true));
    }

    #[test]
    fn no_and_garbage() {
        assert_eq!(parse_confirmation("N"), Some(false));
        assert_eq!(parse_confirmation("no"), Some(false));
        assert_eq!(parse_confirmation("maybe"), None);
    }

    #[test]
    fn prompts_embed_instruction_proposal_and_context() {
        let context = "--- File: sample.py ---\nx = 1\n";
        let propose = propose_prompt("rename x to y", context);
        assert!(propose.starts_with(PROPOSE_EDIT_PROMPT));
        assert!(propose.contains("rename x to y"));
        assert!(propose.ends_with(context));

        let apply = apply_prompt("use y instead of x", context);
        assert!(apply.starts_with(APPLY_EDIT_PROMPT));
        assert!(apply.contains("use y instead of x"));
        assert!(apply.ends_with(context));
    }
}
