use crate::core::error::CarltonError;

use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::MemHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};

/// Completes slash verbs, then file paths for their arguments.
pub struct CarltonHelper {
    commands: Vec<String>,
    filename_completer: FilenameCompleter,
    history_hinter: HistoryHinter,
}

impl CarltonHelper {
    pub fn new(command_names: Vec<String>) -> Self {
        let mut commands: Vec<String> = command_names
            .into_iter()
            .filter(|name| name.starts_with('/'))
            .collect();
        commands.sort();
        Self {
            commands,
            filename_completer: FilenameCompleter::new(),
            history_hinter: HistoryHinter {},
        }
    }

    fn complete_command(&self, typed: &str) -> Vec<Pair> {
        self.commands
            .iter()
            .filter(|cmd| cmd.starts_with(typed))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect()
    }
}

impl Helper for CarltonHelper {}

impl Completer for CarltonHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        if typed.starts_with('/') && !typed.contains(char::is_whitespace) {
            return Ok((0, self.complete_command(typed)));
        }

        self.filename_completer.complete(line, pos, ctx)
    }
}

impl Hinter for CarltonHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for CarltonHelper {}

impl Validator for CarltonHelper {}

/// In-memory history only; nothing survives the run.
pub fn create_editor(
    command_names: Vec<String>,
) -> Result<Editor<CarltonHelper, MemHistory>, CarltonError> {
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(false)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_history(config, MemHistory::new())
        .map_err(|e| CarltonError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(CarltonHelper::new(command_names)));

    Ok(editor)
}

pub fn read_input(
    editor: &mut Editor<CarltonHelper, MemHistory>,
    prompt: &str,
) -> Result<Option<String>, CarltonError> {
    match editor.readline(prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                if let Err(e) = editor.add_history_entry(line.as_str()) {
                    tracing::debug!(error = %e, "failed to add history entry");
                }
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(CarltonError::Input(format!("Input error: {}", err))),
    }
}
