pub mod dispatcher;
pub mod edit;
pub mod handler;
pub mod registry;


use crate::client::LanguageModelClient;
use crate::session::Session;
use crate::terminal::Terminal;
pub use dispatcher::{CommandDispatcher, create_command_registry};

/// What a command needs from the running session.
pub struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub client: &'a LanguageModelClient,
    pub terminal: &'a mut dyn Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Exit,
}

/// One input line split into verb and argument.
///
/// The verb is lowercased; the argument keeps its case and is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub verb: String,
    pub argument: String,
}

impl CommandInvocation {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (verb, rest) = match line.find(char::is_whitespace) {
            Some(idx) => (&line[..idx], &line[idx..]),
            None => (line, ""),
        };

        Some(Self {
            verb: verb.to_lowercase(),
            argument: rest.trim().to_string(),
        })
    }
}
