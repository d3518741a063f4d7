use crate::client::LanguageModelClient;
use crate::commands::{CommandContext, CommandDispatcher, CommandOutcome};
use crate::core::error::CarltonError;
use crate::display;
use crate::interrupt::Interrupts;
use crate::logging::PromptLog;
use crate::providers::BackendRegistry;
use crate::session::Session;
use crate::terminal::Terminal;

pub struct Application {
    session: Session,
    client: LanguageModelClient,
    backends: BackendRegistry,
    command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(
        session: Session,
        backends: BackendRegistry,
        backend_name: &str,
        log: PromptLog,
        interrupts: Interrupts,
        command_dispatcher: CommandDispatcher,
    ) -> Result<Self, CarltonError> {
        let backend = backends.resolve(backend_name)?;
        Ok(Self {
            session,
            client: LanguageModelClient::new(backend, log).with_interrupts(interrupts),
            backends,
            command_dispatcher,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend_name(&self) -> &str {
        self.client.backend().name()
    }

    /// Switches the active backend; on `UnknownBackend` the current one stays.
    pub fn select_backend(&mut self, name: &str) -> Result<(), CarltonError> {
        let backend = self.backends.resolve(name)?;
        self.client.set_backend(backend);
        Ok(())
    }

    /// The REPL. Returns when an exit verb is entered or input is interrupted.
    pub async fn run(&mut self, terminal: &mut dyn Terminal) -> Result<(), CarltonError> {
        terminal.say(&self.client.backend().greet());
        terminal.say("Ready to code");

        let prompt = display::user_prompt();
        loop {
            let Some(line) = terminal.read_line(&prompt)? else {
                terminal.say("Alright, see ya");
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let mut ctx = CommandContext {
                session: &mut self.session,
                client: &self.client,
                terminal: &mut *terminal,
            };
            if self.command_dispatcher.handle_line(&line, &mut ctx).await == CommandOutcome::Exit
            {
                break;
            }
        }

        tracing::info!("session finished");
        Ok(())
    }
}
