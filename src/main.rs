use clap::Parser;
use std::process::ExitCode;

mod app;
mod cli;
mod client;
mod commands;
mod config;
mod context;
mod core;
mod display;
mod input;
mod interrupt;
mod logging;
mod providers;
mod session;
mod terminal;

#[cfg(test)]
mod test_support;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::create_command_registry;
use crate::config::Config;
use crate::core::error::CarltonError;
use crate::interrupt::Interrupts;
use crate::logging::PromptLog;
use crate::providers::BackendRegistry;
use crate::session::Session;
use crate::terminal::RustylineTerminal;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "fatal");
            display::display_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), CarltonError> {
    let mut config = Config::load()?;
    config.apply_args(&args);

    let backends = BackendRegistry::from_config(&config)?;
    tracing::debug!(backends = ?backends.names(), "registered backends");
    let command_dispatcher = create_command_registry(&config.disabled_commands);
    let interrupts = Interrupts::listen();
    let mut terminal =
        RustylineTerminal::new(command_dispatcher.get_command_names(), interrupts.clone())?;

    let log = PromptLog::new(config.prompt_log_path());
    tracing::debug!(path = ?log.path(), "prompt log");

    let mut app = Application::new(
        Session::new(std::env::current_dir()?),
        backends,
        config.active_provider_name(),
        log,
        interrupts,
        command_dispatcher,
    )?;
    if let Some(name) = &args.provider {
        app.select_backend(name)?;
    }
    config.ensure_credentials(app.backend_name())?;

    tracing::info!(
        backend = app.backend_name(),
        cwd = %app.session().working_directory().display(),
        "starting session"
    );

    display::clear_screen();
    app.run(&mut terminal).await
}
