use crate::core::error::CarltonError;
use crate::interrupt::Interrupts;
use crate::logging::PromptLog;
use crate::providers::{LLMProvider, Message};
use std::sync::Arc;

/// The core's only door to the model service: one user message in, the
/// full generated text out.
pub struct LanguageModelClient {
    backend: Arc<dyn LLMProvider>,
    log: PromptLog,
    interrupts: Interrupts,
}

impl LanguageModelClient {
    pub fn new(backend: Arc<dyn LLMProvider>, log: PromptLog) -> Self {
        Self {
            backend,
            log,
            interrupts: Interrupts::new(),
        }
    }

    pub fn with_interrupts(mut self, interrupts: Interrupts) -> Self {
        self.interrupts = interrupts;
        self
    }

    pub fn backend(&self) -> &dyn LLMProvider {
        self.backend.as_ref()
    }

    pub fn set_backend(&mut self, backend: Arc<dyn LLMProvider>) {
        tracing::info!(from = self.backend.name(), to = backend.name(), "switching backend");
        self.backend = backend;
    }

    /// Sends `prompt` and waits for the reply. An interrupt while waiting
    /// drops the request and yields `Cancelled`.
    pub async fn generate(&self, prompt: &str) -> Result<String, CarltonError> {
        let messages = [Message::user(prompt)];
        tracing::debug!(backend = self.backend.name(), chars = prompt.len(), "sending prompt");

        let response = tokio::select! {
            result = self.backend.converse(&messages) => result?,
            _ = self.interrupts.wait() => {
                tracing::info!("model call interrupted");
                return Err(CarltonError::Cancelled);
            }
        };

        self.log.record(prompt, &response);
        Ok(response)
    }
}
