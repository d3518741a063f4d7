use crate::core::error::CarltonError;
use crate::providers::{LLMProvider, Message};
use crate::terminal::Terminal;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Backend that replays queued responses and counts calls.
pub struct ScriptedProvider {
    name: String,
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    stalled: bool,
}

impl ScriptedProvider {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            stalled: false,
        }
    }

    /// Accepts calls but never answers them.
    pub fn stalled() -> Self {
        Self {
            stalled: true,
            ..Self::named("stalled")
        }
    }

    pub fn with_responses(responses: &[&str]) -> Self {
        let provider = Self::named("scripted");
        provider
            .responses
            .lock()
            .unwrap()
            .extend(responses.iter().map(|r| Ok(r.to_string())));
        provider
    }

    pub fn failing(message: &str) -> Self {
        let provider = Self::named("scripted");
        provider
            .responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        provider
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn greet(&self) -> String {
        format!("Hello from {}!", self.name)
    }

    async fn converse(&self, messages: &[Message]) -> Result<String, CarltonError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);
        if self.stalled {
            return std::future::pending().await;
        }

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(CarltonError::ServiceCall(message)),
            None => Err(CarltonError::ServiceCall(
                "no scripted response left".to_string(),
            )),
        }
    }
}

/// Console that replays queued lines and records everything shown.
/// `None` in the queue simulates Ctrl-C; an empty queue reads as end of input.
#[derive(Default)]
pub struct ScriptedTerminal {
    inputs: VecDeque<Option<String>>,
    pub prompts: Vec<String>,
    pub output: Vec<String>,
    pub errors: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            inputs: lines.iter().map(|l| Some(l.to_string())).collect(),
            ..Self::default()
        }
    }

    pub fn push_interrupt(&mut self) {
        self.inputs.push_back(None);
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }
}

impl Terminal for ScriptedTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CarltonError> {
        self.prompts.push(prompt.to_string());
        Ok(self.inputs.pop_front().flatten())
    }

    fn say(&mut self, message: &str) {
        self.output.push(message.to_string());
    }

    fn show_text(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn show_markdown(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
