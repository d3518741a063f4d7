use crate::commands::handler::CommandHandler;
use std::collections::HashMap;
use std::sync::Arc;

/// Verb → handler map. Verbs are stored lowercase, including any leading `/`.
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    order: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registers `handler` under every verb in `verbs`.
    pub fn register_aliases(&mut self, verbs: &[&str], handler: Arc<dyn CommandHandler>) {
        for verb in verbs {
            self.register(verb, handler.clone());
        }
    }

    pub fn register(&mut self, verb: &str, handler: Arc<dyn CommandHandler>) {
        let verb = verb.to_lowercase();
        if self.handlers.insert(verb.clone(), handler).is_none() {
            self.order.push(verb);
        }
    }

    pub fn get(&self, verb: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(&verb.to_lowercase()).cloned()
    }

    /// Help lines of the registered handlers, deduplicated, in registration order.
    pub fn help_lines(&self) -> Vec<&'static str> {
        let mut lines: Vec<&'static str> = Vec::new();
        for verb in &self.order {
            let line = self.handlers[verb].help();
            if !lines.contains(&line) {
                lines.push(line);
            }
        }
        lines
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.order.clone()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
