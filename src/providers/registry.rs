use crate::config::{Config, Provider};
use crate::core::error::CarltonError;
use crate::providers::LLMProvider;
use crate::providers::factory::ProviderFactory;
use std::collections::HashMap;
use std::sync::Arc;

/// Name-keyed set of backends, built once at startup.
///
/// Lookups are exact and case-sensitive; registering a name twice keeps the
/// later backend.
#[derive(Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn LLMProvider>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Registers every known provider with its resolved settings.
    pub fn from_config(config: &Config) -> Result<Self, CarltonError> {
        let factory = ProviderFactory::new();
        let mut registry = Self::new();
        for provider in Provider::ALL {
            let backend = factory.create(
                provider,
                &config.provider_config(provider),
                config.request_timeout(),
            )?;
            registry.register(provider.as_str(), backend);
        }
        Ok(registry)
    }

    pub fn register(&mut self, name: &str, backend: Arc<dyn LLMProvider>) {
        if self.backends.insert(name.to_string(), backend).is_some() {
            tracing::debug!(name, "replaced registered backend");
        }
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn LLMProvider>, CarltonError> {
        self.backends
            .get(name)
            .cloned()
            .ok_or_else(|| CarltonError::UnknownBackend {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.backends.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedProvider;

    #[test]
    fn resolves_registered_backend() {
        let mut registry = BackendRegistry::new();
        registry.register("OpenAi", Arc::new(ScriptedProvider::named("OpenAi")));
        registry.register("Llama", Arc::new(ScriptedProvider::named("Llama")));

        let backend = registry.resolve("Llama").unwrap();
        assert_eq!(backend.greet(), "Hello from Llama!");
        assert_eq!(registry.names(), vec!["Llama", "OpenAi"]);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut registry = BackendRegistry::new();
        registry.register("OpenAi", Arc::new(ScriptedProvider::named("OpenAi")));

        let err = registry.resolve("openai").err().unwrap();
        assert!(matches!(err, CarltonError::UnknownBackend { ref name } if name == "openai"));
    }

    #[test]
    fn later_registration_overwrites() {
        let mut registry = BackendRegistry::new();
        registry.register("local", Arc::new(ScriptedProvider::named("first")));
        registry.register("local", Arc::new(ScriptedProvider::named("second")));

        assert_eq!(registry.resolve("local").unwrap().name(), "second");
        assert_eq!(registry.names().len(), 1);
    }

    #[test]
    fn from_config_registers_known_providers() {
        let registry = BackendRegistry::from_config(&Config::default()).unwrap();
        assert_eq!(
            registry.names(),
            vec!["anthropic", "deepseek", "ollama", "openai", "openrouter"]
        );
        assert!(registry.resolve("gemini").is_err());
    }
}
