use crate::config::{Provider, ProviderConfig};
use crate::core::error::CarltonError;
use crate::providers::{
    LLMProvider, anthropic::AnthropicProvider, openai_compatible::OpenAICompatibleProvider,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

type ProviderCreator = Box<
    dyn Fn(&ProviderConfig, Option<Duration>) -> Result<Arc<dyn LLMProvider>, CarltonError>
        + Send
        + Sync,
>;

pub struct ProviderFactory {
    creators: HashMap<Provider, ProviderCreator>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        let mut creators: HashMap<Provider, ProviderCreator> = HashMap::new();

        for provider in [
            Provider::OpenAI,
            Provider::OpenRouter,
            Provider::DeepSeek,
            Provider::Ollama,
        ] {
            creators.insert(
                provider,
                Box::new(move |config: &ProviderConfig, timeout| {
                    let backend = OpenAICompatibleProvider::new(provider, config, timeout)?;
                    Ok(Arc::new(backend) as Arc<dyn LLMProvider>)
                }),
            );
        }

        creators.insert(
            Provider::Anthropic,
            Box::new(|config: &ProviderConfig, timeout| {
                let backend = AnthropicProvider::new(config, timeout)?;
                Ok(Arc::new(backend) as Arc<dyn LLMProvider>)
            }),
        );

        Self { creators }
    }

    pub fn create(
        &self,
        provider: Provider,
        config: &ProviderConfig,
        timeout: Option<Duration>,
    ) -> Result<Arc<dyn LLMProvider>, CarltonError> {
        self.creators
            .get(&provider)
            .ok_or_else(|| CarltonError::Config(format!("Provider not found: {:?}", provider)))
            .and_then(|creator| creator(config, timeout))
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_provider_has_a_creator() {
        let factory = ProviderFactory::new();
        for provider in Provider::ALL {
            let backend = factory
                .create(provider, &ProviderConfig::default(), None)
                .unwrap();
            assert_eq!(backend.name(), provider.as_str());
        }
    }
}
