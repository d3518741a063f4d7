use crate::config::{Provider, ProviderConfig};
use crate::core::error::CarltonError;
use crate::providers::base_client::HttpClient;
use crate::providers::{LLMProvider, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

/// Extracts the first choice's text from a chat-completions body.
pub fn parse_completion(body: &str) -> Result<String, CarltonError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CarltonError::ServiceCall("No choices in API response".to_string()))?
        .message
        .content
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(CarltonError::ServiceCall(
            "Empty response received from API".to_string(),
        ));
    }
    Ok(content)
}

/// Any backend speaking the OpenAI chat-completions dialect.
#[derive(Clone)]
pub struct OpenAICompatibleProvider {
    provider: Provider,
    client: HttpClient,
    model: String,
}

impl OpenAICompatibleProvider {
    pub fn new(
        provider: Provider,
        config: &ProviderConfig,
        timeout: Option<Duration>,
    ) -> Result<Self, CarltonError> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| provider.default_base_url().to_string());
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string());

        let auth_header = config
            .api_key
            .as_ref()
            .map(|key| ("Authorization".to_string(), format!("Bearer {}", key)));

        let extra_headers = match provider {
            Provider::OpenRouter => Some(HashMap::from([(
                "X-Title".to_string(),
                "carlton".to_string(),
            )])),
            _ => None,
        };

        Ok(Self {
            provider,
            client: HttpClient::new(base_url, auth_header, extra_headers, timeout)?,
            model,
        })
    }

    #[cfg(test)]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LLMProvider for OpenAICompatibleProvider {
    fn name(&self) -> &str {
        self.provider.as_str()
    }

    fn greet(&self) -> String {
        format!("Hello from {}!", self.provider.display_name())
    }

    async fn converse(&self, messages: &[Message]) -> Result<String, CarltonError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| ChatCompletionMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: false,
        };

        let response = self.client.post("chat/completions", &payload).await?;
        let body = response.text().await?;
        parse_completion(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice_verbatim() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"def add(a,b): return a+b"}},{"message":{"content":"other"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "def add(a,b): return a+b");
    }

    #[test]
    fn empty_choices_is_a_service_error() {
        let err = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, CarltonError::ServiceCall(_)));
    }

    #[test]
    fn null_content_is_a_service_error() {
        let err = parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        assert!(matches!(err, CarltonError::ServiceCall(_)));
    }

    #[test]
    fn defaults_come_from_the_provider() {
        let provider =
            OpenAICompatibleProvider::new(Provider::Ollama, &ProviderConfig::default(), None)
                .unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "llama3.2");
        assert_eq!(provider.greet(), "Hello from Llama!");
    }
}
