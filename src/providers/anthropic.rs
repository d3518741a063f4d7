use crate::config::{Provider, ProviderConfig};
use crate::core::error::CarltonError;
use crate::providers::base_client::HttpClient;
use crate::providers::{LLMProvider, Message, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

pub fn parse_messages_response(body: &str) -> Result<String, CarltonError> {
    let parsed: AnthropicResponse = serde_json::from_str(body)?;
    let text: String = parsed.content.into_iter().map(|block| block.text).collect();
    if text.trim().is_empty() {
        return Err(CarltonError::ServiceCall(
            "Empty response from Anthropic".to_string(),
        ));
    }
    Ok(text)
}

#[derive(Clone)]
pub struct AnthropicProvider {
    client: HttpClient,
    model: String,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig, timeout: Option<Duration>) -> Result<Self, CarltonError> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| Provider::Anthropic.default_base_url().to_string());
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| Provider::Anthropic.default_model().to_string());
        let auth_header = config
            .api_key
            .as_ref()
            .map(|key| ("x-api-key".to_string(), key.clone()));
        let extra_headers = HashMap::from([(
            "anthropic-version".to_string(),
            ANTHROPIC_VERSION.to_string(),
        )]);

        Ok(Self {
            client: HttpClient::new(base_url, auth_header, Some(extra_headers), timeout)?,
            model,
        })
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    fn name(&self) -> &str {
        Provider::Anthropic.as_str()
    }

    fn greet(&self) -> String {
        format!("Hello from {}!", Provider::Anthropic.display_name())
    }

    async fn converse(&self, messages: &[Message]) -> Result<String, CarltonError> {
        let system = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str());

        let payload = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: messages
                .iter()
                .filter(|m| m.role != Role::System)
                .map(|m| AnthropicMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            system,
        };

        let response = self.client.post("messages", &payload).await?;
        let body = response.text().await?;
        parse_messages_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_blocks() {
        let body = r#"{"content":[{"type":"text","text":"fn main() {"},{"type":"text","text":"}"}]}"#;
        assert_eq!(parse_messages_response(body).unwrap(), "fn main() {}");
    }

    #[test]
    fn empty_content_is_a_service_error() {
        let err = parse_messages_response(r#"{"content":[]}"#).unwrap_err();
        assert!(matches!(err, CarltonError::ServiceCall(_)));
    }
}
