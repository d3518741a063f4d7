use crate::core::error::CarltonError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod anthropic;
pub mod base_client;
pub mod factory;
pub mod openai_compatible;
pub mod registry;

pub use registry::BackendRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat-capable backend: one language-model vendor.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Registry key, e.g. `openai`.
    fn name(&self) -> &str;

    fn greet(&self) -> String;

    /// One round trip with the service; returns the full generated text.
    async fn converse(&self, messages: &[Message]) -> Result<String, CarltonError>;
}
