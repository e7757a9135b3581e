use crate::config::{ChatRequest, ChatResponse};
use crate::error::Result;
use async_trait::async_trait;

/// Trait for chat-completion providers
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logging and diagnostics
    fn name(&self) -> &'static str;

    /// Whether an API key has been configured
    fn has_api_key(&self) -> bool;

    /// Send a chat completion request
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}
