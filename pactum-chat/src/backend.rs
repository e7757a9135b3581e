//! HTTP collaborators for the chat widget and the flowchart page.

use async_trait::async_trait;
use pactum_core::flowchart::Flowchart;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Reply text used when the chat service answers without a response field.
pub const FALLBACK_REPLY: &str = "I apologize, but I encountered an error. Please try again.";

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat service returned status {0}")]
    Status(u16),

    #[error("Invalid response payload: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Trait for the outbound chat collaborator
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one user message and returns the assistant's reply text.
    async fn send(&self, message: &str) -> Result<String>;
}

/// `POST /api/chat` backend. The chat request itself carries no timeout.
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
}

impl HttpChatBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ChatReplyBody {
    response: Option<String>,
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, message: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "message": message }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let body: ChatReplyBody = response.json().await?;
        Ok(body.response.unwrap_or_else(|| FALLBACK_REPLY.to_string()))
    }
}

/// Flowchart fetch used by the page layer, bounded by a 10-second timeout.
pub struct FlowchartClient {
    client: Client,
    base_url: String,
}

impl FlowchartClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch(&self, document_id: &str) -> Result<Flowchart> {
        let url = format!("{}/api/flowchart", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("documentId", document_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}
