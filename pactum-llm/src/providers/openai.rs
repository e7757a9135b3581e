use crate::config::{ChatRequest, ChatResponse, Usage};
use crate::error::{LlmError, Result};
use crate::providers::trait_impl::ChatProvider;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;

const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub struct OpenAIProvider {
    api_key: Arc<RwLock<Option<String>>>,
    client: Client,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new() -> Self {
        Self {
            api_key: Arc::new(RwLock::new(None)),
            client: Client::new(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn with_api_key(api_key: String) -> Self {
        let provider = Self::new();
        provider.set_api_key(api_key);
        provider
    }

    /// Builds a provider from the environment, if a key is present.
    pub fn from_env() -> Option<Self> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(Self::with_api_key)
    }

    pub fn set_api_key(&self, key: String) {
        *self.api_key.write() = Some(key);
    }

    fn get_api_key(&self) -> Result<String> {
        self.api_key
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| LlmError::MissingApiKey("OpenAI".to_string()))
    }
}

impl Default for OpenAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn has_api_key(&self) -> bool {
        self.api_key.read().is_some()
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let api_key = self.get_api_key()?;

        // Sanitize model name - only allow alphanumeric, dash, underscore, dot
        let model = request
            .model
            .as_ref()
            .map(|m| {
                let sanitized: String = m
                    .chars()
                    .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
                    .take(100)
                    .collect();
                if sanitized.is_empty() {
                    DEFAULT_MODEL.to_string()
                } else {
                    sanitized
                }
            })
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        // Limit max_tokens to prevent excessive API usage
        let max_tokens = request.max_tokens.map(|t| t.min(4096)).unwrap_or(2000);

        let body = json!({
            "model": model,
            "messages": request.messages.iter().map(|m| {
                json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                })
            }).collect::<Vec<_>>(),
            "temperature": request.temperature.unwrap_or(0.7).clamp(0.0, 2.0),
            "max_tokens": max_tokens,
        });

        if !self.base_url.starts_with("https://") {
            return Err(LlmError::InvalidResponse("Invalid base URL".to_string()));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .timeout(std::time::Duration::from_secs(120))
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(LlmError::RateLimit);
        }
        if status == 401 || status == 403 {
            return Err(LlmError::AuthenticationFailed);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let error_msg = if text.len() > 500 {
                let truncated: String = text.chars().take(500).collect();
                format!("HTTP {}: {}", status, truncated)
            } else {
                format!("HTTP {}: {}", status, text)
            };
            return Err(LlmError::InvalidResponse(error_msg));
        }

        let json: serde_json::Value = response.json().await?;

        let choices = json
            .get("choices")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                LlmError::InvalidResponse("Invalid response format: no choices array".to_string())
            })?;

        if choices.is_empty() {
            return Err(LlmError::InvalidResponse(
                "No choices in response".to_string(),
            ));
        }

        let choice = choices[0]
            .as_object()
            .ok_or_else(|| LlmError::InvalidResponse("Invalid choice format".to_string()))?;

        let content = choice["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();

        let usage = json.get("usage").and_then(|u| {
            Some(Usage {
                prompt_tokens: u["prompt_tokens"].as_u64()? as u32,
                completion_tokens: u["completion_tokens"].as_u64()? as u32,
                total_tokens: u["total_tokens"].as_u64()? as u32,
            })
        });

        Ok(ChatResponse {
            content,
            model: json["model"].as_str().unwrap_or(&model).to_string(),
            usage,
            finish_reason: choice["finish_reason"].as_str().map(|s| s.to_string()),
        })
    }
}
