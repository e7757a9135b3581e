//! Synthesis engine client.

use crate::config::SpeechConfig;
use crate::error::{Result, SpeechError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

/// Trait for TTS engines
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Synthesize text to speech audio
    async fn synthesize(&self, text: &str) -> Result<Bytes>;

    /// Check if engine is available
    fn is_available(&self) -> bool;

    /// Get engine name
    fn name(&self) -> &str;
}

/// ElevenLabs text-to-speech client.
pub struct ElevenLabsEngine {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    voice_id: String,
    model_id: String,
    stability: f32,
    similarity_boost: f32,
}

impl ElevenLabsEngine {
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        config.validate().map_err(SpeechError::Config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeechError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            voice_id: config.voice_id.clone(),
            model_id: config.model_id.clone(),
            stability: config.stability,
            similarity_boost: config.similarity_boost,
        })
    }

    fn resolve_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("ELEVENLABS_API_KEY").ok())
            .ok_or(SpeechError::MissingApiKey)
    }
}

#[async_trait]
impl TtsEngine for ElevenLabsEngine {
    async fn synthesize(&self, text: &str) -> Result<Bytes> {
        if text.is_empty() {
            return Err(SpeechError::Config("Text cannot be empty".to_string()));
        }

        let api_key = self.resolve_api_key()?;

        let preview: String = text.chars().take(50).collect();
        debug!(
            "TTS request: {} chars, preview: {}{}",
            text.chars().count(),
            preview,
            if text.chars().count() > 50 { "..." } else { "" }
        );

        let body = json!({
            "text": text,
            "model_id": self.model_id,
            "voice_settings": {
                "stability": self.stability,
                "similarity_boost": self.similarity_boost,
            }
        });

        let url = format!("{}/v1/text-to-speech/{}", self.endpoint, self.voice_id);
        let response = self
            .client
            .post(&url)
            .header("Accept", "audio/mpeg")
            .header("Content-Type", "application/json")
            .header("xi-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail = if detail.len() > 500 {
                let truncated: String = detail.chars().take(500).collect();
                format!("{}...", truncated)
            } else {
                detail
            };
            error!("TTS API error ({}): {}", status, detail);
            return Err(SpeechError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            error!("TTS API returned an empty audio payload");
            return Err(SpeechError::EmptyAudio);
        }

        debug!("Audio generated: {} bytes", audio.len());
        Ok(audio)
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some() || std::env::var("ELEVENLABS_API_KEY").is_ok()
    }

    fn name(&self) -> &str {
        "ElevenLabs"
    }
}
