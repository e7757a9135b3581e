//! Configuration for speech synthesis and playback.

use serde::{Deserialize, Serialize};

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Enable voice output
    pub enabled: bool,

    /// TTS API endpoint
    pub endpoint: String,

    /// API key (optional, can be set via ELEVENLABS_API_KEY)
    pub api_key: Option<String>,

    /// Voice identifier (default: Rachel)
    pub voice_id: String,

    /// Model identifier
    pub model_id: String,

    /// Voice stability (0.0-1.0)
    pub stability: f32,

    /// Voice similarity boost (0.0-1.0)
    pub similarity_boost: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Retry configuration
    pub retry: RetryConfig,

    /// Minimum spacing between synthesis requests in milliseconds
    pub min_request_interval_ms: u64,

    /// Maximum characters sent per synthesis request
    pub max_chars: usize,

    /// Playback settings
    pub playback: PlaybackConfig,
}

/// Retry configuration for synthesis calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum retry attempts after the first try
    pub max_retries: u32,

    /// Fixed delay between attempts in milliseconds
    pub retry_delay_ms: u64,
}

/// Audio playback settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Playback rate; slightly below 1.0 for a gentler feel
    pub rate: f32,

    /// Keep natural pitch when the rate changes
    pub preserve_pitch: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.elevenlabs.io".to_string(),
            api_key: None,
            voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
            model_id: "eleven_turbo_v2_5".to_string(),
            stability: 0.5,
            similarity_boost: 0.75,
            timeout_secs: 30,
            retry: RetryConfig::default(),
            min_request_interval_ms: 1000,
            max_chars: 200,
            playback: PlaybackConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_delay_ms: 500,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            rate: 0.95,
            preserve_pitch: true,
        }
    }
}

impl SpeechConfig {
    pub fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("Invalid TTS endpoint URL: {}", e))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(format!(
                    "Unsupported TTS endpoint scheme: {}. Only http:// and https:// are allowed.",
                    scheme
                ))
            }
        }
        if self.voice_id.is_empty() {
            return Err("Voice id cannot be empty".to_string());
        }
        if self.voice_id.len() > 64 || !self.voice_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err("Voice id must be short and alphanumeric".to_string());
        }
        if self.model_id.is_empty() {
            return Err("Model id cannot be empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.stability) {
            return Err("Stability must be in 0.0-1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.similarity_boost) {
            return Err("Similarity boost must be in 0.0-1.0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Timeout cannot be 0".to_string());
        }
        if self.retry.max_retries > 10 {
            return Err("Too many retries (max 10)".to_string());
        }
        if self.max_chars == 0 {
            return Err("Max chars cannot be 0".to_string());
        }
        if !(0.25..=4.0).contains(&self.playback.rate) {
            return Err("Playback rate must be in 0.25-4.0".to_string());
        }
        Ok(())
    }

    /// API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("ELEVENLABS_API_KEY").ok())
    }
}
