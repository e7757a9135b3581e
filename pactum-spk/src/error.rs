use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TTS API key not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TTS service returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Received empty audio payload")]
    EmptyAudio,

    #[error("Playback error: {0}")]
    Playback(String),
}

pub type Result<T> = std::result::Result<T, SpeechError>;

impl SpeechError {
    /// Only non-2xx responses are retried; network-level failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SpeechError::Status { .. })
    }
}
