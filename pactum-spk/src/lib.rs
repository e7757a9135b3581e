pub mod clean;
pub mod config;
pub mod engine;
pub mod error;
pub mod playback;
pub mod session;

pub use config::{PlaybackConfig, RetryConfig, SpeechConfig};
pub use engine::{ElevenLabsEngine, TtsEngine};
pub use error::{Result, SpeechError};
pub use playback::{
    playback_channel, AudioSink, PlaybackDriver, PlaybackEnd, PlaybackHandle, SilentSink,
};
pub use session::VoiceSession;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_config_default() {
        let config = SpeechConfig::default();
        assert!(config.enabled);
        assert_eq!(config.voice_id, "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(config.model_id, "eleven_turbo_v2_5");
        assert_eq!(config.stability, 0.5);
        assert_eq!(config.similarity_boost, 0.75);
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.retry_delay_ms, 500);
        assert_eq!(config.min_request_interval_ms, 1000);
        assert_eq!(config.max_chars, 200);
        assert_eq!(config.playback.rate, 0.95);
        assert!(config.playback.preserve_pitch);
    }

    #[test]
    fn test_speech_config_validate() {
        assert!(SpeechConfig::default().validate().is_ok());

        let mut bad = SpeechConfig::default();
        bad.endpoint = "ftp://example.com".to_string();
        assert!(bad.validate().is_err());

        let mut bad = SpeechConfig::default();
        bad.voice_id = "not a voice/id".to_string();
        assert!(bad.validate().is_err());

        let mut bad = SpeechConfig::default();
        bad.stability = 1.5;
        assert!(bad.validate().is_err());

        let mut bad = SpeechConfig::default();
        bad.playback.rate = 10.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_engine_available_with_explicit_key() {
        let mut config = SpeechConfig::default();
        config.api_key = Some("test-key".to_string());
        let engine = ElevenLabsEngine::new(&config).unwrap();
        assert!(engine.is_available());
        assert_eq!(engine.name(), "ElevenLabs");
    }

    #[test]
    fn test_status_errors_are_retryable() {
        let status = SpeechError::Status {
            status: 429,
            detail: "rate limited".to_string(),
        };
        assert!(status.is_retryable());
        assert!(!SpeechError::EmptyAudio.is_retryable());
        assert!(!SpeechError::MissingApiKey.is_retryable());
    }
}
