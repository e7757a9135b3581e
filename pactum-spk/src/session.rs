//! Voice playback session.
//!
//! Owns at most one active playback per session. Starting a new utterance
//! stops the previous one, a minimum interval is enforced between synthesis
//! requests, and every failure degrades silently: voice problems never
//! surface beyond a transient mood.

use crate::clean;
use crate::config::SpeechConfig;
use crate::engine::TtsEngine;
use crate::error::{Result, SpeechError};
use crate::playback::{AudioSink, PlaybackEnd};
use bytes::Bytes;
use pactum_avatar::{AnimationState, AvatarContext};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

const MOOD_SPEAKING: &str = "Speaking...";
const MOOD_VOICE_UNAVAILABLE: &str = "Voice unavailable";
const MOOD_PLAYBACK_ERROR: &str = "Error playing audio";
const MOOD_CLEAR_DELAY: Duration = Duration::from_millis(2000);

struct VoiceState {
    enabled: bool,
    speaking_message_id: Option<Uuid>,
    loading: bool,
    last_request_at: Option<Instant>,
    playback: Option<crate::playback::PlaybackHandle>,
    // Bumped by stop() and by each new speak(); in-flight work that observes
    // a newer generation abandons itself instead of playing stale audio.
    generation: u64,
}

#[derive(Clone)]
pub struct VoiceSession {
    engine: Arc<dyn TtsEngine>,
    sink: Arc<dyn AudioSink>,
    avatar: AvatarContext,
    config: Arc<SpeechConfig>,
    state: Arc<Mutex<VoiceState>>,
}

impl VoiceSession {
    pub fn new(
        engine: Arc<dyn TtsEngine>,
        sink: Arc<dyn AudioSink>,
        avatar: AvatarContext,
        config: SpeechConfig,
    ) -> Self {
        let enabled = config.enabled;
        Self {
            engine,
            sink,
            avatar,
            config: Arc::new(config),
            state: Arc::new(Mutex::new(VoiceState {
                enabled,
                speaking_message_id: None,
                loading: false,
                last_request_at: None,
                playback: None,
                generation: 0,
            })),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// Disabling voice output stops any current playback.
    pub fn set_enabled(&self, enabled: bool) {
        let was_enabled = {
            let mut st = self.state.lock();
            let was = st.enabled;
            st.enabled = enabled;
            was
        };
        if was_enabled && !enabled {
            self.stop();
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Id of the message currently being voiced, if any.
    pub fn speaking_message_id(&self) -> Option<Uuid> {
        self.state.lock().speaking_message_id
    }

    /// Converts `text` to audio and plays it. No-op when voice output is
    /// disabled; all failures are absorbed.
    pub async fn speak(&self, text: &str, message_id: Uuid) {
        let (my_gen, wait) = {
            let mut st = self.state.lock();
            if !st.enabled {
                return;
            }
            // Stop any ongoing speech before starting new speech
            if let Some(handle) = st.playback.take() {
                handle.stop();
            }
            st.generation += 1;
            let my_gen = st.generation;

            let min_interval = Duration::from_millis(self.config.min_request_interval_ms);
            let wait = st
                .last_request_at
                .map(|at| min_interval.saturating_sub(at.elapsed()))
                .unwrap_or(Duration::ZERO);

            st.loading = true;
            st.speaking_message_id = Some(message_id);
            (my_gen, wait)
        };

        if !wait.is_zero() {
            debug!(
                "Rate limiting: waiting {}ms before TTS request",
                wait.as_millis()
            );
            tokio::time::sleep(wait).await;
        }

        {
            let mut st = self.state.lock();
            if st.generation != my_gen {
                return;
            }
            st.last_request_at = Some(Instant::now());
        }

        let clean_text = clean::prepare(text, self.config.max_chars);
        if clean_text.chars().count() < text.chars().count() {
            debug!(
                "Text truncated from {} to {} chars for reliable TTS",
                text.chars().count(),
                clean_text.chars().count()
            );
        }

        let audio = match self.request_with_retry(&clean_text).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Voice unavailable: {}", e);
                // A network-level failure shows a transient mood; a service
                // rejection after retries skips voice without comment.
                let mood = matches!(e, SpeechError::Http(_)).then_some(MOOD_VOICE_UNAVAILABLE);
                self.abandon(my_gen, mood);
                return;
            }
        };

        {
            let st = self.state.lock();
            if st.generation != my_gen {
                // Stopped or replaced while the request was in flight; the
                // audio that just arrived no longer has an owner.
                return;
            }
        }

        let handle = match self.sink.play(audio, self.config.playback).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Audio playback error: {}", e);
                self.abandon(my_gen, Some(MOOD_PLAYBACK_ERROR));
                return;
            }
        };

        {
            let mut st = self.state.lock();
            if st.generation != my_gen {
                handle.stop();
                return;
            }
            st.loading = false;
            st.playback = Some(handle.clone());
        }

        self.avatar.set_state(AnimationState::Responding);
        self.avatar.set_mood(MOOD_SPEAKING);

        let session = self.clone();
        tokio::spawn(async move {
            let end = handle.finished().await;
            session.on_playback_end(my_gen, end);
        });
    }

    /// Halts any active playback and returns to the resting state.
    /// Idempotent; callable at any time, including mid-retry.
    pub fn stop(&self) {
        {
            let mut st = self.state.lock();
            st.generation += 1;
            if let Some(handle) = st.playback.take() {
                handle.stop();
            }
            st.speaking_message_id = None;
            st.loading = false;
        }
        self.avatar.reset_to_idle();
    }

    async fn request_with_retry(&self, text: &str) -> Result<Bytes> {
        let max_retries = self.config.retry.max_retries;
        let delay = Duration::from_millis(self.config.retry.retry_delay_ms);
        let mut attempt = 0;
        loop {
            match self.engine.synthesize(text).await {
                Ok(audio) => return Ok(audio),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    debug!("Retry {}/{} for TTS...", attempt, max_retries);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn abandon(&self, gen: u64, mood: Option<&'static str>) {
        {
            let mut st = self.state.lock();
            if st.generation != gen {
                return;
            }
            st.speaking_message_id = None;
            st.loading = false;
        }
        self.avatar.reset_to_idle();
        if let Some(mood) = mood {
            self.avatar.set_transient_mood(mood, MOOD_CLEAR_DELAY);
        }
    }

    fn on_playback_end(&self, gen: u64, end: PlaybackEnd) {
        match end {
            PlaybackEnd::Completed => {
                {
                    let mut st = self.state.lock();
                    if st.generation != gen {
                        return;
                    }
                    st.speaking_message_id = None;
                    st.playback = None;
                }
                self.avatar.reset_to_idle();
            }
            // stop() already released the slot and reset the avatar
            PlaybackEnd::Stopped => {}
            PlaybackEnd::Failed(err) => {
                warn!("Audio playback error: {}", err);
                {
                    let mut st = self.state.lock();
                    if st.generation != gen {
                        return;
                    }
                    st.speaking_message_id = None;
                    st.loading = false;
                    st.playback = None;
                }
                self.avatar.reset_to_idle();
                self.avatar.set_transient_mood(MOOD_PLAYBACK_ERROR, MOOD_CLEAR_DELAY);
            }
        }
    }
}
