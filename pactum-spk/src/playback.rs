//! Audio playback seam.
//!
//! Synthesis produces bytes; what plays them differs per embedding (a real
//! output device, a browser bridge, a test double). The sink trait keeps
//! the voice session independent of that choice. A playback handle has two
//! sides: the handle held by the session (stop / wait for the outcome) and
//! the driver held by the sink implementation (observe stop, report the
//! outcome). Exactly one logical owner holds the handle at a time.

use crate::config::PlaybackConfig;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};

/// How a playback ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEnd {
    /// Ran to natural completion
    Completed,
    /// Halted by an explicit stop
    Stopped,
    /// The underlying player failed
    Failed(String),
}

struct PlaybackShared {
    stop: Notify,
    stop_requested: AtomicBool,
    end_tx: watch::Sender<Option<PlaybackEnd>>,
}

/// Session-side handle to one active playback.
#[derive(Clone)]
pub struct PlaybackHandle {
    shared: Arc<PlaybackShared>,
}

/// Sink-side counterpart used to drive a playback to its end.
pub struct PlaybackDriver {
    shared: Arc<PlaybackShared>,
}

/// Creates a linked handle/driver pair.
pub fn playback_channel() -> (PlaybackHandle, PlaybackDriver) {
    let (end_tx, _) = watch::channel(None);
    let shared = Arc::new(PlaybackShared {
        stop: Notify::new(),
        stop_requested: AtomicBool::new(false),
        end_tx,
    });
    (
        PlaybackHandle {
            shared: shared.clone(),
        },
        PlaybackDriver { shared },
    )
}

impl PlaybackHandle {
    /// Requests an immediate halt. Idempotent.
    pub fn stop(&self) {
        self.shared.stop_requested.store(true, Ordering::SeqCst);
        self.shared.stop.notify_waiters();
    }

    /// Waits for the playback outcome.
    pub async fn finished(&self) -> PlaybackEnd {
        let mut rx = self.shared.end_tx.subscribe();
        loop {
            if let Some(end) = rx.borrow().clone() {
                return end;
            }
            if rx.changed().await.is_err() {
                // Driver dropped without reporting; treat as stopped.
                return PlaybackEnd::Stopped;
            }
        }
    }
}

impl PlaybackDriver {
    pub fn is_stopped(&self) -> bool {
        self.shared.stop_requested.load(Ordering::SeqCst)
    }

    /// Resolves once a stop has been requested.
    pub async fn stop_requested(&self) {
        if self.is_stopped() {
            return;
        }
        self.shared.stop.notified().await;
    }

    /// Reports the playback outcome to the handle side.
    pub fn finish(&self, end: PlaybackEnd) {
        let _ = self.shared.end_tx.send(Some(end));
    }
}

/// Trait for audio playback backends.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Starts playing `audio` and returns a handle once playback has begun.
    async fn play(&self, audio: Bytes, settings: PlaybackConfig) -> Result<PlaybackHandle>;
}

/// Sink for headless deployments: holds the playback slot open for the
/// audio's estimated duration without producing sound.
pub struct SilentSink {
    /// Estimated MPEG bitrate used to derive a duration, in bytes/second
    bytes_per_sec: f64,
}

impl SilentSink {
    pub fn new() -> Self {
        // 128 kbit/s, the ElevenLabs default output
        Self {
            bytes_per_sec: 16_000.0,
        }
    }
}

impl Default for SilentSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioSink for SilentSink {
    async fn play(&self, audio: Bytes, settings: PlaybackConfig) -> Result<PlaybackHandle> {
        let (handle, driver) = playback_channel();
        let secs = audio.len() as f64 / self.bytes_per_sec / settings.rate as f64;
        let duration = std::time::Duration::from_secs_f64(secs);

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(duration) => driver.finish(PlaybackEnd::Completed),
                _ = driver.stop_requested() => driver.finish(PlaybackEnd::Stopped),
            }
        });

        Ok(handle)
    }
}
