//! Session-scoped animation state and mood bubble.
//!
//! The context object is explicitly owned and handed to whoever drives the
//! avatar (the chat orchestrator and the voice session); renderers read
//! consistent snapshots. Mutation is serialized behind a single lock, and
//! every mutation is a no-op while animations are muted.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// The avatar's current behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    Idle,
    Wave,
    Listen,
    Responding,
}

impl AnimationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Wave => "wave",
            AnimationState::Listen => "listen",
            AnimationState::Responding => "responding",
        }
    }
}

/// Transient status overlay tied to the animation state but independently
/// clearable. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodAnnotation {
    pub text: String,
    pub visible: bool,
}

impl MoodAnnotation {
    fn hidden() -> Self {
        Self {
            text: String::new(),
            visible: false,
        }
    }
}

/// Consistent read of the avatar state for a render frame.
#[derive(Debug, Clone, Serialize)]
pub struct AvatarSnapshot {
    pub state: AnimationState,
    pub mood: MoodAnnotation,
}

struct AvatarInner {
    state: AnimationState,
    mood: MoodAnnotation,
    // Bumped on every mood change so delayed clears cannot wipe a newer mood.
    mood_seq: u64,
    muted: bool,
}

/// Shared handle to one avatar's animation state.
#[derive(Clone)]
pub struct AvatarContext {
    inner: Arc<RwLock<AvatarInner>>,
}

impl AvatarContext {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(AvatarInner {
                state: AnimationState::Idle,
                mood: MoodAnnotation::hidden(),
                mood_seq: 0,
                muted: false,
            })),
        }
    }

    pub fn snapshot(&self) -> AvatarSnapshot {
        let inner = self.inner.read();
        AvatarSnapshot {
            state: inner.state,
            mood: inner.mood.clone(),
        }
    }

    pub fn state(&self) -> AnimationState {
        self.inner.read().state
    }

    pub fn is_muted(&self) -> bool {
        self.inner.read().muted
    }

    pub fn set_muted(&self, muted: bool) {
        self.inner.write().muted = muted;
    }

    pub fn set_state(&self, state: AnimationState) {
        let mut inner = self.inner.write();
        if inner.muted {
            return;
        }
        inner.state = state;
    }

    /// Shows `text` as the visible mood bubble. Returns the mood sequence
    /// number, or `None` when muted.
    pub fn set_mood(&self, text: impl Into<String>) -> Option<u64> {
        let mut inner = self.inner.write();
        if inner.muted {
            return None;
        }
        inner.mood = MoodAnnotation {
            text: text.into(),
            visible: true,
        };
        inner.mood_seq += 1;
        Some(inner.mood_seq)
    }

    pub fn clear_mood(&self) {
        let mut inner = self.inner.write();
        if inner.muted {
            return;
        }
        inner.mood = MoodAnnotation::hidden();
        inner.mood_seq += 1;
    }

    /// Clears the mood only if no newer mood replaced the one identified by
    /// `seq` in the meantime.
    pub fn clear_mood_if(&self, seq: u64) {
        let mut inner = self.inner.write();
        if inner.muted || inner.mood_seq != seq {
            return;
        }
        inner.mood = MoodAnnotation::hidden();
        inner.mood_seq += 1;
    }

    /// Shows a mood and schedules it to clear after `clear_after`, unless a
    /// newer mood has been set by then.
    pub fn set_transient_mood(&self, text: impl Into<String>, clear_after: Duration) {
        let Some(seq) = self.set_mood(text) else {
            return;
        };
        let ctx = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(clear_after).await;
            ctx.clear_mood_if(seq);
        });
    }

    /// Returns the avatar to its resting pose and hides the mood bubble.
    pub fn reset_to_idle(&self) {
        let mut inner = self.inner.write();
        if inner.muted {
            return;
        }
        inner.state = AnimationState::Idle;
        inner.mood = MoodAnnotation::hidden();
        inner.mood_seq += 1;
    }
}

impl Default for AvatarContext {
    fn default() -> Self {
        Self::new()
    }
}
