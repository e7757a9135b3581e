//! Chat session orchestration.
//!
//! One session drives each chat turn end-to-end: append the user message,
//! walk the avatar through listen/responding, call the chat collaborator,
//! append the reply, hand it to the voice session, and settle back to idle
//! on timed transitions. Only one request may be in flight per session;
//! failures become visible assistant messages and never propagate.

use crate::backend::ChatBackend;
use pactum_avatar::{AnimationState, AvatarContext};
use pactum_core::types::Message;
use pactum_spk::VoiceSession;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Delay between the listen and responding phases of a turn.
pub const LISTEN_TO_RESPONDING_DELAY: Duration = Duration::from_millis(800);

/// How long transient outcome moods stay visible.
pub const MOOD_CLEAR_DELAY: Duration = Duration::from_millis(2000);

/// Delay before the avatar settles back to idle after a turn.
pub const IDLE_RESET_DELAY: Duration = Duration::from_millis(3000);

/// Pause before a fresh assistant reply is voiced.
pub const AUTO_SPEAK_DELAY: Duration = Duration::from_millis(500);

/// How long the first-open greeting plays.
pub const GREETING_DURATION: Duration = Duration::from_millis(3000);

pub const WELCOME_MESSAGE: &str = "Hey there! 👋 I'm Dr. Chick, your Pactum contract buddy. \
Ask me about clauses, risks, or anything in your agreement - I'm here to help!\n\n\
💡 Just a heads up: I give general info, not legal advice. For binding questions, talk to a lawyer!";

const GREETING_MOOD: &str = "Hi! I'm Dr. Chick. I'll help you understand your contract!";
const CONNECTION_TROUBLE_REPLY: &str =
    "I apologize, but I'm having trouble connecting right now. Please try again later.";

const MOOD_LISTENING: &str = "Listening...";
const MOOD_ANALYZING: &str = "Analyzing...";
const MOOD_FOUND: &str = "Here's what I found!";
const MOOD_ERROR: &str = "Oops! Something went wrong";

struct SessionInner {
    messages: Vec<Message>,
    in_flight: bool,
    greeted: bool,
}

#[derive(Clone)]
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    avatar: AvatarContext,
    voice: Option<VoiceSession>,
    inner: Arc<Mutex<SessionInner>>,
}

impl ChatSession {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        avatar: AvatarContext,
        voice: Option<VoiceSession>,
    ) -> Self {
        Self {
            backend,
            avatar,
            voice,
            inner: Arc::new(Mutex::new(SessionInner {
                messages: vec![Message::assistant(WELCOME_MESSAGE)],
                in_flight: false,
                greeted: false,
            })),
        }
    }

    /// Snapshot of the message log in insertion order.
    pub fn messages(&self) -> Vec<Message> {
        self.inner.lock().messages.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().in_flight
    }

    pub fn avatar(&self) -> &AvatarContext {
        &self.avatar
    }

    pub fn voice(&self) -> Option<&VoiceSession> {
        self.voice.as_ref()
    }

    /// One-time wave on first open. Subsequent calls are no-ops.
    pub async fn greet(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.greeted || self.avatar.is_muted() {
                return;
            }
            inner.greeted = true;
        }

        self.avatar.set_state(AnimationState::Wave);
        self.avatar.set_mood(GREETING_MOOD);
        tokio::time::sleep(GREETING_DURATION).await;
        self.avatar.reset_to_idle();
    }

    /// Runs one chat turn. Empty or whitespace-only input is ignored, as is
    /// any call made while a previous turn is still in flight.
    pub async fn submit(&self, user_text: &str) {
        {
            let mut inner = self.inner.lock();
            if user_text.trim().is_empty() || inner.in_flight {
                return;
            }
            inner.in_flight = true;
            inner.messages.push(Message::user(user_text));
        }

        self.avatar.set_state(AnimationState::Listen);
        self.avatar.set_mood(MOOD_LISTENING);
        tokio::time::sleep(LISTEN_TO_RESPONDING_DELAY).await;
        self.avatar.set_state(AnimationState::Responding);
        self.avatar.set_mood(MOOD_ANALYZING);

        match self.backend.send(user_text).await {
            Ok(reply) => {
                let message = Message::assistant(reply);
                let (id, content) = (message.id, message.content.clone());
                self.inner.lock().messages.push(message);

                self.avatar.set_transient_mood(MOOD_FOUND, MOOD_CLEAR_DELAY);

                if let Some(voice) = self.voice.clone().filter(|v| v.is_enabled()) {
                    tokio::spawn(async move {
                        // Small delay to let the animation start
                        tokio::time::sleep(AUTO_SPEAK_DELAY).await;
                        voice.speak(&content, id).await;
                    });
                }
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                self.inner
                    .lock()
                    .messages
                    .push(Message::assistant(CONNECTION_TROUBLE_REPLY));
                self.avatar.set_state(AnimationState::Idle);
                self.avatar.set_transient_mood(MOOD_ERROR, MOOD_CLEAR_DELAY);
            }
        }

        self.inner.lock().in_flight = false;

        let avatar = self.avatar.clone();
        tokio::spawn(async move {
            tokio::time::sleep(IDLE_RESET_DELAY).await;
            avatar.reset_to_idle();
        });
    }
}
