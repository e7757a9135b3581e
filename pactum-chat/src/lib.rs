pub mod backend;
pub mod session;

pub use backend::{BackendError, ChatBackend, FlowchartClient, HttpChatBackend, FALLBACK_REPLY};
pub use session::{ChatSession, WELCOME_MESSAGE};
