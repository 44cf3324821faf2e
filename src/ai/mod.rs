//! AI money-coach conversations, backed by a chat-completion provider.
//! Per-user provider keys are stored encrypted.

pub mod api_key;
pub mod handlers;
pub mod provider;

pub use api_key::{KeyVault, SealedKey};
pub use provider::{ChatTurn, CompletionProvider, HttpCompletionProvider};

/// System prompt for every coach conversation.
pub const COACH_SYSTEM_PROMPT: &str = "You are a supportive personal-finance coach inside a \
financial-literacy learning app. Explain concepts plainly, avoid jargon, never give \
individualized investment advice, and encourage the user to keep working through their \
course modules.";
