//! Remote conversational service: the trait the chat worker talks to, and the
//! Watson Conversation HTTP client that implements it.

mod watson;

pub use watson::WatsonClient;

use async_trait::async_trait;
use std::fmt;

/// Opaque id correlating every call of one conversation. Constant for the
/// process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Fresh token for a desktop session (`desktop-<uuid>`).
    pub fn generate() -> Self {
        Self(format!("desktop-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("conversation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("conversation api error: {0}")]
    Api(String),
    #[error("conversation service not configured: missing {0}")]
    NotConfigured(&'static str),
}

/// Conversation backend. Calls for one token are made one at a time by the worker.
#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Start (or restart) the conversation and return the welcome text.
    async fn start_session(&self, token: &SessionToken) -> Result<String, ServiceError>;

    /// Send user text and return the reply text.
    async fn send_message(&self, token: &SessionToken, text: &str) -> Result<String, ServiceError>;

    /// Forget any conversation state held for `token`.
    async fn clear_session(&self, token: &SessionToken) -> Result<(), ServiceError>;
}
