//! Error types for follow operations.

use thiserror::Error;

/// Main error type for follow operations.
#[derive(Debug, Error)]
pub enum FollowError {
    /// A store or RPC call rejected.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// A topic action needs a signed-in user and there is none.
    #[error("No authenticated session")]
    Unauthenticated,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FollowError {
    pub fn transport(msg: impl Into<String>) -> Self {
        FollowError::Transport(msg.into())
    }
}

impl From<serde_json::Error> for FollowError {
    fn from(e: serde_json::Error) -> Self {
        FollowError::Serialization(e.to_string())
    }
}

/// Result type for follow operations.
pub type Result<T> = std::result::Result<T, FollowError>;
